//! Snapshot extraction from bundles and snapshot documents

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

use bundlediff_core::model::{
    ComponentDescriptor, LocalizationTable, MetaTypeDescriptor, Snapshot,
};
use bundlediff_core::{log_op_end, log_op_error, log_op_start};
use tracing::{debug, warn};

use crate::document::{read_snapshot_document, DOCUMENT_EXTENSION};
use crate::ds::parse_components;
use crate::errors::{duplicate_identifier, io_error, missing_manifest, unsupported_artifact, Result};
use crate::manifest::{Manifest, BUNDLE_LOCALIZATION, MANIFEST_PATH};
use crate::metatype::{parse_metatype, METATYPE_DIR};
use crate::properties;
use crate::source::{find_resources, BundleSource, DirectorySource, JarSource};

/// Localization base name used when neither the MetaType resource nor the
/// manifest declares one
pub const DEFAULT_LOCALIZATION: &str = "OSGI-INF/l10n/bundle";

const PROPERTIES_SUFFIX: &str = ".properties";

/// Build a snapshot from the artifact at `path`
///
/// - `*.json` files are read as snapshot documents
/// - other files are read as bundle jars
/// - directories are read as exploded bundles
///
/// The snapshot is named after `path` as given.
///
/// # Errors
///
/// Fails if the artifact cannot be read, has no manifest, is not a valid
/// snapshot document, or declares one identifier twice.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let start = Instant::now();
    let name = path.display().to_string();
    log_op_start!("load_snapshot", artifact = name.as_str());

    let result = load(path, &name);
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(snapshot) => {
            log_op_end!(
                "load_snapshot",
                duration_ms = duration_ms,
                artifact = name.as_str(),
                component_count = snapshot.component_count() as u64,
                metatype_count = snapshot.metatype_count() as u64
            );
            Ok(snapshot)
        }
        Err(e) => {
            log_op_error!("load_snapshot", e.clone(), duration_ms = duration_ms, artifact = name.as_str());
            Err(e)
        }
    }
}

fn load(path: &Path, name: &str) -> Result<Snapshot> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error("load_snapshot", name, e))?;
    if metadata.is_dir() {
        read_bundle(&mut DirectorySource::new(name, path))
    } else if !metadata.is_file() {
        Err(unsupported_artifact(name))
    } else if path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION) {
        read_snapshot_document(path, name)
    } else {
        read_bundle(&mut JarSource::open(name, path)?)
    }
}

/// Extract Declarative Services and MetaType metadata from a bundle
///
/// Malformed individual descriptor resources are logged and skipped.
///
/// # Errors
///
/// Fails if the manifest is missing, a resource cannot be read, or two
/// descriptors of one kind claim the same identifier.
pub fn read_bundle<S: BundleSource + ?Sized>(source: &mut S) -> Result<Snapshot> {
    let manifest_text = source
        .read_text(MANIFEST_PATH)?
        .ok_or_else(|| missing_manifest(source.name()))?;
    let manifest = Manifest::parse(&manifest_text);

    let components = read_components(source, &manifest)?;
    let metatypes = read_metatypes(source)?;
    let localizations = read_localizations(source, &manifest, &metatypes)?;

    let snapshot = components
        .into_iter()
        .fold(Snapshot::new(source.name()), |s, (id, c)| s.with_component(id, c));
    let snapshot = metatypes
        .into_iter()
        .fold(snapshot, |s, (id, m)| s.with_metatype(id, m));
    Ok(localizations
        .into_iter()
        .fold(snapshot, |s, (id, t)| s.with_localization(id, t)))
}

fn read_components<S: BundleSource + ?Sized>(
    source: &mut S,
    manifest: &Manifest,
) -> Result<BTreeMap<String, ComponentDescriptor>> {
    let Some(patterns) = manifest.service_components() else {
        warn!(
            artifact = source.name(),
            "bundle has no Service-Component header, no components will be compared"
        );
        return Ok(BTreeMap::new());
    };

    let mut resources: Vec<String> = Vec::new();
    for pattern in &patterns {
        let matched = find_resources(source, pattern)?;
        if matched.is_empty() {
            warn!(artifact = source.name(), resource = pattern.as_str(), "service component resource not found");
        }
        for resource in matched {
            if !resources.contains(&resource) {
                resources.push(resource);
            }
        }
    }

    let mut components = BTreeMap::new();
    for resource in &resources {
        let Some(xml) = source.read_text(resource)? else {
            continue;
        };
        let parsed = match parse_components(&xml, resource, source) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(artifact = source.name(), resource = resource.as_str(), error = %e, "skipping malformed component resource");
                continue;
            }
        };
        for component in parsed {
            for identifier in component.identifiers() {
                insert_unique(&mut components, source.name(), "Declarative Services", identifier, component.clone())?;
            }
        }
    }
    debug!(artifact = source.name(), component_count = components.len() as u64, "components read");
    Ok(components)
}

fn read_metatypes<S: BundleSource + ?Sized>(
    source: &mut S,
) -> Result<BTreeMap<String, MetaTypeDescriptor>> {
    let prefix = format!("{}/", METATYPE_DIR);
    let resources: Vec<String> = source
        .resources()?
        .into_iter()
        .filter(|r| r.starts_with(&prefix) && r.ends_with(".xml"))
        .collect();

    let mut metatypes = BTreeMap::new();
    for resource in &resources {
        let Some(xml) = source.read_text(resource)? else {
            continue;
        };
        let metatype = match parse_metatype(&xml, resource) {
            Ok(metatype) => metatype,
            Err(e) => {
                warn!(artifact = source.name(), resource = resource.as_str(), error = %e, "skipping malformed metatype resource");
                continue;
            }
        };
        let identifiers: BTreeSet<String> = metatype
            .designates
            .iter()
            .filter_map(|d| d.pid_or_factory_pid())
            .map(String::from)
            .collect();
        for identifier in identifiers {
            insert_unique(&mut metatypes, source.name(), "MetaType", identifier, metatype.clone())?;
        }
    }
    debug!(artifact = source.name(), metatype_count = metatypes.len() as u64, "metatypes read");
    Ok(metatypes)
}

fn read_localizations<S: BundleSource + ?Sized>(
    source: &mut S,
    manifest: &Manifest,
    metatypes: &BTreeMap<String, MetaTypeDescriptor>,
) -> Result<BTreeMap<String, LocalizationTable>> {
    let mut tables: BTreeMap<String, LocalizationTable> = BTreeMap::new();
    let mut localizations = BTreeMap::new();
    for (identifier, metatype) in metatypes {
        let base = metatype
            .localization
            .as_deref()
            .or_else(|| manifest.header(BUNDLE_LOCALIZATION))
            .unwrap_or(DEFAULT_LOCALIZATION);
        let table = match tables.get(base) {
            Some(table) => table.clone(),
            None => {
                let path = format!("{}{}", base, PROPERTIES_SUFFIX);
                let table = source
                    .read_text(&path)?
                    .map(|text| properties::parse_table(&text))
                    .unwrap_or_default();
                tables.insert(base.to_string(), table.clone());
                table
            }
        };
        localizations.insert(identifier.clone(), table);
    }
    Ok(localizations)
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    artifact: &str,
    section: &str,
    identifier: String,
    value: T,
) -> Result<()> {
    match map.entry(identifier) {
        Entry::Occupied(occupied) => Err(duplicate_identifier(artifact, section, occupied.key())),
        Entry::Vacant(vacant) => {
            vacant.insert(value);
            Ok(())
        }
    }
}
