use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::component::ComponentDescriptor;
use super::metatype::MetaTypeDescriptor;
use crate::sets;

/// Leading character marking a value as a localization key
pub const LOCALIZATION_MARKER: char = '%';

/// Localized strings for one identifier, keyed by message key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizationTable {
    entries: BTreeMap<String, String>,
}

impl LocalizationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the localized string for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set the localized string for a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve a possibly localized value against an optional table
///
/// Values without the marker are returned as-is. Marked values whose key is
/// missing (or when there is no table) fall back to the raw marked string.
pub fn localize(value: &str, table: Option<&LocalizationTable>) -> String {
    value
        .strip_prefix(LOCALIZATION_MARKER)
        .and_then(|key| table.and_then(|t| t.get(key)))
        .unwrap_or(value)
        .to_string()
}

/// Metadata extracted from one artifact
///
/// Built once by the extraction collaborator and read-only afterwards: the
/// `with_*` builders consume the snapshot, and only accessors take `&self`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    name: String,
    components: BTreeMap<String, ComponentDescriptor>,
    metatypes: BTreeMap<String, MetaTypeDescriptor>,
    localizations: BTreeMap<String, LocalizationTable>,
}

impl Snapshot {
    /// Create an empty snapshot for the named artifact
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Register a component descriptor under an identifier
    pub fn with_component(mut self, identifier: impl Into<String>, component: ComponentDescriptor) -> Self {
        self.components.insert(identifier.into(), component);
        self
    }

    /// Register a MetaType descriptor under an identifier
    pub fn with_metatype(mut self, identifier: impl Into<String>, metatype: MetaTypeDescriptor) -> Self {
        self.metatypes.insert(identifier.into(), metatype);
        self
    }

    /// Register a localization table under an identifier
    pub fn with_localization(mut self, identifier: impl Into<String>, table: LocalizationTable) -> Self {
        self.localizations.insert(identifier.into(), table);
        self
    }

    /// Display name of the artifact
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every identifier known to this snapshot
    pub fn identifiers(&self) -> BTreeSet<String> {
        let components: BTreeSet<String> = self.components.keys().cloned().collect();
        let metatypes: BTreeSet<String> = self.metatypes.keys().cloned().collect();
        sets::union(&components, &metatypes)
    }

    pub fn component(&self, identifier: &str) -> Option<&ComponentDescriptor> {
        self.components.get(identifier)
    }

    pub fn metatype(&self, identifier: &str) -> Option<&MetaTypeDescriptor> {
        self.metatypes.get(identifier)
    }

    pub fn localization(&self, identifier: &str) -> Option<&LocalizationTable> {
        self.localizations.get(identifier)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn metatype_count(&self) -> usize {
        self.metatypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.metatypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_union_components_and_metatypes() {
        let snapshot = Snapshot::new("left.jar")
            .with_component("a", ComponentDescriptor::new("a", "com.example.A"))
            .with_component("b", ComponentDescriptor::new("b", "com.example.B"))
            .with_metatype("b", MetaTypeDescriptor::default())
            .with_metatype("c", MetaTypeDescriptor::default());

        let ids: Vec<String> = snapshot.identifiers().into_iter().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(snapshot.name(), "left.jar");
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_localize_resolves_marked_values() {
        let table: LocalizationTable = [("label", "Timeout (s)")].into_iter().collect();
        assert_eq!(localize("%label", Some(&table)), "Timeout (s)");
        assert_eq!(localize("label", Some(&table)), "label");
    }

    #[test]
    fn test_localize_falls_back_to_raw_marked_value() {
        let table = LocalizationTable::new();
        assert_eq!(localize("%missing", Some(&table)), "%missing");
        assert_eq!(localize("%missing", None), "%missing");
    }
}
