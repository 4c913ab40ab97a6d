//! Schema-aware comparison of one identifier across two snapshots.
//!
//! The entry point is [`compare`]. It walks the fixed descriptor schema and
//! reports differences to a [`Visitor`] as nested section and field events.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::diff::visitor::{DiffEvent, Visitor};
use crate::errors::{BundleDiffError, ExError, Result};
use crate::model::{
    localize, AttributeDefinition, ComponentDescriptor, Designate, FieldValue, LocalizationTable,
    MetaTypeDescriptor, ObjectClassDefinition, ReferenceDescriptor, ServiceDescriptor, Snapshot,
};
use crate::sets;

pub const SECTION_DECLARATIVE_SERVICES: &str = "Declarative Services";
pub const SECTION_ATTRIBUTES: &str = "Attributes";
pub const SECTION_PROPERTIES: &str = "Properties";
pub const SECTION_SERVICE: &str = "Service";
pub const SECTION_REFERENCES: &str = "References";
pub const SECTION_IMPLEMENTATION: &str = "Implementation";
pub const SECTION_METATYPE: &str = "MetaType";
pub const SECTION_DESIGNATES: &str = "Designates";
pub const SECTION_OBJECT_CLASS_DEFINITIONS: &str = "ObjectClassDefinitions";
pub const SECTION_ATTRIBUTE_DEFINITIONS: &str = "AttributeDefinitions";

/// Metadata of one side for the identifier under comparison
#[derive(Debug, Clone, Copy)]
struct Side<'a> {
    component: Option<&'a ComponentDescriptor>,
    metatype: Option<&'a MetaTypeDescriptor>,
    localization: Option<&'a LocalizationTable>,
}

impl<'a> Side<'a> {
    fn of(snapshot: &'a Snapshot, identifier: &str) -> Self {
        Self {
            component: snapshot.component(identifier),
            metatype: snapshot.metatype(identifier),
            localization: snapshot.localization(identifier),
        }
    }
}

/// Localization tables of both sides
#[derive(Debug, Clone, Copy)]
struct Localizers<'a> {
    left: Option<&'a LocalizationTable>,
    right: Option<&'a LocalizationTable>,
}

/// Correlated and indexed metadata of one side
///
/// Everything that can fail for an identifier is resolved here, before the
/// first event reaches the visitor.
#[derive(Debug)]
struct Resolved<'a> {
    references: BTreeMap<String, &'a ReferenceDescriptor>,
    designate: Option<&'a Designate>,
    ocd: Option<ResolvedOcd<'a>>,
}

#[derive(Debug)]
struct ResolvedOcd<'a> {
    ocd: &'a ObjectClassDefinition,
    attribute_definitions: BTreeMap<String, &'a AttributeDefinition>,
}

impl<'a> Resolved<'a> {
    fn of(identifier: &str, side: Side<'a>) -> Result<Self> {
        let references = reference_map(side.component)?;
        let designate = correlate(identifier, side.metatype)?;
        let ocd = resolve_ocd(identifier, side.metatype, designate)
            .map(|ocd| {
                keyed(SECTION_ATTRIBUTE_DEFINITIONS, &ocd.attribute_definitions, |ad| {
                    ad.id.clone()
                })
                .map(|attribute_definitions| ResolvedOcd {
                    ocd,
                    attribute_definitions,
                })
            })
            .transpose()?;
        Ok(Self {
            references,
            designate,
            ocd,
        })
    }
}

/// Comparison of a single identifier
///
/// Holds only borrowed views of the two snapshots; visiting does not mutate
/// it, so the same comparison can be replayed against several visitors.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    identifier: &'a str,
    left: Side<'a>,
    right: Side<'a>,
}

/// Compare `identifier` between two snapshots, reporting to `visitor`
///
/// A correlation or key error is raised before any event is delivered, so
/// the visitor never sees a partial identifier.
///
/// # Errors
///
/// - `AmbiguousCorrelation`: more than one Designate on one side claims the identifier
/// - `DuplicateKey`: two references or attribute definitions on one side share a key
/// - any error returned by the visitor
pub fn compare<V>(identifier: &str, left: &Snapshot, right: &Snapshot, visitor: &mut V) -> Result<()>
where
    V: Visitor + ?Sized,
{
    Comparison::new(identifier, left, right).visit(visitor)
}

impl<'a> Comparison<'a> {
    pub fn new(identifier: &'a str, left: &'a Snapshot, right: &'a Snapshot) -> Self {
        Self {
            identifier,
            left: Side::of(left, identifier),
            right: Side::of(right, identifier),
        }
    }

    /// Walk the schema and report every difference
    ///
    /// # Errors
    ///
    /// See [`compare`].
    pub fn visit<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        debug!(identifier = self.identifier, "comparing identifier");
        self.resolve()
            .and_then(|(left, right)| self.walk(visitor, &left, &right))
            .map_err(|e| match e.identifier() {
                Some(_) => e,
                None => e.with_identifier(self.identifier),
            })
    }

    fn resolve(&self) -> Result<(Resolved<'a>, Resolved<'a>)> {
        Ok((
            Resolved::of(self.identifier, self.left)?,
            Resolved::of(self.identifier, self.right)?,
        ))
    }

    fn walk<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        left: &Resolved<'a>,
        right: &Resolved<'a>,
    ) -> Result<()> {
        visitor.visit(DiffEvent::Enter(self.identifier))?;
        self.visit_declarative_services(visitor, left, right)?;
        self.visit_metatype(visitor, left, right)?;
        visitor.visit(DiffEvent::Leave(self.identifier))
    }

    fn localizers(&self) -> Localizers<'a> {
        Localizers {
            left: self.left.localization,
            right: self.right.localization,
        }
    }

    // ----- Declarative Services -----

    fn visit_declarative_services<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        left_resolved: &Resolved<'a>,
        right_resolved: &Resolved<'a>,
    ) -> Result<()> {
        let (left, right) = (self.left.component, self.right.component);

        visitor.visit(DiffEvent::Enter(SECTION_DECLARATIVE_SERVICES))?;
        visit_component_attributes(visitor, left, right)?;

        let left_props = property_map(left);
        let right_props = property_map(right);
        visit_keyed(visitor, SECTION_PROPERTIES, &left_props, &right_props, |v, key, l, r| {
            visit_value(v, key, l.cloned(), r.cloned())
        })?;

        visit_service(
            visitor,
            left.and_then(|c| c.service.as_ref()),
            right.and_then(|c| c.service.as_ref()),
        )?;

        visit_keyed(
            visitor,
            SECTION_REFERENCES,
            &left_resolved.references,
            &right_resolved.references,
            visit_reference,
        )?;

        visitor.visit(DiffEvent::Enter(SECTION_IMPLEMENTATION))?;
        visit_field(visitor, "class", left, right, |c| text(&c.implementation_class))?;
        visitor.visit(DiffEvent::Leave(SECTION_IMPLEMENTATION))?;

        visitor.visit(DiffEvent::Leave(SECTION_DECLARATIVE_SERVICES))
    }

    // ----- MetaType -----

    fn visit_metatype<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        left_resolved: &Resolved<'a>,
        right_resolved: &Resolved<'a>,
    ) -> Result<()> {
        let (left, right) = (self.left.metatype, self.right.metatype);

        visitor.visit(DiffEvent::Enter(SECTION_METATYPE))?;

        visitor.visit(DiffEvent::Enter(SECTION_ATTRIBUTES))?;
        visit_field(visitor, "namespace", left, right, |m| text(&m.namespace))?;
        visitor.visit(DiffEvent::Leave(SECTION_ATTRIBUTES))?;

        let left_designates = single_entry(self.identifier, left_resolved.designate);
        let right_designates = single_entry(self.identifier, right_resolved.designate);
        visit_keyed(
            visitor,
            SECTION_DESIGNATES,
            &left_designates,
            &right_designates,
            visit_designate,
        )?;

        let left_ocds = single_entry(self.identifier, left_resolved.ocd.as_ref());
        let right_ocds = single_entry(self.identifier, right_resolved.ocd.as_ref());
        let l10n = self.localizers();
        visit_keyed(
            visitor,
            SECTION_OBJECT_CLASS_DEFINITIONS,
            &left_ocds,
            &right_ocds,
            |v, key, l, r| visit_object_class_definition(v, key, l, r, l10n),
        )?;

        visitor.visit(DiffEvent::Leave(SECTION_METATYPE))
    }
}

fn visit_component_attributes<V: Visitor + ?Sized>(
    visitor: &mut V,
    left: Option<&ComponentDescriptor>,
    right: Option<&ComponentDescriptor>,
) -> Result<()> {
    visitor.visit(DiffEvent::Enter(SECTION_ATTRIBUTES))?;
    visit_field(visitor, "name", left, right, |c| text(&c.name))?;
    visit_field(visitor, "enabled", left, right, |c| c.enabled.map(FieldValue::Bool))?;
    visit_field(visitor, "configurationPid", left, right, |c| {
        Some(FieldValue::List(c.configuration_pid.clone()))
    })?;
    visit_field(visitor, "configurationPolicy", left, right, |c| {
        text(&c.configuration_policy)
    })?;
    visit_field(visitor, "activate", left, right, |c| text(&c.activate))?;
    visit_field(visitor, "modified", left, right, |c| text(&c.modified))?;
    visit_field(visitor, "deactivate", left, right, |c| text(&c.deactivate))?;
    visit_field(visitor, "factoryIdentifier", left, right, |c| {
        text(&c.factory_identifier)
    })?;
    visit_field(visitor, "serviceScope", left, right, |c| {
        c.service_scope().map(FieldValue::text)
    })?;
    visitor.visit(DiffEvent::Leave(SECTION_ATTRIBUTES))
}

fn visit_service<V: Visitor + ?Sized>(
    visitor: &mut V,
    left: Option<&ServiceDescriptor>,
    right: Option<&ServiceDescriptor>,
) -> Result<()> {
    visitor.visit(DiffEvent::Enter(SECTION_SERVICE))?;
    visit_field(visitor, "scope", left, right, |s| text(&s.scope))?;
    visit_field(visitor, "provide", left, right, |s| {
        Some(FieldValue::List(s.provides.clone()))
    })?;
    visitor.visit(DiffEvent::Leave(SECTION_SERVICE))
}

fn visit_reference<V: Visitor + ?Sized>(
    visitor: &mut V,
    key: &str,
    left: Option<&ReferenceDescriptor>,
    right: Option<&ReferenceDescriptor>,
) -> Result<()> {
    visitor.visit(DiffEvent::Enter(key))?;
    visit_field(visitor, "name", left, right, |r| Some(FieldValue::text(&r.name)))?;
    visit_field(visitor, "interface", left, right, |r| text(&r.interface))?;
    visit_field(visitor, "cardinality", left, right, |r| text(&r.cardinality))?;
    visit_field(visitor, "bind", left, right, |r| text(&r.bind))?;
    visit_field(visitor, "unbind", left, right, |r| text(&r.unbind))?;
    visit_field(visitor, "updated", left, right, |r| text(&r.updated))?;
    visit_field(visitor, "field", left, right, |r| text(&r.field))?;
    visit_field(visitor, "field-option", left, right, |r| text(&r.field_option))?;
    visit_field(visitor, "field-collection", left, right, |r| {
        text(&r.field_collection_type)
    })?;
    visit_field(visitor, "policy", left, right, |r| text(&r.policy))?;
    visit_field(visitor, "policy-option", left, right, |r| text(&r.policy_option))?;
    visit_field(visitor, "target", left, right, |r| text(&r.target))?;
    visitor.visit(DiffEvent::Leave(key))
}

fn visit_designate<V: Visitor + ?Sized>(
    visitor: &mut V,
    key: &str,
    left: Option<&Designate>,
    right: Option<&Designate>,
) -> Result<()> {
    visitor.visit(DiffEvent::Enter(key))?;
    visit_field(visitor, "pid", left, right, |d| text(&d.pid))?;
    visit_field(visitor, "factoryPid", left, right, |d| text(&d.factory_pid))?;
    visit_field(visitor, "bundleLocation", left, right, |d| text(&d.bundle_location))?;
    visit_field(visitor, "merge", left, right, |d| d.merge.map(FieldValue::Bool))?;
    visit_field(visitor, "optional", left, right, |d| d.optional.map(FieldValue::Bool))?;
    visit_field(visitor, "ocdRef", left, right, |d| text(&d.ocd_ref))?;
    visitor.visit(DiffEvent::Leave(key))
}

fn visit_object_class_definition<V: Visitor + ?Sized>(
    visitor: &mut V,
    key: &str,
    left: Option<&ResolvedOcd<'_>>,
    right: Option<&ResolvedOcd<'_>>,
    l10n: Localizers<'_>,
) -> Result<()> {
    let (left_ocd, right_ocd) = (left.map(|o| o.ocd), right.map(|o| o.ocd));
    visitor.visit(DiffEvent::Enter(key))?;
    visit_field(visitor, "id", left_ocd, right_ocd, |o| text(&o.id))?;
    visit_localized_field(visitor, "name", left_ocd, right_ocd, l10n, |o| text(&o.name))?;
    visit_localized_field(visitor, "description", left_ocd, right_ocd, l10n, |o| {
        text(&o.description)
    })?;

    let empty = BTreeMap::new();
    visit_keyed(
        visitor,
        SECTION_ATTRIBUTE_DEFINITIONS,
        left.map_or(&empty, |o| &o.attribute_definitions),
        right.map_or(&empty, |o| &o.attribute_definitions),
        |v, ad_key, l, r| visit_attribute_definition(v, ad_key, l, r, l10n),
    )?;

    visitor.visit(DiffEvent::Leave(key))
}

fn visit_attribute_definition<V: Visitor + ?Sized>(
    visitor: &mut V,
    key: &str,
    left: Option<&AttributeDefinition>,
    right: Option<&AttributeDefinition>,
    l10n: Localizers<'_>,
) -> Result<()> {
    visitor.visit(DiffEvent::Enter(key))?;
    visit_field(visitor, "id", left, right, |a| text(&a.id))?;
    visit_localized_field(visitor, "name", left, right, l10n, |a| text(&a.name))?;
    visit_localized_field(visitor, "description", left, right, l10n, |a| {
        text(&a.description)
    })?;
    visit_field(visitor, "type", left, right, |a| text(&a.attribute_type))?;
    visit_field(visitor, "cardinality", left, right, |a| {
        a.cardinality.map(FieldValue::Integer)
    })?;
    visit_field(visitor, "defaultValue", left, right, |a| list(&a.default_value))?;
    visit_field(visitor, "min", left, right, |a| text(&a.min))?;
    visit_field(visitor, "max", left, right, |a| text(&a.max))?;
    visit_localized_field(visitor, "optionLabels", left, right, l10n, |a| {
        list(&a.option_labels)
    })?;
    visit_field(visitor, "optionValues", left, right, |a| list(&a.option_values))?;
    visitor.visit(DiffEvent::Leave(key))
}

// ----- Correlation -----

/// The Designate of one side that claims `identifier`
///
/// More than one claimant is an `AmbiguousCorrelation` error.
fn correlate<'m>(
    identifier: &str,
    metatype: Option<&'m MetaTypeDescriptor>,
) -> Result<Option<&'m Designate>> {
    let Some(metatype) = metatype else {
        return Ok(None);
    };
    let claimants: Vec<&Designate> = metatype.designates_for(identifier).collect();
    match claimants.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(*single)),
        many => Err(BundleDiffError::AmbiguousCorrelation {
            identifier: identifier.to_string(),
            ocd_refs: many
                .iter()
                .map(|d| d.ocd_ref.clone().unwrap_or_default())
                .collect(),
        }
        .into()),
    }
}

/// The OCD referenced by the correlated Designate
fn resolve_ocd<'m>(
    identifier: &str,
    metatype: Option<&'m MetaTypeDescriptor>,
    designate: Option<&Designate>,
) -> Option<&'m ObjectClassDefinition> {
    let metatype = metatype?;
    let ocd_ref = designate?.ocd_ref.as_deref()?;
    let ocd = metatype.object_class_definition(ocd_ref);
    if ocd.is_none() {
        warn!(identifier, ocd_ref, "designate references an unknown object class definition");
    }
    ocd
}

// ----- Keyed sections -----

fn property_map(component: Option<&ComponentDescriptor>) -> BTreeMap<String, &FieldValue> {
    component
        .map(|c| c.properties.iter().map(|(k, v)| (k.clone(), v)).collect())
        .unwrap_or_default()
}

fn reference_map(component: Option<&ComponentDescriptor>) -> Result<BTreeMap<String, &ReferenceDescriptor>> {
    keyed(
        SECTION_REFERENCES,
        component.map(|c| c.references.as_slice()).unwrap_or_default(),
        |r| Some(decapitalize(&r.name)),
    )
}

fn single_entry<'m, T>(key: &str, item: Option<&'m T>) -> BTreeMap<String, &'m T> {
    item.map(|item| (key.to_string(), item)).into_iter().collect()
}

/// Index `items` by `key`, rejecting duplicates
///
/// Items without a key cannot be correlated and are skipped.
fn keyed<'s, T>(
    section: &str,
    items: &'s [T],
    key: impl Fn(&T) -> Option<String>,
) -> Result<BTreeMap<String, &'s T>> {
    let mut map = BTreeMap::new();
    for item in items {
        let Some(k) = key(item) else {
            warn!(section, "skipping entry without a key");
            continue;
        };
        if map.insert(k.clone(), item).is_some() {
            return Err(ExError::from(BundleDiffError::DuplicateKey {
                section: section.to_string(),
                key: k,
            }));
        }
    }
    Ok(map)
}

/// Visit the union of keys of both maps in ascending order
fn visit_keyed<'s, T, V, F>(
    visitor: &mut V,
    section: &str,
    left: &BTreeMap<String, &'s T>,
    right: &BTreeMap<String, &'s T>,
    mut visit_entry: F,
) -> Result<()>
where
    T: ?Sized,
    V: Visitor + ?Sized,
    F: FnMut(&mut V, &str, Option<&'s T>, Option<&'s T>) -> Result<()>,
{
    visitor.visit(DiffEvent::Enter(section))?;
    let keys = sets::union(&key_set(left), &key_set(right));
    for key in &keys {
        visit_entry(visitor, key, left.get(key).copied(), right.get(key).copied())?;
    }
    visitor.visit(DiffEvent::Leave(section))
}

fn key_set<T>(map: &BTreeMap<String, T>) -> BTreeSet<String> {
    map.keys().cloned().collect()
}

// ----- Fields -----

fn visit_field<S, V>(
    visitor: &mut V,
    name: &str,
    left: Option<&S>,
    right: Option<&S>,
    extract: impl Fn(&S) -> Option<FieldValue>,
) -> Result<()>
where
    V: Visitor + ?Sized,
{
    visit_value(visitor, name, left.and_then(&extract), right.and_then(&extract))
}

/// Like [`visit_field`], resolving localization keys on each side first
fn visit_localized_field<S, V>(
    visitor: &mut V,
    name: &str,
    left: Option<&S>,
    right: Option<&S>,
    l10n: Localizers<'_>,
    extract: impl Fn(&S) -> Option<FieldValue>,
) -> Result<()>
where
    V: Visitor + ?Sized,
{
    let left_value = left
        .and_then(&extract)
        .map(|v| v.map_text(|s| localize(&s, l10n.left)));
    let right_value = right
        .and_then(&extract)
        .map(|v| v.map_text(|s| localize(&s, l10n.right)));
    visit_value(visitor, name, left_value, right_value)
}

/// Apply the field rule: absent/absent and equal pairs are silent
fn visit_value<V: Visitor + ?Sized>(
    visitor: &mut V,
    name: &str,
    left: Option<FieldValue>,
    right: Option<FieldValue>,
) -> Result<()> {
    match (left, right) {
        (None, None) => Ok(()),
        (Some(value), None) => visitor.visit(DiffEvent::Removed {
            name,
            value: &value,
        }),
        (None, Some(value)) => visitor.visit(DiffEvent::Added {
            name,
            value: &value,
        }),
        (Some(l), Some(r)) if l == r => Ok(()),
        (Some(l), Some(r)) => visitor.visit(DiffEvent::Changed {
            name,
            left: &l,
            right: &r,
        }),
    }
}

fn text(value: &Option<String>) -> Option<FieldValue> {
    value.as_deref().map(FieldValue::text)
}

fn list(value: &Option<Vec<String>>) -> Option<FieldValue> {
    value.clone().map(FieldValue::List)
}

/// Lower-case the first character unless the name starts with two capitals
///
/// `LogService` becomes `logService`; `URLHandler` stays as is.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => first
            .to_lowercase()
            .chain(name.chars().skip(1))
            .collect(),
        (None, _) => String::new(),
    }
}
