use serde::{Deserialize, Serialize};

use crate::lookup::first_present;

/// MetaType resource: configuration type descriptors of a bundle
///
/// A single resource may designate several PIDs; the extractor registers the
/// same descriptor under each of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaTypeDescriptor {
    /// XML namespace of the MetaType resource
    pub namespace: Option<String>,

    /// Base name of the localization properties (`localization` attribute)
    pub localization: Option<String>,

    pub designates: Vec<Designate>,

    pub object_class_definitions: Vec<ObjectClassDefinition>,
}

impl MetaTypeDescriptor {
    /// Designates whose pid-or-factory-pid equals `identifier`
    pub fn designates_for<'a, 'b>(
        &'a self,
        identifier: &'b str,
    ) -> impl Iterator<Item = &'a Designate> + 'b
    where
        'a: 'b,
    {
        self.designates
            .iter()
            .filter(move |d| d.pid_or_factory_pid() == Some(identifier))
    }

    /// Object class definition with the given internal id
    pub fn object_class_definition(&self, id: &str) -> Option<&ObjectClassDefinition> {
        self.object_class_definitions
            .iter()
            .find(|ocd| ocd.id.as_deref() == Some(id))
    }
}

/// Binding from a PID (or factory PID) to an object class definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Designate {
    pub pid: Option<String>,
    pub factory_pid: Option<String>,
    pub bundle_location: Option<String>,
    pub merge: Option<bool>,
    pub optional: Option<bool>,
    /// Internal id of the referenced object class definition
    pub ocd_ref: Option<String>,
}

impl Designate {
    /// The PID if declared, otherwise the factory PID
    pub fn pid_or_factory_pid(&self) -> Option<&str> {
        first_present(self, &[Designate::declared_pid, Designate::declared_factory_pid])
    }

    fn declared_pid(&self) -> Option<&str> {
        self.pid.as_deref()
    }

    fn declared_factory_pid(&self) -> Option<&str> {
        self.factory_pid.as_deref()
    }
}

/// Type descriptor for a configuration's attribute set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectClassDefinition {
    pub id: Option<String>,
    /// Localizable
    pub name: Option<String>,
    /// Localizable
    pub description: Option<String>,
    pub attribute_definitions: Vec<AttributeDefinition>,
}

/// One configurable attribute of an object class definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeDefinition {
    pub id: Option<String>,
    /// Localizable
    pub name: Option<String>,
    /// Localizable
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub attribute_type: Option<String>,
    pub cardinality: Option<i64>,
    pub default_value: Option<Vec<String>>,
    pub min: Option<String>,
    pub max: Option<String>,
    /// Localizable, element by element
    pub option_labels: Option<Vec<String>>,
    pub option_values: Option<Vec<String>>,
}
