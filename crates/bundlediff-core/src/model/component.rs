use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::FieldValue;

/// Declarative Services component descriptor
///
/// One `component` element of a service component XML resource, with the
/// defaults a DS runtime applies already filled in by the extractor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentDescriptor {
    /// Component name
    pub name: Option<String>,

    /// Whether the component is enabled at bundle start
    pub enabled: Option<bool>,

    /// Configuration PIDs the component consumes
    pub configuration_pid: Vec<String>,

    /// `optional`, `require` or `ignore`
    pub configuration_policy: Option<String>,

    /// Lifecycle method names
    pub activate: Option<String>,
    pub modified: Option<String>,
    pub deactivate: Option<String>,

    /// Component factory identifier (`factory` attribute)
    pub factory_identifier: Option<String>,

    /// Component properties keyed by property name
    pub properties: BTreeMap<String, FieldValue>,

    /// Service registration, if the component provides services
    pub service: Option<ServiceDescriptor>,

    /// References in declaration order
    pub references: Vec<ReferenceDescriptor>,

    /// Fully qualified implementation class name
    pub implementation_class: Option<String>,
}

impl ComponentDescriptor {
    /// Create a descriptor with only the name and implementation class set
    pub fn new(name: impl Into<String>, implementation_class: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            implementation_class: Some(implementation_class.into()),
            ..Self::default()
        }
    }

    /// Effective service scope (the scope of the service descriptor)
    pub fn service_scope(&self) -> Option<&str> {
        self.service.as_ref().and_then(|s| s.scope.as_deref())
    }

    /// Identifiers this component is known by
    ///
    /// The declared configuration PIDs, or the component name when none are
    /// declared.
    pub fn identifiers(&self) -> Vec<String> {
        if self.configuration_pid.is_empty() {
            self.name.iter().cloned().collect()
        } else {
            self.configuration_pid.clone()
        }
    }
}

/// Service registration of a component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDescriptor {
    /// `singleton`, `bundle` or `prototype`
    pub scope: Option<String>,

    /// Provided interface names in declaration order
    pub provides: Vec<String>,
}

/// A component's dependency on another service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceDescriptor {
    pub name: String,
    pub interface: Option<String>,
    pub cardinality: Option<String>,
    pub policy: Option<String>,
    pub policy_option: Option<String>,
    pub target: Option<String>,
    pub bind: Option<String>,
    pub unbind: Option<String>,
    pub updated: Option<String>,
    pub field: Option<String>,
    pub field_option: Option<String>,
    pub field_collection_type: Option<String>,
}

impl ReferenceDescriptor {
    /// Create a reference with a name and interface
    pub fn new(name: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interface: Some(interface.into()),
            ..Self::default()
        }
    }
}
