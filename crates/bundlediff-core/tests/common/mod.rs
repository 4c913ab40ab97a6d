//! Snapshot fixtures shared by the integration tests.

use bundlediff_core::model::{
    AttributeDefinition, ComponentDescriptor, Designate, LocalizationTable, MetaTypeDescriptor,
    ObjectClassDefinition,
};

/// Component with a name, implementation class and `configuration_pid = [name]`
#[allow(dead_code)]
pub fn component(name: &str) -> ComponentDescriptor {
    let mut c = ComponentDescriptor::new(name, format!("{}Impl", name));
    c.configuration_pid = vec![name.to_string()];
    c
}

/// MetaType descriptor with one designate `pid -> ocd_id` and the given OCD
#[allow(dead_code)]
pub fn metatype(pid: &str, ocd: ObjectClassDefinition) -> MetaTypeDescriptor {
    MetaTypeDescriptor {
        namespace: Some("http://www.osgi.org/xmlns/metatype/v1.2.0".to_string()),
        designates: vec![designate(pid, ocd.id.as_deref().unwrap_or_default())],
        object_class_definitions: vec![ocd],
        ..MetaTypeDescriptor::default()
    }
}

#[allow(dead_code)]
pub fn designate(pid: &str, ocd_ref: &str) -> Designate {
    Designate {
        pid: Some(pid.to_string()),
        ocd_ref: Some(ocd_ref.to_string()),
        ..Designate::default()
    }
}

#[allow(dead_code)]
pub fn ocd(id: &str, name: &str) -> ObjectClassDefinition {
    ObjectClassDefinition {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        ..ObjectClassDefinition::default()
    }
}

#[allow(dead_code)]
pub fn attribute(id: &str) -> AttributeDefinition {
    AttributeDefinition {
        id: Some(id.to_string()),
        attribute_type: Some("String".to_string()),
        cardinality: Some(0),
        ..AttributeDefinition::default()
    }
}

#[allow(dead_code)]
pub fn table(entries: &[(&str, &str)]) -> LocalizationTable {
    entries.iter().map(|(k, v)| (*k, *v)).collect()
}
