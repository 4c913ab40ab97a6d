//! Declarative Services component descriptor reader
//!
//! Every element named `component` (in any namespace) becomes one
//! [`ComponentDescriptor`]. Values a DS runtime would default are filled in
//! so that an explicit default and an omitted attribute compare equal.

use bundlediff_core::model::{
    ComponentDescriptor, FieldValue, ReferenceDescriptor, ServiceDescriptor,
};
use roxmltree::{Document, Node};
use tracing::warn;

use crate::errors::{invalid_descriptor, Result};
use crate::properties;
use crate::source::BundleSource;

const DEFAULT_CONFIGURATION_POLICY: &str = "optional";
const DEFAULT_ACTIVATE: &str = "activate";
const DEFAULT_DEACTIVATE: &str = "deactivate";
const DEFAULT_SCOPE: &str = "singleton";
const DEFAULT_CARDINALITY: &str = "1..1";
const DEFAULT_POLICY: &str = "static";
const DEFAULT_POLICY_OPTION: &str = "reluctant";
const DEFAULT_FIELD_OPTION: &str = "replace";
const DEFAULT_FIELD_COLLECTION_TYPE: &str = "service";

/// Placeholder for the component name in `configuration-pid`
const NAME_PLACEHOLDER: &str = "$";

/// Parse one service component resource
///
/// `properties` elements name further resources that are read through
/// `source`; a missing one is logged and skipped.
///
/// # Errors
///
/// Returns `InvalidDescriptor` if the resource is not well-formed XML.
pub fn parse_components<S: BundleSource + ?Sized>(
    xml: &str,
    resource: &str,
    source: &mut S,
) -> Result<Vec<ComponentDescriptor>> {
    let doc = Document::parse(xml).map_err(|e| invalid_descriptor(resource, e))?;
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "component")
        .map(|node| component(node, resource, source))
        .collect()
}

fn component<S: BundleSource + ?Sized>(
    node: Node<'_, '_>,
    resource: &str,
    source: &mut S,
) -> Result<ComponentDescriptor> {
    let implementation_class = child(node, "implementation")
        .and_then(|n| n.attribute("class"))
        .map(String::from);
    let name = attr(node, "name").or_else(|| implementation_class.clone());

    let configuration_pid = match node.attribute("configuration-pid") {
        Some(pids) => pids
            .split_whitespace()
            .map(|pid| match (pid, &name) {
                (NAME_PLACEHOLDER, Some(name)) => name.clone(),
                _ => pid.to_string(),
            })
            .collect(),
        None => name.iter().cloned().collect(),
    };

    let mut descriptor = ComponentDescriptor {
        enabled: Some(node.attribute("enabled").map_or(true, |v| v.trim() == "true")),
        configuration_pid,
        configuration_policy: attr(node, "configuration-policy")
            .or_else(|| Some(DEFAULT_CONFIGURATION_POLICY.to_string())),
        activate: attr(node, "activate").or_else(|| Some(DEFAULT_ACTIVATE.to_string())),
        modified: attr(node, "modified"),
        deactivate: attr(node, "deactivate").or_else(|| Some(DEFAULT_DEACTIVATE.to_string())),
        factory_identifier: attr(node, "factory"),
        service: child(node, "service").map(service),
        references: children(node, "reference").map(reference).collect(),
        implementation_class,
        name,
        ..ComponentDescriptor::default()
    };

    // property and properties apply in document order; later entries win
    for element in node.children().filter(Node::is_element) {
        match element.tag_name().name() {
            "property" => {
                if let Some((key, value)) = property(element) {
                    descriptor.properties.insert(key, value);
                }
            }
            "properties" => {
                let Some(entry) = element.attribute("entry") else {
                    continue;
                };
                match source.read_text(entry)? {
                    Some(text) => {
                        for (key, value) in properties::parse(&text) {
                            descriptor.properties.insert(key, FieldValue::Text(value));
                        }
                    }
                    None => warn!(
                        resource,
                        entry,
                        artifact = source.name(),
                        "properties entry not found"
                    ),
                }
            }
            _ => {}
        }
    }

    Ok(descriptor)
}

fn property(node: Node<'_, '_>) -> Option<(String, FieldValue)> {
    let name = node.attribute("name")?.to_string();
    let property_type = node.attribute("type").unwrap_or("String");

    let value = match node.attribute("value") {
        Some(value) => typed(property_type, value),
        None => {
            let lines: Vec<&str> = node
                .text()
                .unwrap_or_default()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            match lines.as_slice() {
                [single] => typed(property_type, single),
                _ => FieldValue::list(lines),
            }
        }
    };
    Some((name, value))
}

/// Convert a scalar to its declared type, keeping it as text if it does not parse
fn typed(property_type: &str, value: &str) -> FieldValue {
    let trimmed = value.trim();
    match property_type {
        "Long" | "Integer" | "Short" | "Byte" => trimmed
            .parse::<i64>()
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::text(value)),
        "Boolean" => trimmed
            .parse::<bool>()
            .map(FieldValue::Bool)
            .unwrap_or_else(|_| FieldValue::text(value)),
        _ => FieldValue::text(value),
    }
}

fn service(node: Node<'_, '_>) -> ServiceDescriptor {
    let legacy_factory = node.attribute("servicefactory") == Some("true");
    let scope = attr(node, "scope").unwrap_or_else(|| {
        if legacy_factory {
            "bundle".to_string()
        } else {
            DEFAULT_SCOPE.to_string()
        }
    });
    ServiceDescriptor {
        scope: Some(scope),
        provides: children(node, "provide")
            .filter_map(|p| p.attribute("interface"))
            .map(String::from)
            .collect(),
    }
}

fn reference(node: Node<'_, '_>) -> ReferenceDescriptor {
    let interface = attr(node, "interface");
    let field = attr(node, "field");
    let field_default = |value: Option<String>, default: &str| {
        value.or_else(|| field.as_ref().map(|_| default.to_string()))
    };

    ReferenceDescriptor {
        name: attr(node, "name")
            .or_else(|| interface.clone())
            .unwrap_or_default(),
        cardinality: attr(node, "cardinality").or_else(|| Some(DEFAULT_CARDINALITY.to_string())),
        policy: attr(node, "policy").or_else(|| Some(DEFAULT_POLICY.to_string())),
        policy_option: attr(node, "policy-option")
            .or_else(|| Some(DEFAULT_POLICY_OPTION.to_string())),
        target: attr(node, "target"),
        bind: attr(node, "bind"),
        unbind: attr(node, "unbind"),
        updated: attr(node, "updated"),
        field_option: field_default(attr(node, "field-option"), DEFAULT_FIELD_OPTION),
        field_collection_type: field_default(
            attr(node, "field-collection-type"),
            DEFAULT_FIELD_COLLECTION_TYPE,
        ),
        field,
        interface,
    }
}

fn attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(String::from)
}

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}
