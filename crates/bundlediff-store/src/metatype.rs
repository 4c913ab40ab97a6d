//! MetaType resource reader

use bundlediff_core::model::{
    AttributeDefinition, Designate, MetaTypeDescriptor, ObjectClassDefinition,
};
use roxmltree::{Document, Node};

use crate::errors::{invalid_descriptor, Result};

/// Directory holding MetaType resources inside a bundle
pub const METATYPE_DIR: &str = "OSGI-INF/metatype";

const DEFAULT_ATTRIBUTE_TYPE: &str = "String";

/// Parse one MetaType resource
///
/// # Errors
///
/// Returns `InvalidDescriptor` if the resource is not well-formed XML.
pub fn parse_metatype(xml: &str, resource: &str) -> Result<MetaTypeDescriptor> {
    let doc = Document::parse(xml).map_err(|e| invalid_descriptor(resource, e))?;
    let root = doc.root_element();

    Ok(MetaTypeDescriptor {
        namespace: root.tag_name().namespace().map(String::from),
        localization: attr(root, "localization"),
        designates: elements(root, "Designate").map(designate).collect(),
        object_class_definitions: elements(root, "OCD").map(object_class_definition).collect(),
    })
}

fn designate(node: Node<'_, '_>) -> Designate {
    Designate {
        pid: attr(node, "pid"),
        factory_pid: attr(node, "factoryPid"),
        bundle_location: attr(node, "bundle"),
        merge: Some(flag(node, "merge")),
        optional: Some(flag(node, "optional")),
        ocd_ref: elements(node, "Object")
            .next()
            .and_then(|o| attr(o, "ocdref")),
    }
}

fn object_class_definition(node: Node<'_, '_>) -> ObjectClassDefinition {
    ObjectClassDefinition {
        id: attr(node, "id"),
        name: attr(node, "name"),
        description: attr(node, "description"),
        attribute_definitions: elements(node, "AD").map(attribute_definition).collect(),
    }
}

fn attribute_definition(node: Node<'_, '_>) -> AttributeDefinition {
    let options: Vec<Node<'_, '_>> = elements(node, "Option").collect();
    let option_list = |key: &str| {
        (!options.is_empty()).then(|| {
            options
                .iter()
                .map(|o| o.attribute(key).unwrap_or_default().to_string())
                .collect::<Vec<String>>()
        })
    };

    AttributeDefinition {
        id: attr(node, "id"),
        name: attr(node, "name"),
        description: attr(node, "description"),
        attribute_type: attr(node, "type").or_else(|| Some(DEFAULT_ATTRIBUTE_TYPE.to_string())),
        cardinality: Some(
            node.attribute("cardinality")
                .and_then(|c| c.trim().parse().ok())
                .unwrap_or(0),
        ),
        default_value: node.attribute("default").map(split_default),
        min: attr(node, "min"),
        max: attr(node, "max"),
        option_labels: option_list("label"),
        option_values: option_list("value"),
    }
}

/// Split a `default` attribute on commas not preceded by a backslash
fn split_default(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ',' => parts.push(std::mem::take(&mut current).trim().to_string()),
            other => current.push(other),
        }
    }
    parts.push(current.trim().to_string());
    parts
}

fn flag(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name).map_or(false, |v| v.trim() == "true")
}

fn attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(String::from)
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}
