#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use bundlediff_core::diff::diff_snapshots;
use bundlediff_core::errors::ExErrorKind;
use bundlediff_core::model::{FieldValue, Snapshot};
use common::{component, designate, metatype, ocd, table};

fn render(left: &Snapshot, right: &Snapshot) -> String {
    let mut out = Vec::new();
    diff_snapshots(left, right, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_two_empty_snapshots() {
    let out = render(&Snapshot::new("old.jar"), &Snapshot::new("new.jar"));
    assert_eq!(out, "No differences found between old.jar and new.jar\n");
}

#[test]
fn test_property_changes_render_under_their_sections() {
    let mut l = component("pid");
    l.properties.insert("timeout".to_string(), FieldValue::text("30"));
    let mut r = component("pid");
    r.properties.insert("timeout".to_string(), FieldValue::text("60"));
    r.properties.insert("retries".to_string(), FieldValue::text("3"));

    let out = render(
        &Snapshot::new("old.jar").with_component("pid", l),
        &Snapshot::new("new.jar").with_component("pid", r),
    );
    assert_eq!(
        out,
        "pid\n\
         \x20   Declarative Services\n\
         \x20       Properties\n\
         \x20           + retries = 3\n\
         \x20           - timeout = 30\n\
         \x20           + timeout = 60\n\
         \n"
    );
}

#[test]
fn test_identifier_blocks_are_separated_by_blank_lines() {
    let left = Snapshot::new("old.jar")
        .with_component("a", component("a"))
        .with_component("same", component("same"));
    let right = Snapshot::new("new.jar")
        .with_component("b", component("b"))
        .with_component("same", component("same"));

    let out = render(&left, &right);
    let blocks: Vec<&str> = out.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("a\n"));
    assert!(blocks[1].starts_with("b\n"));
    assert!(!out.contains("same"));
    assert!(!out.contains("No differences"));
}

#[test]
fn test_localized_label_renders_resolved_text() {
    let left = Snapshot::new("old.jar");
    let right = Snapshot::new("new.jar")
        .with_metatype("X", metatype("X", ocd("ocd.x", "%label")))
        .with_localization("X", table(&[("label", "Timeout (s)")]));

    let out = render(&left, &right);
    assert!(out.contains(
        "        ObjectClassDefinitions\n            X\n                + id = ocd.x\n                + name = Timeout (s)\n"
    ));
    assert!(!out.contains("%label"));
}

#[test]
fn test_summary_counts_identifiers() {
    let left = Snapshot::new("l").with_component("a", component("a"));
    let right = Snapshot::new("r").with_component("b", component("b"));
    let mut out = Vec::new();
    let summary = diff_snapshots(&left, &right, &mut out).unwrap();
    assert_eq!(summary.identifiers_compared, 2);
    assert!(summary.differences_found);
}

#[test]
fn test_ambiguous_identifier_leaves_no_partial_block() {
    // Given: "a" differs cleanly, "pid" has a property change and two
    // Designates claiming it on the left side
    let mut l = component("pid");
    l.properties.insert("timeout".to_string(), FieldValue::text("30"));
    let mut mt = metatype("pid", ocd("ocd.a", "A"));
    mt.designates.push(designate("pid", "ocd.b"));
    let left = Snapshot::new("old.jar")
        .with_component("a", component("a"))
        .with_component("pid", l)
        .with_metatype("pid", mt);
    let right = Snapshot::new("new.jar").with_component("pid", component("pid"));

    // When: We diff
    let mut out = Vec::new();
    let err = diff_snapshots(&left, &right, &mut out).unwrap_err();

    // Then: Only the complete block of "a" was written
    assert_eq!(err.kind(), ExErrorKind::AmbiguousCorrelation);
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("a\n"));
    assert!(out.ends_with("\n\n"));
    assert!(!out.contains("pid"));
    assert!(!out.contains("timeout"));
}

#[test]
fn test_ambiguous_single_identifier_writes_nothing() {
    let mut l = component("pid");
    l.properties.insert("timeout".to_string(), FieldValue::text("30"));
    let mut mt = metatype("pid", ocd("ocd.a", "A"));
    mt.designates.push(designate("pid", "ocd.b"));
    let left = Snapshot::new("old.jar")
        .with_component("pid", l)
        .with_metatype("pid", mt);
    let right = Snapshot::new("new.jar");

    let mut out = Vec::new();
    assert!(diff_snapshots(&left, &right, &mut out).is_err());
    assert!(out.is_empty());
}
