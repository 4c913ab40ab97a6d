#![allow(clippy::unwrap_used, clippy::expect_used)]

use bundlediff_core::diff::diff_snapshots;
use bundlediff_core::errors::{BundleDiffError, ExError, ExErrorKind};
use bundlediff_core::logging_facility::test_capture::init_test_capture;
use bundlediff_core::model::{ComponentDescriptor, Designate, MetaTypeDescriptor, Snapshot};
use bundlediff_core::{log_op_end, log_op_error, log_op_start};
use bundlediff_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_event = capture
        .find_event(op_name, EVENT_END)
        .expect("Should have end event");
    assert_eq!(end_event.field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = BundleDiffError::MissingManifest {
        artifact: "broken.jar".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_event = capture
        .find_event(op_name, EVENT_END_ERROR)
        .expect("Should have error event");
    assert_eq!(error_event.field("err_code"), Some("ERR_MISSING_MANIFEST"));
    assert_eq!(error_event.field("err_kind"), Some("MissingManifest"));
}

#[test]
fn test_log_macros_with_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, artifact = "bundle.jar", identifier_count = 3u64);

    let start_event = capture
        .find_event(op_name, EVENT_START)
        .expect("Should have start event");
    assert_eq!(start_event.field("artifact"), Some("bundle.jar"));
    assert_eq!(start_event.field("identifier_count"), Some("3"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_diff_snapshots_logs_start_and_end() {
    let capture = init_test_capture();
    let left = Snapshot::new("left-logging").with_component(
        "pid.logging",
        ComponentDescriptor::new("pid.logging", "com.example.Impl"),
    );
    let right = Snapshot::new("right-logging");

    let mut out = Vec::new();
    diff_snapshots(&left, &right, &mut out).unwrap();

    let starts = capture.count_events(|e| {
        e.op() == Some("diff_snapshots")
            && e.event() == Some(EVENT_START)
            && e.field("identifier_count") == Some("1")
    });
    assert!(starts >= 1);
    assert!(capture.count_events(|e| {
        e.op() == Some("diff_snapshots")
            && e.event() == Some(EVENT_END)
            && e.field("differences_found") == Some("true")
    }) >= 1);
}

#[test]
fn test_diff_snapshots_logs_error_on_ambiguity() {
    let capture = init_test_capture();
    let designate = |ocd: &str| Designate {
        pid: Some("pid.ambiguous".to_string()),
        ocd_ref: Some(ocd.to_string()),
        ..Designate::default()
    };
    let mt = MetaTypeDescriptor {
        designates: vec![designate("a"), designate("b")],
        ..MetaTypeDescriptor::default()
    };
    let left = Snapshot::new("left").with_metatype("pid.ambiguous", mt);
    let right = Snapshot::new("right");

    let mut out = Vec::new();
    let err: ExError = diff_snapshots(&left, &right, &mut out).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AmbiguousCorrelation);

    assert!(capture.count_events(|e| {
        e.op() == Some("diff_snapshots")
            && e.event() == Some(EVENT_END_ERROR)
            && e.field("err_code") == Some("ERR_AMBIGUOUS_CORRELATION")
    }) >= 1);
}
