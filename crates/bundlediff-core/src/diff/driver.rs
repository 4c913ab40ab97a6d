//! Whole-snapshot diff: one comparison per identifier, one shared renderer.

use std::io::Write;
use std::time::Instant;

use crate::diff::engine::Comparison;
use crate::diff::render::RenderingVisitor;
use crate::errors::Result;
use crate::model::Snapshot;
use crate::sets;

/// Outcome of [`diff_snapshots`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    pub identifiers_compared: usize,
    pub differences_found: bool,
}

/// Render the differences between `left` and `right` to `out`
///
/// Identifiers are compared in ascending order. When nothing differs a
/// single `No differences found between <left> and <right>` line is written.
///
/// # Errors
///
/// Any comparison or write error aborts the run and is returned.
pub fn diff_snapshots<W: Write>(left: &Snapshot, right: &Snapshot, out: W) -> Result<DiffSummary> {
    let start = Instant::now();
    let identifiers = sets::union(&left.identifiers(), &right.identifiers());
    crate::log_op_start!(
        "diff_snapshots",
        identifier_count = identifiers.len() as u64
    );

    let result = render_all(left, right, &identifiers, out);
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(summary) => {
            crate::log_op_end!(
                "diff_snapshots",
                duration_ms = duration_ms,
                differences_found = summary.differences_found
            );
            Ok(summary)
        }
        Err(e) => {
            crate::log_op_error!("diff_snapshots", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

fn render_all<'a, W: Write>(
    left: &Snapshot,
    right: &Snapshot,
    identifiers: impl IntoIterator<Item = &'a String>,
    out: W,
) -> Result<DiffSummary> {
    let mut visitor = RenderingVisitor::new(out);
    let mut identifiers_compared = 0;
    for identifier in identifiers {
        Comparison::new(identifier, left, right).visit(&mut visitor)?;
        identifiers_compared += 1;
    }

    let differences_found = visitor.has_printed_something();
    if !differences_found {
        writeln!(
            visitor.writer(),
            "No differences found between {} and {}",
            left.name(),
            right.name()
        )?;
    }
    visitor.flush()?;

    Ok(DiffSummary {
        identifiers_compared,
        differences_found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentDescriptor;

    #[test]
    fn test_empty_snapshots_report_no_differences() {
        let mut out = Vec::new();
        let summary = diff_snapshots(&Snapshot::new("a.jar"), &Snapshot::new("b.jar"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No differences found between a.jar and b.jar\n"
        );
        assert_eq!(summary.identifiers_compared, 0);
        assert!(!summary.differences_found);
    }

    #[test]
    fn test_identical_snapshots_report_no_differences() {
        let snapshot = Snapshot::new("same")
            .with_component("pid", ComponentDescriptor::new("pid", "com.example.Impl"));
        let mut out = Vec::new();
        let summary = diff_snapshots(&snapshot, &snapshot, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No differences found between same and same\n"
        );
        assert_eq!(summary.identifiers_compared, 1);
    }
}
