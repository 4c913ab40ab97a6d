//! Indented text rendering of diff events.
//!
//! Section headers are deferred: a header is written only once a field
//! event occurs somewhere beneath it, so empty sections never show up.

use std::io::Write;

use crate::diff::visitor::{DiffEvent, Visitor};
use crate::errors::{BundleDiffError, Result};
use crate::model::FieldValue;

const INDENT_WIDTH: usize = 4;

/// Visitor writing a human-readable report to `out`
pub struct RenderingVisitor<W: Write> {
    out: W,
    /// Every open section, outermost first
    sections: Vec<String>,
    /// Prefix of `sections` whose headers are already written
    printed: Vec<String>,
    has_printed_something: bool,
}

impl<W: Write> RenderingVisitor<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sections: Vec::new(),
            printed: Vec::new(),
            has_printed_something: false,
        }
    }

    /// Whether any header or field line has been written
    pub fn has_printed_something(&self) -> bool {
        self.has_printed_something
    }

    /// Flush the underlying writer
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub(crate) fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn enter(&mut self, section: &str) {
        self.sections.push(section.to_string());
    }

    fn leave(&mut self, section: &str) -> Result<()> {
        match self.sections.last() {
            Some(innermost) if innermost == section => {}
            innermost => {
                return Err(BundleDiffError::UnbalancedSection {
                    expected: innermost.cloned().unwrap_or_default(),
                    found: section.to_string(),
                }
                .into())
            }
        }

        if self.sections.len() == self.printed.len() {
            self.printed.pop();
            if self.printed.is_empty() && self.has_printed_something {
                writeln!(self.out)?;
            }
        }
        self.sections.pop();
        Ok(())
    }

    fn print_headers(&mut self) -> Result<()> {
        for depth in self.printed.len()..self.sections.len() {
            let section = &self.sections[depth];
            writeln!(self.out, "{}{}", indent(depth), section)?;
            self.printed.push(section.clone());
            self.has_printed_something = true;
        }
        Ok(())
    }

    fn print_field(&mut self, marker: char, name: &str, value: &FieldValue) -> Result<()> {
        self.print_headers()?;
        let depth = self.sections.len();
        write!(self.out, "{}{} {} = ", indent(depth), marker, name)?;
        self.has_printed_something = true;
        match value {
            FieldValue::List(items) if items.len() > 1 => {
                writeln!(self.out, "[")?;
                let last = items.len() - 1;
                for (i, item) in items.iter().enumerate() {
                    let separator = if i == last { "" } else { "," };
                    writeln!(self.out, "{}{}{}", indent(depth + 2), item, separator)?;
                }
                writeln!(self.out, "{}  ]", indent(depth))?;
            }
            inline => writeln!(self.out, "{}", inline)?,
        }
        Ok(())
    }
}

impl<W: Write> Visitor for RenderingVisitor<W> {
    fn visit(&mut self, event: DiffEvent<'_>) -> Result<()> {
        match event {
            DiffEvent::Enter(section) => {
                self.enter(section);
                Ok(())
            }
            DiffEvent::Leave(section) => self.leave(section),
            DiffEvent::Added { name, value } => self.print_field('+', name, value),
            DiffEvent::Removed { name, value } => self.print_field('-', name, value),
            DiffEvent::Changed { name, left, right } => {
                self.print_field('-', name, left)?;
                self.print_field('+', name, right)
            }
        }
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * INDENT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    fn render(events: &[DiffEvent<'_>]) -> String {
        let mut visitor = RenderingVisitor::new(Vec::new());
        for event in events {
            visitor.visit(*event).unwrap();
        }
        String::from_utf8(visitor.into_inner()).unwrap()
    }

    #[test]
    fn test_headers_only_for_sections_with_fields() {
        let v = FieldValue::text("30");
        let out = render(&[
            DiffEvent::Enter("pid"),
            DiffEvent::Enter("Attributes"),
            DiffEvent::Leave("Attributes"),
            DiffEvent::Enter("Properties"),
            DiffEvent::Removed {
                name: "timeout",
                value: &v,
            },
            DiffEvent::Leave("Properties"),
            DiffEvent::Leave("pid"),
        ]);
        assert_eq!(out, "pid\n    Properties\n        - timeout = 30\n\n");
    }

    #[test]
    fn test_silent_sections_print_nothing() {
        let out = render(&[
            DiffEvent::Enter("pid"),
            DiffEvent::Enter("Attributes"),
            DiffEvent::Leave("Attributes"),
            DiffEvent::Leave("pid"),
        ]);
        assert_eq!(out, "");
    }

    #[test]
    fn test_changed_renders_removed_then_added() {
        let l = FieldValue::Bool(true);
        let r = FieldValue::Bool(false);
        let out = render(&[
            DiffEvent::Enter("pid"),
            DiffEvent::Changed {
                name: "enabled",
                left: &l,
                right: &r,
            },
            DiffEvent::Leave("pid"),
        ]);
        assert_eq!(out, "pid\n    - enabled = true\n    + enabled = false\n\n");
    }

    #[test]
    fn test_short_lists_render_inline() {
        let empty = FieldValue::List(vec![]);
        let one = FieldValue::list(["a"]);
        let out = render(&[
            DiffEvent::Enter("pid"),
            DiffEvent::Added {
                name: "x",
                value: &empty,
            },
            DiffEvent::Added {
                name: "y",
                value: &one,
            },
            DiffEvent::Leave("pid"),
        ]);
        assert_eq!(out, "pid\n    + x = []\n    + y = [a]\n\n");
    }

    #[test]
    fn test_long_lists_render_one_element_per_line() {
        let v = FieldValue::list(["A", "B"]);
        let out = render(&[
            DiffEvent::Enter("pid"),
            DiffEvent::Added {
                name: "optionLabels",
                value: &v,
            },
            DiffEvent::Leave("pid"),
        ]);
        assert_eq!(
            out,
            "pid\n    + optionLabels = [\n            A,\n            B\n      ]\n\n"
        );
    }

    #[test]
    fn test_mismatched_leave_is_an_error() {
        let mut visitor = RenderingVisitor::new(Vec::new());
        visitor.visit(DiffEvent::Enter("a")).unwrap();
        let err = visitor.visit(DiffEvent::Leave("b")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnbalancedSection);

        let mut visitor = RenderingVisitor::new(Vec::new());
        let err = visitor.visit(DiffEvent::Leave("a")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnbalancedSection);
    }

    #[test]
    fn test_separator_between_identifier_blocks() {
        let v = FieldValue::text("x");
        let out = render(&[
            DiffEvent::Enter("a"),
            DiffEvent::Added { name: "n", value: &v },
            DiffEvent::Leave("a"),
            DiffEvent::Enter("b"),
            DiffEvent::Leave("b"),
            DiffEvent::Enter("c"),
            DiffEvent::Removed { name: "n", value: &v },
            DiffEvent::Leave("c"),
        ]);
        assert_eq!(out, "a\n    + n = x\n\nc\n    - n = x\n\n");
    }

    #[test]
    fn test_field_outside_any_section_counts_as_printed() {
        let v = FieldValue::text("x");
        let mut visitor = RenderingVisitor::new(Vec::new());
        visitor.visit(DiffEvent::Added { name: "n", value: &v }).unwrap();
        assert!(visitor.has_printed_something());
        assert_eq!(String::from_utf8(visitor.into_inner()).unwrap(), "+ n = x\n");
    }
}
