//! Diff event protocol.
//!
//! The comparison engine reports everything it finds as a stream of
//! [`DiffEvent`]s delivered to a single [`Visitor`]. `Enter`/`Leave` pairs
//! nest strictly; field events only occur while a section is open.

use crate::errors::Result;
use crate::model::FieldValue;

/// One event of a comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiffEvent<'a> {
    /// A section opens
    Enter(&'a str),
    /// The innermost open section with this name closes
    Leave(&'a str),
    /// Field present only on the right side
    Added { name: &'a str, value: &'a FieldValue },
    /// Field present on both sides with different values
    Changed {
        name: &'a str,
        left: &'a FieldValue,
        right: &'a FieldValue,
    },
    /// Field present only on the left side
    Removed { name: &'a str, value: &'a FieldValue },
}

impl DiffEvent<'_> {
    /// True for `Added`, `Changed` and `Removed`
    pub fn is_field(&self) -> bool {
        !matches!(self, DiffEvent::Enter(_) | DiffEvent::Leave(_))
    }
}

/// Consumer of diff events
pub trait Visitor {
    /// Handle one event
    ///
    /// # Errors
    ///
    /// Implementations return an error when they cannot record the event
    /// (e.g. the output sink failed). The comparison aborts on the first error.
    fn visit(&mut self, event: DiffEvent<'_>) -> Result<()>;
}

impl<F> Visitor for F
where
    F: FnMut(DiffEvent<'_>) -> Result<()>,
{
    fn visit(&mut self, event: DiffEvent<'_>) -> Result<()> {
        self(event)
    }
}

/// Owned copy of a [`DiffEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Enter(String),
    Leave(String),
    Added {
        name: String,
        value: FieldValue,
    },
    Changed {
        name: String,
        left: FieldValue,
        right: FieldValue,
    },
    Removed {
        name: String,
        value: FieldValue,
    },
}

impl From<DiffEvent<'_>> for RecordedEvent {
    fn from(event: DiffEvent<'_>) -> Self {
        match event {
            DiffEvent::Enter(s) => RecordedEvent::Enter(s.to_string()),
            DiffEvent::Leave(s) => RecordedEvent::Leave(s.to_string()),
            DiffEvent::Added { name, value } => RecordedEvent::Added {
                name: name.to_string(),
                value: value.clone(),
            },
            DiffEvent::Changed { name, left, right } => RecordedEvent::Changed {
                name: name.to_string(),
                left: left.clone(),
                right: right.clone(),
            },
            DiffEvent::Removed { name, value } => RecordedEvent::Removed {
                name: name.to_string(),
                value: value.clone(),
            },
        }
    }
}

/// A field event together with the section path it was reported under
#[derive(Debug, Clone, PartialEq)]
pub struct PathedEvent {
    pub path: Vec<String>,
    pub event: RecordedEvent,
}

/// Visitor that keeps every event it receives
#[derive(Debug, Default)]
pub struct RecordingVisitor {
    events: Vec<RecordedEvent>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, including section enters and leaves
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Field events only, each with the section path it occurred under
    pub fn field_events(&self) -> Vec<PathedEvent> {
        let mut path: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for event in &self.events {
            match event {
                RecordedEvent::Enter(s) => path.push(s.clone()),
                RecordedEvent::Leave(_) => {
                    path.pop();
                }
                other => out.push(PathedEvent {
                    path: path.clone(),
                    event: other.clone(),
                }),
            }
        }
        out
    }
}

impl Visitor for RecordingVisitor {
    fn visit(&mut self, event: DiffEvent<'_>) -> Result<()> {
        self.events.push(event.into());
        Ok(())
    }
}
