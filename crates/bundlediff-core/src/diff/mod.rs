//! Metadata diff engine.
//!
//! A [`engine::Comparison`] walks the descriptor schema for one identifier
//! and reports differences as [`visitor::DiffEvent`]s. The
//! [`render::RenderingVisitor`] turns those events into an indented report,
//! and [`driver::diff_snapshots`] runs one comparison per identifier of two
//! snapshots against a single shared renderer.
//!
//! ## Guarantees
//!
//! - **Determinism**: identifiers and keyed entries are visited in ascending
//!   key order, so identical inputs produce byte-identical reports.
//! - **Reflexivity**: comparing a snapshot with itself reports no field events.
//! - **Header suppression**: a section header is written only if a field
//!   event occurs inside it.

pub mod driver;
pub mod engine;
pub mod render;
pub mod visitor;

pub use driver::{diff_snapshots, DiffSummary};
pub use engine::{compare, Comparison};
pub use render::RenderingVisitor;
pub use visitor::{DiffEvent, RecordedEvent, RecordingVisitor, Visitor};
