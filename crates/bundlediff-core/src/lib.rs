//! bundlediff core - schema-aware diffing of OSGi bundle metadata
//!
//! This crate provides:
//! - The descriptor model (Declarative Services components, MetaType
//!   descriptors, localization tables) and the [`model::Snapshot`] of one artifact
//! - Set algebra over identifier sets
//! - The comparison engine and its visitor protocol
//! - The indented text renderer and the whole-snapshot driver
//! - The canonical error and logging facilities shared by all crates
//!
//! Snapshots are built by `bundlediff-store`; this crate performs no I/O
//! beyond writing the report.

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod lookup;
pub mod model;
pub mod sets;

/// Logging schema constants, re-exported for the logging macros
pub use bundlediff_core_types as core_types;

// Re-export commonly used types
pub use diff::{diff_snapshots, DiffEvent, DiffSummary, RenderingVisitor, Visitor};
pub use errors::{BundleDiffError, ExError, ExErrorKind, Result};
pub use model::{FieldValue, Snapshot};
