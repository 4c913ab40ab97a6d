//! bundlediff store - snapshot extraction from OSGi bundles
//!
//! Provides:
//! - Jar and exploded-directory bundle access behind the `BundleSource` trait
//! - Manifest, Declarative Services and MetaType readers
//! - Localization (`.properties`) loading
//! - JSON snapshot documents
//!
//! The single entry point for callers is [`load_snapshot`].

pub mod bundle;
pub mod document;
pub mod ds;
pub mod errors;
pub mod manifest;
pub mod metatype;
pub mod properties;
pub mod source;

// Re-export key types
pub use bundle::{load_snapshot, read_bundle};
pub use document::SnapshotDocument;
pub use errors::Result;
pub use source::{BundleSource, DirectorySource, JarSource};
