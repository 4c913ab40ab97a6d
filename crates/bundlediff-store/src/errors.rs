//! Error handling for bundlediff-store
//!
//! Wraps bundlediff-core ExError with extraction-specific helpers

use bundlediff_core::errors::{BundleDiffError, ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, artifact: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_artifact(artifact)
        .with_message(err.to_string())
}

/// The artifact has no `META-INF/MANIFEST.MF`
pub fn missing_manifest(artifact: &str) -> ExError {
    ExError::from(BundleDiffError::MissingManifest {
        artifact: artifact.to_string(),
    })
    .with_op("read_manifest")
}

/// The path is neither a file nor a directory
pub fn unsupported_artifact(artifact: &str) -> ExError {
    ExError::from(BundleDiffError::UnsupportedArtifact {
        artifact: artifact.to_string(),
    })
    .with_op("load_snapshot")
}

/// Create a jar (zip) archive error
pub fn archive_error(artifact: &str, err: zip::result::ZipError) -> ExError {
    ExError::new(ExErrorKind::Archive)
        .with_op("open_jar")
        .with_artifact(artifact)
        .with_message(err.to_string())
}

/// Create an error for a descriptor resource that cannot be parsed
pub fn invalid_descriptor(resource: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::InvalidDescriptor)
        .with_op("parse_descriptor")
        .with_artifact(resource)
        .with_message(reason.to_string())
}

/// Create a JSON snapshot document error
pub fn snapshot_format(artifact: &str, err: serde_json::Error) -> ExError {
    ExError::from(BundleDiffError::from(err))
        .with_op("read_snapshot_document")
        .with_artifact(artifact)
}

/// Two descriptors of one kind claim the same identifier
pub fn duplicate_identifier(artifact: &str, section: &str, identifier: &str) -> ExError {
    ExError::from(BundleDiffError::DuplicateKey {
        section: section.to_string(),
        key: identifier.to_string(),
    })
    .with_op("index_descriptors")
    .with_identifier(identifier)
    .with_artifact(artifact)
}
