//! JSON snapshot documents
//!
//! A pre-extracted snapshot stored as JSON, for comparing metadata without
//! the bundle at hand:
//!
//! ```json
//! {
//!   "components":    { "<identifier>": { ...ComponentDescriptor... } },
//!   "metatypes":     { "<identifier>": { ...MetaTypeDescriptor... } },
//!   "localizations": { "<identifier>": { "<key>": "<text>" } }
//! }
//! ```
//!
//! Every map is optional.

use std::collections::BTreeMap;
use std::path::Path;

use bundlediff_core::model::{
    ComponentDescriptor, LocalizationTable, MetaTypeDescriptor, Snapshot,
};
use serde::{Deserialize, Serialize};

use crate::errors::{io_error, snapshot_format, Result};

/// File extension selecting the JSON document format
pub const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotDocument {
    pub components: BTreeMap<String, ComponentDescriptor>,
    pub metatypes: BTreeMap<String, MetaTypeDescriptor>,
    pub localizations: BTreeMap<String, LocalizationTable>,
}

impl SnapshotDocument {
    /// Parse a document from JSON text
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error if the text is not a valid document.
    pub fn from_json(artifact: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| snapshot_format(artifact, e))
    }

    pub fn into_snapshot(self, name: impl Into<String>) -> Snapshot {
        let snapshot = self
            .components
            .into_iter()
            .fold(Snapshot::new(name), |s, (id, c)| s.with_component(id, c));
        let snapshot = self
            .metatypes
            .into_iter()
            .fold(snapshot, |s, (id, m)| s.with_metatype(id, m));
        self.localizations
            .into_iter()
            .fold(snapshot, |s, (id, t)| s.with_localization(id, t))
    }
}

/// Read a JSON snapshot document from disk
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be read and a `Serialization`
/// error if its content is not a valid document.
pub fn read_snapshot_document(path: &Path, name: &str) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error("read_snapshot_document", name, e))?;
    Ok(SnapshotDocument::from_json(name, &text)?.into_snapshot(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlediff_core::errors::ExErrorKind;
    use bundlediff_core::model::FieldValue;

    #[test]
    fn test_partial_document() {
        let doc = SnapshotDocument::from_json(
            "a.json",
            r#"{"components": {"pid": {"name": "pid", "properties": {"timeout": "30"}}}}"#,
        )
        .unwrap();
        let snapshot = doc.into_snapshot("a.json");
        assert_eq!(snapshot.name(), "a.json");
        assert_eq!(snapshot.component_count(), 1);
        assert_eq!(snapshot.metatype_count(), 0);
        assert_eq!(
            snapshot.component("pid").map(|c| c.properties["timeout"].clone()),
            Some(FieldValue::text("30"))
        );
    }

    #[test]
    fn test_empty_document() {
        let snapshot = SnapshotDocument::from_json("e.json", "{}")
            .unwrap()
            .into_snapshot("e.json");
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let err = SnapshotDocument::from_json("bad.json", "{\"components\": [").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert_eq!(err.artifact(), Some("bad.json"));
    }
}
