//! Jar manifest parsing
//!
//! Only the main section is read: everything up to the first blank line.
//! Header names are matched case-insensitively, as the jar format requires.

use std::collections::BTreeMap;

/// Path of the manifest inside a bundle
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub const SERVICE_COMPONENT: &str = "Service-Component";
pub const BUNDLE_LOCALIZATION: &str = "Bundle-Localization";

/// Main attributes of a jar manifest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Keyed by lower-cased header name
    headers: BTreeMap<String, String>,
}

impl Manifest {
    /// Parse manifest text
    ///
    /// Continuation lines start with a single space which is dropped before
    /// the rest is appended to the previous header. Lines without a `:` are
    /// ignored.
    pub fn parse(text: &str) -> Self {
        let mut logical: Vec<String> = Vec::new();
        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }
            match (line.strip_prefix(' '), logical.last_mut()) {
                (Some(continuation), Some(previous)) => previous.push_str(continuation),
                _ => logical.push(line.to_string()),
            }
        }

        let headers = logical
            .iter()
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        Self { headers }
    }

    /// Value of a main header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Resource paths listed in `Service-Component`, if the header is present
    pub fn service_components(&self) -> Option<Vec<String>> {
        self.header(SERVICE_COMPONENT).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}
