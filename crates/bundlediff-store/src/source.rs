//! Access to the resources of a bundle
//!
//! A bundle is either a jar (zip archive) or an exploded directory. Both are
//! read through [`BundleSource`], using `/`-separated resource paths relative
//! to the bundle root.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::errors::{archive_error, io_error, Result};

/// Read-only view of a bundle's resources
pub trait BundleSource {
    /// Display name of the bundle (the artifact path)
    fn name(&self) -> &str;

    /// Paths of all regular resources, in ascending order
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be listed.
    fn resources(&mut self) -> Result<Vec<String>>;

    /// Contents of a resource, `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the resource exists but cannot be read.
    fn read(&mut self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Contents of a resource as UTF-8 text (lossy)
    ///
    /// # Errors
    ///
    /// See [`BundleSource::read`].
    fn read_text(&mut self, path: &str) -> Result<Option<String>> {
        Ok(self
            .read(path)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Resolve a resource pattern against the bundle
///
/// A `*` in the last path segment matches any run of characters within that
/// segment; without a wildcard the path itself is returned if it exists.
///
/// # Errors
///
/// Propagates listing errors of the source.
pub fn find_resources<S: BundleSource + ?Sized>(source: &mut S, pattern: &str) -> Result<Vec<String>> {
    let pattern = pattern.trim_start_matches('/');
    let (dir, file_pattern) = match pattern.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, pattern),
    };
    if !file_pattern.contains('*') {
        let exists = source.resources()?.iter().any(|r| r == pattern);
        return Ok(if exists { vec![pattern.to_string()] } else { Vec::new() });
    }

    Ok(source
        .resources()?
        .into_iter()
        .filter(|resource| {
            let (resource_dir, file) = match resource.rsplit_once('/') {
                Some((d, f)) => (Some(d), f),
                None => (None, resource.as_str()),
            };
            resource_dir == dir && wildcard_match(file_pattern, file)
        })
        .collect())
}

/// Match `text` against a pattern where `*` matches any (possibly empty) run
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return text.is_empty();
    };
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };
    let parts: Vec<&str> = parts.collect();
    let Some((last, middle)) = parts.split_last() else {
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// Exploded bundle on the filesystem
pub struct DirectorySource {
    name: String,
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    fn collect(&self, dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| io_error("list_resources", &self.name, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_resources", &self.name, e))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let path = format!("{}{}", prefix, file_name);
            let file_type = entry
                .file_type()
                .map_err(|e| io_error("list_resources", &self.name, e))?;
            if file_type.is_dir() {
                self.collect(&entry.path(), &format!("{}/", path), out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }
}

impl BundleSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resources(&mut self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        self.collect(&self.root, "", &mut out)?;
        out.sort();
        Ok(out)
    }

    fn read(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        let full = self.root.join(path.trim_start_matches('/'));
        if !full.is_file() {
            return Ok(None);
        }
        std::fs::read(&full)
            .map(Some)
            .map_err(|e| io_error("read_resource", &self.name, e).with_identifier(path))
    }
}

/// Bundle packaged as a jar
pub struct JarSource {
    name: String,
    archive: ZipArchive<BufReader<File>>,
}

impl JarSource {
    /// Open the jar at `path`
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be opened and an `Archive`
    /// error if it is not a zip archive.
    pub fn open(name: impl Into<String>, path: &Path) -> Result<Self> {
        let name = name.into();
        let file = File::open(path).map_err(|e| io_error("open_jar", &name, e))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(&name, e))?;
        Ok(Self { name, archive })
    }
}

impl BundleSource for JarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resources(&mut self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|n| !n.ends_with('/'))
            .map(String::from)
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(path.trim_start_matches('/')) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(archive_error(&self.name, e)),
        };
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| io_error("read_resource", &self.name, e))?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("*.xml", "a.xml"));
        assert!(wildcard_match("*.xml", ".xml"));
        assert!(!wildcard_match("*.xml", "a.xml.bak"));
        assert!(wildcard_match("com.*.Impl.xml", "com.example.Impl.xml"));
        assert!(wildcard_match("*", "anything"));
        assert!(!wildcard_match("a*a", "a"));
        assert!(wildcard_match("exact.xml", "exact.xml"));
    }
}
