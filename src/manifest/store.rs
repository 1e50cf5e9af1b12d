//! Manifest document and its backing file

use super::element::{Attributes, Element};
use super::query::{Query, QueryOutput};
use super::registry::ElementKind;
use super::xml::{self, DEFAULT_INDENT};
use crate::{ArmmError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default manifest file name used by git-repo
pub const DEFAULT_FILENAME: &str = "default.xml";

/// An in-memory manifest document rooted at `<manifest>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    root: Element,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self {
            root: Element::root(),
        }
    }

    /// Parse a manifest from XML content
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self {
            root: xml::parse(content)?,
        })
    }

    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize to XML with a declaration and the given indentation
    pub fn to_xml(&self, indent: usize) -> Result<String> {
        xml::write(&self.root, indent)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Upsert an element directly under the root
    pub fn set(&mut self, kind: ElementKind, attrs: &Attributes) -> Result<&mut Self> {
        tracing::debug!(element = %kind, "Action: set");
        self.root.upsert(kind, attrs)?;
        Ok(self)
    }

    /// Remove an element (or some of its attributes) directly under the root
    pub fn remove(&mut self, kind: ElementKind, name: &str, attrs: &[&str]) -> Result<&mut Self> {
        tracing::debug!(element = %kind, name, "Action: remove");
        self.root.remove(kind, name, attrs)?;
        Ok(self)
    }

    /// List elements directly under the root
    pub fn list(&self, query: &Query) -> Vec<QueryOutput> {
        self.root.list(query)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns a manifest and the file it is persisted to
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    indent: usize,
    manifest: Manifest,
}

impl ManifestStore {
    /// Start a new empty manifest
    ///
    /// Fails if a manifest already exists at `path` unless `force` is set.
    /// Nothing is written until [`ManifestStore::save`].
    pub fn init(path: impl Into<PathBuf>, force: bool) -> Result<Self> {
        let path = path.into();
        tracing::debug!(path = %path.display(), force, "Action: init");

        if Self::exists(&path) && !force {
            return Err(ArmmError::Precondition(format!(
                "Manifest file {} already exists",
                path.display()
            )));
        }

        Ok(Self {
            path,
            indent: DEFAULT_INDENT,
            manifest: Manifest::new(),
        })
    }

    /// Load an existing manifest
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tracing::info!(path = %path.display(), "Loading manifest");

        let manifest = Manifest::from_file(&path)?;

        tracing::debug!(
            children = manifest.root().children.len(),
            "Manifest loaded successfully"
        );

        Ok(Self {
            path,
            indent: DEFAULT_INDENT,
            manifest,
        })
    }

    /// Whether a manifest file is present at `path`
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Use a different indentation width when saving
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Write the manifest back to its file
    ///
    /// The content goes to a temporary file next to the target which is then
    /// renamed over it, so a failed write leaves the old file in place.
    pub fn save(&self) -> Result<()> {
        tracing::info!(path = %self.path.display(), "Saving manifest");

        let content = self.manifest.to_xml(self.indent)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;

        match fs::metadata(&self.path) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
            Err(_) => set_default_permissions(tmp.as_file())?,
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }
}

#[cfg(unix)]
fn set_default_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn remote() -> Attributes {
        Attributes::from([("name", "origin"), ("fetch", "https://x")])
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_FILENAME);

        ManifestStore::init(&path, false).unwrap().save().unwrap();
        assert!(ManifestStore::exists(&path));

        let err = ManifestStore::init(&path, false).unwrap_err();
        assert!(matches!(err, ArmmError::Precondition(_)));

        assert!(ManifestStore::init(&path, true).is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_FILENAME);

        let mut store = ManifestStore::init(&path, false).unwrap();
        store
            .manifest_mut()
            .set(ElementKind::Remote, &remote())
            .unwrap()
            .set(ElementKind::Default, &Attributes::from([("revision", "main")]))
            .unwrap();
        store.save().unwrap();

        let loaded = ManifestStore::load(&path).unwrap();
        assert_eq!(loaded.manifest(), store.manifest());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<manifest>\n"));
        assert!(content.contains("  <remote name=\"origin\" fetch=\"https://x\"/>\n"));
    }

    #[test]
    fn test_save_with_indent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_FILENAME);

        let mut store = ManifestStore::init(&path, false).unwrap().with_indent(4);
        store.manifest_mut().set(ElementKind::Remote, &remote()).unwrap();
        store.save().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    <remote "));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ManifestStore::load("/nonexistent/default.xml");
        assert!(matches!(result, Err(ArmmError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_FILENAME);
        fs::write(&path, "<manifest><remote></manifest>").unwrap();

        let result = ManifestStore::load(&path);
        assert!(matches!(result, Err(ArmmError::Parse(_))));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join(DEFAULT_FILENAME);

        let store = ManifestStore::init(&path, false).unwrap();
        assert!(matches!(store.save(), Err(ArmmError::Io(_))));
        assert!(!path.exists());
    }
}
