//! Payload files and the set of files bundled with a pass.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Archive path of the serialized pass.
pub const PASS_JSON: &str = "pass.json";

/// Archive path of the manifest.
pub const MANIFEST_JSON: &str = "manifest.json";

/// Archive path of the detached signature.
pub const SIGNATURE: &str = "signature";

/// A named blob bundled with the pass: `pass.json`, an image, or a
/// localization file such as `fr.lproj/pass.strings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFile {
    path: String,
    data: Vec<u8>,
}

impl PayloadFile {
    /// Create a payload file at a logical archive path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is absolute, empty, uses
    /// `\` separators, contains `.`/`..` segments, or names `manifest.json`
    /// or `signature`.
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<Self> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self {
            path,
            data: data.into(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if path.starts_with('/') {
        return Err(Error::invalid_path(path, "path must be relative"));
    }
    if path.contains('\\') {
        return Err(Error::invalid_path(path, "path must use `/` separators"));
    }
    if path.chars().any(char::is_control) {
        return Err(Error::invalid_path(path, "path contains control characters"));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(Error::invalid_path(path, "path has an empty, `.` or `..` segment"));
    }
    if path == MANIFEST_JSON || path == SIGNATURE {
        return Err(Error::invalid_path(path, "name is reserved for the bundle metadata"));
    }
    Ok(())
}

/// The finalized files of one bundle, keyed by unique logical path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadSet {
    files: BTreeMap<String, PayloadFile>,
}

impl PayloadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] if a file with the same path is present.
    pub fn insert(&mut self, file: PayloadFile) -> Result<()> {
        if self.files.contains_key(file.path()) {
            return Err(Error::DuplicatePath(file.path.clone()));
        }
        self.files.insert(file.path.clone(), file);
        Ok(())
    }

    /// Add a file from a path and its bytes.
    pub fn add(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<()> {
        self.insert(PayloadFile::new(path, data)?)
    }

    /// Insert or overwrite a file, returning the previous one.
    pub fn replace(&mut self, file: PayloadFile) -> Option<PayloadFile> {
        self.files.insert(file.path.clone(), file)
    }

    pub fn get(&self, path: &str) -> Option<&PayloadFile> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in path order.
    pub fn iter(&self) -> impl Iterator<Item = &PayloadFile> {
        self.files.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Load every regular file below `dir` as a payload file.
    ///
    /// Hidden files and directories (such as `.DS_Store`) are skipped, as are
    /// top-level `manifest.json` and `signature` files left over from a
    /// previous bundle. Symlinks are not followed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be walked or a file
    /// cannot be read.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut set = Self::new();

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                Error::Io(std::io::Error::other(format!("Failed to walk directory: {}", e)))
            })?;

            if entry.file_type().is_dir() {
                continue;
            }
            if entry.file_type().is_symlink() {
                log::warn!("Skipping symlink {}", entry.path().display());
                continue;
            }

            let relative = entry.path().strip_prefix(dir).map_err(|_| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Failed to compute relative path",
                ))
            })?;

            let logical = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if logical == MANIFEST_JSON || logical == SIGNATURE {
                log::warn!("Skipping stale bundle metadata {}", entry.path().display());
                continue;
            }

            let data = fs::read(entry.path())?;
            set.add(logical, data)?;
        }

        log::debug!("Loaded {} payload files from {}", set.len(), dir.display());
        Ok(set)
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

impl IntoIterator for PayloadSet {
    type Item = PayloadFile;
    type IntoIter = std::collections::btree_map::IntoValues<String, PayloadFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_values()
    }
}
