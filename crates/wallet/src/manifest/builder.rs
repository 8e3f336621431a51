//! Manifest generation.
//!
//! Hashes every payload file and produces the `manifest.json` mapping of
//! archive path to hex digest that the signature covers.

use super::payload::{PayloadFile, PayloadSet};
use crate::{Error, Result};
use rayon::prelude::*;
use sha1::{Digest, Sha1};
use sha2::Sha256;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Hash function used for manifest entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    /// SHA-1, the algorithm Wallet expects in `manifest.json`.
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Length of a digest in hex characters.
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha256 => 64,
        }
    }

    /// Lowercase hex digest of `data`.
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            DigestAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        }
    }

    fn from_hex_len(len: usize) -> Option<Self> {
        [DigestAlgorithm::Sha1, DigestAlgorithm::Sha256]
            .into_iter()
            .find(|a| a.hex_len() == len)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            _ => Err(Error::Config(format!("Unknown digest algorithm: {}", s))),
        }
    }
}

/// Mapping of archive path to the hex digest of the file's bytes.
///
/// Entries are kept sorted by path, so [`Manifest::to_bytes`] is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    algorithm: DigestAlgorithm,
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Recorded digest for a path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the `manifest.json` bytes that get signed.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.entries)?)
    }

    /// Parse `manifest.json` bytes read back from a bundle.
    ///
    /// The algorithm is inferred from the digest length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Packaging`] if the document is not a flat object of
    /// hex digests of a single known length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let entries: BTreeMap<String, String> = serde_json::from_slice(bytes)
            .map_err(|e| Error::Packaging(format!("Malformed manifest.json: {}", e)))?;

        let algorithm = match entries.values().next() {
            Some(digest) => DigestAlgorithm::from_hex_len(digest.len()).ok_or_else(|| {
                Error::Packaging(format!("Unrecognized digest length {}", digest.len()))
            })?,
            None => DigestAlgorithm::default(),
        };

        for (path, digest) in &entries {
            let well_formed = digest.len() == algorithm.hex_len()
                && digest.chars().all(|c| c.is_ascii_hexdigit());
            if !well_formed {
                return Err(Error::Packaging(format!("Malformed digest for {}", path)));
            }
        }

        Ok(Self { algorithm, entries })
    }

    /// Check that the manifest covers exactly `files` and that every digest
    /// matches the file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestMismatch`] naming the first path that is
    /// missing, unexpected, repeated, or whose bytes changed.
    pub fn verify_entries<'a, I>(&self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (path, data) in files {
            let recorded = self
                .entries
                .get(path)
                .ok_or_else(|| Error::ManifestMismatch(path.to_string()))?;
            if !seen.insert(path) {
                return Err(Error::ManifestMismatch(format!("{} listed twice", path)));
            }
            if !recorded.eq_ignore_ascii_case(&self.algorithm.hex_digest(data)) {
                return Err(Error::ManifestMismatch(path.to_string()));
            }
        }

        if let Some(missing) = self.entries.keys().find(|p| !seen.contains(p.as_str())) {
            return Err(Error::ManifestMismatch(missing.clone()));
        }
        Ok(())
    }

    /// [`Manifest::verify_entries`] over a payload set.
    pub fn verify(&self, payload: &PayloadSet) -> Result<()> {
        self.verify_entries(payload.iter().map(|f| (f.path(), f.data())))
    }
}

/// Builder for [`Manifest`].
///
/// # Examples
///
/// ```
/// use wallet::{DigestAlgorithm, ManifestBuilder, PayloadFile};
///
/// let files = vec![
///     PayloadFile::new("pass.json", b"{}".to_vec())?,
///     PayloadFile::new("icon.png", b"PNG_DATA".to_vec())?,
/// ];
/// let manifest = ManifestBuilder::new(DigestAlgorithm::Sha1).build(&files)?;
/// assert_eq!(manifest.len(), 2);
/// # Ok::<(), wallet::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestBuilder {
    algorithm: DigestAlgorithm,
}

impl ManifestBuilder {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash every file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] if two files share a path.
    pub fn build(&self, files: &[PayloadFile]) -> Result<Manifest> {
        let mut paths = HashSet::with_capacity(files.len());
        for file in files {
            if !paths.insert(file.path()) {
                return Err(Error::DuplicatePath(file.path().to_string()));
            }
        }

        let algorithm = self.algorithm;
        let entries: BTreeMap<String, String> = files
            .par_iter()
            .map(|file| (file.path().to_string(), algorithm.hex_digest(file.data())))
            .collect();

        log::debug!("Hashed {} payload files with {}", entries.len(), algorithm);

        Ok(Manifest { algorithm, entries })
    }

    /// Hash a payload set. Paths in a set are already unique.
    pub fn build_set(&self, payload: &PayloadSet) -> Result<Manifest> {
        let files: Vec<PayloadFile> = payload.iter().cloned().collect();
        self.build(&files)
    }
}
