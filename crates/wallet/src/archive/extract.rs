//! Bundle inspection.
//!
//! Reads a `.pkpass` archive back into its payload, manifest and signature.

use crate::manifest::{Manifest, PayloadSet, MANIFEST_JSON, PASS_JSON, SIGNATURE};
use crate::{Error, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 1 << 20;

/// The parts of an unpacked bundle.
#[derive(Debug, Clone)]
pub struct PkPassContents {
    /// Every file covered by the manifest, `pass.json` included.
    pub payload: PayloadSet,
    /// Parsed `manifest.json`.
    pub manifest: Manifest,
    /// Raw `manifest.json` bytes, as covered by the signature.
    pub manifest_bytes: Vec<u8>,
    /// Raw `signature` bytes.
    pub signature: Vec<u8>,
}

/// Unpack a bundle without checking digests or the signature.
///
/// Directory entries are ignored. The payload keeps its logical paths, so
/// `fr.lproj/pass.strings` stays a single entry.
///
/// # Errors
///
/// - [`Error::Packaging`] if the bytes are not a ZIP archive, an entry name
///   escapes the bundle, or `manifest.json` / `signature` is missing or
///   unparsable
/// - [`Error::DuplicatePath`] if two entries share a path
pub fn open_pkpass(bytes: &[u8]) -> Result<PkPassContents> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Packaging(format!("Not a valid pass archive: {}", e)))?;

    let mut payload = PayloadSet::new();
    let mut manifest_bytes = None;
    let mut signature = None;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| Error::Packaging(format!("Failed to read entry {}: {}", i, e)))?;

        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        if file.enclosed_name().is_none() {
            return Err(Error::Packaging(format!("Entry escapes the bundle: {}", name)));
        }

        let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
        file.read_to_end(&mut data)
            .map_err(|e| Error::Packaging(format!("Failed to read {}: {}", name, e)))?;

        match name.as_str() {
            MANIFEST_JSON => set_once(&mut manifest_bytes, &name, data)?,
            SIGNATURE => set_once(&mut signature, &name, data)?,
            _ => payload.add(name, data)?,
        }
    }

    let manifest_bytes =
        manifest_bytes.ok_or_else(|| Error::Packaging(format!("missing {}", MANIFEST_JSON)))?;
    let signature = signature.ok_or_else(|| Error::Packaging(format!("missing {}", SIGNATURE)))?;
    let manifest = Manifest::from_bytes(&manifest_bytes)?;

    log::debug!(
        "Opened bundle: {} payload files, {} byte signature",
        payload.len(),
        signature.len()
    );

    Ok(PkPassContents {
        payload,
        manifest,
        manifest_bytes,
        signature,
    })
}

fn set_once(slot: &mut Option<Vec<u8>>, name: &str, data: Vec<u8>) -> Result<()> {
    if slot.replace(data).is_some() {
        return Err(Error::DuplicatePath(name.to_string()));
    }
    Ok(())
}

/// Unpack a bundle and check that it is complete and untampered.
///
/// Checks that `pass.json` parses as a JSON object and that the manifest
/// covers exactly the payload with matching digests. With the
/// `openssl-backend` feature the detached signature is also verified over
/// the manifest bytes (without chain validation; see
/// [`crate::crypto::verify_detached`] to check against a trusted root).
///
/// # Errors
///
/// Returns the errors of [`open_pkpass`], plus [`Error::ManifestMismatch`] if
/// a digest or the signature does not match, and [`Error::Json`] if
/// `pass.json` is not valid JSON.
pub fn validate_pkpass(bytes: &[u8]) -> Result<PkPassContents> {
    let contents = open_pkpass(bytes)?;

    let pass_json = contents
        .payload
        .get(PASS_JSON)
        .ok_or_else(|| Error::Packaging(format!("missing {}", PASS_JSON)))?;
    let value: serde_json::Value = serde_json::from_slice(pass_json.data())?;
    if !value.is_object() {
        return Err(Error::Packaging(format!("{} is not a JSON object", PASS_JSON)));
    }

    contents.manifest.verify(&contents.payload)?;

    #[cfg(feature = "openssl-backend")]
    crate::crypto::verify_detached(&contents.manifest_bytes, &contents.signature, None)?;

    Ok(contents)
}
