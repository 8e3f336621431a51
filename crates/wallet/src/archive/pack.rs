//! Bundle archive creation.
//!
//! For the reverse operation, see the [`extract`](super::extract) module.

use super::CompressionLevel;
use crate::manifest::{PayloadSet, MANIFEST_JSON, PASS_JSON, SIGNATURE};
use crate::{Error, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Write a `.pkpass` archive in memory.
///
/// Entries are written in a fixed order: `pass.json`, the remaining payload
/// files sorted by path, `manifest.json`, then `signature`. Every entry carries
/// the same timestamp and permissions, so identical inputs produce
/// byte-identical archives.
///
/// # Arguments
///
/// * `payload` - Every bundled file, `pass.json` included
/// * `manifest` - Serialized manifest bytes, exactly as signed
/// * `signature` - Detached DER signature over `manifest`
/// * `level` - ZIP compression level (see [`CompressionLevel`])
///
/// # Examples
///
/// ```
/// use wallet::archive::pack;
/// use wallet::{CompressionLevel, PayloadSet};
///
/// let mut payload = PayloadSet::new();
/// payload.add("pass.json", b"{}".to_vec())?;
/// let bytes = pack(&payload, b"{}", b"SIG", CompressionLevel::NONE)?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), wallet::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::Packaging`] if the payload has no `pass.json` or the
/// archive cannot be written.
pub fn pack(
    payload: &PayloadSet,
    manifest: &[u8],
    signature: &[u8],
    level: CompressionLevel,
) -> Result<Vec<u8>> {
    let pass_json = payload
        .get(PASS_JSON)
        .ok_or_else(|| Error::Packaging(format!("payload has no {}", PASS_JSON)))?;

    let options = entry_options(level);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    write_entry(&mut zip, PASS_JSON, pass_json.data(), options)?;
    for file in payload.iter().filter(|f| f.path() != PASS_JSON) {
        write_entry(&mut zip, file.path(), file.data(), options)?;
    }
    write_entry(&mut zip, MANIFEST_JSON, manifest, options)?;
    write_entry(&mut zip, SIGNATURE, signature, options)?;

    let bytes = zip
        .finish()
        .map_err(|e| Error::Packaging(format!("Failed to finalize archive: {}", e)))?
        .into_inner();

    log::debug!(
        "Packed {} entries into {} bytes (level {})",
        payload.len() + 2,
        bytes.len(),
        level.level()
    );
    Ok(bytes)
}

fn entry_options(level: CompressionLevel) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    if level.level() == 0 {
        // For stored (no compression), don't set compression level
        options.compression_method(CompressionMethod::Stored)
    } else {
        options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level.level())))
    }
}

fn write_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    path: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|e| Error::Packaging(format!("Failed to add {}: {}", path, e)))?;
    zip.write_all(data)
        .map_err(|e| Error::Packaging(format!("Failed to write {}: {}", path, e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn payload() -> PayloadSet {
        let mut payload = PayloadSet::new();
        payload.add("pass.json", br#"{"formatVersion":1}"#.to_vec()).unwrap();
        payload.add("icon.png", vec![0x89; 10]).unwrap();
        payload.add("en.lproj/pass.strings", b"\"a\" = \"b\";".to_vec()).unwrap();
        payload.add("background.png", vec![1, 2, 3]).unwrap();
        payload
    }

    fn names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_entry_order() {
        let bytes = pack(&payload(), b"{}", b"SIG", CompressionLevel::DEFAULT).unwrap();
        assert_eq!(
            names(&bytes),
            vec![
                "pass.json",
                "background.png",
                "en.lproj/pass.strings",
                "icon.png",
                "manifest.json",
                "signature",
            ]
        );
    }

    #[test]
    fn test_contents_preserved() {
        let bytes = pack(&payload(), b"MANIFEST", b"SIG", CompressionLevel::MAX).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let mut data = Vec::new();
        archive.by_name("icon.png").unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![0x89; 10]);

        let mut manifest = String::new();
        archive
            .by_name("manifest.json")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert_eq!(manifest, "MANIFEST");
    }

    #[test]
    fn test_stored_entries() {
        let bytes = pack(&payload(), b"{}", b"SIG", CompressionLevel::NONE).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_name("icon.png").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_deterministic() {
        let first = pack(&payload(), b"{}", b"SIG", CompressionLevel::DEFAULT).unwrap();
        let second = pack(&payload(), b"{}", b"SIG", CompressionLevel::DEFAULT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_pass_json() {
        let mut payload = PayloadSet::new();
        payload.add("icon.png", vec![0; 4]).unwrap();
        let result = pack(&payload, b"{}", b"SIG", CompressionLevel::DEFAULT);
        assert!(matches!(result, Err(Error::Packaging(_))));
    }
}
