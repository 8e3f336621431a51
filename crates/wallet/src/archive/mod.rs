//! `.pkpass` archive handling.
//!
//! A pass bundle is a flat ZIP archive holding `pass.json`, the images and
//! localization folders, `manifest.json` and the detached `signature`.
//!
//! - [`pack`] writes the archive from finished parts
//! - [`open_pkpass`] and [`validate_pkpass`] read one back

pub mod extract;
pub mod pack;

pub use extract::{open_pkpass, validate_pkpass, PkPassContents};
pub use pack::pack;

/// ZIP compression level for bundle creation.
///
/// Controls the trade-off between compression speed and output file size.
/// Pass bundles are mostly PNG images, which barely shrink, so the level
/// matters less than for other archives.
///
/// # Examples
///
/// ```
/// use wallet::CompressionLevel;
///
/// let fast = CompressionLevel::NONE;
/// let balanced = CompressionLevel::DEFAULT;
/// let small = CompressionLevel::MAX;
///
/// // Custom levels are clamped to 0-9
/// let custom = CompressionLevel::new(12);
/// assert_eq!(custom.level(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// No compression (level 0). Entries are stored.
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Default compression (level 6).
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Maximum compression (level 9).
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Creates a compression level from 0-9.
    ///
    /// Values greater than 9 are clamped to 9.
    #[must_use]
    pub fn new(level: u32) -> Self {
        CompressionLevel(level.min(9))
    }

    /// Returns the compression level value (0-9).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for CompressionLevel {
    fn from(level: u32) -> Self {
        CompressionLevel::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::MAX.level(), 9);
        assert_eq!(CompressionLevel::new(15).level(), 9);
        assert_eq!(CompressionLevel::from(3).level(), 3);
        assert_eq!(CompressionLevel::default(), CompressionLevel::DEFAULT);
    }
}
