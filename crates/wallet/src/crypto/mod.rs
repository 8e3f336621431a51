//! Manifest signing.
//!
//! The signature of a pass is a detached, DER-encoded PKCS#7 `SignedData`
//! structure computed over the exact `manifest.json` bytes. It embeds the
//! signer certificate and the intermediate chain (the Apple WWDR certificate)
//! so the device can build the path to its trusted root.
//!
//! Two backends implement [`ManifestSigner`]:
//!
//! | Feature | Type | Library |
//! |---------|------|---------|
//! | `openssl-backend` (default) | [`SigningCredentials`] | `openssl` |
//! | `pure-rust` | [`PureRustCredentials`] | `cryptographic-message-syntax` |
//!
//! Credential material is passed in already loaded. The `from_pem` /
//! `from_p12` constructors are convenience decoders for command-line glue.

#[cfg(feature = "openssl-backend")]
pub mod assets;
#[cfg(feature = "pure-rust")]
pub mod cert;
#[cfg(feature = "pure-rust")]
pub mod cms;
#[cfg(feature = "openssl-backend")]
pub mod verify;

#[cfg(feature = "openssl-backend")]
pub use assets::SigningCredentials;
#[cfg(feature = "pure-rust")]
pub use cert::PureRustCredentials;
#[cfg(feature = "openssl-backend")]
pub use verify::{load_certificate, verify_detached, X509};

use crate::Result;
use std::time::SystemTime;
#[cfg(feature = "openssl-backend")]
use {crate::Error, std::time::UNIX_EPOCH};

/// Produces the detached signature over manifest bytes.
///
/// Implementations hold read-only credential material and must be safe to
/// share between threads; one signer can serve many pipelines at once.
pub trait ManifestSigner: Send + Sync {
    /// Sign `manifest` as of the instant `at`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidCredentials`] if the private key does not belong to
    ///   the signing certificate
    /// - [`crate::Error::ExpiredCertificate`] if a certificate of the chain is not
    ///   valid at `at`
    /// - [`crate::Error::SigningBackend`] if the cryptographic library fails
    fn sign(&self, manifest: &[u8], at: SystemTime) -> Result<Vec<u8>>;

    /// Apple Team ID of the signing certificate, if it carries one.
    fn team_identifier(&self) -> Option<String> {
        None
    }
}

/// Seconds since the Unix epoch.
#[cfg(feature = "openssl-backend")]
pub(crate) fn unix_seconds(at: SystemTime) -> Result<i64> {
    let elapsed = at
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::SigningBackend("Signing time precedes the Unix epoch".into()))?;
    i64::try_from(elapsed.as_secs())
        .map_err(|_| Error::SigningBackend("Signing time out of range".into()))
}

#[cfg(all(test, feature = "openssl-backend"))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unix_seconds() {
        assert_eq!(unix_seconds(UNIX_EPOCH + Duration::from_secs(42)).unwrap(), 42);
        assert!(unix_seconds(UNIX_EPOCH - Duration::from_secs(1)).is_err());
    }
}
