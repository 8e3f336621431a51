//! Certificate and private key handling for the pure Rust backend.
//!
//! This module decodes signing credentials without OpenSSL. Keys must be
//! unencrypted PKCS#8 (RSA, ECDSA P-256/P-384 or Ed25519).
//!
//! # Examples
//!
//! ```no_run
//! use wallet::crypto::PureRustCredentials;
//!
//! let cert_pem = std::fs::read("certificate.pem")?;
//! let key_pem = std::fs::read("private_key.pem")?;
//! let wwdr = std::fs::read("AppleWWDRCAG4.pem")?;
//! let credentials = PureRustCredentials::from_pem(&cert_pem, &key_pem)?
//!     .with_intermediate_pem(&wwdr)?;
//! # Ok::<(), wallet::Error>(())
//! ```

use super::cms::sign_detached;
use super::ManifestSigner;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::SystemTime;
use x509_certificate::{CapturedX509Certificate, InMemorySigningKeyPair, Sign};

/// Signing credentials decoded with pure Rust libraries.
///
/// # Security
///
/// The private key contained in this struct should be treated as sensitive data.
/// Avoid logging or exposing [`PureRustCredentials`] instances.
pub struct PureRustCredentials {
    /// Pass Type ID certificate.
    pub certificate: CapturedX509Certificate,

    /// Private key corresponding to the certificate's public key.
    pub signing_key: InMemorySigningKeyPair,

    /// Intermediate CA certificates embedded in the signature.
    pub cert_chain: Vec<CapturedX509Certificate>,
}

impl PureRustCredentials {
    pub fn new(
        certificate: CapturedX509Certificate,
        signing_key: InMemorySigningKeyPair,
        cert_chain: Vec<CapturedX509Certificate>,
    ) -> Self {
        Self {
            certificate,
            signing_key,
            cert_chain,
        }
    }

    /// Load credentials from a PEM certificate and a PEM PKCS#8 private key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if either input cannot be parsed
    /// or the key does not match the certificate.
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        let certificate = CapturedX509Certificate::from_pem(cert_pem)
            .map_err(|e| Error::InvalidCredentials(format!("Failed to parse certificate PEM: {}", e)))?;

        let signing_key = InMemorySigningKeyPair::from_pkcs8_pem(key_pem)
            .map_err(|e| Error::InvalidCredentials(format!("Failed to parse private key PEM: {}", e)))?;

        let credentials = Self::new(certificate, signing_key, Vec::new());
        credentials.validate_key_pair()?;
        Ok(credentials)
    }

    /// Load credentials from a DER certificate and a DER PKCS#8 private key.
    pub fn from_der(cert_der: &[u8], key_der: &[u8]) -> Result<Self> {
        let certificate = CapturedX509Certificate::from_der(cert_der.to_vec())
            .map_err(|e| Error::InvalidCredentials(format!("Failed to parse certificate DER: {}", e)))?;

        let signing_key = InMemorySigningKeyPair::from_pkcs8_der(key_der)
            .map_err(|e| Error::InvalidCredentials(format!("Failed to parse private key DER: {}", e)))?;

        let credentials = Self::new(certificate, signing_key, Vec::new());
        credentials.validate_key_pair()?;
        Ok(credentials)
    }

    /// Append every certificate of a PEM document to the chain.
    pub fn with_intermediate_pem(mut self, pem: &[u8]) -> Result<Self> {
        let certs = CapturedX509Certificate::from_pem_multiple(pem).map_err(|e| {
            Error::InvalidCredentials(format!("Failed to parse intermediate certificate: {}", e))
        })?;
        self.cert_chain.extend(certs);
        Ok(self)
    }

    /// Apple Team ID from the certificate's Organizational Unit.
    pub fn team_id(&self) -> Option<String> {
        self.certificate
            .subject_name()
            .iter_organizational_unit()
            .find_map(|atav| atav.to_string().ok())
    }

    fn validate_key_pair(&self) -> Result<()> {
        if self.signing_key.public_key_data() != self.certificate.public_key_data() {
            return Err(Error::InvalidCredentials(
                "Private key does not match certificate public key".into(),
            ));
        }
        Ok(())
    }

    /// Check that every certificate of the chain is valid at `at`.
    pub fn check_validity(&self, at: SystemTime) -> Result<()> {
        let at: DateTime<Utc> = at.into();

        for cert in std::iter::once(&self.certificate).chain(self.cert_chain.iter()) {
            let subject = cert
                .subject_common_name()
                .unwrap_or_else(|| "certificate without common name".into());
            if cert.validity_not_before() > at {
                return Err(Error::ExpiredCertificate(format!(
                    "{} is not valid before {}",
                    subject,
                    cert.validity_not_before()
                )));
            }
            if cert.validity_not_after() < at {
                return Err(Error::ExpiredCertificate(format!(
                    "{} expired on {}",
                    subject,
                    cert.validity_not_after()
                )));
            }
        }
        Ok(())
    }
}

impl ManifestSigner for PureRustCredentials {
    fn sign(&self, manifest: &[u8], at: SystemTime) -> Result<Vec<u8>> {
        self.validate_key_pair()?;
        self.check_validity(at)?;
        sign_detached(manifest, &self.signing_key, &self.certificate, &self.cert_chain)
    }

    fn team_identifier(&self) -> Option<String> {
        self.team_id()
    }
}

impl fmt::Debug for PureRustCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PureRustCredentials")
            .field("certificate", &self.certificate.subject_common_name())
            .field("cert_chain", &self.cert_chain.len())
            .finish_non_exhaustive()
    }
}
