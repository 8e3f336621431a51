//! Signing credentials for the OpenSSL backend.

use super::{unix_seconds, ManifestSigner};
use crate::{Error, Result};
use openssl::asn1::Asn1Time;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::x509::{X509Ref, X509};
use secrecy::{ExposeSecret, SecretString};
use std::cmp::Ordering;
use std::fmt;
use std::time::SystemTime;

/// Signing certificate, private key and intermediate chain.
///
/// # Examples
///
/// ```no_run
/// use wallet::crypto::SigningCredentials;
///
/// let p12 = std::fs::read("pass-certificate.p12")?;
/// let wwdr = std::fs::read("AppleWWDRCAG4.pem")?;
/// let credentials = SigningCredentials::from_p12(&p12, None)?.with_intermediate_pem(&wwdr)?;
/// # Ok::<(), wallet::Error>(())
/// ```
///
/// # Security
///
/// The private key contained in this struct should be treated as sensitive data.
/// The [`fmt::Debug`] implementation omits it.
pub struct SigningCredentials {
    /// Pass Type ID certificate issued to the developer.
    pub certificate: X509,
    /// Private key corresponding to the certificate's public key.
    pub private_key: PKey<Private>,
    /// Intermediate CA certificates embedded in the signature.
    pub cert_chain: Vec<X509>,
}

impl SigningCredentials {
    /// Wrap already-loaded credential material.
    pub fn new(certificate: X509, private_key: PKey<Private>, cert_chain: Vec<X509>) -> Self {
        Self {
            certificate,
            private_key,
            cert_chain,
        }
    }

    /// Decode a PEM or DER certificate and private key.
    ///
    /// The password, if provided, decrypts a PEM-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if either input cannot be
    /// decoded or the key does not match the certificate.
    pub fn from_pem(cert_data: &[u8], key_data: &[u8], key_password: Option<&SecretString>) -> Result<Self> {
        let certificate = X509::from_pem(cert_data)
            .or_else(|_| X509::from_der(cert_data))
            .map_err(|e| Error::InvalidCredentials(format!("Failed to load certificate: {}", e)))?;

        let private_key = if let Some(pass) = key_password {
            PKey::private_key_from_pem_passphrase(key_data, pass.expose_secret().as_bytes())
        } else {
            PKey::private_key_from_pem(key_data).or_else(|_| PKey::private_key_from_der(key_data))
        }
        .map_err(|e| Error::InvalidCredentials(format!("Failed to load private key: {}", e)))?;

        Self::validate_key_pair(&certificate, &private_key)?;

        Ok(Self::new(certificate, private_key, Vec::new()))
    }

    /// Decode a PKCS#12 (.p12) container.
    ///
    /// Certificates bundled next to the identity become the intermediate
    /// chain. The password defaults to an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if the container is malformed,
    /// the password is wrong, or it lacks a certificate or key.
    pub fn from_p12(p12_data: &[u8], password: Option<&SecretString>) -> Result<Self> {
        let pkcs12 = Pkcs12::from_der(p12_data)
            .map_err(|e| Error::InvalidCredentials(format!("Invalid PKCS#12: {}", e)))?;

        let pass = password.map(|s| s.expose_secret().as_str()).unwrap_or("");
        let parsed = pkcs12
            .parse2(pass)
            .map_err(|e| Error::InvalidCredentials(format!("Failed to parse PKCS#12: {}", e)))?;

        let certificate = parsed
            .cert
            .ok_or_else(|| Error::InvalidCredentials("No certificate in PKCS#12".into()))?;
        let private_key = parsed
            .pkey
            .ok_or_else(|| Error::InvalidCredentials("No private key in PKCS#12".into()))?;
        let cert_chain: Vec<X509> = parsed.ca.map(|stack| stack.into_iter().collect()).unwrap_or_default();

        Self::validate_key_pair(&certificate, &private_key)?;

        Ok(Self::new(certificate, private_key, cert_chain))
    }

    /// Append an intermediate certificate.
    pub fn with_intermediate(mut self, certificate: X509) -> Self {
        self.cert_chain.push(certificate);
        self
    }

    /// Append one or more PEM (or a single DER) intermediate certificates.
    pub fn with_intermediate_pem(mut self, data: &[u8]) -> Result<Self> {
        let certs = match X509::stack_from_pem(data) {
            Ok(certs) if !certs.is_empty() => certs,
            _ => vec![X509::from_der(data).map_err(|e| {
                Error::InvalidCredentials(format!("Failed to load intermediate certificate: {}", e))
            })?],
        };
        self.cert_chain.extend(certs);
        Ok(self)
    }

    /// Apple Team ID from the certificate's Organizational Unit.
    pub fn team_id(&self) -> Option<String> {
        name_entry(&self.certificate, Nid::ORGANIZATIONALUNITNAME)
    }

    /// Validate that the private key matches the certificate's public key.
    fn validate_key_pair(cert: &X509Ref, private_key: &PKey<Private>) -> Result<()> {
        let cert_public_key = cert.public_key().map_err(|e| {
            Error::InvalidCredentials(format!("Failed to extract public key from certificate: {}", e))
        })?;

        if !private_key.public_eq(&cert_public_key) {
            return Err(Error::InvalidCredentials(
                "Private key does not match certificate public key".into(),
            ));
        }
        Ok(())
    }

    /// Check that every certificate of the chain is valid at `at`.
    pub fn check_validity(&self, at: SystemTime) -> Result<()> {
        let now = Asn1Time::from_unix(unix_seconds(at)? as _)
            .map_err(|e| Error::SigningBackend(format!("Invalid signing time: {}", e)))?;

        for cert in std::iter::once(&self.certificate).chain(self.cert_chain.iter()) {
            let subject = describe(cert);
            let starts = cert.not_before().compare(&now).map_err(backend)?;
            if starts == Ordering::Greater {
                return Err(Error::ExpiredCertificate(format!(
                    "{} is not valid before {}",
                    subject,
                    cert.not_before()
                )));
            }
            let ends = cert.not_after().compare(&now).map_err(backend)?;
            if ends == Ordering::Less {
                return Err(Error::ExpiredCertificate(format!(
                    "{} expired on {}",
                    subject,
                    cert.not_after()
                )));
            }
        }
        Ok(())
    }
}

impl ManifestSigner for SigningCredentials {
    fn sign(&self, manifest: &[u8], at: SystemTime) -> Result<Vec<u8>> {
        Self::validate_key_pair(&self.certificate, &self.private_key)?;
        self.check_validity(at)?;

        let mut chain = Stack::new().map_err(backend)?;
        for cert in &self.cert_chain {
            chain.push(cert.clone()).map_err(backend)?;
        }

        let flags = Pkcs7Flags::DETACHED | Pkcs7Flags::BINARY;
        let pkcs7 = Pkcs7::sign(&self.certificate, &self.private_key, &chain, manifest, flags)
            .map_err(|e| Error::SigningBackend(format!("Failed to build PKCS#7 signature: {}", e)))?;

        let der = pkcs7.to_der().map_err(backend)?;
        log::debug!("Signed manifest as {} ({} bytes)", describe(&self.certificate), der.len());
        Ok(der)
    }

    fn team_identifier(&self) -> Option<String> {
        self.team_id()
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("certificate", &describe(&self.certificate))
            .field("cert_chain", &self.cert_chain.iter().map(|c| describe(c)).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn backend(e: openssl::error::ErrorStack) -> Error {
    Error::SigningBackend(e.to_string())
}

fn name_entry(cert: &X509Ref, nid: Nid) -> Option<String> {
    cert.subject_name()
        .entries_by_nid(nid)
        .next()
        .and_then(|entry| entry.data().as_utf8().ok())
        .map(|data| data.to_string())
}

/// Human-readable certificate name for messages.
fn describe(cert: &X509Ref) -> String {
    name_entry(cert, Nid::COMMONNAME).unwrap_or_else(|| "certificate without common name".into())
}
