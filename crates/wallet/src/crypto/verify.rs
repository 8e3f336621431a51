//! Detached signature verification.

use crate::manifest::SIGNATURE;
use crate::{Error, Result};
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
pub use openssl::x509::X509;

/// Verify a detached PKCS#7 signature over manifest bytes.
///
/// Without `trusted_root` only the signature itself is checked against the
/// certificate embedded in it. With a root, the embedded chain must also lead
/// to that root.
///
/// # Errors
///
/// Returns [`Error::Packaging`] if the signature is not valid DER PKCS#7, and
/// [`Error::ManifestMismatch`] if it does not cover `manifest` or the chain
/// does not verify.
pub fn verify_detached(manifest: &[u8], signature: &[u8], trusted_root: Option<&X509>) -> Result<()> {
    let pkcs7 = Pkcs7::from_der(signature)
        .map_err(|e| Error::Packaging(format!("Malformed signature: {}", e)))?;

    let mut store = X509StoreBuilder::new().map_err(|e| Error::SigningBackend(e.to_string()))?;
    let mut flags = Pkcs7Flags::BINARY;
    match trusted_root {
        Some(root) => store
            .add_cert(root.clone())
            .map_err(|e| Error::SigningBackend(e.to_string()))?,
        None => flags |= Pkcs7Flags::NOVERIFY,
    }
    let store = store.build();

    let certs = Stack::new().map_err(|e| Error::SigningBackend(e.to_string()))?;
    pkcs7
        .verify(&certs, &store, Some(manifest), None, flags)
        .map_err(|e| Error::ManifestMismatch(format!("{}: {}", SIGNATURE, e)))
}

/// Decode a PEM or DER certificate, such as a trusted root for
/// [`verify_detached`].
pub fn load_certificate(data: &[u8]) -> Result<X509> {
    X509::from_pem(data)
        .or_else(|_| X509::from_der(data))
        .map_err(|e| Error::InvalidCredentials(format!("Failed to parse certificate: {}", e)))
}
