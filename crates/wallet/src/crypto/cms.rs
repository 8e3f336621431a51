//! Detached CMS signing.
//!
//! Uses the cryptographic-message-syntax crate for CMS signature generation.

use crate::{Error, Result};
use cryptographic_message_syntax::{SignedDataBuilder, SignerBuilder};
use x509_certificate::{CapturedX509Certificate, KeyInfoSigner};

/// Generate a detached CMS `SignedData` over `data`.
///
/// The content itself is not embedded. The signing certificate and every
/// certificate of `cert_chain` are.
///
/// # Arguments
///
/// * `data` - The manifest bytes to sign
/// * `signing_key` - The private key implementing KeyInfoSigner trait
/// * `signing_cert` - The signing certificate as CapturedX509Certificate
/// * `cert_chain` - Certificate chain (intermediate CAs)
pub fn sign_detached<K: KeyInfoSigner>(
    data: &[u8],
    signing_key: &K,
    signing_cert: &CapturedX509Certificate,
    cert_chain: &[CapturedX509Certificate],
) -> Result<Vec<u8>> {
    let signer = SignerBuilder::new(signing_key, signing_cert.clone());

    let mut builder = SignedDataBuilder::default()
        .content_external(data.to_vec())
        .signer(signer);

    for cert in cert_chain {
        builder = builder.certificate(cert.clone());
    }

    let der = builder
        .build_der()
        .map_err(|e| Error::SigningBackend(format!("Failed to build CMS signature: {}", e)))?;

    log::debug!("CMS signature: {} bytes over {} bytes", der.len(), data.len());
    Ok(der)
}
