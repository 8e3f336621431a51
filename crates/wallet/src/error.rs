//! Error types for pass generation.
//!
//! This module defines the [`enum@Error`] enum covering every failure case of
//! the bundle pipeline: invalid pass data, payload path collisions, signing
//! credential problems and archive assembly failures.
//!
//! Each variant maps to the pipeline [`Stage`] that raises it, so callers can
//! report which step of bundle generation failed.
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use std::fmt;
use thiserror::Error;

/// Error type for pass generation.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses this error type.
/// Match on variants to handle specific failure cases.
///
/// # Examples
///
/// ```no_run
/// use wallet::{Error, Pass, PassStyle};
///
/// let pass = Pass::new(PassStyle::Generic).serial_number("0001");
/// match pass.serialize() {
///     Ok(json) => println!("{} bytes", json.len()),
///     Err(Error::Validation { field, reason }) => eprintln!("{field}: {reason}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// Pass data is missing a required field or holds a malformed value.
    ///
    /// `field` is the JSON key of the offending value (for nested values a
    /// dotted path such as `barcodes[0].message`).
    #[error("Invalid pass field `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// Two payload files share the same logical path.
    #[error("Duplicate payload path: {0}")]
    DuplicatePath(String),

    /// A payload path is not usable inside a bundle.
    ///
    /// Paths must be relative, use `/` separators, contain no `..` segments
    /// and must not shadow `manifest.json` or `signature`.
    #[error("Invalid payload path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A payload file no longer matches the digest recorded in the manifest,
    /// or the manifest and the payload do not cover the same paths.
    #[error("Manifest mismatch for `{0}`")]
    ManifestMismatch(String),

    /// The private key does not belong to the signing certificate, or the
    /// credential material could not be decoded.
    #[error("Invalid signing credentials: {0}")]
    InvalidCredentials(String),

    /// A certificate in the signing chain is expired or not yet valid.
    #[error("Certificate outside its validity period: {0}")]
    ExpiredCertificate(String),

    /// The cryptographic library failed while producing the signature.
    #[error("Signing backend failure: {0}")]
    SigningBackend(String),

    /// Archive assembly or decoding failed.
    #[error("Packaging failed: {0}")]
    Packaging(String),

    /// Invalid builder or pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed.
    ///
    /// Occurs when reading asset directories or writing the output file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pass,
    Payload,
    Manifest,
    Signing,
    Packaging,
    Environment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pass => "pass",
            Stage::Payload => "payload",
            Stage::Manifest => "manifest",
            Stage::Signing => "signing",
            Stage::Packaging => "packaging",
            Stage::Environment => "environment",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Validation { .. } => Stage::Pass,
            Error::DuplicatePath(_) | Error::InvalidPath { .. } => Stage::Payload,
            Error::ManifestMismatch(_) => Stage::Manifest,
            Error::InvalidCredentials(_)
            | Error::ExpiredCertificate(_)
            | Error::SigningBackend(_) => Stage::Signing,
            Error::Packaging(_) => Stage::Packaging,
            Error::Config(_) | Error::Io(_) | Error::Json(_) => Stage::Environment,
        }
    }
}
