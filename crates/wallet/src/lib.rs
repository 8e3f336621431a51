//! Apple Wallet pass (`.pkpass`) generation.
//!
//! A pass bundle is built in four stages:
//!
//! 1. [`Pass`] is validated and serialized to `pass.json`
//! 2. [`ManifestBuilder`] digests every bundled file into `manifest.json`
//! 3. a [`ManifestSigner`] produces the detached `signature` over the manifest
//! 4. [`archive::pack`] writes the ZIP archive
//!
//! [`PassPipeline`] chains the stages and enforces their order at compile
//! time; [`PassBuilder`] wraps the pipeline for the one-pass, one-file case.

pub mod archive;
pub mod builder;
pub mod crypto;
pub mod error;
pub mod manifest;
pub mod pass;
pub mod pipeline;

pub use archive::{open_pkpass, validate_pkpass, CompressionLevel, PkPassContents};
pub use builder::PassBuilder;
pub use crypto::ManifestSigner;
#[cfg(feature = "pure-rust")]
pub use crypto::PureRustCredentials;
#[cfg(feature = "openssl-backend")]
pub use crypto::{verify_detached, SigningCredentials};
pub use error::{Error, Stage};
pub use manifest::{DigestAlgorithm, Manifest, ManifestBuilder, PayloadFile, PayloadSet};
pub use pass::{
    Barcode, BarcodeFormat, Beacon, Color, Field, FieldGroup, FieldValue, Location, Pass,
    PassStyle, TransitType,
};
pub use pipeline::{generate, PassPipeline, PipelineConfig, PipelineState};

pub type Result<T> = std::result::Result<T, Error>;
