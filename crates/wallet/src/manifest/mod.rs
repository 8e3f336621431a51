//! Payload collection and manifest hashing.
//!
//! This module provides:
//! - [`PayloadFile`] and [`PayloadSet`] for the files bundled with a pass
//! - [`ManifestBuilder`] to hash them into a [`Manifest`]
//!
//! # Overview
//!
//! A pass bundle must contain a `manifest.json` listing the digest of every
//! other file except the signature, `pass.json` included. The signature covers
//! the manifest bytes, so the manifest is built only once every payload file
//! is final.
//!
//! # Examples
//!
//! ```
//! use wallet::{ManifestBuilder, PayloadSet};
//!
//! let mut payload = PayloadSet::new();
//! payload.add("pass.json", b"{}".to_vec())?;
//! payload.add("icon.png", b"PNG_DATA".to_vec())?;
//!
//! let manifest = ManifestBuilder::default().build_set(&payload)?;
//! manifest.verify(&payload)?;
//! let bytes = manifest.to_bytes()?;
//! # Ok::<(), wallet::Error>(())
//! ```

pub mod builder;
pub mod payload;

pub use builder::{DigestAlgorithm, Manifest, ManifestBuilder};
pub use payload::{PayloadFile, PayloadSet, MANIFEST_JSON, PASS_JSON, SIGNATURE};
