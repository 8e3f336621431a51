//! Pass data model.
//!
//! This module holds the in-memory representation of a Wallet pass and its
//! canonical `pass.json` encoding:
//! - [`Pass`] with its identifiers, appearance, relevance and lifecycle data
//! - [`PassFields`], an ordered list of [`Field`] records per [`FieldGroup`]
//! - [`Barcode`], [`Location`] and [`Beacon`] descriptions
//!
//! # `pass.json` Layout
//!
//! | Key | Source |
//! |-----|--------|
//! | `formatVersion` | always `1` |
//! | `passTypeIdentifier`, `serialNumber`, `teamIdentifier`, `organizationName` | required identifiers |
//! | `boardingPass` / `coupon` / `eventTicket` / `generic` / `storeCard` | [`PassStyle`], holding the field groups |
//! | `barcodes`, `barcode` | barcode list and its first legacy-compatible entry |
//! | `locations`, `beacons`, `relevantDate`, `maxDistance` | relevance |
//!
//! Keys are written in lexicographic order so serialization is byte-stable.

pub mod barcode;
pub mod color;
pub mod fields;
pub mod model;
pub mod relevance;

pub use barcode::{Barcode, BarcodeFormat};
pub use color::Color;
pub use fields::{DateStyle, Field, FieldGroup, FieldValue, NumberStyle, PassFields, TextAlignment};
pub use model::{Pass, PassIdentity, PassStyle, TransitType, WebService};
pub use relevance::{Beacon, Location};
