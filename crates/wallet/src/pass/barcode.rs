//! Barcode descriptions.
//!
//! A pass carries an ordered list of barcodes. Devices render the first format
//! they support, so the list is written as `barcodes`, and the first barcode
//! readable by older devices is repeated under the legacy `barcode` key.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default text encoding used to turn the message into barcode bytes.
pub const DEFAULT_MESSAGE_ENCODING: &str = "iso-8859-1";

/// Symbology of a barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BarcodeFormat {
    Qr,
    Pdf417,
    Aztec,
    /// Only understood through the `barcodes` array.
    Code128,
}

impl BarcodeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeFormat::Qr => "PKBarcodeFormatQR",
            BarcodeFormat::Pdf417 => "PKBarcodeFormatPDF417",
            BarcodeFormat::Aztec => "PKBarcodeFormatAztec",
            BarcodeFormat::Code128 => "PKBarcodeFormatCode128",
        }
    }

    /// Whether the format may appear under the legacy `barcode` key.
    pub fn is_legacy(&self) -> bool {
        !matches!(self, BarcodeFormat::Code128)
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PKBarcodeFormatQR" => Ok(BarcodeFormat::Qr),
            "PKBarcodeFormatPDF417" => Ok(BarcodeFormat::Pdf417),
            "PKBarcodeFormatAztec" => Ok(BarcodeFormat::Aztec),
            "PKBarcodeFormatCode128" => Ok(BarcodeFormat::Code128),
            other => Err(Error::validation(
                "barcode.format",
                format!("unsupported barcode format `{other}`"),
            )),
        }
    }
}

impl TryFrom<String> for BarcodeFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BarcodeFormat> for String {
    fn from(format: BarcodeFormat) -> Self {
        format.as_str().to_string()
    }
}

/// A barcode shown on the front of the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    pub message: String,
    pub format: BarcodeFormat,
    #[serde(default = "default_encoding")]
    pub message_encoding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

fn default_encoding() -> String {
    DEFAULT_MESSAGE_ENCODING.to_string()
}

impl Barcode {
    pub fn new(message: impl Into<String>, format: BarcodeFormat) -> Self {
        Self {
            message: message.into(),
            format,
            message_encoding: default_encoding(),
            alt_text: None,
        }
    }

    /// Set the IANA character set name used to encode the message.
    pub fn message_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.message_encoding = encoding.into();
        self
    }

    /// Set the human-readable text displayed near the barcode.
    pub fn alt_text(mut self, text: impl Into<String>) -> Self {
        self.alt_text = Some(text.into());
        self
    }

    pub(crate) fn validate(&self, path: &str) -> Result<()> {
        if self.message.is_empty() {
            return Err(Error::validation(format!("{path}.message"), "is required"));
        }

        let encoding_ok = !self.message_encoding.is_empty()
            && self
                .message_encoding
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
        if !encoding_ok {
            return Err(Error::validation(
                format!("{path}.messageEncoding"),
                format!("`{}` is not a character set name", self.message_encoding),
            ));
        }

        if self.format == BarcodeFormat::Code128 && !self.message.is_ascii() {
            return Err(Error::validation(
                format!("{path}.message"),
                "Code 128 barcodes can only encode ASCII text",
            ));
        }

        Ok(())
    }
}
