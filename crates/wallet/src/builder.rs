//! Pass builder API
//!
//! Provides a builder pattern interface over the bundle pipeline for the
//! common case: one pass, a folder of images, one output file.

use crate::manifest::{PayloadFile, PayloadSet};
use crate::pass::Pass;
use crate::pipeline::{generate, PipelineConfig};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Pass bundle generator with builder pattern API.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wallet::{Pass, PassBuilder, PassStyle, PipelineConfig, SigningCredentials};
///
/// let credentials = SigningCredentials::from_pem(
///     &std::fs::read("pass.pem")?,
///     &std::fs::read("pass.key")?,
///     None,
/// )?;
/// let config = PipelineConfig::new(Arc::new(credentials));
///
/// let pass = Pass::new(PassStyle::Generic)
///     .pass_type_identifier("pass.com.example.test")
///     .serial_number("0001")
///     .team_identifier("TEAM123")
///     .organization_name("Example Co");
///
/// PassBuilder::new(pass)
///     .assets_dir("assets/")
///     .write(&config, "out/ticket.pkpass")?;
/// # Ok::<(), wallet::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PassBuilder {
    pass: Pass,
    assets_dir: Option<PathBuf>,
    files: Vec<PayloadFile>,
}

impl PassBuilder {
    /// Create a new builder for `pass`.
    pub fn new(pass: Pass) -> Self {
        Self {
            pass,
            assets_dir: None,
            files: Vec::new(),
        }
    }

    /// Bundle every file below `path` (see [`PayloadSet::from_dir`]).
    pub fn assets_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.assets_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Bundle one in-memory file.
    pub fn file(mut self, file: PayloadFile) -> Self {
        self.files.push(file);
        self
    }

    /// Bundle several in-memory files.
    pub fn files(mut self, files: impl IntoIterator<Item = PayloadFile>) -> Self {
        self.files.extend(files);
        self
    }

    pub fn pass(&self) -> &Pass {
        &self.pass
    }

    /// Validate the builder configuration.
    ///
    /// Returns an error if the assets directory is configured but missing
    /// or not a directory.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref dir) = self.assets_dir {
            if !dir.is_dir() {
                return Err(Error::Config(format!(
                    "Assets directory not found: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Gather the assets directory and the in-memory files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] if an in-memory file has the same
    /// path as a file of the assets directory.
    pub fn payload(&self) -> Result<PayloadSet> {
        self.validate()?;

        let mut payload = match self.assets_dir {
            Some(ref dir) => PayloadSet::from_dir(dir)?,
            None => PayloadSet::new(),
        };
        for file in &self.files {
            payload.insert(file.clone())?;
        }
        Ok(payload)
    }

    /// Produce the `.pkpass` bytes.
    ///
    /// # Errors
    ///
    /// Returns the first error of any pipeline step; no partial output is
    /// produced.
    pub fn create(&self, config: &PipelineConfig) -> Result<Vec<u8>> {
        let payload = self.payload()?;
        generate(config.clone(), &self.pass, payload)
    }

    /// Produce the `.pkpass` bytes and write them to `output`.
    ///
    /// Parent directories are created as needed. Nothing is written if any
    /// step fails.
    pub fn write(&self, config: &PipelineConfig, output: impl AsRef<Path>) -> Result<()> {
        let output = output.as_ref();
        let bytes = self.create(config)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output, &bytes)?;

        log::info!("Wrote {} ({} bytes)", output.display(), bytes.len());
        Ok(())
    }
}
