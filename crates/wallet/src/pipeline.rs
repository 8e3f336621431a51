//! Bundle generation pipeline.
//!
//! A bundle is produced in five steps, each consuming the previous state:
//!
//! ```text
//! Empty -> PassBuilt -> PayloadCollected -> ManifestComputed -> Signed -> Packaged
//! ```
//!
//! The state is part of the type, so a step cannot be skipped or run twice:
//! there is no `sign` on a pipeline whose manifest is not computed yet, and a
//! signed pipeline offers no way to touch the payload. The one way back is
//! [`PassPipeline::replace_file`], which drops the manifest and returns to
//! [`PayloadCollected`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallet::{Pass, PassPipeline, PassStyle, PayloadFile, PipelineConfig, SigningCredentials};
//!
//! let credentials = SigningCredentials::from_pem(
//!     &std::fs::read("pass.pem")?,
//!     &std::fs::read("pass.key")?,
//!     None,
//! )?;
//! let config = PipelineConfig::new(Arc::new(credentials));
//!
//! let pass = Pass::new(PassStyle::Generic)
//!     .pass_type_identifier("pass.com.example.test")
//!     .serial_number("0001")
//!     .team_identifier("TEAM123")
//!     .organization_name("Example Co");
//!
//! let bytes = PassPipeline::new(config)
//!     .build_pass(&pass)?
//!     .collect([PayloadFile::new("icon.png", std::fs::read("icon.png")?)?])?
//!     .compute_manifest()?
//!     .sign()?
//!     .package()?
//!     .into_bytes();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::archive::{pack, CompressionLevel};
use crate::crypto::ManifestSigner;
use crate::manifest::{DigestAlgorithm, Manifest, ManifestBuilder, PayloadFile, PayloadSet, PASS_JSON};
use crate::pass::Pass;
use crate::Result;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Settings shared by every step of one pipeline.
///
/// The signer sits behind an [`Arc`], so one set of credentials can serve
/// many pipelines, including pipelines running on different threads.
#[derive(Clone)]
pub struct PipelineConfig {
    signer: Arc<dyn ManifestSigner>,
    digest: DigestAlgorithm,
    compression: CompressionLevel,
    signing_time: Option<SystemTime>,
}

impl PipelineConfig {
    pub fn new(signer: Arc<dyn ManifestSigner>) -> Self {
        Self {
            signer,
            digest: DigestAlgorithm::default(),
            compression: CompressionLevel::DEFAULT,
            signing_time: None,
        }
    }

    /// Manifest digest algorithm. Default is SHA-1, which every Wallet
    /// version accepts.
    pub fn digest(mut self, algorithm: DigestAlgorithm) -> Self {
        self.digest = algorithm;
        self
    }

    pub fn compression(mut self, level: CompressionLevel) -> Self {
        self.compression = level;
        self
    }

    /// Fix the instant certificates are checked against.
    ///
    /// Defaults to the time [`PassPipeline::sign`] runs. Only the validity
    /// check uses it; the signing backend stamps the CMS `signingTime`
    /// attribute with the wall clock regardless.
    pub fn signing_time(mut self, at: SystemTime) -> Self {
        self.signing_time = Some(at);
        self
    }

    pub fn signer(&self) -> &Arc<dyn ManifestSigner> {
        &self.signer
    }

    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        self.digest
    }

    pub fn compression_level(&self) -> CompressionLevel {
        self.compression
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("digest", &self.digest)
            .field("compression", &self.compression)
            .field("signing_time", &self.signing_time)
            .finish_non_exhaustive()
    }
}

/// Name of a pipeline state, for logging and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Empty,
    PassBuilt,
    PayloadCollected,
    ManifestComputed,
    Signed,
    Packaged,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Empty => "empty",
            PipelineState::PassBuilt => "pass built",
            PipelineState::PayloadCollected => "payload collected",
            PipelineState::ManifestComputed => "manifest computed",
            PipelineState::Signed => "signed",
            PipelineState::Packaged => "packaged",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A pipeline state type.
pub trait Step: sealed::Sealed {
    const STATE: PipelineState;
}

/// Nothing built yet.
#[derive(Debug)]
pub struct Empty;

/// `pass.json` is serialized.
#[derive(Debug)]
pub struct PassBuilt {
    pass_json: Vec<u8>,
}

/// Every payload file is known.
#[derive(Debug)]
pub struct PayloadCollected {
    payload: PayloadSet,
}

/// The manifest covers the payload.
#[derive(Debug)]
pub struct ManifestComputed {
    payload: PayloadSet,
    manifest: Manifest,
    manifest_bytes: Vec<u8>,
}

/// The manifest bytes are signed.
#[derive(Debug)]
pub struct Signed {
    payload: PayloadSet,
    manifest_bytes: Vec<u8>,
    signature: Vec<u8>,
}

/// The archive is written.
#[derive(Debug)]
pub struct Packaged {
    bytes: Vec<u8>,
}

macro_rules! impl_step {
    ($($ty:ident),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Step for $ty {
                const STATE: PipelineState = PipelineState::$ty;
            }
        )*
    };
}

impl_step!(Empty, PassBuilt, PayloadCollected, ManifestComputed, Signed, Packaged);

/// One bundle in progress. See the [module docs](self).
#[derive(Debug)]
pub struct PassPipeline<S: Step> {
    config: PipelineConfig,
    state: S,
}

impl<S: Step> PassPipeline<S> {
    pub fn state(&self) -> PipelineState {
        S::STATE
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn transition<T: Step>(config: PipelineConfig, state: T) -> PassPipeline<T> {
        log::debug!("Pipeline: {} -> {}", S::STATE, T::STATE);
        PassPipeline { config, state }
    }
}

impl PassPipeline<Empty> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: Empty,
        }
    }

    /// Validate and serialize the pass.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the first invalid field.
    pub fn build_pass(self, pass: &Pass) -> Result<PassPipeline<PassBuilt>> {
        let pass_json = pass.serialize()?;

        if let Some(team) = self.config.signer.team_identifier() {
            if team != pass.team_identifier {
                log::warn!(
                    "Pass teamIdentifier {} differs from the signing certificate team {}",
                    pass.team_identifier,
                    team
                );
            }
        }

        log::info!("Building {}", pass.identity());
        Ok(Self::transition(self.config, PassBuilt { pass_json }))
    }
}

impl PassPipeline<PassBuilt> {
    /// Serialized `pass.json`.
    pub fn pass_json(&self) -> &[u8] {
        &self.state.pass_json
    }

    /// Gather the files bundled next to `pass.json`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicatePath`] if two files share a path or a file
    /// is named `pass.json`.
    pub fn collect<I>(self, files: I) -> Result<PassPipeline<PayloadCollected>>
    where
        I: IntoIterator<Item = PayloadFile>,
    {
        let PassPipeline { config, state } = self;
        let mut payload = PayloadSet::new();
        payload.add(PASS_JSON, state.pass_json)?;
        for file in files {
            payload.insert(file)?;
        }
        Ok(Self::transition(config, PayloadCollected { payload }))
    }

    /// [`collect`](Self::collect) every file of a [`PayloadSet`].
    pub fn collect_set(self, files: PayloadSet) -> Result<PassPipeline<PayloadCollected>> {
        self.collect(files)
    }
}

impl PassPipeline<PayloadCollected> {
    pub fn payload(&self) -> &PayloadSet {
        &self.state.payload
    }

    /// Add one more file.
    pub fn add_file(mut self, file: PayloadFile) -> Result<Self> {
        self.state.payload.insert(file)?;
        Ok(self)
    }

    /// Digest every payload file.
    pub fn compute_manifest(self) -> Result<PassPipeline<ManifestComputed>> {
        let PassPipeline { config, state } = self;
        let manifest = ManifestBuilder::new(config.digest).build_set(&state.payload)?;
        let manifest_bytes = manifest.to_bytes()?;
        Ok(Self::transition(
            config,
            ManifestComputed {
                payload: state.payload,
                manifest,
                manifest_bytes,
            },
        ))
    }
}

impl PassPipeline<ManifestComputed> {
    pub fn manifest(&self) -> &Manifest {
        &self.state.manifest
    }

    /// Serialized `manifest.json`, exactly as it will be signed.
    pub fn manifest_bytes(&self) -> &[u8] {
        &self.state.manifest_bytes
    }

    pub fn payload(&self) -> &PayloadSet {
        &self.state.payload
    }

    /// Change a payload file after the manifest was computed.
    ///
    /// The manifest no longer describes the payload, so it is dropped and the
    /// pipeline returns to [`PayloadCollected`]. A file with a new path is
    /// added.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicatePath`] for `pass.json`, which only
    /// [`PassPipeline::build_pass`] writes.
    pub fn replace_file(self, file: PayloadFile) -> Result<PassPipeline<PayloadCollected>> {
        if file.path() == PASS_JSON {
            return Err(crate::Error::DuplicatePath(PASS_JSON.to_string()));
        }
        let PassPipeline { config, state } = self;
        let mut payload = state.payload;
        log::debug!("Replacing {}; manifest invalidated", file.path());
        payload.replace(file);
        Ok(Self::transition(config, PayloadCollected { payload }))
    }

    /// Sign the manifest bytes.
    ///
    /// The manifest is checked against the payload once more before signing.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ManifestMismatch`] if the payload does not match the manifest
    /// - the signer's errors (see [`ManifestSigner::sign`])
    pub fn sign(self) -> Result<PassPipeline<Signed>> {
        self.state.manifest.verify(&self.state.payload)?;

        let at = self.config.signing_time.unwrap_or_else(SystemTime::now);
        let signature = self.config.signer.sign(&self.state.manifest_bytes, at)?;
        log::debug!("Signature: {} bytes", signature.len());

        let PassPipeline { config, state } = self;
        Ok(Self::transition(
            config,
            Signed {
                payload: state.payload,
                manifest_bytes: state.manifest_bytes,
                signature,
            },
        ))
    }
}

impl PassPipeline<Signed> {
    /// Detached DER signature over the manifest bytes.
    pub fn signature(&self) -> &[u8] {
        &self.state.signature
    }

    pub fn manifest_bytes(&self) -> &[u8] {
        &self.state.manifest_bytes
    }

    /// Write the archive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Packaging`] if the archive cannot be written.
    pub fn package(self) -> Result<PassPipeline<Packaged>> {
        let bytes = pack(
            &self.state.payload,
            &self.state.manifest_bytes,
            &self.state.signature,
            self.config.compression,
        )?;
        Ok(Self::transition(self.config, Packaged { bytes }))
    }
}

impl PassPipeline<Packaged> {
    pub fn bytes(&self) -> &[u8] {
        &self.state.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.state.bytes
    }
}

impl From<PassPipeline<Packaged>> for Vec<u8> {
    fn from(pipeline: PassPipeline<Packaged>) -> Self {
        pipeline.into_bytes()
    }
}

/// Run every step for one pass.
pub fn generate(config: PipelineConfig, pass: &Pass, files: PayloadSet) -> Result<Vec<u8>> {
    Ok(PassPipeline::new(config)
        .build_pass(pass)?
        .collect_set(files)?
        .compute_manifest()?
        .sign()?
        .package()?
        .into_bytes())
}
