//! Command-line interface for the wallet pass generator.
//!
//! Builds signed `.pkpass` bundles from a pass definition and an asset
//! folder, and checks existing bundles.

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use wallet::crypto::load_certificate;
use wallet::{
    validate_pkpass, verify_detached, CompressionLevel, DigestAlgorithm, Pass, PassBuilder,
    PipelineConfig, SigningCredentials,
};

#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "Apple Wallet pass generator")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build and sign a pass bundle
    Create(CreateArgs),
    /// Check the manifest and signature of a pass bundle
    Verify(VerifyArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Pass definition (JSON)
    definition: PathBuf,

    /// Directory of images and localizations to bundle
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Certificate file (PEM or DER format)
    #[arg(short = 'c', long)]
    certificate: Option<PathBuf>,

    /// Private key file (PEM or DER format)
    #[arg(short = 'k', long)]
    private_key: Option<PathBuf>,

    /// PKCS#12 file (.p12)
    #[arg(short = 'p', long)]
    pkcs12: Option<PathBuf>,

    /// Intermediate certificate (Apple WWDR), PEM or DER
    #[arg(long)]
    wwdr: Option<PathBuf>,

    /// Password for private key or PKCS#12
    #[arg(long, env = "WALLET_KEY_PASSWORD")]
    password: Option<String>,

    /// ZIP compression level (0-9, default: 6)
    #[arg(short = 'z', long, default_value = "6")]
    zip_level: u32,

    /// Manifest digest algorithm (sha1 or sha256)
    #[arg(long, default_value = "sha1")]
    digest: DigestAlgorithm,
}

#[derive(Args)]
struct VerifyArgs {
    /// Pass bundle to check
    input: PathBuf,

    /// Trusted root certificate (PEM) to validate the signer chain against
    #[arg(long)]
    root: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Create(args) => create(args),
        Command::Verify(args) => verify(args),
    }
}

fn create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let definition = std::fs::read(&args.definition)?;
    let pass: Pass = serde_json::from_slice(&definition)?;

    let credentials = load_credentials(&args)?;
    let config = PipelineConfig::new(Arc::new(credentials))
        .digest(args.digest)
        .compression(CompressionLevel::new(args.zip_level));

    let output = args.output.clone().unwrap_or_else(|| {
        let mut out = args.definition.clone();
        out.set_extension("pkpass");
        out
    });

    let mut builder = PassBuilder::new(pass);
    if let Some(ref assets) = args.assets {
        builder = builder.assets_dir(assets);
    }
    builder.write(&config, &output)?;

    println!("Created: {}", output.display());
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&args.input)?;
    let contents = validate_pkpass(&bytes)?;

    if let Some(ref root_path) = args.root {
        let root = load_certificate(&std::fs::read(root_path)?)?;
        verify_detached(&contents.manifest_bytes, &contents.signature, Some(&root))?;
    }

    println!(
        "Valid: {} ({} files, {} manifest)",
        args.input.display(),
        contents.payload.len(),
        contents.manifest.algorithm()
    );
    Ok(())
}

fn load_credentials(args: &CreateArgs) -> Result<SigningCredentials, Box<dyn std::error::Error>> {
    let password = args.password.clone().map(SecretString::new);

    let credentials = if let Some(ref p12_path) = args.pkcs12 {
        if args.certificate.is_some() || args.private_key.is_some() {
            return Err("Cannot specify both --pkcs12 and --certificate/--private-key".into());
        }
        let p12_data = std::fs::read(p12_path)?;
        SigningCredentials::from_p12(&p12_data, password.as_ref())?
    } else if let (Some(ref cert_path), Some(ref key_path)) = (&args.certificate, &args.private_key) {
        let cert_data = std::fs::read(cert_path)?;
        let key_data = std::fs::read(key_path)?;
        SigningCredentials::from_pem(&cert_data, &key_data, password.as_ref())?
    } else {
        return Err("Must provide either --pkcs12 or both --certificate and --private-key".into());
    };

    match args.wwdr {
        Some(ref wwdr_path) => Ok(credentials.with_intermediate_pem(&std::fs::read(wwdr_path)?)?),
        None => Ok(credentials),
    }
}
