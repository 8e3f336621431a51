//! End-to-end bundle generation with OpenSSL-signed manifests.

#![cfg(feature = "openssl-backend")]

mod common;

use common::{chain, chain_with_leaf_validity, icon_bytes, scenario_pass};
use sha1::{Digest, Sha1};
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use wallet::crypto::verify_detached;
use wallet::{
    generate, open_pkpass, validate_pkpass, CompressionLevel, DigestAlgorithm, Error, Pass,
    PassPipeline, PassStyle, PayloadFile, PayloadSet, PipelineConfig, PipelineState,
};
use zip::ZipArchive;

fn config() -> PipelineConfig {
    PipelineConfig::new(Arc::new(chain().credentials()))
}

fn icon_payload() -> PayloadSet {
    let mut payload = PayloadSet::new();
    payload.add("icon.png", icon_bytes()).unwrap();
    payload
}

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_scenario_bundle_layout() {
    let bytes = generate(config(), &scenario_pass(), icon_payload()).unwrap();

    assert_eq!(
        entry_names(&bytes),
        vec!["pass.json", "icon.png", "manifest.json", "signature"]
    );

    let contents = validate_pkpass(&bytes).unwrap();
    assert_eq!(contents.manifest.len(), 2);

    let icon_digest = hex::encode(Sha1::digest(icon_bytes()));
    assert_eq!(contents.manifest.get("icon.png"), Some(icon_digest.as_str()));

    let pass_json = contents.payload.get("pass.json").unwrap();
    let pass_digest = hex::encode(Sha1::digest(pass_json.data()));
    assert_eq!(contents.manifest.get("pass.json"), Some(pass_digest.as_str()));
}

#[test]
fn test_scenario_pass_json() {
    let bytes = generate(config(), &scenario_pass(), icon_payload()).unwrap();
    let contents = open_pkpass(&bytes).unwrap();

    let pass_json = contents.payload.get("pass.json").unwrap();
    assert_eq!(pass_json.data(), scenario_pass().serialize().unwrap().as_slice());

    let value: serde_json::Value = serde_json::from_slice(pass_json.data()).unwrap();
    assert_eq!(value["serialNumber"], "0001");
    assert_eq!(value["teamIdentifier"], "TEAM123");
    assert_eq!(value["formatVersion"], 1);
    assert!(value["generic"].is_object());
}

#[test]
fn test_unpacked_payload_is_byte_identical() {
    let mut payload = icon_payload();
    payload.add("logo@2x.png", vec![0xAB; 300]).unwrap();
    payload.add("de.lproj/pass.strings", "\"k\" = \"Grüße\";".as_bytes().to_vec()).unwrap();

    let bytes = generate(config(), &scenario_pass(), payload.clone()).unwrap();
    let contents = open_pkpass(&bytes).unwrap();

    for file in payload.iter() {
        let unpacked = contents.payload.get(file.path()).unwrap();
        assert_eq!(unpacked.data(), file.data(), "{}", file.path());
    }
    contents.manifest.verify(&contents.payload).unwrap();
}

#[test]
fn test_manifest_bytes_stable_across_runs() {
    let run = || {
        PassPipeline::new(config())
            .build_pass(&scenario_pass())
            .unwrap()
            .collect_set(icon_payload())
            .unwrap()
            .compute_manifest()
            .unwrap()
            .manifest_bytes()
            .to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_missing_team_identifier() {
    let pass = Pass::new(PassStyle::Generic)
        .serial_number("0001")
        .pass_type_identifier("pass.com.example.test")
        .organization_name("Example Co");

    match generate(config(), &pass, icon_payload()) {
        Err(Error::Validation { field, .. }) => assert_eq!(field, "teamIdentifier"),
        other => panic!("expected a validation error, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_replace_file_after_manifest() {
    let computed = PassPipeline::new(config())
        .build_pass(&scenario_pass())
        .unwrap()
        .collect_set(icon_payload())
        .unwrap()
        .compute_manifest()
        .unwrap();
    let stale = computed.manifest().clone();

    let collected = computed
        .replace_file(PayloadFile::new("icon.png", vec![0u8; 10]).unwrap())
        .unwrap();
    assert_eq!(collected.state(), PipelineState::PayloadCollected);
    assert!(matches!(stale.verify(collected.payload()), Err(Error::ManifestMismatch(_))));

    let bytes = collected
        .compute_manifest()
        .unwrap()
        .sign()
        .unwrap()
        .package()
        .unwrap()
        .into_bytes();
    let contents = validate_pkpass(&bytes).unwrap();
    assert_eq!(contents.payload.get("icon.png").unwrap().data(), &[0u8; 10]);
}

#[test]
fn test_tampered_archive_rejected() {
    let bytes = generate(config(), &scenario_pass(), icon_payload()).unwrap();
    let contents = open_pkpass(&bytes).unwrap();

    let mut tampered = contents.payload.clone();
    tampered.replace(PayloadFile::new("icon.png", vec![1u8; 10]).unwrap());
    let repacked = wallet::archive::pack(
        &tampered,
        &contents.manifest_bytes,
        &contents.signature,
        CompressionLevel::DEFAULT,
    )
    .unwrap();
    assert!(matches!(validate_pkpass(&repacked), Err(Error::ManifestMismatch(_))));

    // Manifest edited to match: the signature no longer covers it.
    let manifest = wallet::ManifestBuilder::default().build_set(&tampered).unwrap();
    let repacked = wallet::archive::pack(
        &tampered,
        &manifest.to_bytes().unwrap(),
        &contents.signature,
        CompressionLevel::DEFAULT,
    )
    .unwrap();
    assert!(matches!(validate_pkpass(&repacked), Err(Error::ManifestMismatch(_))));
}

#[test]
fn test_signature_chains_to_root() {
    let chain = chain();
    let bytes = generate(
        PipelineConfig::new(Arc::new(chain.credentials())),
        &scenario_pass(),
        icon_payload(),
    )
    .unwrap();
    let contents = open_pkpass(&bytes).unwrap();

    verify_detached(&contents.manifest_bytes, &contents.signature, Some(&chain.root.cert)).unwrap();

    let other = common::issue("Other Root", None, None, true, -1, 30);
    let result = verify_detached(&contents.manifest_bytes, &contents.signature, Some(&other.cert));
    assert!(matches!(result, Err(Error::ManifestMismatch(_))));
}

#[test]
fn test_expired_certificate() {
    let chain = chain_with_leaf_validity(-30, -1);
    let result = generate(
        PipelineConfig::new(Arc::new(chain.credentials())),
        &scenario_pass(),
        icon_payload(),
    );
    assert!(matches!(result, Err(Error::ExpiredCertificate(_))));
}

#[test]
fn test_signing_time_outside_validity() {
    let chain = chain();
    let config = PipelineConfig::new(Arc::new(chain.credentials()))
        .signing_time(SystemTime::now() - Duration::from_secs(5 * 24 * 3600));

    let result = generate(config, &scenario_pass(), icon_payload());
    assert!(matches!(result, Err(Error::ExpiredCertificate(_))));
}

#[test]
fn test_mismatched_key() {
    let chain = chain();
    let credentials = wallet::SigningCredentials::new(
        chain.leaf.cert.clone(),
        common::generate_key(),
        vec![chain.intermediate.cert.clone()],
    );
    let result = generate(
        PipelineConfig::new(Arc::new(credentials)),
        &scenario_pass(),
        icon_payload(),
    );
    assert!(matches!(result, Err(Error::InvalidCredentials(_))));
}

#[test]
fn test_concurrent_pipelines_share_credentials() {
    let config = config();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let config = config.clone();
            std::thread::spawn(move || {
                let pass = scenario_pass().serial_number(format!("{:04}", i));
                let mut payload = PayloadSet::new();
                payload.add("icon.png", vec![i as u8; 10]).unwrap();
                generate(config, &pass, payload).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let bytes = handle.join().unwrap();
        let contents = validate_pkpass(&bytes).unwrap();
        assert_eq!(contents.payload.get("icon.png").unwrap().data(), &[i as u8; 10]);
    }
}

#[test]
fn test_sha256_manifest_and_stored_entries() {
    let config = config()
        .digest(DigestAlgorithm::Sha256)
        .compression(CompressionLevel::NONE);
    let bytes = generate(config, &scenario_pass(), icon_payload()).unwrap();

    let contents = validate_pkpass(&bytes).unwrap();
    assert_eq!(contents.manifest.algorithm(), DigestAlgorithm::Sha256);
    assert_eq!(contents.manifest.get("icon.png").unwrap().len(), 64);

    let mut archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
    let mut icon = archive.by_name("icon.png").unwrap();
    assert_eq!(icon.compression(), zip::CompressionMethod::Stored);
    let mut data = Vec::new();
    icon.read_to_end(&mut data).unwrap();
    assert_eq!(data, icon_bytes());
}

#[cfg(feature = "pure-rust")]
#[test]
fn test_pure_rust_backend() {
    use wallet::PureRustCredentials;

    let chain = chain();
    let credentials = PureRustCredentials::from_pem(
        &chain.leaf.cert.to_pem().unwrap(),
        &chain.leaf.key.private_key_to_pem_pkcs8().unwrap(),
    )
    .unwrap()
    .with_intermediate_pem(&chain.intermediate.cert.to_pem().unwrap())
    .unwrap();

    let bytes = generate(
        PipelineConfig::new(Arc::new(credentials)),
        &scenario_pass(),
        icon_payload(),
    )
    .unwrap();

    let contents = validate_pkpass(&bytes).unwrap();
    verify_detached(&contents.manifest_bytes, &contents.signature, Some(&chain.root.cert)).unwrap();
}
