//! Throwaway certificates and passes shared by the integration tests.

#![allow(dead_code)]

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::x509::extension::{BasicConstraints, KeyUsage};
use openssl::x509::{X509Builder, X509NameBuilder, X509};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use wallet::{Pass, PassStyle, SigningCredentials};

const DAY: i64 = 24 * 3600;

static SERIAL: AtomicU32 = AtomicU32::new(1);

pub fn generate_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
}

/// A certificate and its key.
pub struct Identity {
    pub cert: X509,
    pub key: PKey<Private>,
}

/// Issue a certificate valid from `from_days` to `to_days` relative to now.
///
/// Without an issuer the certificate is self-signed.
pub fn issue(
    common_name: &str,
    team: Option<&str>,
    issuer: Option<&Identity>,
    ca: bool,
    from_days: i64,
    to_days: i64,
) -> Identity {
    let key = generate_key();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", common_name).unwrap();
    if let Some(team) = team {
        name.append_entry_by_text("OU", team).unwrap();
    }
    let name = name.build();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_u32(SERIAL.fetch_add(1, Ordering::SeqCst)).unwrap();
    builder.set_serial_number(&serial.to_asn1_integer().unwrap()).unwrap();
    builder.set_subject_name(&name).unwrap();
    match issuer {
        Some(issuer) => builder.set_issuer_name(issuer.cert.subject_name()).unwrap(),
        None => builder.set_issuer_name(&name).unwrap(),
    }
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::from_unix(now() + from_days * DAY).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(now() + to_days * DAY).unwrap())
        .unwrap();

    if ca {
        builder
            .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();
        builder
            .append_extension(KeyUsage::new().critical().key_cert_sign().crl_sign().build().unwrap())
            .unwrap();
    } else {
        builder
            .append_extension(KeyUsage::new().critical().digital_signature().build().unwrap())
            .unwrap();
    }

    let signing_key = issuer.map(|i| &i.key).unwrap_or(&key);
    builder.sign(signing_key, MessageDigest::sha256()).unwrap();

    Identity {
        cert: builder.build(),
        key,
    }
}

/// Root CA, intermediate CA and a pass signing certificate for team `TEAM123`.
pub struct Chain {
    pub root: Identity,
    pub intermediate: Identity,
    pub leaf: Identity,
}

pub fn chain() -> Chain {
    chain_with_leaf_validity(0, 365)
}

pub fn chain_with_leaf_validity(from_days: i64, to_days: i64) -> Chain {
    let root = issue("Test Root CA", None, None, true, -10, 3650);
    let intermediate = issue("Test WWDR CA", None, Some(&root), true, -10, 1825);
    let leaf = issue(
        "Pass Type ID: pass.com.example.test",
        Some("TEAM123"),
        Some(&intermediate),
        false,
        from_days,
        to_days,
    );
    Chain {
        root,
        intermediate,
        leaf,
    }
}

impl Chain {
    pub fn credentials(&self) -> SigningCredentials {
        SigningCredentials::new(
            self.leaf.cert.clone(),
            self.leaf.key.clone(),
            vec![self.intermediate.cert.clone()],
        )
    }
}

/// The pass of the reference scenario.
pub fn scenario_pass() -> Pass {
    Pass::new(PassStyle::Generic)
        .serial_number("0001")
        .pass_type_identifier("pass.com.example.test")
        .organization_name("Example Co")
        .team_identifier("TEAM123")
}

/// A 10-byte stand-in for a PNG icon.
pub fn icon_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01]
}
