//! Leaf issuance: key pair, CSR, CA-signed certificate, fullchain and
//! metadata, written under `certs/<CN>/`.
//!
//! The five artifacts are written in order (key, csr, cert, fullchain,
//! meta.json) with no rollback; a failure partway through leaves the
//! earlier files on disk.

use chrono::{DateTime, TimeZone, Utc};
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, Ia5String,
    KeyUsagePurpose, SanType, SerialNumber,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::ca::{random_serial, RootIdentity};
use crate::codec;
use crate::config::{Config, Profile, UsageKind};
use crate::error::Result;
use crate::hash;
use crate::key::{KeyAlgorithm, PrivateKey};
use crate::store::{self, Layout, LeafPaths};

/// Descriptive record written alongside the certificate as
/// `meta.json`. Never read back by the engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuanceMetadata {
    pub cn: String,
    #[serde(rename = "type")]
    pub usage: String,
    pub algorithm: String,
    pub fingerprint_sha256: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Raw SAN entries from the profile, including any that were
    /// dropped from the certificate as malformed.
    pub san: Vec<String>,
    pub serial_hex: String,
    pub key_encrypted: bool,
}

/// Result of a successful issuance.
#[derive(Debug)]
pub struct IssuedCertificate {
    pub cert_pem: String,
    pub paths: LeafPaths,
    pub metadata: IssuanceMetadata,
}

/// Issue a leaf key/certificate pair signed by the root.
///
/// Validates the CN, guards the five artifacts against accidental
/// overwrite, and inherits algorithm/validity defaults from config
/// where the profile leaves them unset.
pub fn issue(
    cfg: &Config,
    root: &RootIdentity,
    profile: &Profile,
    usage: UsageKind,
) -> Result<IssuedCertificate> {
    store::validate_cn(&profile.cn)?;

    let algorithm = KeyAlgorithm::parse(
        profile.algo.as_deref().unwrap_or_else(|| cfg.default_algo()),
    )?;
    let days = match profile.days {
        None | Some(0) => cfg.default_days(),
        Some(days) => days,
    };
    let rsa_bits = match profile.rsa_bits {
        None | Some(0) => crate::key::DEFAULT_RSA_BITS,
        Some(bits) => bits,
    };

    let layout = Layout::new(cfg);
    let paths = layout.leaf_paths(&profile.cn)?;
    if !cfg.overwrite && paths.artifacts().iter().any(|p| store::exists(p)) {
        return Err(crate::CaError::ArtifactsExist);
    }
    store::create_dir_all(&paths.dir)?;

    let leaf_key = PrivateKey::generate(algorithm, rsa_bits)?;
    let signing_key = leaf_key.signing_key()?;

    let serial = random_serial()?;
    let not_before = OffsetDateTime::now_utc();
    let not_after = not_before + time::Duration::days(i64::from(days));

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, profile.cn.as_str());

    let mut params = CertificateParams::default();
    params.distinguished_name = dn;
    params.subject_alt_names = san_entries(&profile.san);
    params.not_before = not_before;
    params.not_after = not_after;
    let (key_usages, extended) = usage_flags(usage, algorithm);
    params.key_usages = key_usages;
    params.extended_key_usages = extended;

    // A CSR cannot carry a serial number; it goes into the params only
    // after the request has been serialized.
    let csr_pem = params.serialize_request(&signing_key)?.pem()?;
    params.serial_number = Some(SerialNumber::from(serial.clone()));

    let (ca_cert, ca_key) = root.issuer()?;
    let certificate = params.signed_by(&signing_key, &ca_cert, &ca_key)?;
    let cert_pem = certificate.pem();
    let cert_der = certificate.der().as_ref().to_vec();

    store::write_private(&paths.key, codec::encode_key(&leaf_key)?.as_bytes())?;
    store::write(&paths.csr, csr_pem.as_bytes())?;
    store::write(&paths.cert, cert_pem.as_bytes())?;

    let fullchain = format!("{cert_pem}{}", root.cert_pem());
    store::write(&paths.chain, fullchain.as_bytes())?;

    let metadata = IssuanceMetadata {
        cn: profile.cn.clone(),
        usage: usage.as_str().to_string(),
        algorithm: algorithm.label(rsa_bits),
        fingerprint_sha256: hash::fingerprint(&cert_der),
        not_before: offset_to_utc(not_before),
        not_after: offset_to_utc(not_after),
        san: profile.san.clone(),
        serial_hex: hash::serial_hex(&serial),
        key_encrypted: false,
    };
    store::write(&paths.meta, &serde_json::to_vec_pretty(&metadata)?)?;

    info!(
        cn = %profile.cn,
        usage = usage.as_str(),
        algorithm = %metadata.algorithm,
        serial = %metadata.serial_hex,
        "issued certificate"
    );

    Ok(IssuedCertificate { cert_pem, paths, metadata })
}

/// The metadata record carries the same instants the certificate was
/// built with, truncated to whole seconds like the DER encoding.
fn offset_to_utc(t: OffsetDateTime) -> DateTime<Utc> {
    Utc.timestamp_opt(t.unix_timestamp(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Parse tagged SAN entries; unrecognized or malformed ones are
/// dropped, not errors.
fn san_entries(raw: &[String]) -> Vec<SanType> {
    let mut out = Vec::new();
    for entry in raw {
        if let Some(rest) = entry.strip_prefix("DNS:") {
            if let Ok(name) = Ia5String::try_from(rest) {
                out.push(SanType::DnsName(name));
            }
        } else if let Some(rest) = entry.strip_prefix("IP:") {
            if let Ok(addr) = rest.parse::<IpAddr>() {
                out.push(SanType::IpAddress(addr));
            }
        } else if let Some(rest) = entry.strip_prefix("URI:") {
            if let Ok(uri) = Ia5String::try_from(rest) {
                out.push(SanType::URI(uri));
            }
        } else if let Some(rest) = entry.strip_prefix("EMAIL:") {
            if let Ok(email) = Ia5String::try_from(rest) {
                out.push(SanType::Rfc822Name(email));
            }
        } else {
            debug!(entry = %entry, "dropping unrecognized san entry");
        }
    }
    out
}

/// Key-usage bits derived from the usage kind and algorithm.
///
/// digitalSignature is always set; keyEncipherment is added unless the
/// key is Ed25519 or the certificate is client-only.
fn usage_flags(
    usage: UsageKind,
    algorithm: KeyAlgorithm,
) -> (Vec<KeyUsagePurpose>, Vec<ExtendedKeyUsagePurpose>) {
    let extended = match usage {
        UsageKind::Server => vec![ExtendedKeyUsagePurpose::ServerAuth],
        UsageKind::Client => vec![ExtendedKeyUsagePurpose::ClientAuth],
        UsageKind::Both => vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
        ],
    };
    let mut key_usages = vec![KeyUsagePurpose::DigitalSignature];
    if algorithm != KeyAlgorithm::Ed25519 && usage != UsageKind::Client {
        key_usages.push(KeyUsagePurpose::KeyEncipherment);
    }
    (key_usages, extended)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_in(dir: &std::path::Path) -> IssuedCertificate {
        let cfg = Config {
            store: Some(dir.join("certs")),
            default_algo: Some("ed25519".to_string()),
            ..Config::default()
        };
        let root = RootIdentity::init(&cfg).unwrap();
        let profile = Profile { cn: "unit.test".into(), ..Profile::default() };
        issue(&cfg, &root, &profile, UsageKind::Server).unwrap()
    }

    #[test]
    fn test_issue_writes_a_csr_and_a_serialed_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let issued = issue_in(dir.path());

        let csr = std::fs::read_to_string(&issued.paths.csr).unwrap();
        assert!(csr.starts_with("-----BEGIN CERTIFICATE REQUEST-----"));

        let der = codec::decode_cert(&std::fs::read(&issued.paths.cert).unwrap()).unwrap();
        let (_, parsed) = x509_parser::parse_x509_certificate(&der).unwrap();
        assert_eq!(hash::serial_hex(parsed.raw_serial()), issued.metadata.serial_hex);
    }

    #[test]
    fn test_metadata_times_match_the_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let issued = issue_in(dir.path());

        let der = codec::decode_cert(&std::fs::read(&issued.paths.cert).unwrap()).unwrap();
        let (_, parsed) = x509_parser::parse_x509_certificate(&der).unwrap();
        let validity = parsed.validity();
        assert_eq!(issued.metadata.not_before.timestamp(), validity.not_before.timestamp());
        assert_eq!(issued.metadata.not_after.timestamp(), validity.not_after.timestamp());
    }

    #[test]
    fn test_san_entries_drop_malformed() {
        let raw: Vec<String> = [
            "DNS:localhost",
            "IP:127.0.0.1",
            "IP:not-an-ip",
            "URI:https://example.com",
            "EMAIL:a@example.com",
            "SPIFFE:id",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let parsed = san_entries(&raw);
        assert_eq!(parsed.len(), 4);
        assert!(matches!(parsed[0], SanType::DnsName(_)));
        assert!(matches!(parsed[1], SanType::IpAddress(IpAddr::V4(_))));
        assert!(matches!(parsed[2], SanType::URI(_)));
        assert!(matches!(parsed[3], SanType::Rfc822Name(_)));
    }

    #[test]
    fn test_usage_flags_server() {
        let (ku, eku) = usage_flags(UsageKind::Server, KeyAlgorithm::Rsa);
        assert_eq!(
            ku,
            vec![KeyUsagePurpose::DigitalSignature, KeyUsagePurpose::KeyEncipherment]
        );
        assert_eq!(eku, vec![ExtendedKeyUsagePurpose::ServerAuth]);
    }

    #[test]
    fn test_usage_flags_client_has_no_encipherment() {
        let (ku, eku) = usage_flags(UsageKind::Client, KeyAlgorithm::Rsa);
        assert_eq!(ku, vec![KeyUsagePurpose::DigitalSignature]);
        assert_eq!(eku, vec![ExtendedKeyUsagePurpose::ClientAuth]);
    }

    #[test]
    fn test_usage_flags_ed25519_has_no_encipherment() {
        let (ku, _) = usage_flags(UsageKind::Both, KeyAlgorithm::Ed25519);
        assert_eq!(ku, vec![KeyUsagePurpose::DigitalSignature]);
    }

    #[test]
    fn test_usage_flags_both() {
        let (_, eku) = usage_flags(UsageKind::Both, KeyAlgorithm::Ecdsa);
        assert_eq!(
            eku,
            vec![
                ExtendedKeyUsagePurpose::ServerAuth,
                ExtendedKeyUsagePurpose::ClientAuth
            ]
        );
    }
}
