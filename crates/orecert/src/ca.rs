//! Root CA initialization and loading.
//!
//! The root identity is created once per store directory and read back
//! by issuance, revocation and verification. Initialization is
//! at-least-once, not atomic: a failure partway through can leave some
//! root artifacts written.

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose, SerialNumber,
};
use ring::rand::{SecureRandom, SystemRandom};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::codec;
use crate::config::Config;
use crate::error::{CaError, Result};
use crate::key::{KeyAlgorithm, PrivateKey, DEFAULT_RSA_BITS};
use crate::store::{self, Layout};

/// Fixed subject common name of the root certificate.
pub const ROOT_SUBJECT: &str = "orecert root CA";

/// Empty, headerless ledger seeded at init time so revocation always
/// has something to parse.
pub(crate) const CRL_PLACEHOLDER: &str = "-----BEGIN X509 CRL-----\n-----END X509 CRL-----\n";

/// The CA's own key pair and self-signed certificate.
pub struct RootIdentity {
    key: PrivateKey,
    cert_pem: String,
    cert_der: Vec<u8>,
}

impl RootIdentity {
    /// Create the root key and self-signed certificate.
    ///
    /// Defaults to RSA-2048 / 825 days. When `overwrite` is unset and
    /// either target file exists, fails with `CaExists` before touching
    /// the filesystem. Seeds an empty ledger placeholder next to the
    /// certificate if none exists yet.
    pub fn init(cfg: &Config) -> Result<Self> {
        let algorithm = KeyAlgorithm::parse(cfg.default_algo())?;
        let days = cfg.default_days();
        let layout = Layout::new(cfg);

        if !cfg.overwrite
            && (store::exists(layout.ca_key_path()) || store::exists(layout.ca_cert_path()))
        {
            return Err(CaError::CaExists);
        }

        for path in [layout.ca_key_path(), layout.ca_cert_path()] {
            if let Some(parent) = path.parent() {
                store::create_dir_all(parent)?;
            }
        }

        let key = PrivateKey::generate(algorithm, DEFAULT_RSA_BITS)?;
        let signing_key = key.signing_key()?;

        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, ROOT_SUBJECT);

        let mut params = CertificateParams::default();
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
        params.serial_number = Some(SerialNumber::from(random_serial()?));
        params.not_before = OffsetDateTime::now_utc();
        params.not_after = OffsetDateTime::now_utc() + Duration::days(i64::from(days));

        let certificate = params.self_signed(&signing_key)?;
        let cert_pem = certificate.pem();
        let cert_der = certificate.der().as_ref().to_vec();

        store::write_private(layout.ca_key_path(), codec::encode_key(&key)?.as_bytes())?;
        store::write(layout.ca_cert_path(), cert_pem.as_bytes())?;

        let crl_path = layout.crl_path();
        if !store::exists(&crl_path) {
            store::write(&crl_path, CRL_PLACEHOLDER.as_bytes())?;
            debug!(path = %crl_path.display(), "seeded empty revocation ledger");
        }

        info!(
            cert = %layout.ca_cert_path().display(),
            algorithm = ?algorithm,
            days,
            "root ca initialized"
        );

        Ok(Self { key, cert_pem, cert_der })
    }

    /// Load the root identity from its configured paths.
    pub fn load(cfg: &Config) -> Result<Self> {
        let layout = Layout::new(cfg);

        let key_pem = store::read(layout.ca_key_path())?;
        let key = codec::decode_key(&key_pem)?;

        let cert_bytes = store::read(layout.ca_cert_path())?;
        let cert_pem = String::from_utf8(cert_bytes)
            .map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;
        let cert_der = codec::decode_cert(cert_pem.as_bytes())?;

        Ok(Self { key, cert_pem, cert_der })
    }

    /// Root certificate PEM, as written on disk.
    #[must_use]
    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    /// Root certificate DER.
    #[must_use]
    pub fn cert_der(&self) -> &[u8] {
        &self.cert_der
    }

    /// Root private key.
    #[must_use]
    pub fn key(&self) -> &PrivateKey {
        &self.key
    }

    /// Rebuild the rcgen issuer pair for signing leaves and ledgers.
    ///
    /// Fails with `NotASigner` if the key on disk does not match the
    /// certificate's public key (a swapped or corrupted key file
    /// cannot sign for this root).
    pub(crate) fn issuer(&self) -> Result<(rcgen::Certificate, KeyPair)> {
        let signing_key = self.key.signing_key()?;

        let (_, parsed) = x509_parser::parse_x509_certificate(&self.cert_der)
            .map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;
        if parsed.public_key().raw != signing_key.public_key_der() {
            return Err(CaError::NotASigner(
                "root key does not match root certificate".to_string(),
            ));
        }

        let params = CertificateParams::from_ca_cert_pem(&self.cert_pem)
            .map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;
        let certificate = params.self_signed(&signing_key)?;
        Ok((certificate, signing_key))
    }
}

impl std::fmt::Debug for RootIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootIdentity")
            .field("subject", &ROOT_SUBJECT)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Random 128-bit serial number.
pub(crate) fn random_serial() -> Result<Vec<u8>> {
    let mut bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| CaError::KeyGeneration("system random source failed".to_string()))?;
    // Keep the DER integer positive.
    bytes[0] &= 0x7f;
    Ok(bytes.to_vec())
}
