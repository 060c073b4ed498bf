//! Append-only revocation ledger (CRL).
//!
//! The ledger is a single signed artifact next to the root
//! certificate. Every successful append bumps the sequence number by
//! exactly one; entries are never removed or reordered, and duplicate
//! serials are not rejected. The file is overwritten in place, so a
//! crash mid-write can corrupt it.

use rcgen::{CertificateRevocationListParams, KeyIdMethod, RevokedCertParams, SerialNumber};
use std::path::{Path, PathBuf};
use time::{Duration, OffsetDateTime};
use tracing::info;
use x509_parser::prelude::{CertificateRevocationList, FromDer, X509Certificate};

use crate::ca::RootIdentity;
use crate::config::Config;
use crate::error::{CaError, Result};
use crate::store::{self, Layout};

/// How long a re-signed ledger stays fresh.
const NEXT_UPDATE_DAYS: i64 = 30;

/// Result of a successful revocation.
#[derive(Debug)]
pub struct LedgerSummary {
    /// Sequence (CRL) number after the append.
    pub sequence: u64,
    /// Total entry count after the append.
    pub entries: usize,
    /// Ledger file location.
    pub path: PathBuf,
}

/// Decoded ledger state: sequence number plus
/// (serial, revocation epoch seconds) entries in original order.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub number: u64,
    pub entries: Vec<(Vec<u8>, i64)>,
}

/// Revoke the certificate issued for `cn` and re-sign the ledger.
///
/// The ledger file must already exist (it is seeded at CA init time);
/// a missing file is a hard error rather than an implicit
/// re-initialization.
pub fn revoke(cfg: &Config, root: &RootIdentity, cn: &str) -> Result<LedgerSummary> {
    store::validate_cn(cn)?;
    let layout = Layout::new(cfg);

    let cert_path = layout.leaf_paths(cn)?.cert;
    let cert_der = crate::codec::decode_cert(&store::read(&cert_path)?)?;
    let (_, leaf) = X509Certificate::from_der(&cert_der)
        .map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;
    let serial = leaf.raw_serial().to_vec();

    let crl_path = layout.crl_path();
    let mut state = read_ledger(&crl_path)?;

    let now = OffsetDateTime::now_utc();
    state.entries.push((serial, now.unix_timestamp()));
    let sequence = state.number + 1;

    let revoked_certs = state
        .entries
        .iter()
        .map(|(serial, revoked_at)| RevokedCertParams {
            serial_number: SerialNumber::from(serial.clone()),
            revocation_time: OffsetDateTime::from_unix_timestamp(*revoked_at)
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
            reason_code: None,
            invalidity_date: None,
        })
        .collect();

    let params = CertificateRevocationListParams {
        this_update: now,
        next_update: now + Duration::days(NEXT_UPDATE_DAYS),
        crl_number: SerialNumber::from(sequence),
        issuing_distribution_point: None,
        revoked_certs,
        key_identifier_method: KeyIdMethod::Sha256,
    };

    let (ca_cert, ca_key) = root.issuer()?;
    let crl = params.signed_by(&ca_cert, &ca_key).map_err(|e| match e {
        rcgen::Error::IssuerNotCrlSigner => CaError::NotASigner(e.to_string()),
        other => CaError::Build(other),
    })?;

    store::write(&crl_path, crl.pem()?.as_bytes())?;

    let entries = state.entries.len();
    info!(cn, sequence, entries, path = %crl_path.display(), "revoked certificate");
    Ok(LedgerSummary { sequence, entries, path: crl_path })
}

/// Decode the ledger artifact.
///
/// The empty placeholder seeded at init time yields sequence 0 and no
/// entries; a signed CRL yields its number and entry list; anything
/// else is `InvalidCrlFormat`. A missing file propagates as `NotFound`.
pub(crate) fn read_ledger(path: &Path) -> Result<LedgerState> {
    let data = store::read(path)?;
    let block = pem::parse(&data).map_err(|e| CaError::InvalidCrlFormat(e.to_string()))?;
    if block.contents().is_empty() {
        return Ok(LedgerState::default());
    }

    let (_, crl) = CertificateRevocationList::from_der(block.contents())
        .map_err(|e| CaError::InvalidCrlFormat(e.to_string()))?;

    let number = crl
        .crl_number()
        .map(|n| n.to_str_radix(10).parse::<u64>().unwrap_or(0))
        .unwrap_or(0);
    let entries = crl
        .iter_revoked_certificates()
        .map(|entry| (entry.raw_serial().to_vec(), entry.revocation_date.timestamp()))
        .collect();

    Ok(LedgerState { number, entries })
}
