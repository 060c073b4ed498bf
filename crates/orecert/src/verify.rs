//! Certificate verification against the local root.
//!
//! Checks run in a fixed order: expiry first, then the chain back to
//! the root. Expiry is reported precisely; any chain defect collapses
//! into a single `ChainInvalid` so callers cannot distinguish (and
//! start depending on) individual failure modes. The ledger is only
//! consulted when `check_revocation` is set.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;
use x509_parser::prelude::*;

use crate::ca::RootIdentity;
use crate::config::Config;
use crate::error::{CaError, Result};
use crate::hash;
use crate::revoke;
use crate::store::{self, Layout};

/// Verify the certificate issued for `cn`.
///
/// Returns `Ok(())` when the leaf is inside its validity window and
/// chains to the configured root. With `check_revocation` enabled the
/// ledger is consulted as a final step; a missing or empty ledger is
/// treated as "nothing revoked".
pub fn verify(cfg: &Config, root: &RootIdentity, cn: &str) -> Result<()> {
    store::validate_cn(cn)?;
    let layout = Layout::new(cfg);

    let cert_path = layout.leaf_paths(cn)?.cert;
    let leaf_der = crate::codec::decode_cert(&store::read(&cert_path)?)?;
    let (_, leaf) = X509Certificate::from_der(&leaf_der)
        .map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;

    let now = Utc::now();
    let not_after = asn1_to_utc(&leaf.validity().not_after);
    if now > not_after {
        return Err(CaError::Expired { not_after });
    }

    let (_, ca) = X509Certificate::from_der(root.cert_der())
        .map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;
    check_chain(&leaf, &ca, now)?;

    if cfg.check_revocation {
        check_ledger(&layout, &leaf)?;
    }

    Ok(())
}

/// Epoch-second ASN.1 time into chrono, clamping unreadable values to
/// "now" so a malformed field fails closed as expired/not-yet-valid.
fn asn1_to_utc(t: &ASN1Time) -> DateTime<Utc> {
    Utc.timestamp_opt(t.timestamp(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn check_chain(leaf: &X509Certificate<'_>, ca: &X509Certificate<'_>, now: DateTime<Utc>) -> Result<()> {
    if leaf.issuer().as_raw() != ca.subject().as_raw() {
        debug!("issuer DN does not match root subject");
        return Err(CaError::ChainInvalid);
    }

    let is_ca = ca
        .basic_constraints()
        .ok()
        .flatten()
        .map(|bc| bc.value)
        .is_some_and(|bc| bc.ca);
    if !is_ca {
        debug!("root is not a CA certificate");
        return Err(CaError::ChainInvalid);
    }

    if !ca.validity().is_valid() {
        debug!("root certificate outside its validity window");
        return Err(CaError::ChainInvalid);
    }

    if now < asn1_to_utc(&leaf.validity().not_before) {
        debug!("leaf certificate not yet valid");
        return Err(CaError::ChainInvalid);
    }

    if leaf.verify_signature(Some(ca.public_key())).is_err() {
        debug!("leaf signature does not verify against root key");
        return Err(CaError::ChainInvalid);
    }

    Ok(())
}

fn check_ledger(layout: &Layout, leaf: &X509Certificate<'_>) -> Result<()> {
    let state = match revoke::read_ledger(&layout.crl_path()) {
        Ok(state) => state,
        Err(CaError::NotFound { .. }) => return Ok(()),
        Err(e) => return Err(e),
    };

    let serial = leaf.raw_serial();
    if state.entries.iter().any(|(revoked, _)| revoked == serial) {
        return Err(CaError::Revoked { serial: hash::serial_hex(serial) });
    }
    Ok(())
}
