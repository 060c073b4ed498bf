//! SHA-256 helpers via `ring::digest`.

use ring::digest::{digest, SHA256};

/// Compute SHA-256 of raw bytes, lowercase hex.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data).as_ref())
}

/// Certificate fingerprint: SHA-256 of the DER, colon-delimited
/// uppercase hex (`AB:CD:...`).
#[must_use]
pub fn fingerprint(der: &[u8]) -> String {
    digest(&SHA256, der)
        .as_ref()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Uppercase hex rendering of a serial number with leading zeros
/// trimmed, matching `big.Int.Text(16)` style output.
#[must_use]
pub fn serial_hex(serial: &[u8]) -> String {
    let full = hex::encode_upper(serial);
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
