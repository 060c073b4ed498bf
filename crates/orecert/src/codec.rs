//! PEM codec for private keys and certificates.
//!
//! Armor labels are chosen by key variant the same way the on-disk
//! format has always been written: RSA keys as PKCS#1
//! (`RSA PRIVATE KEY`), ECDSA keys as SEC1 (`EC PRIVATE KEY`) and
//! Ed25519 keys as PKCS#8 (`PRIVATE KEY`). Decoding dispatches on the
//! label and must round-trip losslessly.

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;

use crate::error::{CaError, Result};
use crate::key::PrivateKey;

/// Encode a private key to PEM, picking the armor label by variant.
pub fn encode_key(key: &PrivateKey) -> Result<String> {
    let pem = match key {
        PrivateKey::Rsa(inner) => inner
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CaError::InvalidKeyFormat(e.to_string()))?,
        PrivateKey::EcdsaP256(inner) => inner
            .to_sec1_pem(LineEnding::LF)
            .map_err(|e| CaError::InvalidKeyFormat(e.to_string()))?,
        PrivateKey::Ed25519(inner) => {
            use rsa::pkcs8::EncodePrivateKey;
            inner
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| CaError::InvalidKeyFormat(e.to_string()))?
        }
    };
    Ok(pem.to_string())
}

/// Decode a PEM private key, dispatching on the armor label.
pub fn decode_key(data: &[u8]) -> Result<PrivateKey> {
    let block = pem::parse(data).map_err(|e| CaError::InvalidKeyFormat(e.to_string()))?;
    match block.tag() {
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(block.contents())
            .map(PrivateKey::Rsa)
            .map_err(|e| CaError::InvalidKeyFormat(e.to_string())),
        "EC PRIVATE KEY" => p256::SecretKey::from_sec1_der(block.contents())
            .map(PrivateKey::EcdsaP256)
            .map_err(|e| CaError::InvalidKeyFormat(e.to_string())),
        "PRIVATE KEY" => decode_pkcs8(block.contents()),
        other => Err(CaError::InvalidKeyFormat(format!(
            "unknown key label {other:?}"
        ))),
    }
}

/// A PKCS#8 block carries its own algorithm identifier; try the
/// supported algorithms in turn.
fn decode_pkcs8(der: &[u8]) -> Result<PrivateKey> {
    if let Ok(key) = ed25519_dalek::SigningKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::Ed25519(key));
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(key) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::EcdsaP256(key));
    }
    Err(CaError::InvalidKeyFormat(
        "unsupported pkcs#8 algorithm".to_string(),
    ))
}

/// Wrap a DER certificate in a `CERTIFICATE` armor block.
pub fn encode_cert(der: &[u8]) -> String {
    pem::encode(&pem::Pem::new("CERTIFICATE", der.to_vec()))
}

/// Extract the DER from a PEM `CERTIFICATE` block.
pub fn decode_cert(data: &[u8]) -> Result<Vec<u8>> {
    let block = pem::parse(data).map_err(|e| CaError::InvalidCertFormat(e.to_string()))?;
    if block.tag() != "CERTIFICATE" {
        return Err(CaError::InvalidCertFormat(format!(
            "unexpected label {:?}",
            block.tag()
        )));
    }
    Ok(block.into_contents())
}
