//! Key pair generation over the supported algorithm set.
//!
//! The closed [`PrivateKey`] variant is the single dispatch point for
//! cryptographic agility: every encode and sign call site matches
//! exhaustively over {RSA, ECDSA-P256, Ed25519}.

use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{CaError, Result};

/// Default RSA modulus size in bits.
pub const DEFAULT_RSA_BITS: u32 = 2048;

/// Supported key algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    /// RSA with a configurable modulus size.
    Rsa,
    /// ECDSA over the P-256 curve.
    Ecdsa,
    /// Ed25519.
    Ed25519,
}

impl KeyAlgorithm {
    /// Parse an algorithm token. The empty string defaults to RSA,
    /// matching the config-file behavior.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "rsa" | "" => Ok(Self::Rsa),
            "ecdsa" => Ok(Self::Ecdsa),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(CaError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Display label used in issuance metadata.
    pub fn label(self, rsa_bits: u32) -> String {
        match self {
            Self::Rsa => format!("RSA-{rsa_bits}"),
            Self::Ecdsa => "ECDSA-P256".to_string(),
            Self::Ed25519 => "Ed25519".to_string(),
        }
    }
}

/// A private key tagged with its algorithm.
///
/// Owned by the component that generated it until persisted; nothing is
/// cached across invocations.
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    EcdsaP256(p256::SecretKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    /// Generate a fresh key pair.
    ///
    /// `rsa_bits` applies to RSA only; zero falls back to
    /// [`DEFAULT_RSA_BITS`]. ECDSA always uses P-256 and Ed25519 takes
    /// no size parameter.
    pub fn generate(algorithm: KeyAlgorithm, rsa_bits: u32) -> Result<Self> {
        match algorithm {
            KeyAlgorithm::Rsa => {
                let bits = if rsa_bits == 0 { DEFAULT_RSA_BITS } else { rsa_bits };
                let key = RsaPrivateKey::new(&mut OsRng, bits as usize)
                    .map_err(|e| CaError::KeyGeneration(e.to_string()))?;
                Ok(Self::Rsa(key))
            }
            KeyAlgorithm::Ecdsa => Ok(Self::EcdsaP256(p256::SecretKey::random(&mut OsRng))),
            KeyAlgorithm::Ed25519 => {
                Ok(Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng)))
            }
        }
    }

    /// The algorithm this key was generated for.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(_) => KeyAlgorithm::Rsa,
            Self::EcdsaP256(_) => KeyAlgorithm::Ecdsa,
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
        }
    }

    /// PKCS#8 DER encoding, used for comparisons and conversions.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let doc = match self {
            Self::Rsa(key) => key.to_pkcs8_der(),
            Self::EcdsaP256(key) => key.to_pkcs8_der(),
            Self::Ed25519(key) => key.to_pkcs8_der(),
        }
        .map_err(|e| CaError::InvalidKeyFormat(e.to_string()))?;
        Ok(Zeroizing::new(doc.as_bytes().to_vec()))
    }

    /// Convert into an rcgen signing handle for certificate/CRL builds.
    pub(crate) fn signing_key(&self) -> Result<rcgen::KeyPair> {
        let pem = self.pkcs8_pem()?;
        let alg = match self {
            Self::Rsa(_) => &rcgen::PKCS_RSA_SHA256,
            Self::EcdsaP256(_) => &rcgen::PKCS_ECDSA_P256_SHA256,
            Self::Ed25519(_) => &rcgen::PKCS_ED25519,
        };
        rcgen::KeyPair::from_pem_and_sign_algo(&pem, alg)
            .map_err(|e| CaError::InvalidKeyFormat(e.to_string()))
    }

    fn pkcs8_pem(&self) -> Result<Zeroizing<String>> {
        match self {
            Self::Rsa(key) => key.to_pkcs8_pem(LineEnding::LF),
            Self::EcdsaP256(key) => key.to_pkcs8_pem(LineEnding::LF),
            Self::Ed25519(key) => key.to_pkcs8_pem(LineEnding::LF),
        }
        .map_err(|e| CaError::InvalidKeyFormat(e.to_string()))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_tuple("PrivateKey").field(&self.algorithm()).finish()
    }
}
