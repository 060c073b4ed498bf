//! Error types for certificate lifecycle operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, CaError>;

/// Errors that can occur across the certificate lifecycle.
///
/// Every public operation returns exactly one of these; nothing is
/// retried internally and partial writes are not rolled back.
#[derive(Error, Debug)]
pub enum CaError {
    /// Common name is empty or contains path traversal characters.
    #[error("invalid cn: {0:?}")]
    InvalidCn(String),

    /// Usage kind is not one of server/client/both.
    #[error("invalid type: {0:?}")]
    InvalidUsage(String),

    /// Algorithm token is not one of rsa/ecdsa/ed25519.
    #[error("unsupported algo: {0:?}")]
    UnsupportedAlgorithm(String),

    /// Key pair generation failed (entropy or parameter error).
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Private key PEM could not be parsed or has an unknown label.
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Certificate PEM/DER could not be parsed.
    #[error("invalid certificate format: {0}")]
    InvalidCertFormat(String),

    /// Revocation ledger PEM/DER could not be parsed.
    #[error("invalid crl format: {0}")]
    InvalidCrlFormat(String),

    /// Root key or certificate already exists and overwrite is disabled.
    #[error("ca files exist and overwrite disabled")]
    CaExists,

    /// One of the leaf artifacts already exists and overwrite is disabled.
    #[error("files exist and overwrite disabled")]
    ArtifactsExist,

    /// A required file (root, leaf, or ledger) is missing.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// The root key cannot sign for the root certificate's algorithm.
    #[error("ca key is not a signer: {0}")]
    NotASigner(String),

    /// The certificate's notAfter is in the past.
    #[error("certificate expired at {not_after}")]
    Expired { not_after: DateTime<Utc> },

    /// Chain validation against the root failed.
    #[error("chain verification failed")]
    ChainInvalid,

    /// The certificate's serial appears in the revocation ledger.
    ///
    /// Only returned when revocation checking is enabled in config.
    #[error("certificate revoked (serial {serial})")]
    Revoked { serial: String },

    /// Filesystem error.
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Metadata serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// X.509 structure building or signing failed.
    #[error("x509 build error: {0}")]
    Build(#[from] rcgen::Error),
}

impl CaError {
    /// Wrap an I/O error with the path it occurred at.
    ///
    /// Missing files map to [`CaError::NotFound`] so callers can
    /// distinguish "never issued" from genuine I/O failures.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().display().to_string();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
