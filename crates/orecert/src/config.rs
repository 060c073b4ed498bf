//! Immutable configuration and issuance profiles.
//!
//! A [`Config`] is constructed once at the process boundary (flags +
//! file + environment merged by the caller) and passed by reference
//! into every operation; the core never reads ambient state.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{CaError, Result};

/// Default root CA validity in days.
pub const DEFAULT_DAYS: u32 = 825;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Algorithm token used when a profile omits one (`rsa` when unset).
    #[serde(default)]
    pub default_algo: Option<String>,

    /// Validity in days used when a profile omits one (825 when unset).
    #[serde(default)]
    pub default_days: Option<u32>,

    /// Allow overwriting existing root or leaf artifacts.
    #[serde(default)]
    pub overwrite: bool,

    /// Base directory for the certificate store (`certs` when unset).
    #[serde(default)]
    pub store: Option<PathBuf>,

    /// Consult the revocation ledger during verification.
    ///
    /// Off by default: historically `verify` checks expiry and chain
    /// only, and revoked-but-unexpired certificates still pass.
    #[serde(default)]
    pub check_revocation: bool,

    /// Root CA file location overrides.
    #[serde(default)]
    pub ca: CaPaths,
}

/// Optional overrides for the root CA key/certificate locations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaPaths {
    #[serde(default)]
    pub key: Option<PathBuf>,

    #[serde(default)]
    pub cert: Option<PathBuf>,
}

impl Config {
    /// Effective default algorithm token.
    #[must_use]
    pub fn default_algo(&self) -> &str {
        self.default_algo.as_deref().unwrap_or("rsa")
    }

    /// Effective default validity. Zero counts as unset.
    #[must_use]
    pub fn default_days(&self) -> u32 {
        match self.default_days {
            None | Some(0) => DEFAULT_DAYS,
            Some(days) => days,
        }
    }
}

/// Issuance profile, typically deserialized from a YAML file.
///
/// Immutable once parsed; unset fields inherit [`Config`] defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    /// Subject common name; also the key into the on-disk store.
    pub cn: String,

    /// SAN entries tagged by literal prefix (`DNS:`, `IP:`, `URI:`,
    /// `EMAIL:`). Unrecognized entries are dropped at issuance.
    #[serde(default)]
    pub san: Vec<String>,

    /// Algorithm token override.
    #[serde(default)]
    pub algo: Option<String>,

    /// RSA modulus size override (2048 when unset or zero).
    #[serde(default)]
    pub rsa_bits: Option<u32>,

    /// Validity override in days.
    #[serde(default)]
    pub days: Option<u32>,
}

/// What the issued certificate will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Server,
    Client,
    Both,
}

impl UsageKind {
    /// Parse a usage token; anything outside server/client/both fails.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "server" => Ok(Self::Server),
            "client" => Ok(Self::Client),
            "both" => Ok(Self::Both),
            other => Err(CaError::InvalidUsage(other.to_string())),
        }
    }

    /// Token form, as written into issuance metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
            Self::Both => "both",
        }
    }
}

impl std::str::FromStr for UsageKind {
    type Err = CaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
