//! Configuration loading and merging.
//!
//! Precedence, lowest to highest: YAML config file, `ORECERT_*`
//! environment variables, command-line flags. Flags are applied by the
//! individual commands; this module produces the file+env baseline.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Default config file, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".orecert.yaml";

/// Load the config file and apply the environment overlay.
///
/// A missing default file yields `Config::default()`; a missing file
/// that was named explicitly with `-c` is an error.
pub fn load(explicit: Option<&Path>) -> Result<orecert::Config> {
    let mut cfg = match explicit {
        Some(path) => read_file(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_file(path)?
            } else {
                orecert::Config::default()
            }
        }
    };
    apply_env(&mut cfg)?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<orecert::Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("malformed config file {}", path.display()))
}

fn apply_env(cfg: &mut orecert::Config) -> Result<()> {
    if let Ok(store) = std::env::var("ORECERT_STORE") {
        cfg.store = Some(PathBuf::from(store));
    }
    if let Ok(algo) = std::env::var("ORECERT_ALGO") {
        cfg.default_algo = Some(algo);
    }
    if let Ok(days) = std::env::var("ORECERT_DAYS") {
        cfg.default_days = Some(
            days.parse()
                .with_context(|| format!("ORECERT_DAYS is not a number: {days}"))?,
        );
    }
    if let Ok(key) = std::env::var("ORECERT_CA_KEY") {
        cfg.ca.key = Some(PathBuf::from(key));
    }
    if let Ok(cert) = std::env::var("ORECERT_CA_CERT") {
        cfg.ca.cert = Some(PathBuf::from(cert));
    }
    if std::env::var("ORECERT_CHECK_REVOCATION").is_ok_and(|v| v == "1" || v == "true") {
        cfg.check_revocation = true;
    }
    Ok(())
}

/// Load a certificate profile from a YAML file.
pub fn load_profile(path: &Path) -> Result<orecert::Profile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read profile {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("malformed profile {}", path.display()))
}
