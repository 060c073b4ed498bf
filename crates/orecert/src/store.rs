//! On-disk certificate store layout and filesystem helpers.
//!
//! ```text
//! certs/ca/key.pem          root private key (0600)
//! certs/ca/cert.pem         root certificate
//! certs/ca/crl.pem          revocation ledger
//! certs/<CN>/key.pem        leaf private key (0600)
//! certs/<CN>/csr.pem        certificate signing request
//! certs/<CN>/cert.pem       leaf certificate
//! certs/<CN>/fullchain.pem  leaf + root concatenation
//! certs/<CN>/meta.json      issuance metadata
//! ```
//!
//! The CN doubles as a directory name, so it is validated before any
//! path is derived from it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CaError, Result};

/// Resolved store layout for one invocation.
#[derive(Debug, Clone)]
pub struct Layout {
    store: PathBuf,
    ca_key: PathBuf,
    ca_cert: PathBuf,
}

/// Paths for the five artifacts of one issued CN.
#[derive(Debug, Clone)]
pub struct LeafPaths {
    pub dir: PathBuf,
    pub key: PathBuf,
    pub csr: PathBuf,
    pub cert: PathBuf,
    pub chain: PathBuf,
    pub meta: PathBuf,
}

impl LeafPaths {
    /// The artifacts guarded by the overwrite check.
    #[must_use]
    pub fn artifacts(&self) -> [&Path; 5] {
        [&self.key, &self.csr, &self.cert, &self.chain, &self.meta]
    }
}

impl Layout {
    /// Resolve the layout from config, filling conventional defaults.
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        let store = cfg.store.clone().unwrap_or_else(|| PathBuf::from("certs"));
        let ca_key = cfg
            .ca
            .key
            .clone()
            .unwrap_or_else(|| store.join("ca").join("key.pem"));
        let ca_cert = cfg
            .ca
            .cert
            .clone()
            .unwrap_or_else(|| store.join("ca").join("cert.pem"));
        Self { store, ca_key, ca_cert }
    }

    #[must_use]
    pub fn ca_key_path(&self) -> &Path {
        &self.ca_key
    }

    #[must_use]
    pub fn ca_cert_path(&self) -> &Path {
        &self.ca_cert
    }

    /// The ledger lives next to the root certificate.
    #[must_use]
    pub fn crl_path(&self) -> PathBuf {
        self.ca_cert
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("crl.pem")
    }

    /// Artifact paths for a CN. Fails with `InvalidCn` before deriving
    /// any path from an unsafe name.
    pub fn leaf_paths(&self, cn: &str) -> Result<LeafPaths> {
        validate_cn(cn)?;
        let dir = self.store.join(cn);
        Ok(LeafPaths {
            key: dir.join("key.pem"),
            csr: dir.join("csr.pem"),
            cert: dir.join("cert.pem"),
            chain: dir.join("fullchain.pem"),
            meta: dir.join("meta.json"),
            dir,
        })
    }
}

/// Directory-traversal guard for CN-derived paths.
pub fn validate_cn(cn: &str) -> Result<()> {
    if cn.is_empty() || cn.contains("..") || cn.contains('/') || cn.contains('\\') {
        return Err(CaError::InvalidCn(cn.to_string()));
    }
    Ok(())
}

pub(crate) fn exists(path: &Path) -> bool {
    path.exists()
}

pub(crate) fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| CaError::io(path, e))
}

pub(crate) fn write(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|e| CaError::io(path, e))
}

pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| CaError::io(path, e))
}

/// Write key material with owner-only permissions.
#[cfg(unix)]
pub(crate) fn write_private(path: &Path, data: &[u8]) -> Result<()> {
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| CaError::io(path, e))?;
    file.write_all(data).map_err(|e| CaError::io(path, e))
}

#[cfg(not(unix))]
pub(crate) fn write_private(path: &Path, data: &[u8]) -> Result<()> {
    write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cn_rejects_traversal() {
        for cn in ["", "..", "../up", "a/b", "a\\b", "x/../y"] {
            assert!(
                matches!(validate_cn(cn), Err(CaError::InvalidCn(_))),
                "cn {cn:?} should be rejected"
            );
        }
        assert!(validate_cn("localhost").is_ok());
        assert!(validate_cn("svc.internal.example").is_ok());
    }

    #[test]
    fn test_layout_defaults() {
        let layout = Layout::new(&Config::default());
        assert_eq!(layout.ca_key_path(), Path::new("certs/ca/key.pem"));
        assert_eq!(layout.ca_cert_path(), Path::new("certs/ca/cert.pem"));
        assert_eq!(layout.crl_path(), PathBuf::from("certs/ca/crl.pem"));
    }

    #[test]
    fn test_layout_ca_override_moves_crl() {
        let cfg = Config {
            ca: crate::config::CaPaths {
                key: Some(PathBuf::from("/tmp/authority/key.pem")),
                cert: Some(PathBuf::from("/tmp/authority/cert.pem")),
            },
            ..Config::default()
        };
        let layout = Layout::new(&cfg);
        assert_eq!(layout.crl_path(), PathBuf::from("/tmp/authority/crl.pem"));
    }

    #[test]
    fn test_leaf_paths() {
        let layout = Layout::new(&Config::default());
        let paths = layout.leaf_paths("localhost").unwrap();
        assert_eq!(paths.cert, PathBuf::from("certs/localhost/cert.pem"));
        assert_eq!(paths.artifacts().len(), 5);
        assert!(layout.leaf_paths("../evil").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pem");
        write_private(&path, b"secret").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
