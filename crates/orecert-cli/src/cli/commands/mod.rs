//! Command implementations.

pub mod init_ca;
pub mod issue;
pub mod revoke;
pub mod verify;

use anyhow::Result;
use orecert::{Config, RootIdentity};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged file + environment configuration.
    pub config: Config,
}

impl Context {
    /// Load the root identity, pointing at `init-ca` when it is absent.
    pub fn root(&self) -> Result<RootIdentity> {
        RootIdentity::load(&self.config).map_err(|e| match e {
            orecert::CaError::NotFound { .. } => {
                anyhow::anyhow!("{e}\n\nRun `orecert init-ca` first to create the root CA.")
            }
            other => other.into(),
        })
    }
}
