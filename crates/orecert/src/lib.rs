//! # orecert
//!
//! Local certificate authority lifecycle engine for development TLS
//! material. Creates a self-signed root, issues leaf key/certificate
//! pairs signed by that root, maintains an append-only revocation
//! ledger (CRL), and verifies leaf validity against the root.
//!
//! ## Lifecycle
//!
//! ```text
//! init-ca      certs/ca/{key.pem, cert.pem}  + empty crl.pem placeholder
//!    │
//!    ├── issue    certs/<CN>/{key,csr,cert,fullchain,meta.json}
//!    ├── revoke   certs/ca/crl.pem  (append entry, bump sequence, re-sign)
//!    └── verify   expiry check, then chain validation against the root
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use orecert::{Config, Profile, RootIdentity, UsageKind};
//!
//! let cfg = Config::default();
//! let root = RootIdentity::init(&cfg)?;
//!
//! let profile = Profile {
//!     cn: "localhost".into(),
//!     san: vec!["DNS:localhost".into()],
//!     ..Profile::default()
//! };
//! orecert::issue(&cfg, &root, &profile, UsageKind::Server)?;
//! orecert::verify(&cfg, &root, "localhost")?;
//! orecert::revoke(&cfg, &root, "localhost")?;
//! ```
//!
//! Everything is synchronous and filesystem-backed; a single invocation
//! owns the `certs/` tree for its duration. Multi-artifact writes are
//! not atomic: a failure partway through can leave some files written.

pub mod bundle;
pub mod ca;
pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod issue;
pub mod key;
pub mod revoke;
pub mod store;
pub mod verify;

pub use bundle::{bundle_with, load_material, BundleMaterial, Bundler};
pub use ca::RootIdentity;
pub use config::{Config, Profile, UsageKind};
pub use error::{CaError, Result};
pub use issue::{issue, IssuanceMetadata, IssuedCertificate};
pub use key::{KeyAlgorithm, PrivateKey};
pub use revoke::{revoke, LedgerSummary};
pub use verify::verify;
