//! # orecert-cli
//!
//! Command-line front end for the [`orecert`] certificate authority
//! engine.
//!
//! ## Commands
//!
//! - **init-ca**: create the root key and self-signed certificate
//! - **issue**: sign a leaf certificate described by a profile file
//! - **revoke**: append a certificate to the revocation ledger
//! - **verify**: check a certificate's validity window and chain
//!
//! Configuration comes from `.orecert.yaml` (or `-c <file>`), overlaid
//! by `ORECERT_*` environment variables, overlaid by flags.

pub mod cli;
pub mod config;

pub use cli::run;
