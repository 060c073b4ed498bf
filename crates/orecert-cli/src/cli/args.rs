//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Local certificate authority for development and lab environments
///
/// Creates a private root CA, issues server/client certificates from
/// YAML profiles, and tracks revocations in a signed ledger.
#[derive(Parser, Debug)]
#[command(name = "orecert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: .orecert.yaml in the working directory)
    #[arg(short = 'c', long, global = true, env = "ORECERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the root CA key and self-signed certificate
    #[command(name = "init-ca")]
    InitCa(InitCaArgs),

    /// Issue a certificate from a profile file
    Issue(IssueArgs),

    /// Revoke a certificate and re-sign the ledger
    Revoke(RevokeArgs),

    /// Verify a certificate against the root
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct InitCaArgs {
    /// Key algorithm: rsa, ecdsa or ed25519
    #[arg(long)]
    pub algo: Option<String>,

    /// Validity in days
    #[arg(long)]
    pub days: Option<u32>,

    /// Replace an existing root key and certificate
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Profile file (YAML) describing the certificate
    pub profile: PathBuf,

    /// Certificate type: server, client or both
    #[arg(short = 't', long = "type", default_value = "server")]
    pub usage: String,

    /// Replace existing artifacts for this CN
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Profile file (YAML) naming the CN to revoke
    pub profile: PathBuf,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Profile file (YAML) naming the CN to verify
    pub profile: PathBuf,

    /// Also check the revocation ledger
    #[arg(long)]
    pub check_revocation: bool,
}
