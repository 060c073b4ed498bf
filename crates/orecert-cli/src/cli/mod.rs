//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.quiet, cli.verbose);

    let config = crate::config::load(cli.config.as_deref())?;
    let ctx = commands::Context { config };

    match cli.command {
        Commands::InitCa(cmd_args) => commands::init_ca::execute(ctx, cmd_args),
        Commands::Issue(cmd_args) => commands::issue::execute(ctx, cmd_args),
        Commands::Revoke(cmd_args) => commands::revoke::execute(ctx, cmd_args),
        Commands::Verify(cmd_args) => commands::verify::execute(ctx, cmd_args),
    }
}

/// RUST_LOG wins when set; otherwise --quiet/--verbose pick the level.
fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orecert={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
