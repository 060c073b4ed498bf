//! orecert - local certificate authority CLI.

use anyhow::Result;

fn main() -> Result<()> {
    orecert_cli::run()
}
