//! `orecert revoke` - append a certificate to the ledger.

use anyhow::Result;

use super::Context;
use crate::cli::args::RevokeArgs;

pub fn execute(ctx: Context, args: RevokeArgs) -> Result<()> {
    let profile = crate::config::load_profile(&args.profile)?;
    let root = ctx.root()?;

    let summary = orecert::revoke(&ctx.config, &root, &profile.cn)?;

    println!("✅ {}", summary.path.display());
    Ok(())
}
