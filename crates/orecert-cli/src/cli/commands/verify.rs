//! `orecert verify` - check validity window and chain.

use anyhow::Result;

use super::Context;
use crate::cli::args::VerifyArgs;

pub fn execute(mut ctx: Context, args: VerifyArgs) -> Result<()> {
    let profile = crate::config::load_profile(&args.profile)?;
    if args.check_revocation {
        ctx.config.check_revocation = true;
    }

    let root = ctx.root()?;
    orecert::verify(&ctx.config, &root, &profile.cn)?;

    println!("✅ {} is valid", profile.cn);
    Ok(())
}
