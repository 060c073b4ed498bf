//! `orecert issue` - sign a leaf certificate from a profile.

use anyhow::Result;
use orecert::UsageKind;

use super::Context;
use crate::cli::args::IssueArgs;

pub fn execute(mut ctx: Context, args: IssueArgs) -> Result<()> {
    let usage: UsageKind = args.usage.parse()?;
    let profile = crate::config::load_profile(&args.profile)?;
    if args.overwrite {
        ctx.config.overwrite = true;
    }

    let root = ctx.root()?;
    let issued = orecert::issue(&ctx.config, &root, &profile, usage)?;

    println!("✅ {}", issued.paths.cert.display());
    Ok(())
}
