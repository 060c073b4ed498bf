//! `orecert init-ca` - create the root key and certificate.

use anyhow::Result;
use orecert::store::Layout;
use orecert::RootIdentity;

use super::Context;
use crate::cli::args::InitCaArgs;

pub fn execute(mut ctx: Context, args: InitCaArgs) -> Result<()> {
    if args.algo.is_some() {
        ctx.config.default_algo = args.algo;
    }
    if args.days.is_some() {
        ctx.config.default_days = args.days;
    }
    if args.overwrite {
        ctx.config.overwrite = true;
    }

    RootIdentity::init(&ctx.config)?;

    let layout = Layout::new(&ctx.config);
    println!("✅ {}", layout.ca_cert_path().display());
    Ok(())
}
