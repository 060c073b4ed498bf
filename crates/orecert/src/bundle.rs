//! Export bundles.
//!
//! Collects the on-disk material for an issued certificate and hands
//! it to a pluggable packaging backend. The library ships the trait
//! and the loader; concrete formats (PKCS#12 and friends) live behind
//! the [`Bundler`] seam so they can be swapped without touching the
//! store layout.

use crate::config::Config;
use crate::error::Result;
use crate::key::PrivateKey;
use crate::store::{self, Layout};

/// Everything a packaging backend needs for one leaf.
pub struct BundleMaterial {
    /// Decoded leaf private key.
    pub key: PrivateKey,
    /// Leaf certificate, DER.
    pub cert_der: Vec<u8>,
    /// Root certificate, DER.
    pub root_der: Vec<u8>,
}

/// Packaging backend for [`bundle_with`].
pub trait Bundler {
    /// Package `material`, protecting the output with `password` when
    /// the format supports it.
    fn bundle(&self, material: &BundleMaterial, password: &str) -> Result<()>;
}

/// Load the key, certificate and root for `cn` from the store.
pub fn load_material(cfg: &Config, cn: &str) -> Result<BundleMaterial> {
    let layout = Layout::new(cfg);
    let paths = layout.leaf_paths(cn)?;

    let key = crate::codec::decode_key(&store::read(&paths.key)?)?;
    let cert_der = crate::codec::decode_cert(&store::read(&paths.cert)?)?;
    let root_der = crate::codec::decode_cert(&store::read(&layout.ca_cert_path())?)?;

    Ok(BundleMaterial { key, cert_der, root_der })
}

/// Load the material for `cn` and run it through `bundler`.
pub fn bundle_with(cfg: &Config, cn: &str, password: &str, bundler: &dyn Bundler) -> Result<()> {
    let material = load_material(cfg, cn)?;
    bundler.bundle(&material, password)
}
