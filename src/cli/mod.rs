pub mod assets;
pub mod compare;
pub mod convert;
pub mod setup;
pub mod ui;

use crate::core::market::Asset;
use anyhow::{Result, bail};

/// Resolves a user-supplied asset id against the provider snapshot.
pub(crate) fn find_asset<'a>(assets: &'a [Asset], id: &str) -> Result<&'a Asset> {
    match assets.iter().find(|a| a.id == id) {
        Some(asset) => Ok(asset),
        None => bail!("Unknown asset id: {id}. Run `xcr assets` to list supported ids."),
    }
}
