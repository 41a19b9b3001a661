//! HTTP utilities.
//!
//! Used by license resolution to fetch a declared license URL. Plain fetch,
//! no special protocol handling.

use crate::packager::error::{ErrorExt, Result};
use std::path::Path;

/// Downloads a URL to a file, creating parent directories as needed.
pub async fn download_to_file(url: &str, dest: &Path) -> Result<()> {
    log::info!("Downloading {url}");

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    tokio::fs::write(dest, &bytes)
        .await
        .fs_context("writing downloaded file", dest)?;

    Ok(())
}
