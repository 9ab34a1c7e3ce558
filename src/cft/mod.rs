//! Chrome for Testing (CfT) integration.
//! Resolves the browser binary the suite runs against: a configured path, or a
//! CfT build fetched from the official JSON API and cached on disk.

mod api;
mod download;

pub use api::{fetch_version, CftVersionInfo, LastKnownGoodVersions};
pub use download::{ensure_chrome_binary, find_chrome_in_dir, get_platform};

use crate::config::{validate_chrome_path, BrowserSource, SuiteConfig};
use crate::error::Result;
use std::path::PathBuf;

/// Resolve the Chrome executable for this suite run.
pub async fn resolve_chrome(config: &SuiteConfig) -> Result<PathBuf> {
    match &config.browser_source {
        BrowserSource::Custom { path } => {
            validate_chrome_path(path)?;
            Ok(path.clone())
        }
        BrowserSource::ChromeForTesting { channel } => {
            let info = fetch_version(*channel, get_platform()).await?;
            let path = ensure_chrome_binary(&info, &config.download_dir).await?;
            tracing::info!("Resolved Chrome {} at {:?}", info.version, path);
            Ok(path)
        }
    }
}
