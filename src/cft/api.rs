//! CfT JSON API types and fetch.

use crate::config::CftChannel;
use crate::error::{Result, SuiteError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const VERSIONS_URL: &str =
    "https://googlechromelabs.github.io/chrome-for-testing/last-known-good-versions-with-downloads.json";

#[derive(Debug, Clone, Deserialize)]
pub struct LastKnownGoodVersions {
    pub timestamp: Option<String>,
    pub channels: HashMap<String, ChannelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelInfo {
    pub channel: String,
    pub version: String,
    #[serde(default)]
    pub revision: Option<String>,
    pub downloads: Option<Downloads>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Downloads {
    pub chrome: Option<Vec<DownloadItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadItem {
    pub platform: String,
    pub url: String,
}

/// Version info for one channel, with download URL for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CftVersionInfo {
    pub channel: String,
    pub version: String,
    pub url: String,
    pub platform: String,
}

impl LastKnownGoodVersions {
    /// Pick the build for `channel` on `platform`.
    pub fn select(&self, channel: CftChannel, platform: &str) -> Result<CftVersionInfo> {
        let info = self.channels.get(channel.as_str()).ok_or_else(|| {
            SuiteError::Download(format!("Channel {} missing from CfT data", channel.as_str()))
        })?;

        let url = info
            .downloads
            .as_ref()
            .and_then(|d| d.chrome.as_ref())
            .and_then(|items| items.iter().find(|i| i.platform == platform))
            .map(|i| i.url.clone())
            .ok_or_else(|| {
                SuiteError::Download(format!(
                    "No chrome download for platform {} in channel {}",
                    platform, info.channel
                ))
            })?;

        Ok(CftVersionInfo {
            channel: info.channel.clone(),
            version: info.version.clone(),
            url,
            platform: platform.to_string(),
        })
    }
}

/// Fetch last-known-good-versions-with-downloads and pick the build for `channel`.
pub async fn fetch_version(channel: CftChannel, platform: &str) -> Result<CftVersionInfo> {
    let data: LastKnownGoodVersions = reqwest::get(VERSIONS_URL)
        .await?
        .error_for_status()?
        .json()
        .await?;

    let info = data.select(channel, platform)?;
    tracing::info!(
        "Chrome for Testing {} is {} ({})",
        info.channel,
        info.version,
        info.platform
    );
    Ok(info)
}
