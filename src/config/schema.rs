use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base URL of the site under test
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Upper bound for every explicit wait, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Run Chrome without a window
    #[serde(default)]
    pub headless: bool,

    /// Where the Chrome binary comes from
    #[serde(default)]
    pub browser_source: BrowserSource,

    /// Cache directory for downloaded Chrome for Testing builds
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Write a screenshot here for every failed case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_dir: Option<PathBuf>,

    /// Extra Chrome command-line arguments
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            timeout_secs: default_timeout_secs(),
            headless: false,
            browser_source: BrowserSource::default(),
            download_dir: default_download_dir(),
            screenshot_dir: None,
            extra_args: Vec::new(),
        }
    }
}

impl SuiteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join a site path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.site_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserSource {
    /// Download (once) and use an official Chrome for Testing build
    ChromeForTesting {
        #[serde(default)]
        channel: CftChannel,
    },
    /// Use a Chrome/Chromium binary that is already installed
    Custom { path: PathBuf },
}

impl Default for BrowserSource {
    fn default() -> Self {
        BrowserSource::ChromeForTesting {
            channel: CftChannel::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CftChannel {
    #[default]
    Stable,
    Beta,
    Dev,
    Canary,
}

impl CftChannel {
    /// Channel name as used by the Chrome for Testing JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CftChannel::Stable => "Stable",
            CftChannel::Beta => "Beta",
            CftChannel::Dev => "Dev",
            CftChannel::Canary => "Canary",
        }
    }
}

fn default_site_url() -> String {
    "https://periplus.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_download_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("periplus-e2e").join("chrome"))
        .unwrap_or_else(|| PathBuf::from(".periplus-e2e/chrome"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = SuiteConfig {
            site_url: "https://periplus.com/".to_string(),
            ..SuiteConfig::default()
        };
        assert_eq!(
            config.url("/checkout/cart"),
            "https://periplus.com/checkout/cart"
        );
        assert_eq!(
            config.url("account/Login"),
            "https://periplus.com/account/Login"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SuiteConfig = toml::from_str("headless = true").unwrap();
        assert!(config.headless);
        assert_eq!(config.site_url, "https://periplus.com");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.browser_source, BrowserSource::default());
    }

    #[test]
    fn test_custom_browser_source_toml() {
        let config: SuiteConfig = toml::from_str(
            r#"
            [browser_source]
            type = "custom"
            path = "/usr/bin/chromium"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.browser_source,
            BrowserSource::Custom {
                path: PathBuf::from("/usr/bin/chromium")
            }
        );
    }
}
