//! One browser session shared sequentially by every case of a suite run.

use crate::browser::port::allocate_free_cdp_port;
use crate::browser::{CDPClient, LaunchOptions, Wait};
use crate::cft;
use crate::config::{validate_config, Credentials, SuiteConfig};
use crate::error::{Result, SuiteError};
use base64::Engine as _;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

pub struct Session {
    client: CDPClient,
    config: SuiteConfig,
    credentials: Credentials,
    wait: Wait,
    auth: AuthState,
}

impl Session {
    /// Validate the config, resolve a Chrome binary and launch it.
    pub async fn start(config: SuiteConfig, credentials: Credentials) -> Result<Self> {
        validate_config(&config)?;
        let chrome = cft::resolve_chrome(&config).await?;
        Self::launch(&chrome, config, credentials).await
    }

    /// Launch a specific Chrome binary.
    pub async fn launch(
        chrome_path: &Path,
        config: SuiteConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        let mut options = LaunchOptions::temporary(allocate_free_cdp_port(), config.headless);
        options.extra_args = config.extra_args.clone();

        let client = CDPClient::launch(chrome_path, &options).await?;
        tracing::info!(
            "Session started against {} as {:?}",
            config.site_url,
            credentials.username
        );

        Ok(Self {
            client,
            wait: Wait::new(config.timeout()),
            config,
            credentials,
            auth: AuthState::Anonymous,
        })
    }

    pub fn client(&self) -> &CDPClient {
        &self.client
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn wait(&self) -> &Wait {
        &self.wait
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth
    }

    pub(crate) fn set_auth_state(&mut self, state: AuthState) {
        if self.auth != state {
            tracing::info!("Session {:?} -> {:?}", self.auth, state);
        }
        self.auth = state;
    }

    /// Absolute URL of a site path.
    pub fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    /// Write a PNG of the current page into `dir`; returns the file path.
    pub async fn save_screenshot(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let data = self.client.screenshot().await?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| SuiteError::Cdp(format!("Invalid screenshot data: {}", e)))?;

        std::fs::create_dir_all(dir)?;
        let path = dir.join(screenshot_file_name(name, now_ms()));
        std::fs::write(&path, bytes)?;
        tracing::info!("Saved screenshot to {:?}", path);
        Ok(path)
    }

    /// Close the browser. Always releases Chrome, even when the socket is already gone.
    pub async fn close(mut self) -> Result<()> {
        self.client.close().await
    }
}

fn screenshot_file_name(case: &str, timestamp_ms: u64) -> String {
    let slug: String = case
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("{}-{}.png", slug.trim_matches('-'), timestamp_ms)
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
