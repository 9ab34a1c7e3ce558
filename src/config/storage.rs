use crate::config::schema::{BrowserSource, SuiteConfig};
use crate::error::{Result, SuiteError};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "PERIPLUS_E2E_CONFIG";
pub const SITE_URL_ENV: &str = "PERIPLUS_SITE_URL";
pub const HEADLESS_ENV: &str = "PERIPLUS_HEADLESS";
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Get the configuration file path: `$PERIPLUS_E2E_CONFIG` or `./periplus-e2e.toml`
pub fn get_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("periplus-e2e.toml"))
}

/// Load configuration from the default location and apply environment overrides
pub fn load_config() -> Result<SuiteConfig> {
    let mut config = load_config_from(&get_config_path())?;
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Load configuration from `path`; a missing file yields the defaults
pub fn load_config_from(path: &Path) -> Result<SuiteConfig> {
    if !path.exists() {
        tracing::info!("Config file not found at {:?}, using defaults", path);
        return Ok(SuiteConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        SuiteError::Config(format!("Failed to read config from {:?}: {}", path, e))
    })?;

    let config: SuiteConfig = toml::from_str(&content)?;

    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Apply environment overrides read through `lookup`.
pub fn apply_overrides<F>(config: &mut SuiteConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(SITE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.site_url = url.trim().to_string();
    }

    if let Some(value) = lookup(HEADLESS_ENV) {
        config.headless = matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );
    }

    if let Some(path) = lookup(CHROME_PATH_ENV).filter(|v| !v.trim().is_empty()) {
        config.browser_source = BrowserSource::Custom {
            path: PathBuf::from(path.trim()),
        };
    }
}
