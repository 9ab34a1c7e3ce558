use crate::config::schema::{BrowserSource, SuiteConfig};
use crate::error::{Result, SuiteError};
use std::path::Path;

/// Validate Chrome executable path
pub fn validate_chrome_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SuiteError::Validation(format!(
            "Chrome executable not found at {:?}",
            path
        )));
    }

    if !path.is_file() {
        return Err(SuiteError::Validation(format!(
            "Chrome path {:?} is not a file",
            path
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = path.metadata().map_err(|e| {
            SuiteError::Validation(format!("Cannot read Chrome file metadata: {}", e))
        })?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(SuiteError::Validation(format!(
                "Chrome executable {:?} is not executable",
                path
            )));
        }
    }

    Ok(())
}

/// Validate suite configuration before a browser is launched
pub fn validate_config(config: &SuiteConfig) -> Result<()> {
    let url = config.site_url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SuiteError::Validation(format!(
            "Invalid site URL: {}. Must start with http:// or https://",
            config.site_url
        )));
    }

    if config.timeout_secs == 0 {
        return Err(SuiteError::Validation(
            "Timeout must be at least one second".to_string(),
        ));
    }

    if let BrowserSource::Custom { path } = &config.browser_source {
        validate_chrome_path(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SuiteConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = SuiteConfig {
            site_url: "periplus.com".to_string(),
            ..SuiteConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = SuiteConfig {
            timeout_secs: 0,
            ..SuiteConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_missing_custom_chrome() {
        let config = SuiteConfig {
            browser_source: BrowserSource::Custom {
                path: PathBuf::from("/nonexistent/path/to/chrome"),
            },
            ..SuiteConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_directory_is_not_a_chrome_binary() {
        let err = validate_chrome_path(&std::env::temp_dir()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }
}
