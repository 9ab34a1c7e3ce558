use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Download error: {0}")]
    Download(String),

    /// A test assertion that did not hold. Aborts the current case only.
    #[error("{0}")]
    Failed(String),
}

impl SuiteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SuiteError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, SuiteError>;

/// Fail the current test case with a human-readable message.
pub fn fail<T>(message: impl Into<String>) -> Result<T> {
    Err(SuiteError::Failed(message.into()))
}

/// Turn a timed-out wait into a test failure with a specific message.
pub trait FailOnTimeout<T> {
    fn fail_on_timeout<F>(self, message: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> FailOnTimeout<T> for Result<T> {
    fn fail_on_timeout<F>(self, message: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e {
            SuiteError::Timeout(_) => SuiteError::Failed(message()),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_displays_message_verbatim() {
        let err = fail::<()>("Cart is Empty").unwrap_err();
        assert_eq!(err.to_string(), "Cart is Empty");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_fail_on_timeout_rewrites_only_timeouts() {
        let timed_out: Result<()> = Err(SuiteError::Timeout("#basket".to_string()));
        let err = timed_out.fail_on_timeout(|| "Cart is Empty".to_string()).unwrap_err();
        assert!(matches!(err, SuiteError::Failed(ref m) if m == "Cart is Empty"));

        let broken: Result<()> = Err(SuiteError::Browser("socket closed".to_string()));
        let err = broken.fail_on_timeout(|| "Cart is Empty".to_string()).unwrap_err();
        assert!(matches!(err, SuiteError::Browser(_)));
    }

    #[test]
    fn test_timeout_is_detected() {
        let err = SuiteError::Timeout("#filter_name".to_string());
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Timeout waiting for: #filter_name");
    }
}
