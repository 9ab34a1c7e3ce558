use std::fmt;

pub const USERNAME_ENV: &str = "PERI_USERNAME";
pub const PASSWORD_ENV: &str = "PERI_PASSWORD";

/// Login credentials for the site under test. Read once per suite.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read credentials from the process environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Missing values become empty strings; the login step then fails on its own.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key).unwrap_or_else(|| {
                tracing::warn!("{} is not set, logging in with an empty value", key);
                String::new()
            })
        };

        Self {
            username: read(USERNAME_ENV),
            password: read(PASSWORD_ENV),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_reads_both_keys() {
        let creds = Credentials::from_lookup(|key| match key {
            USERNAME_ENV => Some("reader@example.com".to_string()),
            PASSWORD_ENV => Some("hunter2".to_string()),
            _ => None,
        });
        assert_eq!(creds, Credentials::new("reader@example.com", "hunter2"));
        assert!(creds.is_complete());
    }

    #[test]
    fn test_missing_values_become_empty() {
        let creds = Credentials::from_lookup(|_| None);
        assert_eq!(creds.username, "");
        assert_eq!(creds.password, "");
        assert!(!creds.is_complete());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("reader@example.com", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("reader@example.com"));
        assert!(!printed.contains("hunter2"));
    }
}
