//! Resource API configuration.

use std::env;

use docinspect_core::{defaults, Error, Result};

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the resource endpoint.
    pub base_url: String,
    /// Request timeout in seconds. `None` leaves the transport default.
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(defaults::ENV_API_BASE_URL)
                .unwrap_or_else(|_| defaults::API_BASE_URL.to_string()),
            timeout_seconds: env::var(defaults::ENV_API_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_seconds == Some(0) {
            return Err(Error::Config("timeout must be at least one second".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, defaults::API_BASE_URL);
        assert_eq!(config.timeout_seconds, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_base_url() {
        let config = ApiConfig::default().with_base_url("http://localhost:8080/api");
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_rejects_missing_scheme() {
        let config = ApiConfig::default().with_base_url("localhost:8080");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let config = ApiConfig::default().with_base_url("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ApiConfig {
            timeout_seconds: Some(0),
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_timeout_parsing() {
        env::set_var(defaults::ENV_API_TIMEOUT, "not-a-number");
        let config = ApiConfig::from_env();
        env::remove_var(defaults::ENV_API_TIMEOUT);
        assert_eq!(config.timeout_seconds, None);
    }
}
