//! Identity-platform configuration.
//!
//! Loaded from `DOCINSPECT_*` environment variables, falling back to the
//! constants in [`docinspect_core::defaults`].

use std::env;

use docinspect_core::{defaults, Error, Result, ScopeConfig, ScopeRequest};
use tracing::debug;

/// Settings for the identity platform and the scopes the broker requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Public client id of this application.
    pub client_id: String,
    /// Authority URL, e.g. `https://login.microsoftonline.com/<tenant>`.
    pub authority: String,
    /// Scopes requested by the initial interactive sign-in.
    pub login: ScopeConfig,
    /// Primary and fallback scopes for the acquisition tiers.
    pub scopes: ScopeRequest,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: defaults::CLIENT_ID.to_string(),
            authority: defaults::AUTHORITY.to_string(),
            login: ScopeConfig::new([defaults::PROFILE_SCOPE]),
            scopes: ScopeRequest::default(),
        }
    }
}

impl AuthConfig {
    /// Build from environment variables with documented defaults.
    pub fn from_env() -> Self {
        let profile_scope = env::var(defaults::ENV_PROFILE_SCOPE)
            .unwrap_or_else(|_| defaults::PROFILE_SCOPE.to_string());
        let api_scope =
            env::var(defaults::ENV_API_SCOPE).unwrap_or_else(|_| defaults::API_SCOPE.to_string());

        let config = Self {
            client_id: env::var(defaults::ENV_CLIENT_ID)
                .unwrap_or_else(|_| defaults::CLIENT_ID.to_string()),
            authority: env::var(defaults::ENV_AUTHORITY)
                .unwrap_or_else(|_| defaults::AUTHORITY.to_string()),
            login: ScopeConfig::new([profile_scope.clone()]),
            scopes: ScopeRequest {
                primary: ScopeConfig::new([api_scope]),
                fallback: ScopeConfig::new([profile_scope]),
            },
        };

        debug!(
            authority = %config.authority,
            primary = %config.scopes.primary.joined(),
            fallback = %config.scopes.fallback.joined(),
            "Loaded auth configuration"
        );
        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::Config("client_id cannot be empty".to_string()));
        }

        if !self.authority.starts_with("http://") && !self.authority.starts_with("https://") {
            return Err(Error::Config(format!(
                "authority must start with http:// or https://, got: {}",
                self.authority
            )));
        }

        for (label, scopes) in [
            ("login", &self.login),
            ("primary", &self.scopes.primary),
            ("fallback", &self.scopes.fallback),
        ] {
            if scopes.scopes.iter().all(|s| s.trim().is_empty()) {
                return Err(Error::Config(format!("{} scopes cannot be empty", label)));
            }
        }

        Ok(())
    }
}
