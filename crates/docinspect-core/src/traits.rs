//! Core traits for docinspect abstractions.
//!
//! The identity platform is consumed through [`IdentityProvider`], so the
//! credential broker can be driven by a real authority or by a scripted
//! provider in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AccessToken, Identity, ScopeConfig};

/// Failure reported by an identity platform primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The user dismissed or declined the prompt.
    #[error("user cancelled the prompt")]
    Cancelled,

    /// No usable session; user interaction (or consent) is required.
    #[error("interaction required: {0}")]
    InteractionRequired(String),

    /// No account is signed in.
    #[error("no active account")]
    NoAccount,

    /// The authority could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The authority answered with an error or an unexpected response.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl IdentityError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, IdentityError::Cancelled)
    }
}

/// Identity-platform primitives consumed by the credential broker.
///
/// Implementations own all session state (accounts, cached tokens). The
/// broker never caches or persists anything itself.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Accounts currently signed in, most recently active first.
    async fn active_accounts(&self) -> Vec<Identity>;

    /// Prompt the user to sign in with the given scopes.
    async fn sign_in_interactive(&self, scopes: &ScopeConfig) -> Result<Identity, IdentityError>;

    /// Obtain a token without user interaction, from the existing session.
    async fn acquire_token_silent(
        &self,
        scopes: &ScopeConfig,
        identity: &Identity,
    ) -> Result<AccessToken, IdentityError>;

    /// Obtain a token through a user-facing prompt.
    async fn acquire_token_interactive(
        &self,
        scopes: &ScopeConfig,
        identity: &Identity,
    ) -> Result<AccessToken, IdentityError>;

    /// Sign the active account out.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Drop every cached account and token.
    async fn clear_cache(&self) -> Result<(), IdentityError>;
}
