//! Scripted identity provider for deterministic testing.
//!
//! Outcomes are keyed by acquisition mode and the space-joined scope set.
//! Anything not scripted fails with `InteractionRequired("not scripted")`.
//! Every call is recorded so tests can assert on tier ordering.
//!
//! ```rust
//! use docinspect_auth::mock::ScriptedIdentityProvider;
//! use docinspect_auth::AcquisitionMode;
//! use docinspect_core::{AccessToken, ScopeConfig};
//!
//! let provider = ScriptedIdentityProvider::new()
//!     .with_signed_in_account()
//!     .with_outcome(
//!         AcquisitionMode::Silent,
//!         &ScopeConfig::new(["api://docs/read"]),
//!         Ok(AccessToken::new("token")),
//!     );
//! assert!(provider.calls().is_empty());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docinspect_core::{AccessToken, Identity, IdentityError, IdentityProvider, ScopeConfig};

use crate::broker::AcquisitionMode;

/// A recorded provider call. Scope sets are space-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    ActiveAccounts,
    SignIn(String),
    Silent(String),
    Interactive(String),
    SignOut,
    ClearCache,
}

type Outcome = Result<AccessToken, IdentityError>;

/// Identity provider that replays scripted outcomes.
#[derive(Clone)]
pub struct ScriptedIdentityProvider {
    accounts: Arc<Mutex<Vec<Identity>>>,
    sign_in: Arc<Mutex<Result<Identity, IdentityError>>>,
    outcomes: Arc<Mutex<HashMap<(AcquisitionMode, String), Outcome>>>,
    call_log: Arc<Mutex<Vec<ProviderCall>>>,
}

impl Default for ScriptedIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedIdentityProvider {
    /// No accounts; sign-in succeeds with [`Self::test_identity`].
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(Vec::new())),
            sign_in: Arc::new(Mutex::new(Ok(Self::test_identity()))),
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn test_identity() -> Identity {
        Identity {
            account_key: "00000000-0000-0000-0000-000000000001".to_string(),
            username: "ada@example.com".to_string(),
            name: Some("Ada Lovelace".to_string()),
        }
    }

    /// Start with [`Self::test_identity`] already signed in.
    pub fn with_signed_in_account(self) -> Self {
        self.accounts.lock().unwrap().push(Self::test_identity());
        self
    }

    /// Script the result of interactive sign-in.
    pub fn with_sign_in(self, result: Result<Identity, IdentityError>) -> Self {
        *self.sign_in.lock().unwrap() = result;
        self
    }

    /// Script the result of a token request.
    pub fn with_outcome(self, mode: AcquisitionMode, scopes: &ScopeConfig, outcome: Outcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert((mode, scopes.joined()), outcome);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.call_log.lock().unwrap().clone()
    }

    fn record(&self, call: ProviderCall) {
        self.call_log.lock().unwrap().push(call);
    }

    fn outcome(&self, mode: AcquisitionMode, scopes: &ScopeConfig) -> Outcome {
        self.outcomes
            .lock()
            .unwrap()
            .get(&(mode, scopes.joined()))
            .cloned()
            .unwrap_or_else(|| Err(IdentityError::InteractionRequired("not scripted".into())))
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn active_accounts(&self) -> Vec<Identity> {
        self.record(ProviderCall::ActiveAccounts);
        self.accounts.lock().unwrap().clone()
    }

    async fn sign_in_interactive(&self, scopes: &ScopeConfig) -> Result<Identity, IdentityError> {
        self.record(ProviderCall::SignIn(scopes.joined()));
        let result = self.sign_in.lock().unwrap().clone();
        if let Ok(identity) = &result {
            self.accounts.lock().unwrap().insert(0, identity.clone());
        }
        result
    }

    async fn acquire_token_silent(
        &self,
        scopes: &ScopeConfig,
        _identity: &Identity,
    ) -> Result<AccessToken, IdentityError> {
        self.record(ProviderCall::Silent(scopes.joined()));
        self.outcome(AcquisitionMode::Silent, scopes)
    }

    async fn acquire_token_interactive(
        &self,
        scopes: &ScopeConfig,
        _identity: &Identity,
    ) -> Result<AccessToken, IdentityError> {
        self.record(ProviderCall::Interactive(scopes.joined()));
        self.outcome(AcquisitionMode::Interactive, scopes)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.record(ProviderCall::SignOut);
        let mut accounts = self.accounts.lock().unwrap();
        if !accounts.is_empty() {
            accounts.remove(0);
        }
        Ok(())
    }

    async fn clear_cache(&self) -> Result<(), IdentityError> {
        self.record(ProviderCall::ClearCache);
        self.accounts.lock().unwrap().clear();
        Ok(())
    }
}
