//! Tiered credential acquisition.
//!
//! The broker signs the user in when needed, then walks a fixed list of
//! `(mode, scope)` tiers until one yields a token:
//!
//! | Tier | Mode | Scope |
//! |------|------|-------|
//! | 1 | silent | primary |
//! | 2 | interactive | primary |
//! | 3 | silent | fallback |
//! | 4 | interactive | fallback |
//!
//! Every failure moves on to the next tier, except a user cancellation on
//! a primary-scope tier, which ends the chain with [`Error::UserCancelled`].
//! The fallback tiers absorb cancellations. Exhausting the list yields
//! [`Error::AcquisitionFailed`].

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use docinspect_core::{
    logging, AccessToken, Error, Identity, IdentityError, IdentityProvider, Result, ScopeConfig,
    ScopeKind, ScopeRequest,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::AuthConfig;

/// How a tier talks to the identity platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionMode {
    /// From the existing session, no prompt.
    Silent,
    /// Through a user-facing prompt.
    Interactive,
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Interactive => write!(f, "interactive"),
        }
    }
}

/// One attempt in the acquisition sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub mode: AcquisitionMode,
    pub scope: ScopeKind,
}

/// The acquisition sequence, in order.
pub const TIERS: [Tier; 4] = [
    Tier {
        mode: AcquisitionMode::Silent,
        scope: ScopeKind::Primary,
    },
    Tier {
        mode: AcquisitionMode::Interactive,
        scope: ScopeKind::Primary,
    },
    Tier {
        mode: AcquisitionMode::Silent,
        scope: ScopeKind::Fallback,
    },
    Tier {
        mode: AcquisitionMode::Interactive,
        scope: ScopeKind::Fallback,
    },
];

/// What to do after a tier failed.
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Stop,
    Continue,
}

fn classify(tier_index: usize, err: &IdentityError) -> Verdict {
    let is_primary = TIERS[tier_index].scope == ScopeKind::Primary;
    if err.is_cancellation() && is_primary {
        Verdict::Stop
    } else {
        Verdict::Continue
    }
}

/// A successful acquisition.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub token: AccessToken,
    pub identity: Identity,
    /// The tier that produced the token.
    pub tier: Tier,
}

impl Acquisition {
    /// Whether the token carries the resource scope. A fallback token only
    /// proves who the user is.
    pub fn is_primary(&self) -> bool {
        self.tier.scope == ScopeKind::Primary
    }
}

/// Negotiates an access token through the identity platform.
pub struct CredentialBroker<P: ?Sized> {
    provider: Arc<P>,
    login: ScopeConfig,
    scopes: ScopeRequest,
    // Held for a whole acquisition so at most one prompt is ever visible.
    in_flight: Mutex<()>,
}

impl<P> CredentialBroker<P>
where
    P: IdentityProvider + ?Sized,
{
    pub fn new(provider: Arc<P>, config: &AuthConfig) -> Self {
        Self::with_scopes(provider, config.login.clone(), config.scopes.clone())
    }

    pub fn with_scopes(provider: Arc<P>, login: ScopeConfig, scopes: ScopeRequest) -> Self {
        Self {
            provider,
            login,
            scopes,
            in_flight: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Acquire a bearer token.
    pub async fn acquire(&self) -> Result<AccessToken> {
        self.acquire_detailed().await.map(|a| a.token)
    }

    /// Acquire a bearer token, reporting which identity and tier produced it.
    #[instrument(skip(self), fields(subsystem = "auth", op = "acquire"))]
    pub async fn acquire_detailed(&self) -> Result<Acquisition> {
        let _guard = self.in_flight.lock().await;
        let start = Instant::now();

        let identity = self.resolve_identity().await?;
        let mut last_error: Option<IdentityError> = None;

        for (index, tier) in TIERS.iter().enumerate() {
            let number = index + 1;
            let scopes = self.scopes.get(tier.scope);
            debug!(
                { logging::TIER } = number,
                { logging::MODE } = %tier.mode,
                { logging::SCOPE_KIND } = %tier.scope,
                "Attempting tier"
            );

            let attempt = match tier.mode {
                AcquisitionMode::Silent => {
                    self.provider.acquire_token_silent(scopes, &identity).await
                }
                AcquisitionMode::Interactive => {
                    self.provider
                        .acquire_token_interactive(scopes, &identity)
                        .await
                }
            };

            match attempt {
                Ok(token) => {
                    info!(
                        { logging::TIER } = number,
                        { logging::MODE } = %tier.mode,
                        { logging::SCOPE_KIND } = %tier.scope,
                        { logging::ACCOUNT } = %identity.username,
                        { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
                        "Access token acquired"
                    );
                    return Ok(Acquisition {
                        token,
                        identity,
                        tier: *tier,
                    });
                }
                Err(err) => {
                    debug!({ logging::TIER } = number, { logging::ERROR_MSG } = %err, "Tier failed");
                    if classify(index, &err) == Verdict::Stop {
                        info!({ logging::TIER } = number, "Token acquisition cancelled by user");
                        return Err(Error::UserCancelled);
                    }
                    last_error = Some(err);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no tiers attempted".to_string());
        warn!(error = %detail, "All token acquisition tiers failed");
        Err(Error::AcquisitionFailed(detail))
    }

    /// Use the active account, signing in first when there is none.
    async fn resolve_identity(&self) -> Result<Identity> {
        if let Some(identity) = self.active_identity().await {
            debug!({ logging::ACCOUNT } = %identity.username, "Using active account");
            return Ok(identity);
        }

        info!("No active account, starting sign-in");
        self.sign_in().await
    }

    /// The first active account, if any.
    pub async fn active_identity(&self) -> Option<Identity> {
        self.provider.active_accounts().await.into_iter().next()
    }

    /// Interactive sign-in with the login scopes.
    pub async fn sign_in(&self) -> Result<Identity> {
        match self.provider.sign_in_interactive(&self.login).await {
            Ok(identity) => {
                info!({ logging::ACCOUNT } = %identity.username, "Signed in");
                Ok(identity)
            }
            Err(IdentityError::Cancelled) => {
                info!("Sign-in cancelled by user");
                Err(Error::UserCancelled)
            }
            Err(err) => {
                warn!(error = %err, "Sign-in failed");
                Err(Error::AcquisitionFailed(err.to_string()))
            }
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.provider
            .sign_out()
            .await
            .map_err(|e| Error::AcquisitionFailed(format!("sign-out failed: {}", e)))
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.provider
            .clear_cache()
            .await
            .map_err(|e| Error::AcquisitionFailed(format!("clearing cache failed: {}", e)))
    }
}
