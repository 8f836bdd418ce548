//! OAuth 2.0 device authorization grant (RFC 8628) identity provider.
//!
//! Interactive acquisition shows a verification URL and user code through a
//! [`VerificationPrompt`], then polls the token endpoint until the user
//! approves or declines. Silent acquisition serves unexpired access tokens
//! from the session cache and otherwise redeems the session refresh token.
//!
//! Nothing is written to disk: the session ends with the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use docinspect_core::{
    defaults, AccessToken, Error, Identity, IdentityError, IdentityProvider, Result, ScopeConfig,
};

use crate::config::AuthConfig;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Default access token lifetime when the authority omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Upper bound on any lifetime or interval the authority reports.
const MAX_AUTHORITY_SECS: u64 = 86_400;

/// Device authorization response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeChallenge {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    #[serde(default)]
    pub interval: Option<u64>,
    /// Human-readable instructions, when the authority provides them.
    #[serde(default)]
    pub message: Option<String>,
}

impl DeviceCodeChallenge {
    /// Text to show the user.
    pub fn instructions(&self) -> String {
        self.message.clone().unwrap_or_else(|| {
            format!(
                "To sign in, open {} and enter the code {}",
                self.verification_uri, self.user_code
            )
        })
    }
}

/// Where device-code instructions are shown to the user.
pub trait VerificationPrompt: Send + Sync {
    fn show(&self, challenge: &DeviceCodeChallenge);
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// Token lifetime, bounded to what the cache can represent.
    fn lifetime_secs(&self) -> i64 {
        self.expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .clamp(0, MAX_AUTHORITY_SECS as i64)
    }
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthErrorResponse {
    fn detail(&self) -> String {
        match &self.error_description {
            Some(desc) => format!("{}: {}", self.error, desc),
            None => self.error.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    oid: Option<String>,
    #[serde(default)]
    sub: Option<String>,
}

/// Decode the claims segment of an id token. The signature is not verified;
/// the claims only label the session.
fn decode_id_token(id_token: &str) -> std::result::Result<Identity, IdentityError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| IdentityError::Protocol("malformed id token".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| IdentityError::Protocol(format!("id token is not base64url: {}", e)))?;
    let claims: IdTokenClaims = serde_json::from_slice(&bytes)
        .map_err(|e| IdentityError::Protocol(format!("id token claims: {}", e)))?;

    let account_key = claims
        .oid
        .or(claims.sub)
        .ok_or_else(|| IdentityError::Protocol("id token has no subject".to_string()))?;
    let username = claims
        .preferred_username
        .or(claims.email)
        .unwrap_or_else(|| account_key.clone());

    Ok(Identity {
        account_key,
        username,
        name: claims.name,
    })
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - chrono::Duration::seconds(defaults::TOKEN_EXPIRY_SKEW_SECS) > now
    }
}

#[derive(Debug)]
struct CachedAccount {
    identity: Identity,
    refresh_token: Option<String>,
    tokens: HashMap<String, CachedToken>,
}

/// Session state. The first account is the active one.
#[derive(Debug, Default)]
struct Session {
    accounts: Vec<CachedAccount>,
}

impl Session {
    fn find_mut(&mut self, account_key: &str) -> Option<&mut CachedAccount> {
        self.accounts
            .iter_mut()
            .find(|a| a.identity.account_key == account_key)
    }

    /// Record a token response for `identity`, making it the active account.
    fn store(&mut self, identity: &Identity, scope_key: String, response: &TokenResponse) {
        let position = self
            .accounts
            .iter()
            .position(|a| a.identity.account_key == identity.account_key);
        let mut account = match position {
            Some(index) => self.accounts.remove(index),
            None => CachedAccount {
                identity: identity.clone(),
                refresh_token: None,
                tokens: HashMap::new(),
            },
        };

        if response.refresh_token.is_some() {
            account.refresh_token = response.refresh_token.clone();
        }
        account.tokens.insert(
            scope_key,
            CachedToken {
                token: AccessToken::new(response.access_token.clone()),
                expires_at: Utc::now() + chrono::Duration::seconds(response.lifetime_secs()),
            },
        );
        self.accounts.insert(0, account);
    }
}

/// Identity provider backed by the device authorization grant.
pub struct DeviceCodeProvider {
    client: Client,
    config: AuthConfig,
    prompt: Arc<dyn VerificationPrompt>,
    interrupt_cancels: bool,
    session: Mutex<Session>,
}

impl DeviceCodeProvider {
    pub fn new(config: AuthConfig, prompt: Arc<dyn VerificationPrompt>) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            authority = %config.authority,
            "Initializing device-code identity provider"
        );

        Ok(Self {
            client,
            config,
            prompt,
            interrupt_cancels: false,
            session: Mutex::new(Session::default()),
        })
    }

    /// Treat Ctrl-C while waiting for the user as a cancellation.
    pub fn with_interrupt_cancellation(mut self, enabled: bool) -> Self {
        self.interrupt_cancels = enabled;
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/oauth2/v2.0/{}",
            self.config.authority.trim_end_matches('/'),
            name
        )
    }

    /// Requested scopes plus the OpenID scopes, without duplicates.
    fn interactive_scope(scopes: &ScopeConfig) -> String {
        let mut all: Vec<&str> = scopes.scopes.iter().map(String::as_str).collect();
        for extra in defaults::OIDC_SCOPES {
            if !all.contains(extra) {
                all.push(extra);
            }
        }
        all.join(" ")
    }

    async fn oauth_error(response: reqwest::Response) -> OAuthErrorResponse {
        let status = response.status();
        response.json().await.unwrap_or(OAuthErrorResponse {
            error: "unexpected_response".to_string(),
            error_description: Some(format!("authority returned {}", status)),
        })
    }

    async fn wait(&self, interval: Duration) -> std::result::Result<(), IdentityError> {
        if !self.interrupt_cancels {
            tokio::time::sleep(interval).await;
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => Ok(()),
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted while waiting for device sign-in");
                Err(IdentityError::Cancelled)
            }
        }
    }

    /// Run the device flow to completion.
    async fn device_flow(
        &self,
        scopes: &ScopeConfig,
    ) -> std::result::Result<TokenResponse, IdentityError> {
        let scope = Self::interactive_scope(scopes);
        debug!(scope = %scope, "Requesting device code");

        let response = self
            .client
            .post(self.endpoint("devicecode"))
            .form(&[("client_id", self.config.client_id.as_str()), ("scope", scope.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let err = Self::oauth_error(response).await;
            return Err(IdentityError::Protocol(err.detail()));
        }

        let challenge: DeviceCodeChallenge = response.json().await.map_err(transport_error)?;
        self.prompt.show(&challenge);

        let mut interval = Duration::from_secs(
            challenge
                .interval
                .unwrap_or(defaults::DEVICE_CODE_POLL_SECS)
                .min(MAX_AUTHORITY_SECS),
        );
        let deadline = tokio::time::Instant::now()
            + Duration::from_secs(challenge.expires_in.min(MAX_AUTHORITY_SECS));

        loop {
            self.wait(interval).await?;
            if tokio::time::Instant::now() > deadline {
                return Err(IdentityError::Protocol("device code expired".to_string()));
            }

            let response = self
                .client
                .post(self.endpoint("token"))
                .form(&[
                    ("grant_type", DEVICE_CODE_GRANT),
                    ("client_id", self.config.client_id.as_str()),
                    ("device_code", challenge.device_code.as_str()),
                ])
                .send()
                .await
                .map_err(transport_error)?;

            if response.status().is_success() {
                return response.json().await.map_err(transport_error);
            }

            let err = Self::oauth_error(response).await;
            match err.error.as_str() {
                "authorization_pending" => {
                    debug!("Device sign-in pending");
                }
                "slow_down" => {
                    interval = (interval
                        + Duration::from_secs(defaults::DEVICE_CODE_SLOW_DOWN_SECS))
                    .min(Duration::from_secs(MAX_AUTHORITY_SECS));
                    debug!(interval_secs = interval.as_secs(), "Authority asked to slow down");
                }
                "authorization_declined" | "access_denied" => {
                    info!("User declined device sign-in");
                    return Err(IdentityError::Cancelled);
                }
                "expired_token" => {
                    return Err(IdentityError::Protocol("device code expired".to_string()));
                }
                _ => return Err(map_token_error(&err)),
            }
        }
    }

    async fn redeem_refresh_token(
        &self,
        refresh_token: &str,
        scopes: &ScopeConfig,
    ) -> std::result::Result<TokenResponse, IdentityError> {
        let scope = scopes.joined();
        let response = self
            .client
            .post(self.endpoint("token"))
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            return response.json().await.map_err(transport_error);
        }

        let err = Self::oauth_error(response).await;
        Err(map_token_error(&err))
    }
}

/// Undecodable bodies are protocol errors; everything else is the network.
fn transport_error(e: reqwest::Error) -> IdentityError {
    if e.is_decode() {
        IdentityError::Protocol(e.to_string())
    } else {
        IdentityError::Network(e.to_string())
    }
}

fn map_token_error(err: &OAuthErrorResponse) -> IdentityError {
    match err.error.as_str() {
        "invalid_grant" | "interaction_required" | "consent_required" | "login_required" => {
            IdentityError::InteractionRequired(err.detail())
        }
        _ => IdentityError::Protocol(err.detail()),
    }
}

#[async_trait]
impl IdentityProvider for DeviceCodeProvider {
    async fn active_accounts(&self) -> Vec<Identity> {
        let session = self.session.lock().await;
        session.accounts.iter().map(|a| a.identity.clone()).collect()
    }

    async fn sign_in_interactive(
        &self,
        scopes: &ScopeConfig,
    ) -> std::result::Result<Identity, IdentityError> {
        let response = self.device_flow(scopes).await?;
        let id_token = response
            .id_token
            .as_deref()
            .ok_or_else(|| IdentityError::Protocol("authority returned no id token".to_string()))?;
        let identity = decode_id_token(id_token)?;

        self.session
            .lock()
            .await
            .store(&identity, scopes.joined(), &response);
        info!(account = %identity.username, "Device sign-in complete");
        Ok(identity)
    }

    async fn acquire_token_silent(
        &self,
        scopes: &ScopeConfig,
        identity: &Identity,
    ) -> std::result::Result<AccessToken, IdentityError> {
        let scope_key = scopes.joined();

        let refresh_token = {
            let mut session = self.session.lock().await;
            let account = session
                .find_mut(&identity.account_key)
                .ok_or(IdentityError::NoAccount)?;

            if !scopes.force_refresh {
                if let Some(cached) = account.tokens.get(&scope_key) {
                    if cached.is_fresh(Utc::now()) {
                        debug!(scope = %scope_key, "Serving cached access token");
                        return Ok(cached.token.clone());
                    }
                }
            }

            account.refresh_token.clone().ok_or_else(|| {
                IdentityError::InteractionRequired("no refresh token in session".to_string())
            })?
        };

        let response = self.redeem_refresh_token(&refresh_token, scopes).await?;
        let token = AccessToken::new(response.access_token.clone());

        let mut session = self.session.lock().await;
        session.store(identity, scope_key, &response);
        Ok(token)
    }

    async fn acquire_token_interactive(
        &self,
        scopes: &ScopeConfig,
        identity: &Identity,
    ) -> std::result::Result<AccessToken, IdentityError> {
        let response = self.device_flow(scopes).await?;

        let signed_in = match response.id_token.as_deref().map(decode_id_token) {
            Some(Ok(claimed)) => {
                if claimed.account_key != identity.account_key {
                    warn!(
                        expected = %identity.username,
                        actual = %claimed.username,
                        "Device sign-in completed with a different account"
                    );
                }
                claimed
            }
            Some(Err(err)) => {
                warn!(error = %err, "Ignoring unreadable id token");
                identity.clone()
            }
            None => identity.clone(),
        };

        let token = AccessToken::new(response.access_token.clone());
        self.session
            .lock()
            .await
            .store(&signed_in, scopes.joined(), &response);
        Ok(token)
    }

    async fn sign_out(&self) -> std::result::Result<(), IdentityError> {
        let mut session = self.session.lock().await;
        if session.accounts.is_empty() {
            return Err(IdentityError::NoAccount);
        }
        let account = session.accounts.remove(0);
        info!(account = %account.identity.username, "Signed out");
        Ok(())
    }

    async fn clear_cache(&self) -> std::result::Result<(), IdentityError> {
        let mut session = self.session.lock().await;
        let count = session.accounts.len();
        session.accounts.clear();
        info!(accounts = count, "Session cache cleared");
        Ok(())
    }
}
