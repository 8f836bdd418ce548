//! Centralized default constants for docinspect.
//!
//! **This module is the single source of truth** for shared default values.
//! Configuration loaders fall back to these when the environment is silent.

// =============================================================================
// RESOURCE API
// =============================================================================

/// Default base URL of the document resource endpoint.
pub const API_BASE_URL: &str = "https://learnknowledge-int.azurewebsites.net/api/document";

/// Environment variable overriding [`API_BASE_URL`].
pub const ENV_API_BASE_URL: &str = "DOCINSPECT_API_BASE_URL";

/// Environment variable for an optional request timeout in seconds.
pub const ENV_API_TIMEOUT: &str = "DOCINSPECT_API_TIMEOUT";

// =============================================================================
// IDENTITY PLATFORM
// =============================================================================

/// Public client id registered with the identity platform.
pub const CLIENT_ID: &str = "fd972449-9448-4dce-9df1-c1edac7b2225";

/// Authority (tenant) that issues tokens.
pub const AUTHORITY: &str =
    "https://login.microsoftonline.com/72f988bf-86f1-41af-91ab-2d7cd011db47";

/// Resource-specific scope that authorizes the document endpoint.
pub const API_SCOPE: &str = "api://7c78db7f-b420-4cb8-b448-fc0015661260/user_impersonation";

/// Basic profile scope, used for sign-in and as the fallback tier.
pub const PROFILE_SCOPE: &str = "https://graph.microsoft.com/User.Read";

pub const ENV_CLIENT_ID: &str = "DOCINSPECT_CLIENT_ID";
pub const ENV_AUTHORITY: &str = "DOCINSPECT_AUTHORITY";
pub const ENV_API_SCOPE: &str = "DOCINSPECT_API_SCOPE";
pub const ENV_PROFILE_SCOPE: &str = "DOCINSPECT_PROFILE_SCOPE";

/// Scopes always added to interactive requests so the authority returns an
/// id token and a refresh token.
pub const OIDC_SCOPES: &[&str] = &["openid", "profile", "offline_access"];

/// Device-code polling interval when the authority does not supply one.
pub const DEVICE_CODE_POLL_SECS: u64 = 5;

/// Interval increase requested by a `slow_down` poll response (RFC 8628 §3.5).
pub const DEVICE_CODE_SLOW_DOWN_SECS: u64 = 5;

/// Access tokens this close to expiry are not served from the session cache.
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Title used when the payload carries none.
pub const UNTITLED_DOCUMENT: &str = "Untitled Document";

/// Content used when the payload carries none.
pub const NO_CONTENT: &str = "No content available";

/// Envelope key that may wrap the record.
pub const ENVELOPE_KEY: &str = "itemSpec";

/// Nested metadata object key.
pub const METADATA_KEY: &str = "metadata";

// =============================================================================
// LOGGING
// =============================================================================

/// Tracing filter used when `RUST_LOG` is unset.
pub const LOG_FILTER: &str = "docinspect=info,docinspect_core=info,docinspect_auth=info,docinspect_client=info";

/// Number of token characters kept by redacted token output.
pub const TOKEN_PREVIEW_CHARS: usize = 8;
