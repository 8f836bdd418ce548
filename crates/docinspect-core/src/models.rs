//! Core data models for docinspect.
//!
//! These types are shared across all docinspect crates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// IDENTITY & CREDENTIALS
// =============================================================================

/// Snapshot of a signed-in account, as reported by the identity platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-specific key for the account (object id or subject).
    pub account_key: String,
    /// Username, usually an email address.
    pub username: String,
    /// Display name, when the platform supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    /// Name to greet the user with: the display name, else the username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Opaque bearer credential.
///
/// `Debug` and `Display` only show a short prefix so a token never ends up
/// in logs verbatim. Use [`AccessToken::secret`] to read the full value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The full bearer string.
    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Short prefix followed by an ellipsis.
    pub fn redacted(&self) -> String {
        let preview: String = self.0.chars().take(defaults::TOKEN_PREVIEW_CHARS).collect();
        format!("{}…", preview)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.redacted()).finish()
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// One scope configuration: the scopes to request and whether cached
/// tokens may be reused.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub scopes: Vec<String>,
    #[serde(default)]
    pub force_refresh: bool,
}

impl ScopeConfig {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            force_refresh: false,
        }
    }

    /// Space-delimited scope string, as sent on the wire.
    pub fn joined(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Which of the two scope configurations a tier uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Resource-specific permission; authorizes the document endpoint.
    Primary,
    /// Basic profile permission.
    Fallback,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Ordered pair of scope configurations, primary first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequest {
    pub primary: ScopeConfig,
    pub fallback: ScopeConfig,
}

impl ScopeRequest {
    pub fn get(&self, kind: ScopeKind) -> &ScopeConfig {
        match kind {
            ScopeKind::Primary => &self.primary,
            ScopeKind::Fallback => &self.fallback,
        }
    }
}

impl Default for ScopeRequest {
    fn default() -> Self {
        Self {
            primary: ScopeConfig::new([defaults::API_SCOPE]),
            fallback: ScopeConfig::new([defaults::PROFILE_SCOPE]),
        }
    }
}

// =============================================================================
// DOCUMENT CHUNKS
// =============================================================================

/// Caller-supplied identifier of a document chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentChunkId(String);

impl DocumentChunkId {
    /// Wrap an identifier verbatim.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate user input: surrounding whitespace is dropped and the
    /// remainder must not be empty.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "Please enter a document chunk ID".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentChunkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical metadata of a document chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMetadata {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The canonical record handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub metadata: CanonicalMetadata,
    pub content: String,
}
