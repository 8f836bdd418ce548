//! Error types for docinspect.
//!
//! The display strings double as the user-facing messages, so presentation
//! can print an error without inspecting its variant.

use thiserror::Error;

/// Result type alias using docinspect's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type surfaced to presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The user dismissed an interactive prompt
    #[error("Sign-in was cancelled")]
    UserCancelled,

    /// Every credential tier was exhausted without a cancellation. The
    /// detail is for logs only.
    #[error("Failed to acquire access token. Please try signing in again.")]
    AcquisitionFailed(String),

    /// The resource endpoint rejected the presented token (401)
    #[error("Authentication failed. Please sign in again.")]
    AuthExpired,

    /// Authenticated but not authorized for the resource (403)
    #[error("Access denied. You may not have permission to access this resource.")]
    AccessDenied,

    /// The document chunk does not exist (404)
    #[error("Document chunk not found. Please check the ID and try again.")]
    ResourceNotFound(String),

    /// Any other non-2xx response, carrying the raw body
    #[error("API Error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// No usable response was obtained
    #[error("Request error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether the error reflects a deliberate user action and should not be
    /// reported as a failure.
    pub fn is_silent(&self) -> bool {
        matches!(self, Error::UserCancelled)
    }

    /// Short stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UserCancelled => "user_cancelled",
            Error::AcquisitionFailed(_) => "acquisition_failed",
            Error::AuthExpired => "auth_expired",
            Error::AccessDenied => "access_denied",
            Error::ResourceNotFound(_) => "resource_not_found",
            Error::ApiError { .. } => "api_error",
            Error::Transport(_) => "transport_error",
            Error::Config(_) => "config",
            Error::InvalidInput(_) => "invalid_input",
        }
    }
}
