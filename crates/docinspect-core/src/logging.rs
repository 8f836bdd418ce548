//! Structured logging schema and field name constants for docinspect.
//!
//! All crates use these constants for consistent structured logging fields.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Search failed, surfaced to the user |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, sign-in, token acquired, record fetched |
//! | DEBUG | Tier attempts, request URLs, decision points |
//! | TRACE | Alias probing inside the normalizer |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one search.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "auth", "client", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "acquire", "fetch_resource", "health_check"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Document chunk identifier being fetched.
pub const DOCUMENT_CHUNK_ID: &str = "document_chunk_id";

/// Username of the active identity.
pub const ACCOUNT: &str = "account";

// ─── Credential fields ─────────────────────────────────────────────────────

/// One-based tier number in the acquisition chain.
pub const TIER: &str = "tier";

/// Acquisition mode ("silent", "interactive").
pub const MODE: &str = "mode";

/// Scope kind ("primary", "fallback", "login").
pub const SCOPE_KIND: &str = "scope";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// HTTP status code returned by the resource endpoint.
pub const HTTP_STATUS: &str = "status";

/// Byte length of a response body.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Stable error tag (see `Error::kind`).
pub const ERROR_KIND: &str = "error_kind";
