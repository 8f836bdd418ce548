//! # docinspect-core
//!
//! Core types, traits, and abstractions for docinspect.
//!
//! This crate provides the data model shared by the other docinspect crates,
//! the error taxonomy surfaced to presentation, the identity-platform seam,
//! and the response normalizer that turns an arbitrary backend payload into
//! a canonical [`DocumentChunk`].

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use normalize::{normalize, normalize_source, CanonicalField, FieldSource, CONTENT_ALIASES};
pub use traits::*;
