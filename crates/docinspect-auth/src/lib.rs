//! # docinspect-auth
//!
//! Credential acquisition for docinspect.
//!
//! This crate provides:
//! - [`CredentialBroker`], the fixed four-tier fallback chain that negotiates
//!   an access token across silent and interactive modes and across the
//!   primary (resource) and fallback (profile) scopes
//! - [`AuthConfig`], loaded from the environment
//! - [`DeviceCodeProvider`], an identity provider speaking the OAuth 2.0
//!   device authorization grant, with a session-only token cache
//! - a scripted provider for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docinspect_auth::{AuthConfig, CredentialBroker, DeviceCodeProvider, VerificationPrompt};
//! use docinspect_auth::DeviceCodeChallenge;
//!
//! struct Print;
//! impl VerificationPrompt for Print {
//!     fn show(&self, challenge: &DeviceCodeChallenge) {
//!         eprintln!("{}", challenge.instructions());
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AuthConfig::from_env();
//!     let provider = DeviceCodeProvider::new(config.clone(), Arc::new(Print)).unwrap();
//!     let broker = CredentialBroker::new(Arc::new(provider), &config);
//!     let token = broker.acquire().await.unwrap();
//!     println!("acquired {}", token);
//! }
//! ```

pub mod broker;
pub mod config;
pub mod device_code;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use broker::{Acquisition, AcquisitionMode, CredentialBroker, Tier, TIERS};
pub use config::AuthConfig;
pub use device_code::{DeviceCodeChallenge, DeviceCodeProvider, VerificationPrompt};
