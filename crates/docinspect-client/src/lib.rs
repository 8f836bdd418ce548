//! # docinspect-client
//!
//! Client for the document chunk resource API.
//!
//! [`ApiClient::fetch_resource`] issues one authenticated GET, maps the
//! status code onto the docinspect error taxonomy, and hands successful
//! payloads to [`docinspect_core::normalize`].
//!
//! # Example
//!
//! ```rust,no_run
//! use docinspect_client::ApiClient;
//! use docinspect_core::{AccessToken, DocumentChunkId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ApiClient::from_env().unwrap();
//!     let id = DocumentChunkId::parse("doc-12345-chunk-67890").unwrap();
//!     let chunk = client
//!         .fetch_resource(&id, &AccessToken::new("token"))
//!         .await
//!         .unwrap();
//!     println!("{}", chunk.metadata.title);
//! }
//! ```

mod client;
mod config;

pub use client::ApiClient;
pub use config::ApiConfig;
