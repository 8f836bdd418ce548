//! Per-request search coordination.
//!
//! A search validates the id, acquires a token through the broker, fetches
//! the chunk and folds the result into a [`SearchOutcome`]. Each search runs
//! in its own span carrying a fresh UUIDv7 `request_id`.

use std::time::Instant;

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use docinspect_auth::CredentialBroker;
use docinspect_client::ApiClient;
use docinspect_core::{logging, DocumentChunk, DocumentChunkId, Error, IdentityProvider, Result};

/// What the presentation layer should show for one search.
#[derive(Debug)]
pub enum SearchOutcome {
    Found(DocumentChunk),
    Failed(Error),
    /// The user dismissed a sign-in prompt. Nothing to report.
    Dismissed,
}

impl SearchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchOutcome::Failed(_))
    }
}

impl From<Result<DocumentChunk>> for SearchOutcome {
    fn from(result: Result<DocumentChunk>) -> Self {
        match result {
            Ok(chunk) => SearchOutcome::Found(chunk),
            Err(err) if err.is_silent() => SearchOutcome::Dismissed,
            Err(err) => SearchOutcome::Failed(err),
        }
    }
}

/// Couples a [`CredentialBroker`] with an [`ApiClient`].
pub struct SearchOrchestrator<P: ?Sized> {
    broker: CredentialBroker<P>,
    client: ApiClient,
}

impl<P> SearchOrchestrator<P>
where
    P: IdentityProvider + ?Sized,
{
    pub fn new(broker: CredentialBroker<P>, client: ApiClient) -> Self {
        Self { broker, client }
    }

    pub fn broker(&self) -> &CredentialBroker<P> {
        &self.broker
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Run one search for the raw user input.
    pub async fn search(&self, input: &str) -> SearchOutcome {
        let request_id = Uuid::now_v7();
        let span = info_span!(
            "search",
            { logging::SUBSYSTEM } = "cli",
            { logging::OPERATION } = "search",
            { logging::REQUEST_ID } = %request_id
        );

        async {
            let start = Instant::now();
            let outcome = SearchOutcome::from(self.fetch(input).await);
            let duration_ms = start.elapsed().as_millis() as u64;

            match &outcome {
                SearchOutcome::Found(chunk) => info!(
                    { logging::DOCUMENT_CHUNK_ID } = %chunk.metadata.id,
                    { logging::DURATION_MS } = duration_ms,
                    { logging::SUCCESS } = true,
                    "Search completed"
                ),
                SearchOutcome::Failed(err) => error!(
                    { logging::ERROR_KIND } = err.kind(),
                    { logging::ERROR_MSG } = %err,
                    { logging::DURATION_MS } = duration_ms,
                    { logging::SUCCESS } = false,
                    "Search failed"
                ),
                SearchOutcome::Dismissed => info!(
                    { logging::DURATION_MS } = duration_ms,
                    "Search dismissed by user"
                ),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn fetch(&self, input: &str) -> Result<DocumentChunk> {
        let id = DocumentChunkId::parse(input)?;
        let token = self.broker.acquire().await?;
        self.client.fetch_resource(&id, &token).await
    }

    /// Acquire a token and probe the resource API.
    pub async fn health(&self) -> Result<bool> {
        let token = self.broker.acquire().await?;
        Ok(self.client.health_check(&token).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docinspect_core::CanonicalMetadata;

    fn chunk() -> DocumentChunk {
        DocumentChunk {
            metadata: CanonicalMetadata {
                id: "a".to_string(),
                title: "T".to_string(),
                last_updated: None,
                depot_name: None,
                page_type: None,
                url: None,
            },
            content: "c".to_string(),
        }
    }

    #[test]
    fn test_outcome_from_ok() {
        let outcome = SearchOutcome::from(Ok(chunk()));
        assert!(matches!(outcome, SearchOutcome::Found(ref c) if c.metadata.id == "a"));
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_outcome_cancel_is_dismissed() {
        let outcome = SearchOutcome::from(Err(Error::UserCancelled));
        assert!(matches!(outcome, SearchOutcome::Dismissed));
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_outcome_other_errors_fail() {
        let outcome = SearchOutcome::from(Err(Error::AccessDenied));
        assert!(matches!(outcome, SearchOutcome::Failed(Error::AccessDenied)));
        assert!(outcome.is_failure());
    }
}
