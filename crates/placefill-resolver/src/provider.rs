//! The provider interface the coordinator talks to.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use placefill_core::{Candidate, ResolvedAddress, SuggestQuery};
use placefill_places::GooglePlacesClient;

/// A stream of candidate sets. Each item replaces the previous set; dropping
/// the stream unsubscribes.
pub type CandidateFeed = BoxStream<'static, Vec<Candidate>>;

/// A source of suggestions and address lookups.
///
/// Implementations never fail loudly: anything that goes wrong is logged and
/// reported as `None`.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Short provider name for log fields.
    fn name(&self) -> &'static str;

    /// Starts a suggest request. `None` means the provider could not answer
    /// and the caller should try elsewhere.
    async fn suggest(&self, query: &SuggestQuery) -> Option<CandidateFeed>;

    /// Resolves a candidate this provider produced.
    async fn resolve(&self, candidate: &Candidate) -> Option<ResolvedAddress>;
}

#[async_trait]
impl PlaceProvider for GooglePlacesClient {
    fn name(&self) -> &'static str {
        "google_places"
    }

    /// One-shot: the feed yields the prediction set once and ends.
    async fn suggest(&self, query: &SuggestQuery) -> Option<CandidateFeed> {
        let params = self.query_parameters(query);
        let candidates = GooglePlacesClient::suggest(self, &params).await?;
        Some(stream::once(async move { candidates }).boxed())
    }

    async fn resolve(&self, candidate: &Candidate) -> Option<ResolvedAddress> {
        let Some(place_id) = candidate.primary_provider_id() else {
            tracing::debug!(
                label = %candidate.primary_label,
                "candidate has no place id, skipping places details"
            );
            return None;
        };
        GooglePlacesClient::resolve(self, place_id).await
    }
}
