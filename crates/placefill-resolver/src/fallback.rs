//! Adapter that puts an on-device search engine behind [`PlaceProvider`].

use async_trait::async_trait;
use futures::future;
use futures::stream::StreamExt;
use placefill_core::{
    normalize_completion, parse_placemark, Candidate, FallbackHandle, ResolvedAddress,
    SuggestQuery,
};

use crate::local::{CompleterOptions, LocalSearchEngine};
use crate::provider::{CandidateFeed, PlaceProvider};

/// Fallback provider backed by a [`LocalSearchEngine`].
///
/// `suggest` always yields a live subscription: every completer push becomes
/// a fresh candidate set. Failed pushes are logged and skipped.
pub struct FallbackProvider<E> {
    engine: E,
}

impl<E: LocalSearchEngine> FallbackProvider<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Subscribes to completions for `fragment` under `options`.
    pub fn subscribe(&self, fragment: &str, options: &CompleterOptions) -> CandidateFeed {
        self.engine
            .complete(fragment, options)
            .filter_map(|update| {
                future::ready(match update {
                    Ok(completions) => {
                        tracing::debug!(count = completions.len(), "local completer update");
                        Some(
                            completions
                                .into_iter()
                                .map(normalize_completion)
                                .collect::<Vec<_>>(),
                        )
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "local completer update failed");
                        None
                    }
                })
            })
            .boxed()
    }

    /// Runs a local search for `handle` and parses the first hit.
    pub async fn resolve_handle(&self, handle: &FallbackHandle) -> Option<ResolvedAddress> {
        let completion = handle.completion();
        let items = match self.engine.search(completion).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(title = %completion.title, error = %e, "local search failed");
                return None;
            }
        };

        let Some(item) = items.first() else {
            tracing::warn!(title = %completion.title, "local search returned no map items");
            return None;
        };

        let address = parse_placemark(&item.placemark);
        if address.is_none() {
            tracing::warn!(title = %completion.title, "local placemark has no title");
        }
        address
    }
}

#[async_trait]
impl<E: LocalSearchEngine> PlaceProvider for FallbackProvider<E> {
    fn name(&self) -> &'static str {
        "local_search"
    }

    async fn suggest(&self, query: &SuggestQuery) -> Option<CandidateFeed> {
        let options = CompleterOptions::from_scope(&query.scope);
        Some(self.subscribe(&query.text, &options))
    }

    async fn resolve(&self, candidate: &Candidate) -> Option<ResolvedAddress> {
        let Some(handle) = candidate.fallback_handle() else {
            tracing::debug!(
                label = %candidate.primary_label,
                "candidate has no local search handle"
            );
            return None;
        };
        self.resolve_handle(handle).await
    }
}
