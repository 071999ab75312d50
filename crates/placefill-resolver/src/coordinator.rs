//! Orchestrates one autocomplete session across the primary and fallback
//! providers.
//!
//! The collaborator feeds text changes and selections in through
//! [`ResolutionCoordinator::on_query_changed`] and
//! [`ResolutionCoordinator::on_candidate_selected`]; both return immediately
//! and the provider calls run on spawned Tokio tasks. Results come back as
//! [`SearchEvent`]s on the receiver returned by [`ResolutionCoordinator::new`],
//! which the collaborator drains on whatever context is safe for it.
//!
//! Ordering: every query bumps a generation counter and every publish compares
//! against it under the same lock that guards the event sender, so a response
//! for older text can never overwrite candidates for newer text. In-flight
//! HTTP requests are not cancelled; their results are dropped on arrival. The
//! fallback subscription runs on its own task and is aborted as soon as the
//! session moves on.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::StreamExt;
use placefill_core::{Candidate, ResolvedAddress, SearchScope, SuggestQuery};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::provider::{CandidateFeed, PlaceProvider};

/// Events delivered to the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Replaces the displayed candidate list wholesale.
    CandidatesUpdated(Vec<Candidate>),
    AddressResolved(ResolvedAddress),
    /// Always follows [`SearchEvent::AddressResolved`]; the search UI should close.
    SessionDismissed,
}

pub type SearchEvents = mpsc::UnboundedReceiver<SearchEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingPrimarySuggest,
    /// Primary suggest failed; the fallback subscription is live.
    AwaitingFallbackSuggest,
    AwaitingResolve,
}

struct Session {
    query_generation: u64,
    resolve_generation: u64,
    state: SessionState,
    subscription: Option<AbortHandle>,
}

impl Session {
    /// Starts a new query epoch: older suggest and resolve results go stale
    /// and the fallback subscription is dropped.
    fn begin_query(&mut self, state: SessionState) -> u64 {
        self.query_generation += 1;
        self.resolve_generation += 1;
        self.cancel_subscription();
        self.state = state;
        self.query_generation
    }

    fn begin_resolve(&mut self) -> u64 {
        self.resolve_generation += 1;
        self.state = SessionState::AwaitingResolve;
        self.resolve_generation
    }

    fn cancel_subscription(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.abort();
        }
    }

    /// State to fall back to once a pending operation settles.
    fn resting_state(&self) -> SessionState {
        if self.subscription.is_some() {
            SessionState::AwaitingFallbackSuggest
        } else {
            SessionState::Idle
        }
    }
}

struct Shared {
    primary: Arc<dyn PlaceProvider>,
    fallback: Arc<dyn PlaceProvider>,
    scope: SearchScope,
    session: Mutex<Session>,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, event: SearchEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("search event receiver dropped");
        }
    }

    /// Publishes `candidates` if `generation` is still the latest query.
    /// Returns `false` when the result is stale.
    fn publish_candidates(
        &self,
        generation: u64,
        candidates: Vec<Candidate>,
        next: SessionState,
    ) -> bool {
        let mut session = self.lock();
        if session.query_generation != generation {
            return false;
        }
        if session.state != SessionState::AwaitingResolve {
            session.state = next;
        }
        tracing::debug!(generation, count = candidates.len(), "publishing candidates");
        self.send(SearchEvent::CandidatesUpdated(candidates));
        true
    }

    async fn run_query(self: Arc<Self>, generation: u64, query: SuggestQuery) {
        if let Some(feed) = self.primary.suggest(&query).await {
            self.drain(generation, feed, SessionState::Idle).await;
            return;
        }

        {
            let mut session = self.lock();
            if session.query_generation != generation {
                tracing::debug!(generation, "dropping stale primary failure");
                return;
            }
            session.state = SessionState::AwaitingFallbackSuggest;
        }
        tracing::info!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            "primary suggest failed, falling back"
        );

        let Some(feed) = self.fallback.suggest(&query).await else {
            tracing::warn!(generation, "both providers failed to suggest");
            self.publish_candidates(generation, Vec::new(), SessionState::Idle);
            return;
        };

        // Hold the lock while spawning so the handle is recorded before the
        // subscription can publish or finish.
        let mut session = self.lock();
        if session.query_generation != generation {
            tracing::debug!(generation, "query superseded before fallback subscribed");
            return;
        }
        let shared = Arc::clone(&self);
        let task = tokio::spawn(async move {
            shared
                .drain(generation, feed, SessionState::AwaitingFallbackSuggest)
                .await;
        });
        session.cancel_subscription();
        session.subscription = Some(task.abort_handle());
    }

    /// Publishes every set `feed` yields until it ends or goes stale.
    async fn drain(&self, generation: u64, mut feed: CandidateFeed, next: SessionState) {
        while let Some(candidates) = feed.next().await {
            if !self.publish_candidates(generation, candidates, next) {
                tracing::debug!(generation, "dropping stale candidates, unsubscribing");
                return;
            }
        }

        let mut session = self.lock();
        if session.query_generation == generation {
            session.subscription = None;
            if session.state != SessionState::AwaitingResolve {
                session.state = SessionState::Idle;
            }
        }
    }

    async fn run_resolve(self: Arc<Self>, generation: u64, candidate: Candidate) {
        let provider = if candidate.primary_provider_id().is_some() {
            &self.primary
        } else {
            &self.fallback
        };

        let resolved = provider.resolve(&candidate).await;

        let mut session = self.lock();
        if session.resolve_generation != generation {
            tracing::debug!(generation, "dropping stale resolve result");
            return;
        }

        match resolved {
            Some(address) => {
                session.begin_query(SessionState::Idle);
                self.send(SearchEvent::AddressResolved(address));
                self.send(SearchEvent::SessionDismissed);
            }
            None => {
                tracing::warn!(
                    provider = provider.name(),
                    label = %candidate.primary_label,
                    "selected candidate could not be resolved"
                );
                session.state = session.resting_state();
            }
        }
    }
}

/// Drives a single autocomplete session.
///
/// Cloning yields another handle onto the same session.
#[derive(Clone)]
pub struct ResolutionCoordinator {
    shared: Arc<Shared>,
}

impl ResolutionCoordinator {
    /// Creates a coordinator and the receiver its events are delivered on.
    pub fn new(
        primary: Arc<dyn PlaceProvider>,
        fallback: Arc<dyn PlaceProvider>,
        scope: SearchScope,
    ) -> (Self, SearchEvents) {
        let (events, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            primary,
            fallback,
            scope,
            session: Mutex::new(Session {
                query_generation: 0,
                resolve_generation: 0,
                state: SessionState::Idle,
                subscription: None,
            }),
            events,
        });
        (Self { shared }, receiver)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Handles new search text. Empty text clears the candidate list;
    /// anything else starts a primary suggest, falling back to the local
    /// provider if the primary cannot answer.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn on_query_changed(&self, text: &str) {
        if text.is_empty() {
            let mut session = self.shared.lock();
            session.begin_query(SessionState::Idle);
            self.shared.send(SearchEvent::CandidatesUpdated(Vec::new()));
            return;
        }

        let generation = self
            .shared
            .lock()
            .begin_query(SessionState::AwaitingPrimarySuggest);
        let query = self.shared.scope.query(text);
        tokio::spawn(Arc::clone(&self.shared).run_query(generation, query));
    }

    /// Resolves a selected candidate through the provider that produced it.
    ///
    /// On success emits [`SearchEvent::AddressResolved`] followed by
    /// [`SearchEvent::SessionDismissed`]. On failure nothing is emitted and
    /// the session stays open.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn on_candidate_selected(&self, candidate: Candidate) {
        let generation = self.shared.lock().begin_resolve();
        tokio::spawn(Arc::clone(&self.shared).run_resolve(generation, candidate));
    }
}
