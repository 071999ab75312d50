//! Session-level tests for `ResolutionCoordinator` using scripted providers.
//!
//! Primary providers are in-memory fakes; the fallback side is the real
//! `FallbackProvider` over a channel-backed engine so pushes can be timed by
//! the test.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::{mpsc, oneshot};
use futures::stream::{self, StreamExt};
use placefill_core::{
    normalize_completion, Candidate, Coordinate, LocalCompletion, LocalMapItem, LocalPlacemark,
    PlaceType, ResolvedAddress, SearchScope, SuggestQuery,
};
use placefill_resolver::{
    CandidateFeed, CompleterOptions, FallbackProvider, LocalCompletionStream, LocalSearchEngine,
    LocalSearchError, PlaceProvider, ResolutionCoordinator, SearchEvent, SearchEvents,
    SessionState,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Primary provider with fixed answers.
struct StaticPrimary {
    suggestions: Option<Vec<Candidate>>,
    address: Option<ResolvedAddress>,
}

#[async_trait]
impl PlaceProvider for StaticPrimary {
    fn name(&self) -> &'static str {
        "static_primary"
    }

    async fn suggest(&self, _query: &SuggestQuery) -> Option<CandidateFeed> {
        let candidates = self.suggestions.clone()?;
        Some(stream::once(async move { candidates }).boxed())
    }

    async fn resolve(&self, _candidate: &Candidate) -> Option<ResolvedAddress> {
        self.address.clone()
    }
}

/// Primary provider whose suggest responses are released by the test, per
/// input text, in whatever order the test chooses.
#[derive(Default)]
struct GatedPrimary {
    gates: Mutex<HashMap<String, oneshot::Receiver<Option<Vec<Candidate>>>>>,
}

impl GatedPrimary {
    fn gate(&self, text: &str) -> oneshot::Sender<Option<Vec<Candidate>>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(text.to_string(), rx);
        tx
    }
}

#[async_trait]
impl PlaceProvider for GatedPrimary {
    fn name(&self) -> &'static str {
        "gated_primary"
    }

    async fn suggest(&self, query: &SuggestQuery) -> Option<CandidateFeed> {
        let gate = self.gates.lock().unwrap().remove(&query.text)?;
        let candidates = gate.await.ok().flatten()?;
        Some(stream::once(async move { candidates }).boxed())
    }

    async fn resolve(&self, _candidate: &Candidate) -> Option<ResolvedAddress> {
        None
    }
}

/// Fallback provider that cannot answer at all.
struct NoFallback;

#[async_trait]
impl PlaceProvider for NoFallback {
    fn name(&self) -> &'static str {
        "no_fallback"
    }

    async fn suggest(&self, _query: &SuggestQuery) -> Option<CandidateFeed> {
        None
    }

    async fn resolve(&self, _candidate: &Candidate) -> Option<ResolvedAddress> {
        None
    }
}

type Push = Result<Vec<LocalCompletion>, LocalSearchError>;

#[derive(Default)]
struct EngineState {
    subscriptions: Mutex<Vec<(String, mpsc::UnboundedSender<Push>)>>,
    map_items: Vec<LocalMapItem>,
}

/// Local engine whose completer pushes come from channels the test holds.
/// Clones share state, so the test keeps one while the provider owns another.
#[derive(Clone, Default)]
struct ChannelEngine {
    state: Arc<EngineState>,
}

impl ChannelEngine {
    fn with_map_items(map_items: Vec<LocalMapItem>) -> Self {
        Self {
            state: Arc::new(EngineState {
                subscriptions: Mutex::new(Vec::new()),
                map_items,
            }),
        }
    }

    fn fragments(&self) -> Vec<String> {
        self.state
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .map(|(f, _)| f.clone())
            .collect()
    }

    fn push(&self, index: usize, completions: Vec<LocalCompletion>) {
        let subscriptions = self.state.subscriptions.lock().unwrap();
        // A send error just means the subscription was dropped.
        let _ = subscriptions[index].1.unbounded_send(Ok(completions));
    }
}

#[async_trait]
impl LocalSearchEngine for ChannelEngine {
    fn complete(&self, fragment: &str, _options: &CompleterOptions) -> LocalCompletionStream {
        let (tx, rx) = mpsc::unbounded();
        self.state
            .subscriptions
            .lock()
            .unwrap()
            .push((fragment.to_string(), tx));
        rx.boxed()
    }

    async fn search(
        &self,
        _completion: &LocalCompletion,
    ) -> Result<Vec<LocalMapItem>, LocalSearchError> {
        Ok(self.state.map_items.clone())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scope() -> SearchScope {
    SearchScope {
        place_type: PlaceType::Address,
        bias: None,
        radius_meters: 0.0,
    }
}

fn coordinator(
    primary: Arc<dyn PlaceProvider>,
    engine: &ChannelEngine,
) -> (ResolutionCoordinator, SearchEvents) {
    let fallback = Arc::new(FallbackProvider::new(engine.clone()));
    ResolutionCoordinator::new(primary, fallback, scope())
}

async fn next_event(events: &mut SearchEvents) -> SearchEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for a search event")
        .expect("event channel closed")
}

async fn assert_no_event(events: &mut SearchEvents) {
    if let Ok(event) = tokio::time::timeout(Duration::from_millis(150), events.recv()).await {
        panic!("expected no event, got {event:?}");
    }
}

/// Waits until the engine has seen `count` completer subscriptions.
async fn wait_for_subscriptions(engine: &ChannelEngine, count: usize) {
    for _ in 0..200 {
        if engine.fragments().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("fallback subscription never started");
}

fn candidates(event: SearchEvent) -> Vec<Candidate> {
    match event {
        SearchEvent::CandidatesUpdated(candidates) => candidates,
        other => panic!("expected CandidatesUpdated, got {other:?}"),
    }
}

fn broadway() -> ResolvedAddress {
    let mut address = ResolvedAddress::new("90 Broadway, New York, NY 10006, USA");
    address.street_number = Some("90".to_string());
    address.route = Some("Broadway".to_string());
    address.coordinate = Some(Coordinate::new(40.708_2, -74.011_9));
    address
}

// ---------------------------------------------------------------------------
// Suggest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn primary_success_publishes_primary_candidates() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(StaticPrimary {
        suggestions: Some(vec![Candidate::from_primary(
            "90 Broadway",
            "New York, NY, USA",
            "ChIJ-broadway",
        )]),
        address: None,
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("90 Broad");

    let published = candidates(next_event(&mut events).await);
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].primary_provider_id(), Some("ChIJ-broadway"));
    assert!(engine.fragments().is_empty(), "fallback must not be used");
    assert_no_event(&mut events).await;
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[tokio::test]
async fn primary_failure_starts_fallback_subscription() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(StaticPrimary {
        suggestions: None,
        address: None,
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("1 Infinite");
    wait_for_subscriptions(&engine, 1).await;
    assert_eq!(engine.fragments(), vec!["1 Infinite"]);

    engine.push(
        0,
        vec![
            LocalCompletion::new("1 Infinite Loop", "Cupertino, CA"),
            LocalCompletion::new("1 Infinite Way", "Austin, TX"),
        ],
    );

    let published = candidates(next_event(&mut events).await);
    assert_eq!(published.len(), 2);
    for candidate in &published {
        assert!(candidate.fallback_handle().is_some());
        assert_eq!(candidate.primary_provider_id(), None);
    }
    assert_eq!(coordinator.state(), SessionState::AwaitingFallbackSuggest);

    // Later pushes replace the set.
    engine.push(0, vec![LocalCompletion::new("1 Infinite Loop", "Cupertino, CA")]);
    assert_eq!(candidates(next_event(&mut events).await).len(), 1);
}

#[tokio::test]
async fn both_providers_exhausted_publishes_empty_list() {
    let primary = Arc::new(StaticPrimary {
        suggestions: None,
        address: None,
    });
    let (coordinator, mut events) =
        ResolutionCoordinator::new(primary, Arc::new(NoFallback), scope());

    coordinator.on_query_changed("nowhere");

    assert!(candidates(next_event(&mut events).await).is_empty());
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[tokio::test]
async fn empty_primary_result_is_published_without_fallback() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(StaticPrimary {
        suggestions: Some(Vec::new()),
        address: None,
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("zzzz");

    assert!(candidates(next_event(&mut events).await).is_empty());
    assert!(engine.fragments().is_empty());
}

#[tokio::test]
async fn empty_text_clears_candidates() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(GatedPrimary::default());
    let pending = primary.gate("a");
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("a");
    coordinator.on_query_changed("");

    assert!(candidates(next_event(&mut events).await).is_empty());
    assert_eq!(coordinator.state(), SessionState::Idle);

    // The response for "a" lands after the clear and must be ignored.
    pending
        .send(Some(vec![Candidate::from_primary("A Street", "", "id-a")]))
        .unwrap();
    assert_no_event(&mut events).await;
}

#[tokio::test]
async fn stale_primary_response_does_not_overwrite_newer_query() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(GatedPrimary::default());
    let gate_a = primary.gate("a");
    let gate_ab = primary.gate("ab");
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("a");
    coordinator.on_query_changed("ab");

    gate_ab
        .send(Some(vec![Candidate::from_primary("AB Avenue", "", "id-ab")]))
        .unwrap();
    let published = candidates(next_event(&mut events).await);
    assert_eq!(published[0].primary_provider_id(), Some("id-ab"));

    gate_a
        .send(Some(vec![Candidate::from_primary("A Street", "", "id-a")]))
        .unwrap();
    assert_no_event(&mut events).await;
}

#[tokio::test]
async fn stale_fallback_pushes_are_ignored_after_new_query() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(GatedPrimary::default());
    let gate_a = primary.gate("a");
    let gate_ab = primary.gate("ab");
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("a");
    gate_a.send(None).unwrap();
    wait_for_subscriptions(&engine, 1).await;

    coordinator.on_query_changed("ab");
    engine.push(0, vec![LocalCompletion::new("A Street", "Old")]);
    assert_no_event(&mut events).await;

    gate_ab
        .send(Some(vec![Candidate::from_primary("AB Avenue", "", "id-ab")]))
        .unwrap();
    let published = candidates(next_event(&mut events).await);
    assert_eq!(published[0].primary_label, "AB Avenue");
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

#[tokio::test]
async fn selecting_primary_candidate_resolves_and_dismisses() {
    let engine = ChannelEngine::default();
    let primary = Arc::new(StaticPrimary {
        suggestions: None,
        address: Some(broadway()),
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_candidate_selected(Candidate::from_primary(
        "90 Broadway",
        "New York",
        "ChIJ-broadway",
    ));

    match next_event(&mut events).await {
        SearchEvent::AddressResolved(address) => {
            assert_eq!(address.formatted_address, "90 Broadway, New York, NY 10006, USA");
        }
        other => panic!("expected AddressResolved, got {other:?}"),
    }
    assert_eq!(next_event(&mut events).await, SearchEvent::SessionDismissed);
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[tokio::test]
async fn fallback_candidate_without_map_items_emits_nothing() {
    let engine = ChannelEngine::with_map_items(Vec::new());
    let primary = Arc::new(StaticPrimary {
        suggestions: None,
        address: Some(broadway()),
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_candidate_selected(normalize_completion(LocalCompletion::new(
        "1 Infinite Loop",
        "Cupertino, CA",
    )));

    assert_no_event(&mut events).await;
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[tokio::test]
async fn fallback_candidate_resolves_through_local_search() {
    let engine = ChannelEngine::with_map_items(vec![LocalMapItem {
        name: Some("Apple".to_string()),
        placemark: LocalPlacemark {
            title: Some("1 Infinite Loop, Cupertino, CA 95014".to_string()),
            sub_thoroughfare: Some("1".to_string()),
            thoroughfare: Some("Infinite Loop".to_string()),
            locality: Some("Cupertino".to_string()),
            postal_code: Some("95014".to_string()),
            sub_administrative_area: None,
            administrative_area: Some("CA".to_string()),
            country: Some("United States".to_string()),
            iso_country_code: Some("US".to_string()),
            coordinate: Coordinate::new(37.331_7, -122.030_1),
        },
    }]);
    let primary = Arc::new(StaticPrimary {
        suggestions: None,
        address: None,
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_candidate_selected(normalize_completion(LocalCompletion::new(
        "1 Infinite Loop",
        "Cupertino, CA",
    )));

    match next_event(&mut events).await {
        SearchEvent::AddressResolved(address) => {
            assert_eq!(address.formatted_address, "1 Infinite Loop, Cupertino, CA 95014");
            assert_eq!(address.city.as_deref(), Some(""));
            assert_eq!(address.state.as_deref(), Some("CA"));
        }
        other => panic!("expected AddressResolved, got {other:?}"),
    }
    assert_eq!(next_event(&mut events).await, SearchEvent::SessionDismissed);
}

#[tokio::test]
async fn failed_resolve_keeps_fallback_subscription_alive() {
    let engine = ChannelEngine::with_map_items(Vec::new());
    let primary = Arc::new(StaticPrimary {
        suggestions: None,
        address: None,
    });
    let (coordinator, mut events) = coordinator(primary, &engine);

    coordinator.on_query_changed("1 Inf");
    wait_for_subscriptions(&engine, 1).await;
    engine.push(0, vec![LocalCompletion::new("1 Infinite Loop", "Cupertino, CA")]);
    let published = candidates(next_event(&mut events).await);

    coordinator.on_candidate_selected(published[0].clone());
    assert_no_event(&mut events).await;
    assert_eq!(coordinator.state(), SessionState::AwaitingFallbackSuggest);

    engine.push(0, vec![LocalCompletion::new("1 Infinite Loop", "Cupertino, CA")]);
    assert_eq!(candidates(next_event(&mut events).await).len(), 1);
}
