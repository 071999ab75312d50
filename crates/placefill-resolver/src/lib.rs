pub mod coordinator;
pub mod error;
pub mod fallback;
pub mod gazetteer;
pub mod local;
pub mod provider;

pub use coordinator::{ResolutionCoordinator, SearchEvent, SearchEvents, SessionState};
pub use error::LocalSearchError;
pub use fallback::FallbackProvider;
pub use gazetteer::{GazetteerEngine, GazetteerEntry};
pub use local::{
    CompleterOptions, CompletionFilter, LocalCompletionStream, LocalSearchEngine, SearchRegion,
};
pub use provider::{CandidateFeed, PlaceProvider};
