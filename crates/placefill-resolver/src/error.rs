use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by an on-device search engine.
///
/// The fallback adapter logs these and reports an absent result; they never
/// reach the coordinator.
#[derive(Debug, Error)]
pub enum LocalSearchError {
    #[error("local search unavailable: {0}")]
    Unavailable(String),

    #[error("local search failed: {0}")]
    Search(String),

    #[error("failed to read gazetteer {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gazetteer {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
