//! Offline [`LocalSearchEngine`] backed by a JSON list of known places.
//!
//! File format: an array of entries, each with a `title`, an optional
//! `subtitle` and a `placemark`:
//!
//! ```json
//! [
//!   {
//!     "title": "Apple Park",
//!     "subtitle": "Cupertino, CA",
//!     "placemark": {
//!       "title": "Apple Park, 1 Apple Park Way, Cupertino, CA 95014",
//!       "sub_thoroughfare": "1",
//!       "thoroughfare": "Apple Park Way",
//!       "locality": "Cupertino",
//!       "coordinate": { "latitude": 37.3349, "longitude": -122.009 }
//!     }
//!   }
//! ]
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use placefill_core::{LocalCompletion, LocalMapItem, LocalPlacemark};
use serde::Deserialize;

use crate::error::LocalSearchError;
use crate::local::{CompleterOptions, CompletionFilter, LocalCompletionStream, LocalSearchEngine};

const MAX_COMPLETIONS: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerEntry {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub placemark: LocalPlacemark,
}

impl GazetteerEntry {
    /// Entries with neither a street nor a locality are treated as
    /// query-style suggestions (categories, landmarks) rather than locations.
    fn is_location(&self) -> bool {
        self.placemark.thoroughfare.is_some() || self.placemark.locality.is_some()
    }

    fn completion(&self) -> LocalCompletion {
        LocalCompletion::new(self.title.clone(), self.subtitle.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GazetteerEngine {
    entries: Arc<Vec<GazetteerEntry>>,
}

impl GazetteerEngine {
    #[must_use]
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// An engine that never completes anything.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads entries from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LocalSearchError::Io`] if the file cannot be read, or
    /// [`LocalSearchError::Parse`] if it is not a valid entry list.
    pub fn from_path(path: &Path) -> Result<Self, LocalSearchError> {
        let raw = std::fs::read_to_string(path).map_err(|e| LocalSearchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let entries: Vec<GazetteerEntry> =
            serde_json::from_str(&raw).map_err(|e| LocalSearchError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        tracing::info!(path = %path.display(), count = entries.len(), "loaded gazetteer");
        Ok(Self::new(entries))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matching(&self, fragment: &str, options: &CompleterOptions) -> Vec<LocalCompletion> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| options.filter == CompletionFilter::LocationsAndQueries || e.is_location())
            .filter(|e| {
                options
                    .region
                    .is_none_or(|region| region.contains(e.placemark.coordinate))
            })
            .filter(|e| {
                e.title.to_lowercase().contains(&needle)
                    || e.subtitle.to_lowercase().contains(&needle)
            })
            .take(MAX_COMPLETIONS)
            .map(GazetteerEntry::completion)
            .collect()
    }
}

#[async_trait]
impl LocalSearchEngine for GazetteerEngine {
    /// Yields a single completion set; the gazetteer never changes underneath
    /// a subscription.
    fn complete(&self, fragment: &str, options: &CompleterOptions) -> LocalCompletionStream {
        let completions = self.matching(fragment, options);
        stream::once(async move { Ok(completions) }).boxed()
    }

    async fn search(
        &self,
        completion: &LocalCompletion,
    ) -> Result<Vec<LocalMapItem>, LocalSearchError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.title == completion.title && e.subtitle == completion.subtitle)
            .map(|e| LocalMapItem {
                name: Some(e.title.clone()),
                placemark: e.placemark.clone(),
            })
            .collect())
    }
}
