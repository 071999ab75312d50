//! Native result shapes produced by an on-device search engine.
//!
//! These mirror what a platform completer and local search hand back: a
//! title/subtitle completion and map items carrying a placemark. Engines build
//! them; the normalizer and parser consume them.

use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

/// One entry pushed by a query-fragment completer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCompletion {
    pub title: String,
    pub subtitle: String,
}

impl LocalCompletion {
    #[must_use]
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// Structured address attributes of a local search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPlacemark {
    #[serde(default)]
    pub title: Option<String>,
    /// House number.
    #[serde(default)]
    pub sub_thoroughfare: Option<String>,
    /// Street name.
    #[serde(default)]
    pub thoroughfare: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub sub_administrative_area: Option<String>,
    #[serde(default)]
    pub administrative_area: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub iso_country_code: Option<String>,
    pub coordinate: Coordinate,
}

/// A local search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalMapItem {
    #[serde(default)]
    pub name: Option<String>,
    pub placemark: LocalPlacemark,
}
