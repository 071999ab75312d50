//! Contract for an on-device search engine used as the fallback provider.
//!
//! An engine offers a push-based completer (a long-lived stream of completion
//! sets for a query fragment) and a request/response local search that turns
//! a completion back into map items.

use async_trait::async_trait;
use futures::stream::BoxStream;
use placefill_core::{Coordinate, LocalCompletion, LocalMapItem, PlaceType, SearchScope};

use crate::error::LocalSearchError;

/// Completer pushes. An `Err` item reports a failed update; the stream may
/// keep going afterwards.
pub type LocalCompletionStream =
    BoxStream<'static, Result<Vec<LocalCompletion>, LocalSearchError>>;

/// What kinds of completions the completer may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFilter {
    /// Addresses and points of interest plus free-form query suggestions.
    LocationsAndQueries,
    LocationsOnly,
}

impl CompletionFilter {
    #[must_use]
    pub fn for_place_type(place_type: PlaceType) -> Self {
        if place_type == PlaceType::All {
            CompletionFilter::LocationsAndQueries
        } else {
            CompletionFilter::LocationsOnly
        }
    }
}

/// Meters per degree of latitude, close enough for region spans.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// A rectangular region centered on a point, sized in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRegion {
    pub center: Coordinate,
    pub latitudinal_meters: f64,
    pub longitudinal_meters: f64,
}

impl SearchRegion {
    pub const DEFAULT_RADIUS_METERS: f64 = 50_000.0;

    /// Region around `center` with both extents equal to `radius_meters`
    /// (50 km when the radius is zero or negative). `None` for an invalid
    /// center.
    #[must_use]
    pub fn around(center: Coordinate, radius_meters: f64) -> Option<Self> {
        if !center.is_valid() {
            return None;
        }
        let extent = if radius_meters > 0.0 {
            radius_meters
        } else {
            Self::DEFAULT_RADIUS_METERS
        };
        Some(Self {
            center,
            latitudinal_meters: extent,
            longitudinal_meters: extent,
        })
    }

    /// `(latitude_delta, longitude_delta)` in degrees covered by the region.
    #[must_use]
    pub fn span_degrees(&self) -> (f64, f64) {
        let latitude_delta = self.latitudinal_meters / METERS_PER_DEGREE;
        let cos_lat = self.center.latitude.to_radians().cos().abs();
        let longitude_delta = if cos_lat < 1e-9 {
            360.0
        } else {
            (self.longitudinal_meters / (METERS_PER_DEGREE * cos_lat)).min(360.0)
        };
        (latitude_delta, longitude_delta)
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        let (latitude_delta, longitude_delta) = self.span_degrees();
        let mut longitude_offset = (point.longitude - self.center.longitude).abs();
        if longitude_offset > 180.0 {
            longitude_offset = 360.0 - longitude_offset;
        }
        (point.latitude - self.center.latitude).abs() <= latitude_delta / 2.0
            && longitude_offset <= longitude_delta / 2.0
    }
}

/// Completer configuration derived from the session scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleterOptions {
    pub filter: CompletionFilter,
    pub region: Option<SearchRegion>,
}

impl CompleterOptions {
    #[must_use]
    pub fn from_scope(scope: &SearchScope) -> Self {
        Self {
            filter: CompletionFilter::for_place_type(scope.place_type),
            region: scope
                .bias
                .and_then(|center| SearchRegion::around(center, scope.radius_meters)),
        }
    }
}

/// An on-device search facility.
#[async_trait]
pub trait LocalSearchEngine: Send + Sync {
    /// Subscribes to completions for `fragment`. The stream stays open for
    /// as long as the engine has updates to push.
    fn complete(&self, fragment: &str, options: &CompleterOptions) -> LocalCompletionStream;

    /// Runs a local search for a completion previously pushed by
    /// [`LocalSearchEngine::complete`].
    async fn search(
        &self,
        completion: &LocalCompletion,
    ) -> Result<Vec<LocalMapItem>, LocalSearchError>;
}
