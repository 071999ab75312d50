//! Value types shared by both providers and the coordinator.
//!
//! [`Candidate`] and [`ResolvedAddress`] are immutable once built and owned by
//! whoever receives them. [`QueryParameters`] is the request shape for one
//! primary-provider suggest call and is rebuilt for every query.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::UnknownPlaceType;
use crate::local::LocalCompletion;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both components are finite and inside the
    /// `[-90, 90]` / `[-180, 180]` ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Place-type filter applied to primary-provider suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceType {
    All,
    Geocode,
    #[default]
    Address,
    Establishment,
    Regions,
    Cities,
}

impl PlaceType {
    /// The provider filter token sent as the `types` query parameter.
    /// [`PlaceType::All`] maps to the empty (unfiltered) token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            PlaceType::All => "",
            PlaceType::Geocode => "geocode",
            PlaceType::Address => "address",
            PlaceType::Establishment => "establishment",
            PlaceType::Regions => "(regions)",
            PlaceType::Cities => "(cities)",
        }
    }
}

impl FromStr for PlaceType {
    type Err = UnknownPlaceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(PlaceType::All),
            "geocode" => Ok(PlaceType::Geocode),
            "address" => Ok(PlaceType::Address),
            "establishment" => Ok(PlaceType::Establishment),
            "regions" | "(regions)" => Ok(PlaceType::Regions),
            "cities" | "(cities)" => Ok(PlaceType::Cities),
            other => Err(UnknownPlaceType(other.to_string())),
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaceType::All => "all",
            PlaceType::Geocode => "geocode",
            PlaceType::Address => "address",
            PlaceType::Establishment => "establishment",
            PlaceType::Regions => "regions",
            PlaceType::Cities => "cities",
        };
        f.write_str(name)
    }
}

/// Opaque handle to a fallback-provider completion.
///
/// Wraps the engine's completion unmodified so it can be handed back to the
/// same engine when the candidate is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackHandle(Arc<LocalCompletion>);

impl FallbackHandle {
    #[must_use]
    pub fn new(completion: LocalCompletion) -> Self {
        Self(Arc::new(completion))
    }

    #[must_use]
    pub fn completion(&self) -> &LocalCompletion {
        &self.0
    }
}

/// Which provider produced a [`Candidate`], plus what that provider needs to
/// resolve it.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOrigin {
    /// Identifier for re-querying the primary provider. May be empty when the
    /// prediction carried no `place_id`.
    Primary { place_id: String },
    Fallback(FallbackHandle),
}

/// A lightweight search suggestion shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub primary_label: String,
    pub secondary_label: String,
    pub origin: CandidateOrigin,
}

impl Candidate {
    #[must_use]
    pub fn from_primary(
        primary_label: impl Into<String>,
        secondary_label: impl Into<String>,
        place_id: impl Into<String>,
    ) -> Self {
        Self {
            primary_label: primary_label.into(),
            secondary_label: secondary_label.into(),
            origin: CandidateOrigin::Primary {
                place_id: place_id.into(),
            },
        }
    }

    #[must_use]
    pub fn from_fallback(
        primary_label: impl Into<String>,
        secondary_label: impl Into<String>,
        handle: FallbackHandle,
    ) -> Self {
        Self {
            primary_label: primary_label.into(),
            secondary_label: secondary_label.into(),
            origin: CandidateOrigin::Fallback(handle),
        }
    }

    /// The primary-provider place id, if this candidate has a non-empty one.
    #[must_use]
    pub fn primary_provider_id(&self) -> Option<&str> {
        match &self.origin {
            CandidateOrigin::Primary { place_id } if !place_id.is_empty() => Some(place_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn fallback_handle(&self) -> Option<&FallbackHandle> {
        match &self.origin {
            CandidateOrigin::Fallback(handle) => Some(handle),
            CandidateOrigin::Primary { .. } => None,
        }
    }
}

/// A fully structured postal address.
///
/// `formatted_address` is always present; every other field depends on what
/// the provider returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAddress {
    pub formatted_address: String,
    pub street_number: Option<String>,
    pub route: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub iso_country_code: Option<String>,
    pub coordinate: Option<Coordinate>,
}

impl ResolvedAddress {
    #[must_use]
    pub fn new(formatted_address: impl Into<String>) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            street_number: None,
            route: None,
            postal_code: None,
            city: None,
            state: None,
            country: None,
            iso_country_code: None,
            coordinate: None,
        }
    }
}

/// Session-wide search settings: filter, bias point and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchScope {
    pub place_type: PlaceType,
    pub bias: Option<Coordinate>,
    /// Search radius in meters. `0` means unset.
    pub radius_meters: f64,
}

impl SearchScope {
    #[must_use]
    pub fn query(&self, text: &str) -> SuggestQuery {
        SuggestQuery {
            text: text.to_string(),
            scope: *self,
        }
    }

    /// The bias point, only when it is a valid coordinate.
    #[must_use]
    pub fn valid_bias(&self) -> Option<Coordinate> {
        self.bias.filter(Coordinate::is_valid)
    }
}

/// Provider-neutral suggest request: raw user text plus the session scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestQuery {
    pub text: String,
    pub scope: SearchScope,
}

/// Request shape for one primary-provider suggest call.
#[derive(Clone)]
pub struct QueryParameters {
    pub input: String,
    pub place_type: PlaceType,
    pub location: Option<Coordinate>,
    pub radius_meters: Option<f64>,
    api_key: String,
}

impl QueryParameters {
    /// Builds parameters for `query`. `location` is kept only for a valid bias
    /// point, and `radius` only alongside it when positive.
    #[must_use]
    pub fn new(query: &SuggestQuery, api_key: &str) -> Self {
        let location = query.scope.valid_bias();
        let radius_meters = location
            .map(|_| query.scope.radius_meters)
            .filter(|r| *r > 0.0);
        Self {
            input: query.text.clone(),
            place_type: query.scope.place_type,
            location,
            radius_meters,
            api_key: api_key.to_string(),
        }
    }

    /// Query-string pairs in wire order: `input`, `types`, optional
    /// `location` and `radius`, then `key`.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("input", self.input.clone()),
            ("types", self.place_type.token().to_string()),
        ];
        if let Some(location) = self.location {
            pairs.push((
                "location",
                format!(
                    "{},{}",
                    format_degrees(location.latitude),
                    format_degrees(location.longitude)
                ),
            ));
        }
        if let Some(radius) = self.radius_meters {
            pairs.push(("radius", radius.to_string()));
        }
        pairs.push(("key", self.api_key.clone()));
        pairs
    }
}

impl fmt::Debug for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParameters")
            .field("input", &self.input)
            .field("place_type", &self.place_type)
            .field("location", &self.location)
            .field("radius_meters", &self.radius_meters)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// Degrees always carry a fractional part on the wire (`40.0`, not `40`).
fn format_degrees(value: f64) -> String {
    let rendered = value.to_string();
    if rendered.contains('.') {
        rendered
    } else {
        format!("{rendered}.0")
    }
}
