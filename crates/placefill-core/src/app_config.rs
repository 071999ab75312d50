use std::path::PathBuf;

use crate::error::ConfigError;
use crate::model::{Coordinate, PlaceType, SearchScope};

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Settings for one autocomplete widget: credential, search scope and the
/// knobs of the HTTP and offline providers.
#[derive(Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub scope: SearchScope,
    /// Prompt text for the search field. Presentation only.
    pub placeholder: String,
    pub request_timeout_secs: u64,
    pub places_base_url: String,
    pub gazetteer_path: Option<PathBuf>,
    pub log_level: String,
}

impl SearchConfig {
    /// Creates a config with default scope settings for `place_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if `api_key` is blank.
    pub fn new(api_key: &str, place_type: PlaceType) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self {
            api_key: api_key.to_string(),
            scope: SearchScope {
                place_type,
                bias: None,
                radius_meters: 0.0,
            },
            placeholder: "Enter Address".to_string(),
            request_timeout_secs: 15,
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            gazetteer_path: None,
            log_level: "info".to_string(),
        })
    }

    /// Biases suggestions toward `center`. A radius of `0` leaves it unset.
    #[must_use]
    pub fn with_bias(mut self, center: Coordinate, radius_meters: f64) -> Self {
        self.scope.bias = Some(center);
        self.scope.radius_meters = radius_meters;
        self
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"[redacted]")
            .field("scope", &self.scope)
            .field("placeholder", &self.placeholder)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("places_base_url", &self.places_base_url)
            .field("gazetteer_path", &self.gazetteer_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}
