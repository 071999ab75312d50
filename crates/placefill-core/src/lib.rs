pub mod app_config;
pub mod config;
pub mod error;
pub mod local;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod types;

pub use app_config::{SearchConfig, DEFAULT_PLACES_BASE_URL};
pub use config::{load_search_config, load_search_config_from_env};
pub use error::{ConfigError, UnknownPlaceType};
pub use local::{LocalCompletion, LocalMapItem, LocalPlacemark};
pub use model::{
    Candidate, CandidateOrigin, Coordinate, FallbackHandle, PlaceType, QueryParameters,
    ResolvedAddress, SearchScope, SuggestQuery,
};
pub use normalize::{normalize_completion, normalize_prediction};
pub use parse::{parse_place_details, parse_placemark};
