use thiserror::Error;

/// Errors raised while building a [`SearchConfig`](crate::SearchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// The places API credential was empty.
    #[error("a non-empty Google Places API key is required")]
    EmptyApiKey,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown place type \"{0}\" (expected all, geocode, address, establishment, regions or cities)")]
pub struct UnknownPlaceType(pub String);
