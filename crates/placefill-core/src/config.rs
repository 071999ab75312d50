use crate::app_config::{SearchConfig, DEFAULT_PLACES_BASE_URL};
use crate::error::ConfigError;
use crate::model::{Coordinate, PlaceType, SearchScope};

/// Load search configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_search_config() -> Result<SearchConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_search_config_from_env()
}

/// Load search configuration from environment variables already in the process.
///
/// Unlike [`load_search_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_search_config_from_env() -> Result<SearchConfig, ConfigError> {
    build_search_config(|key| std::env::var(key))
}

/// Build search configuration using the provided env-var lookup function.
fn build_search_config<F>(lookup: F) -> Result<SearchConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_f64 = |var: &str| -> Result<Option<f64>, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(None),
        }
    };

    let api_key = lookup("PLACEFILL_GOOGLE_API_KEY")
        .map_err(|_| ConfigError::MissingEnvVar("PLACEFILL_GOOGLE_API_KEY".to_string()))?;
    if api_key.trim().is_empty() {
        return Err(ConfigError::EmptyApiKey);
    }

    let place_type = or_default("PLACEFILL_PLACE_TYPE", "address")
        .parse::<PlaceType>()
        .map_err(|e| invalid("PLACEFILL_PLACE_TYPE", e.to_string()))?;

    let bias = match (
        parse_f64("PLACEFILL_BIAS_LATITUDE")?,
        parse_f64("PLACEFILL_BIAS_LONGITUDE")?,
    ) {
        (Some(latitude), Some(longitude)) => {
            let center = Coordinate::new(latitude, longitude);
            if !center.is_valid() {
                return Err(invalid(
                    "PLACEFILL_BIAS_LATITUDE",
                    format!("({latitude}, {longitude}) is not a valid coordinate"),
                ));
            }
            Some(center)
        }
        (None, None) => None,
        (Some(_), None) => {
            return Err(invalid(
                "PLACEFILL_BIAS_LONGITUDE",
                "must be set together with PLACEFILL_BIAS_LATITUDE".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(invalid(
                "PLACEFILL_BIAS_LATITUDE",
                "must be set together with PLACEFILL_BIAS_LONGITUDE".to_string(),
            ))
        }
    };

    let radius_meters = parse_f64("PLACEFILL_RADIUS_METERS")?.unwrap_or(0.0);
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(invalid(
            "PLACEFILL_RADIUS_METERS",
            format!("{radius_meters} is not a non-negative distance"),
        ));
    }

    let request_timeout_secs = or_default("PLACEFILL_REQUEST_TIMEOUT_SECS", "15")
        .parse::<u64>()
        .map_err(|e| invalid("PLACEFILL_REQUEST_TIMEOUT_SECS", e.to_string()))?;

    let placeholder = or_default("PLACEFILL_PLACEHOLDER", "Enter Address");
    let places_base_url = or_default("PLACEFILL_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let gazetteer_path = lookup("PLACEFILL_GAZETTEER_PATH").ok().map(PathBuf::from);
    let log_level = or_default("PLACEFILL_LOG_LEVEL", "info");

    Ok(SearchConfig {
        api_key,
        scope: SearchScope {
            place_type,
            bias,
            radius_meters,
        },
        placeholder,
        request_timeout_secs,
        places_base_url,
        gazetteer_path,
        log_level,
    })
}
