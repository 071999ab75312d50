use thiserror::Error;

/// Errors returned by the Google Places client.
///
/// Callers of [`GooglePlacesClient::suggest`](crate::GooglePlacesClient::suggest)
/// and [`GooglePlacesClient::resolve`](crate::GooglePlacesClient::resolve) never
/// see these; they are logged and collapsed to `None`.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with a `status` other than `"OK"`.
    #[error("Places API status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    ApiStatus {
        status: String,
        message: Option<String>,
    },

    #[error("response from {endpoint} is missing `{field}`")]
    MissingField { field: String, endpoint: String },

    #[error("a non-empty Google Places API key is required")]
    MissingApiKey,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl PlacesError {
    /// Coarse failure class used in log fields.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            PlacesError::Http(_) => "transport",
            PlacesError::UnexpectedStatus { .. } | PlacesError::Deserialize { .. } => "protocol",
            PlacesError::ApiStatus { .. } | PlacesError::MissingField { .. } => "provider",
            PlacesError::MissingApiKey | PlacesError::InvalidBaseUrl(_) => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_display_includes_message_when_present() {
        let err = PlacesError::ApiStatus {
            status: "REQUEST_DENIED".to_string(),
            message: Some("The provided API key is invalid.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Places API status REQUEST_DENIED: The provided API key is invalid."
        );

        let bare = PlacesError::ApiStatus {
            status: "ZERO_RESULTS".to_string(),
            message: None,
        };
        assert_eq!(bare.to_string(), "Places API status ZERO_RESULTS");
    }

    #[test]
    fn categories_follow_failure_taxonomy() {
        let deserialize = PlacesError::Deserialize {
            context: "autocomplete".to_string(),
            source: serde_json::from_str::<()>("{").unwrap_err(),
        };
        assert_eq!(deserialize.category(), "protocol");
        assert_eq!(
            PlacesError::UnexpectedStatus {
                status: 500,
                endpoint: "details".to_string()
            }
            .category(),
            "protocol"
        );
        assert_eq!(
            PlacesError::MissingField {
                field: "predictions".to_string(),
                endpoint: "autocomplete".to_string()
            }
            .category(),
            "provider"
        );
    }
}
