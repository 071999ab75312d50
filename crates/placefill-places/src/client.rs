//! HTTP client for the Google Places autocomplete and details web services.
//!
//! Wraps `reqwest` with the API key, base URL and the Places-specific success
//! check (`"status": "OK"`). The `fetch_*` methods surface every failure as a
//! [`PlacesError`]; [`GooglePlacesClient::suggest`] and
//! [`GooglePlacesClient::resolve`] log the failure and return `None`.

use std::time::Duration;

use placefill_core::types::{AutocompleteResponse, DetailsResponse};
use placefill_core::{
    normalize_prediction, parse_place_details, Candidate, QueryParameters, ResolvedAddress,
    SuggestQuery, DEFAULT_PLACES_BASE_URL,
};
use reqwest::{Client, StatusCode, Url};

use crate::error::PlacesError;

const AUTOCOMPLETE_ENDPOINT: &str = "autocomplete/json";
const DETAILS_ENDPOINT: &str = "details/json";

/// Client for the Google Places web service.
///
/// Holds its own credential and base URL; there is no process-wide state. Use
/// [`GooglePlacesClient::new`] for production or
/// [`GooglePlacesClient::with_base_url`] to point at a mock server in tests.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GooglePlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] if `api_key` is blank, or
    /// [`PlacesError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_PLACES_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] if `api_key` is blank,
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be constructed,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        if api_key.trim().is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("placefill/0.1 (address-autocomplete)")
            .build()?;

        // Exactly one trailing slash, so endpoint paths join under the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Builds the request shape for `query` using this client's credential.
    #[must_use]
    pub fn query_parameters(&self, query: &SuggestQuery) -> QueryParameters {
        QueryParameters::new(query, &self.api_key)
    }

    /// Fetches autocomplete predictions and normalizes them into candidates.
    ///
    /// An empty `predictions` array is a valid, empty result.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on transport failure.
    /// - [`PlacesError::UnexpectedStatus`] on a non-200 response.
    /// - [`PlacesError::Deserialize`] if the body is not valid JSON or
    ///   `predictions` has the wrong shape.
    /// - [`PlacesError::ApiStatus`] if `status` is not `"OK"`.
    /// - [`PlacesError::MissingField`] if `predictions` is absent.
    pub async fn fetch_predictions(
        &self,
        params: &QueryParameters,
    ) -> Result<Vec<Candidate>, PlacesError> {
        let pairs = params.to_pairs();
        let url = self.build_url(
            AUTOCOMPLETE_ENDPOINT,
            pairs.iter().map(|(k, v)| (*k, v.as_str())),
        )?;
        let body = self.request_json(&url, AUTOCOMPLETE_ENDPOINT).await?;
        Self::check_status(&body)?;

        let response: AutocompleteResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("{AUTOCOMPLETE_ENDPOINT}(input={})", params.input),
                source: e,
            })?;

        let predictions = response
            .predictions
            .ok_or_else(|| PlacesError::MissingField {
                field: "predictions".to_string(),
                endpoint: AUTOCOMPLETE_ENDPOINT.to_string(),
            })?;

        Ok(predictions.iter().map(normalize_prediction).collect())
    }

    /// Fetches place details for `place_id` and parses the address.
    ///
    /// Returns `Ok(None)` when the response succeeded but carried no
    /// `result.formatted_address`.
    ///
    /// # Errors
    ///
    /// Same classification as [`GooglePlacesClient::fetch_predictions`],
    /// minus [`PlacesError::MissingField`].
    pub async fn fetch_place_details(
        &self,
        place_id: &str,
    ) -> Result<Option<ResolvedAddress>, PlacesError> {
        let url = self.build_url(
            DETAILS_ENDPOINT,
            [("placeid", place_id), ("key", self.api_key.as_str())],
        )?;
        let body = self.request_json(&url, DETAILS_ENDPOINT).await?;
        Self::check_status(&body)?;

        let response: DetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("{DETAILS_ENDPOINT}(placeid={place_id})"),
                source: e,
            })?;

        Ok(parse_place_details(&response))
    }

    /// Suggests candidates for `params`, or `None` on any failure.
    pub async fn suggest(&self, params: &QueryParameters) -> Option<Vec<Candidate>> {
        match self.fetch_predictions(params).await {
            Ok(candidates) => {
                tracing::debug!(
                    endpoint = AUTOCOMPLETE_ENDPOINT,
                    count = candidates.len(),
                    "places autocomplete succeeded"
                );
                Some(candidates)
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = AUTOCOMPLETE_ENDPOINT,
                    category = e.category(),
                    error = %e,
                    "places autocomplete failed"
                );
                None
            }
        }
    }

    /// Resolves `place_id` into an address, or `None` on any failure.
    pub async fn resolve(&self, place_id: &str) -> Option<ResolvedAddress> {
        match self.fetch_place_details(place_id).await {
            Ok(Some(address)) => Some(address),
            Ok(None) => {
                tracing::warn!(
                    endpoint = DETAILS_ENDPOINT,
                    place_id,
                    "place details response has no formatted_address"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = DETAILS_ENDPOINT,
                    place_id,
                    category = e.category(),
                    error = %e,
                    "place details lookup failed"
                );
                None
            }
        }
    }

    /// Builds the endpoint URL with percent-encoded query parameters.
    fn build_url<'a>(
        &self,
        endpoint: &str,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{endpoint}: {e}")))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Sends a GET request, requires HTTP 200, and parses the body as JSON.
    ///
    /// The URL is stripped from transport errors since it carries the key.
    async fn request_json(
        &self,
        url: &Url,
        endpoint: &str,
    ) -> Result<serde_json::Value, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: endpoint.to_string(),
            source: e,
        })
    }

    /// Requires the top-level `"status"` to be `"OK"`.
    fn check_status(body: &serde_json::Value) -> Result<(), PlacesError> {
        let status = body.get("status").and_then(serde_json::Value::as_str);
        if status == Some("OK") {
            return Ok(());
        }
        Err(PlacesError::ApiStatus {
            status: status.unwrap_or("<missing>").to_string(),
            message: body
                .get("error_message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        })
    }
}
