//! Google Places web-service response types.
//!
//! Every field the normalizer or parser reads is optional and lenient: a value
//! of the wrong JSON type is treated the same as a missing one, so a single
//! odd field never fails the whole response. Only the top-level `predictions`
//! array is strict; an element that is not an object rejects the response.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

/// Deserializes into `Some(T)` when the value fits `T`, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

// ---------------------------------------------------------------------------
// place/autocomplete
// ---------------------------------------------------------------------------

/// Body of the autocomplete endpoint once `status == "OK"` has been checked.
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub predictions: Option<Vec<Prediction>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Prediction {
    #[serde(default, deserialize_with = "lenient")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub structured_formatting: Option<StructuredFormatting>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StructuredFormatting {
    #[serde(default, deserialize_with = "lenient")]
    pub main_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub secondary_text: Option<String>,
}

// ---------------------------------------------------------------------------
// place/details
// ---------------------------------------------------------------------------

/// Body of the details endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DetailsResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<PlaceResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceResult {
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub address_components: Option<Vec<AddressComponent>>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<Geometry>,
}

/// One entry of `address_components`, e.g.
/// `{ "long_name": "90", "short_name": "90", "types": ["street_number"] }`.
#[derive(Debug, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default, deserialize_with = "lenient")]
    pub types: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub long_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Geometry {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<LatLng>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatLng {
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lng: Option<f64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wrong_typed_fields_become_none() {
        let prediction: Prediction = serde_json::from_value(json!({
            "place_id": 42,
            "structured_formatting": "not an object"
        }))
        .unwrap();
        assert!(prediction.place_id.is_none());
        assert!(prediction.structured_formatting.is_none());
    }

    #[test]
    fn non_object_prediction_rejects_response() {
        let result = serde_json::from_value::<AutocompleteResponse>(json!({
            "predictions": ["just a string"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn non_object_component_drops_all_components() {
        let response: DetailsResponse = serde_json::from_value(json!({
            "result": {
                "formatted_address": "1 Main St",
                "address_components": [{"types": ["route"], "short_name": "Main St"}, 7]
            }
        }))
        .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result.formatted_address.as_deref(), Some("1 Main St"));
        assert!(result.address_components.is_none());
    }

    #[test]
    fn missing_predictions_is_none_not_error() {
        let response: AutocompleteResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.predictions.is_none());
    }
}
