//! Conversion of raw provider suggestions into [`Candidate`]s.
//!
//! Pure data transformation. Missing labels degrade to empty strings; nothing
//! here can fail.

use crate::local::LocalCompletion;
use crate::model::{Candidate, FallbackHandle};
use crate::types::Prediction;

/// Converts a primary-provider prediction into a [`Candidate`].
///
/// Labels come from `structured_formatting.{main_text,secondary_text}` and
/// the place id from `place_id`, each defaulting to `""` when absent.
#[must_use]
pub fn normalize_prediction(prediction: &Prediction) -> Candidate {
    let formatting = prediction.structured_formatting.as_ref();
    Candidate::from_primary(
        formatting
            .and_then(|f| f.main_text.clone())
            .unwrap_or_default(),
        formatting
            .and_then(|f| f.secondary_text.clone())
            .unwrap_or_default(),
        prediction.place_id.clone().unwrap_or_default(),
    )
}

/// Converts a fallback completion into a [`Candidate`], keeping the
/// completion itself as the resolve handle.
#[must_use]
pub fn normalize_completion(completion: LocalCompletion) -> Candidate {
    let primary_label = completion.title.clone();
    let secondary_label = completion.subtitle.clone();
    Candidate::from_fallback(
        primary_label,
        secondary_label,
        FallbackHandle::new(completion),
    )
}
