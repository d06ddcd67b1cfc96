//! AI-suggested aspect values and the rules for merging them.
//!
//! Suggestions are keyed by aspect name. A fetch-all merges every returned
//! key into the caller's map; a fetch-one touches only its own key. Neither
//! call is serialized against another: if two fetches for the same aspect
//! overlap, whichever response is applied last wins.

#[cfg(test)]
#[path = "suggestion_test.rs"]
mod suggestion_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ListingApi;
use crate::error::ApiError;

/// Confidence above which a suggestion is shown as trustworthy.
pub const HIGH_CONFIDENCE: f64 = 0.7;

/// Where a suggested value came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Title,
    Description,
    PreviousValues,
    #[default]
    #[serde(other)]
    AiGenerated,
}

impl SuggestionSource {
    /// Short label for display next to a suggestion.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "From Title",
            Self::Description => "From Description",
            Self::PreviousValues => "From History",
            Self::AiGenerated => "AI Generated",
        }
    }
}

/// A candidate value for one aspect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub aspect_name: String,
    pub value: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub source: SuggestionSource,
}

impl Suggestion {
    #[must_use]
    pub fn new(aspect_name: impl Into<String>, value: impl Into<String>, confidence: f64, source: SuggestionSource) -> Self {
        Self { aspect_name: aspect_name.into(), value: value.into(), confidence: clamp_confidence(confidence), source }
    }

    /// Confidence as a rounded whole percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }

    #[must_use]
    pub fn is_high_confidence(&self) -> bool {
        self.confidence > HIGH_CONFIDENCE
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) }
}

/// Suggestions keyed by aspect name.
pub type SuggestionMap = HashMap<String, Suggestion>;

// =============================================================================
// REQUEST
// =============================================================================

/// Product fields the backend uses to infer aspect values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for both suggestion endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub category_id: String,
    pub context: SuggestionContext,
}

// =============================================================================
// WIRE
// =============================================================================

/// One entry of a suggestion response: a bare value or a scored object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionWire {
    Plain(String),
    Scored {
        value: String,
        #[serde(default)]
        confidence: f64,
        #[serde(default)]
        source: SuggestionSource,
    },
}

fn from_wire(aspect_name: &str, wire: Option<SuggestionWire>) -> Option<Suggestion> {
    let (value, confidence, source) = match wire? {
        SuggestionWire::Plain(value) => (value, 0.0, SuggestionSource::AiGenerated),
        SuggestionWire::Scored { value, confidence, source } => (value, confidence, source),
    };
    if value.trim().is_empty() {
        return None;
    }
    Some(Suggestion::new(aspect_name, value, confidence, source))
}

fn parse_entries(body: &str) -> Result<HashMap<String, Option<SuggestionWire>>, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::Parse("expected an object of suggestions".to_owned()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Decode a fetch-all response. Blank and null values are dropped.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] if the body is not an object of suggestions.
pub fn decode_suggestions(body: &str) -> Result<SuggestionMap, ApiError> {
    Ok(parse_entries(body)?
        .into_iter()
        .filter_map(|(name, wire)| from_wire(&name, wire).map(|s| (name, s)))
        .collect())
}

/// Decode a fetch-one response for `aspect_name`.
///
/// `Ok(None)` means the backend answered but had no usable value.
///
/// # Errors
///
/// Returns [`ApiError::MissingData`] if the response lacks the aspect key.
pub fn decode_single(body: &str, aspect_name: &str) -> Result<Option<Suggestion>, ApiError> {
    let mut entries = parse_entries(body)?;
    let wire = entries.remove(aspect_name).ok_or_else(|| ApiError::MissingData(aspect_name.to_owned()))?;
    Ok(from_wire(aspect_name, wire))
}

// =============================================================================
// MERGE
// =============================================================================

/// Merge a fetch-all result into `target`, overwriting per key.
///
/// Keys absent from `incoming` keep their previous suggestion.
pub fn merge_suggestions(target: &mut SuggestionMap, incoming: SuggestionMap) {
    target.extend(incoming);
}

/// Apply a fetch-one result for `aspect_name` without touching other keys.
///
/// `None` clears the entry.
pub fn apply_single(target: &mut SuggestionMap, aspect_name: &str, incoming: Option<Suggestion>) {
    match incoming {
        Some(suggestion) => {
            target.insert(aspect_name.to_owned(), suggestion);
        }
        None => {
            target.remove(aspect_name);
        }
    }
}

/// Fetch suggestions for every aspect and merge them into `target`.
///
/// Returns the number of suggestions received.
///
/// # Errors
///
/// Returns the backend error; `target` is left unchanged on failure.
pub async fn fetch_all<A>(api: &A, request: &SuggestionRequest, target: &mut SuggestionMap) -> Result<usize, ApiError>
where
    A: ListingApi + ?Sized,
{
    let incoming = api.suggest_all(request).await?;
    let count = incoming.len();
    tracing::debug!(category_id = %request.category_id, count, "merged suggestions");
    merge_suggestions(target, incoming);
    Ok(count)
}

/// Fetch a suggestion for one aspect and apply it to `target`.
///
/// # Errors
///
/// Returns the backend error; `target` is left unchanged on failure.
pub async fn fetch_one<A>(
    api: &A,
    aspect_name: &str,
    request: &SuggestionRequest,
    target: &mut SuggestionMap,
) -> Result<Option<Suggestion>, ApiError>
where
    A: ListingApi + ?Sized,
{
    let incoming = api.suggest_one(aspect_name, request).await?;
    apply_single(target, aspect_name, incoming.clone());
    Ok(incoming)
}
