//! Marketplace aspects ("item specifics") and their usage tiers.
//!
//! Aspects are fetched per category id and live for one category
//! selection. [`AspectGroups::partition`] splits them into the three tiers
//! the form renders:
//!
//! - required:    the `required` flag is set
//! - recommended: not required and usage is `RECOMMENDED`
//! - optional:    everything else
//!
//! Every input aspect lands in exactly one tier, and input order is kept
//! within each tier.

#[cfg(test)]
#[path = "aspect_test.rs"]
mod aspect_test;

use serde::{Deserialize, Serialize};

use crate::api::ListingApi;
use crate::error::ApiError;

/// Marketplace usage tier for an aspect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AspectUsage {
    Required,
    Recommended,
    #[default]
    #[serde(other)]
    Optional,
}

/// Whether the marketplace accepts free text or only listed values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AspectMode {
    SelectionOnly,
    #[default]
    #[serde(other)]
    FreeText,
}

/// Declared value type for an aspect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AspectDataType {
    Number,
    Date,
    #[default]
    #[serde(rename = "STRING", other)]
    Text,
}

/// A marketplace-defined item attribute for one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    #[serde(alias = "localizedAspectName")]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub usage: AspectUsage,
    /// Known values, in marketplace order. Empty when none are published.
    #[serde(default, alias = "values")]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub mode: AspectMode,
    #[serde(default)]
    pub data_type: AspectDataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Date layout (`YYYY`, `YYYYMM`, `YYYYMMDD`) for DATE aspects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Aspect {
    /// A free-text aspect with the given name and tier.
    #[must_use]
    pub fn new(name: impl Into<String>, required: bool, usage: AspectUsage) -> Self {
        Self {
            name: name.into(),
            required,
            usage,
            allowed_values: Vec::new(),
            mode: AspectMode::FreeText,
            data_type: AspectDataType::Text,
            max_length: None,
            format: None,
        }
    }

    /// Check a candidate value against this aspect's constraints.
    ///
    /// Empty values always pass here; required-ness is checked by the form.
    ///
    /// # Errors
    ///
    /// Returns the first constraint the value violates.
    pub fn check_value(&self, value: &str) -> Result<(), AspectValueError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }

        if let Some(max) = self.max_length {
            if value.chars().count() > max {
                return Err(AspectValueError::TooLong { max });
            }
        }

        match self.data_type {
            AspectDataType::Number if value.parse::<f64>().is_err() => return Err(AspectValueError::NotANumber),
            AspectDataType::Date => {
                if let Some(expected) = self.format.as_deref().and_then(date_format_len) {
                    if value.len() != expected {
                        return Err(AspectValueError::DateFormat { expected });
                    }
                }
            }
            _ => {}
        }

        if self.mode == AspectMode::SelectionOnly
            && !self.allowed_values.is_empty()
            && !self.allowed_values.iter().any(|allowed| allowed == value)
        {
            return Err(AspectValueError::NotAllowed);
        }

        Ok(())
    }
}

fn date_format_len(format: &str) -> Option<usize> {
    match format {
        "YYYY" => Some(4),
        "YYYYMM" => Some(6),
        "YYYYMMDD" => Some(8),
        _ => None,
    }
}

/// Why a value was rejected by [`Aspect::check_value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AspectValueError {
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("must be a number")]
    NotANumber,
    #[error("must be a {expected}-digit date")]
    DateFormat { expected: usize },
    #[error("must be one of the listed values")]
    NotAllowed,
}

// =============================================================================
// GROUPS
// =============================================================================

/// Aspects for one category split into usage tiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AspectGroups {
    pub required: Vec<Aspect>,
    pub recommended: Vec<Aspect>,
    pub optional: Vec<Aspect>,
}

impl AspectGroups {
    /// Split aspects into required / recommended / optional.
    #[must_use]
    pub fn partition(aspects: impl IntoIterator<Item = Aspect>) -> Self {
        let mut groups = Self::default();
        for aspect in aspects {
            if aspect.required {
                groups.required.push(aspect);
            } else if aspect.usage == AspectUsage::Recommended {
                groups.recommended.push(aspect);
            } else {
                groups.optional.push(aspect);
            }
        }
        groups
    }

    /// All aspects, required first, then recommended, then optional.
    pub fn iter(&self) -> impl Iterator<Item = &Aspect> {
        self.required.iter().chain(&self.recommended).chain(&self.optional)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.required.len() + self.recommended.len() + self.optional.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an aspect by name in any tier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Aspect> {
        self.iter().find(|a| a.name == name)
    }
}

/// Fetch the aspects for `category_id` and split them into tiers.
///
/// # Errors
///
/// Returns the transport or decode error from the backend call unchanged;
/// there is no retry.
pub async fn fetch_item_specifics<A>(api: &A, category_id: &str) -> Result<AspectGroups, ApiError>
where
    A: ListingApi + ?Sized,
{
    let aspects = api.fetch_aspects(category_id).await?;
    let groups = AspectGroups::partition(aspects);
    tracing::debug!(
        category_id,
        required = groups.required.len(),
        recommended = groups.recommended.len(),
        optional = groups.optional.len(),
        "fetched item specifics"
    );
    Ok(groups)
}
