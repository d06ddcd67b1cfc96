//! Bulk editing of aspect values against their AI suggestions.
//!
//! A [`BulkEditor`] works on copies: opening one never touches the session,
//! and dropping it (cancel) throws every edit away. Only [`BulkEditor::save`]
//! hands the edited values and refreshed suggestions back to the owner.

#[cfg(test)]
#[path = "bulk_editor_test.rs"]
mod bulk_editor_test;

use crate::api::ListingApi;
use crate::aspect::{Aspect, AspectGroups};
use crate::error::ApiError;
use crate::form::AspectValues;
use crate::suggestion::{Suggestion, SuggestionMap, SuggestionRequest};

/// One aspect in the editor.
#[derive(Clone, Debug, PartialEq)]
pub struct BulkEditRow {
    pub aspect: Aspect,
    pub value: String,
    pub suggestion: Option<Suggestion>,
    /// A refresh for this row is in flight.
    pub loading: bool,
}

impl BulkEditRow {
    /// Required and still blank.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.aspect.required && self.value.trim().is_empty()
    }

    /// There is a suggestion that differs from the current value.
    #[must_use]
    pub fn can_accept(&self) -> bool {
        !self.loading && self.suggestion.as_ref().is_some_and(|s| s.value != self.value)
    }
}

/// What [`BulkEditor::save`] returns to the owner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulkEditOutcome {
    /// Complete value map; blank values are dropped.
    pub values: AspectValues,
    /// Complete suggestion map including refreshes.
    pub suggestions: SuggestionMap,
}

#[derive(Clone, Debug, Default)]
pub struct BulkEditor {
    rows: Vec<BulkEditRow>,
    other_values: AspectValues,
    other_suggestions: SuggestionMap,
}

impl BulkEditor {
    /// Open over copies of the current schema, values and suggestions.
    #[must_use]
    pub fn open(aspects: &AspectGroups, values: &AspectValues, suggestions: &SuggestionMap) -> Self {
        let mut other_values = values.clone();
        let mut other_suggestions = suggestions.clone();
        let rows = aspects
            .iter()
            .map(|aspect| BulkEditRow {
                value: other_values.remove(&aspect.name).unwrap_or_default(),
                suggestion: other_suggestions.remove(&aspect.name),
                aspect: aspect.clone(),
                loading: false,
            })
            .collect();
        Self { rows, other_values, other_suggestions }
    }

    /// Rows in required, recommended, optional order.
    #[must_use]
    pub fn rows(&self) -> &[BulkEditRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, aspect_name: &str) -> Option<&BulkEditRow> {
        self.rows.iter().find(|r| r.aspect.name == aspect_name)
    }

    fn row_mut(&mut self, aspect_name: &str) -> Option<&mut BulkEditRow> {
        self.rows.iter_mut().find(|r| r.aspect.name == aspect_name)
    }

    #[must_use]
    pub fn value(&self, aspect_name: &str) -> Option<&str> {
        self.row(aspect_name).map(|r| r.value.as_str())
    }

    /// Required rows that are still blank.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_missing()).count()
    }

    /// Set the edited value of a row. Returns `false` for unknown aspects.
    pub fn set_value(&mut self, aspect_name: &str, value: impl Into<String>) -> bool {
        match self.row_mut(aspect_name) {
            Some(row) => {
                row.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Copy a row's suggestion into its value, exactly as suggested.
    ///
    /// Returns `false` (and changes nothing) when the row has no suggestion.
    pub fn accept(&mut self, aspect_name: &str) -> bool {
        let Some(row) = self.row_mut(aspect_name) else {
            return false;
        };
        let Some(suggestion) = &row.suggestion else {
            return false;
        };
        row.value.clone_from(&suggestion.value);
        true
    }

    /// Accept every suggestion with at least `min_confidence`; with
    /// `only_empty`, rows that already hold a value are skipped.
    ///
    /// Returns how many rows changed.
    pub fn accept_all(&mut self, min_confidence: f64, only_empty: bool) -> usize {
        let mut changed = 0;
        for row in &mut self.rows {
            if only_empty && !row.value.trim().is_empty() {
                continue;
            }
            let Some(suggestion) = row.suggestion.as_ref().filter(|s| s.confidence >= min_confidence) else {
                continue;
            };
            if row.value != suggestion.value {
                row.value.clone_from(&suggestion.value);
                changed += 1;
            }
        }
        changed
    }

    /// Mark a row as refreshing. Returns `false` if the aspect is unknown or
    /// a refresh for it is already in flight.
    pub fn begin_refresh(&mut self, aspect_name: &str) -> bool {
        match self.row_mut(aspect_name) {
            Some(row) if !row.loading => {
                row.loading = true;
                true
            }
            _ => false,
        }
    }

    /// Apply a refresh result to its row and clear the loading flag.
    ///
    /// Only the row's suggestion changes; its value and every other row are
    /// left alone.
    ///
    /// # Errors
    ///
    /// Passes the fetch error through after clearing the flag.
    pub fn finish_refresh(
        &mut self,
        aspect_name: &str,
        result: Result<Option<Suggestion>, ApiError>,
    ) -> Result<(), ApiError> {
        let Some(row) = self.row_mut(aspect_name) else {
            return result.map(|_| ());
        };
        row.loading = false;
        row.suggestion = result?;
        Ok(())
    }

    /// Re-fetch the suggestion for one row.
    ///
    /// Returns `Ok(false)` without a request if that row is already
    /// refreshing or unknown.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the row's previous suggestion is kept.
    pub async fn refresh<A>(&mut self, api: &A, request: &SuggestionRequest, aspect_name: &str) -> Result<bool, ApiError>
    where
        A: ListingApi + ?Sized,
    {
        if !self.begin_refresh(aspect_name) {
            return Ok(false);
        }
        let result = api.suggest_one(aspect_name, request).await;
        self.finish_refresh(aspect_name, result)?;
        Ok(true)
    }

    /// Close the editor and return the full edited state.
    #[must_use]
    pub fn save(self) -> BulkEditOutcome {
        let mut values = self.other_values;
        let mut suggestions = self.other_suggestions;
        for row in self.rows {
            if !row.value.trim().is_empty() {
                values.insert(row.aspect.name.clone(), row.value);
            }
            if let Some(suggestion) = row.suggestion {
                suggestions.insert(row.aspect.name, suggestion);
            }
        }
        values.retain(|_, v| !v.trim().is_empty());
        BulkEditOutcome { values, suggestions }
    }

    /// Close the editor, discarding every edit.
    pub fn cancel(self) {
        tracing::debug!(rows = self.rows.len(), "bulk edit cancelled");
    }
}
