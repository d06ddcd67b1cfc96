//! The listing session: single owner of the form, its schema and the
//! suggestion map, plus the submit state machine.
//!
//! STATE MACHINE
//! =============
//!
//! ```text
//!   Editing --begin_submit--> Submitting --finish_submit(Ok)--> Succeeded
//!      ^                          |
//!      +----finish_submit(Err)----+
//! ```
//!
//! `begin_submit` validates first; a form with issues stays in `Editing` and
//! no request is made. While `Submitting`, edits and a second submit are
//! refused. A failed create returns to `Editing` with the form untouched
//! and `last_error` set.
//!
//! Views never hold a reference into the session. They read copies and hand
//! edits back through the methods here, which keeps the async gaps
//! (fetching aspects, suggestions, submitting) free of outstanding borrows:
//! each async flow is a `begin_*` / `apply_*` pair around the request.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::api::{CreatedListing, ListingApi, ProductRecord};
use crate::aspect::{AspectGroups, fetch_item_specifics};
use crate::bulk_editor::{BulkEditOutcome, BulkEditor};
use crate::category::marketplace_category_id;
use crate::error::{ApiError, SubmitError};
use crate::form::{FieldValue, ListingForm, ListingPayload, ValidationIssue};
use crate::registry::{self, FieldDescriptor};
use crate::suggestion::{self, Suggestion, SuggestionMap, SuggestionRequest};
use crate::template::{self, TemplateData};

/// Where the session is in the submit lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Succeeded,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListingSession {
    form: ListingForm,
    aspects: AspectGroups,
    /// Category id the current `aspects` were fetched for.
    aspects_for: Option<String>,
    suggestions: SuggestionMap,
    phase: FormPhase,
    last_error: Option<String>,
    created: Option<CreatedListing>,
}

impl ListingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session pre-filled from a scanned product.
    #[must_use]
    pub fn from_product(product: &ProductRecord) -> Self {
        Self { form: ListingForm::from_product(product), ..Self::default() }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn form(&self) -> &ListingForm {
        &self.form
    }

    /// Registry fields for the current category.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        registry::fields_for(&self.form.category)
    }

    #[must_use]
    pub fn aspects(&self) -> &AspectGroups {
        &self.aspects
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionMap {
        &self.suggestions
    }

    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn created(&self) -> Option<&CreatedListing> {
        self.created.as_ref()
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.phase == FormPhase::Editing
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Apply an arbitrary edit to the form. Refused outside `Editing`.
    pub fn edit(&mut self, f: impl FnOnce(&mut ListingForm)) -> bool {
        if !self.is_editable() {
            return false;
        }
        f(&mut self.form);
        true
    }

    /// Switch category by name.
    ///
    /// Category-specific fields, aspects, aspect values and suggestions all
    /// belong to the old category and are cleared. The marketplace id is
    /// derived from the name; a blank name clears it. Returns the new category id, or `None` if
    /// the session is not editable or the category did not change.
    pub fn select_category(&mut self, category: &str) -> Option<&str> {
        let category = category.trim();
        if !self.is_editable() || self.form.category == category {
            return None;
        }
        self.form.category = category.to_owned();
        let id = marketplace_category_id(category).to_owned();
        self.reset_category_state(id);
        Some(self.form.category_id.as_str())
    }

    /// Override the marketplace category id directly, keeping the name.
    pub fn set_category_id(&mut self, category_id: &str) -> bool {
        if !self.is_editable() || self.form.category_id == category_id {
            return false;
        }
        self.reset_category_state(category_id.to_owned());
        true
    }

    fn reset_category_state(&mut self, category_id: String) {
        tracing::debug!(category = %self.form.category, %category_id, "category changed");
        self.form.category_id = category_id;
        self.form.fields.clear();
        self.form.aspects.clear();
        self.aspects = AspectGroups::default();
        self.aspects_for = None;
        self.suggestions.clear();
    }

    pub fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        self.edit(|form| {
            form.fields.insert(name.to_owned(), value);
        })
    }

    pub fn set_aspect_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        self.edit(|form| {
            form.aspects.insert(name.to_owned(), value);
        })
    }

    // -------------------------------------------------------------------------
    // Aspects
    // -------------------------------------------------------------------------

    /// Install fetched aspects if they still belong to the current category.
    ///
    /// Returns `false` and drops them when the category changed while the
    /// fetch was in flight.
    pub fn apply_aspects(&mut self, category_id: &str, groups: AspectGroups) -> bool {
        if self.form.category_id != category_id {
            tracing::debug!(category_id, current = %self.form.category_id, "dropping stale aspects");
            return false;
        }
        self.aspects = groups;
        self.aspects_for = Some(category_id.to_owned());
        true
    }

    /// Fetch and install aspects for the current category id.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous aspects are kept.
    pub async fn load_aspects<A>(&mut self, api: &A) -> Result<bool, ApiError>
    where
        A: ListingApi + ?Sized,
    {
        let category_id = self.form.category_id.clone();
        if category_id.is_empty() {
            return Ok(false);
        }
        let groups = fetch_item_specifics(api, &category_id).await?;
        Ok(self.apply_aspects(&category_id, groups))
    }

    /// Whether the installed aspects match the current category id.
    #[must_use]
    pub fn aspects_loaded(&self) -> bool {
        self.aspects_for.as_deref() == Some(self.form.category_id.as_str())
    }

    // -------------------------------------------------------------------------
    // Suggestions
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn suggestion_request(&self) -> SuggestionRequest {
        self.form.suggestion_request()
    }

    pub fn merge_suggestions(&mut self, incoming: SuggestionMap) {
        suggestion::merge_suggestions(&mut self.suggestions, incoming);
    }

    pub fn apply_suggestion(&mut self, aspect_name: &str, incoming: Option<Suggestion>) {
        suggestion::apply_single(&mut self.suggestions, aspect_name, incoming);
    }

    /// Copy a suggestion into the aspect value map exactly as suggested.
    pub fn accept_suggestion(&mut self, aspect_name: &str) -> bool {
        let Some(value) = self.suggestions.get(aspect_name).map(|s| s.value.clone()) else {
            return false;
        };
        self.set_aspect_value(aspect_name, value)
    }

    /// Fetch suggestions for every aspect and merge them.
    ///
    /// # Errors
    ///
    /// Returns the backend error; existing suggestions are kept.
    pub async fn request_suggestions<A>(&mut self, api: &A) -> Result<usize, ApiError>
    where
        A: ListingApi + ?Sized,
    {
        let request = self.suggestion_request();
        suggestion::fetch_all(api, &request, &mut self.suggestions).await
    }

    /// Re-fetch the suggestion for one aspect; other entries are untouched.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the previous suggestion is kept.
    pub async fn refresh_suggestion<A>(&mut self, api: &A, aspect_name: &str) -> Result<Option<Suggestion>, ApiError>
    where
        A: ListingApi + ?Sized,
    {
        let request = self.suggestion_request();
        suggestion::fetch_one(api, aspect_name, &request, &mut self.suggestions).await
    }

    // -------------------------------------------------------------------------
    // Bulk editor
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn open_bulk_editor(&self) -> BulkEditor {
        BulkEditor::open(&self.aspects, &self.form.aspects, &self.suggestions)
    }

    /// Take over the values and suggestions of a saved bulk edit.
    pub fn apply_bulk_edits(&mut self, outcome: BulkEditOutcome) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.form.aspects = outcome.values;
        self.suggestions = outcome.suggestions;
        true
    }

    // -------------------------------------------------------------------------
    // Description template
    // -------------------------------------------------------------------------

    /// Template key for the current category.
    #[must_use]
    pub fn template_key(&self) -> Option<&'static str> {
        template::template_key(&self.form.category)
    }

    #[must_use]
    pub fn template_data(&self) -> TemplateData {
        TemplateData::from_form(&self.form)
    }

    /// Replace the description with rendered template HTML.
    pub fn apply_description(&mut self, html: String) -> bool {
        self.edit(|form| form.description = html)
    }

    /// Render the category's template with the current form and use it as
    /// the description. `Ok(false)` when the category has no template or
    /// the session stopped being editable meanwhile.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the description is left as it was.
    pub async fn fill_description<A>(&mut self, api: &A) -> Result<bool, ApiError>
    where
        A: ListingApi + ?Sized,
    {
        let Some(key) = self.template_key() else {
            return Ok(false);
        };
        let html = api.fill_template(key, &self.template_data()).await?;
        tracing::debug!(key, bytes = html.len(), "description filled from template");
        Ok(self.apply_description(html))
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.form.validate(self.fields(), &self.aspects)
    }

    /// Validate and move to `Submitting`.
    ///
    /// # Errors
    ///
    /// [`SubmitError::InProgress`] while `Submitting`,
    /// [`SubmitError::AlreadySubmitted`] once `Succeeded`, and
    /// [`SubmitError::Validation`] if the form is incomplete. None of them
    /// changes the phase.
    pub fn begin_submit(&mut self) -> Result<ListingPayload, SubmitError> {
        match self.phase {
            FormPhase::Editing => {}
            FormPhase::Submitting => return Err(SubmitError::InProgress),
            FormPhase::Succeeded => return Err(SubmitError::AlreadySubmitted),
        }
        let payload = self.form.prepare(self.fields(), &self.aspects).map_err(SubmitError::Validation)?;
        self.phase = FormPhase::Submitting;
        self.last_error = None;
        Ok(payload)
    }

    /// Record the create outcome.
    ///
    /// # Errors
    ///
    /// On failure the session returns to `Editing`, keeps the form as it
    /// was, stores the message in `last_error`, and passes the error on.
    pub fn finish_submit(&mut self, result: Result<CreatedListing, ApiError>) -> Result<CreatedListing, SubmitError> {
        match result {
            Ok(created) => {
                tracing::info!(item_id = %created.item_id, "listing created");
                self.phase = FormPhase::Succeeded;
                self.created = Some(created.clone());
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(error = %err, "listing create failed");
                self.phase = FormPhase::Editing;
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validate, send one create request, and record the outcome.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_submit`] and [`Self::finish_submit`].
    pub async fn submit<A>(&mut self, api: &A) -> Result<CreatedListing, SubmitError>
    where
        A: ListingApi + ?Sized,
    {
        let payload = self.begin_submit()?;
        let result = api.create_listing(&payload).await;
        self.finish_submit(result)
    }

    /// Start over with an empty form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
