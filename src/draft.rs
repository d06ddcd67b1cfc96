//! Assemble a listing session from command-line inputs.
//!
//! DESIGN
//! ======
//! `build_draft` drives the same `ListingSession` the web client edits, in
//! the order a seller would: scan, copy from a similar listing, pick a
//! category, fill details, load aspects, accept suggestions, apply
//! explicit overrides, then render the description template. The caller
//! decides whether to submit.

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;

use listing::api::{ListingApi, ScanRequest, is_valid_upc};
use listing::registry::{self, FieldKind};
use listing::{FieldValue, ListingSession};

use crate::error::CliError;

/// Everything `scanlist create` can set.
#[derive(Debug, Clone, Default)]
pub struct DraftOptions {
    pub upc: Option<String>,
    pub quantity: Option<u32>,
    pub similar: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub condition_id: Option<String>,
    pub price: Option<f64>,
    pub images: Vec<String>,
    pub fields: Vec<(String, String)>,
    pub aspects: Vec<(String, String)>,
    /// Accept suggestions at or above this confidence into empty aspects.
    pub auto_fill: Option<f64>,
    /// Replace the description with the category's rendered template.
    pub fill_description: bool,
}

/// Parse a `name=value` argument.
///
/// # Errors
///
/// Returns a message for clap when `=` is missing or the name is blank.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw.split_once('=').ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing name in `{raw}`"));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

/// Typed value for a category field: multiselect fields take a
/// comma-separated list.
#[must_use]
pub fn field_value(category: &str, name: &str, raw: &str) -> FieldValue {
    match registry::field(category, name) {
        Some(descriptor) if descriptor.kind == FieldKind::Multiselect => FieldValue::Many(
            raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect(),
        ),
        _ => FieldValue::One(raw.to_owned()),
    }
}

/// Build an editable session from `opts`, calling the backend as needed.
///
/// # Errors
///
/// [`CliError::InvalidUpc`] for a malformed UPC, [`CliError::NoTemplate`]
/// when a description fill is asked for a category without a template, or
/// the first backend error.
pub async fn build_draft<A>(api: &A, opts: &DraftOptions) -> Result<ListingSession, CliError>
where
    A: ListingApi + ?Sized,
{
    let mut session = match &opts.upc {
        Some(upc) => {
            if !is_valid_upc(upc) {
                return Err(CliError::InvalidUpc(upc.clone()));
            }
            let request = ScanRequest::new(upc.as_str(), opts.quantity.unwrap_or(1));
            let product = api.scan_upc(&request).await?;
            tracing::info!(upc = %request.upc, title = %product.title, "product found");
            ListingSession::from_product(&product)
        }
        None => ListingSession::new(),
    };

    if let Some(item_id) = &opts.similar {
        let details = api.fetch_listing(item_id).await?;
        session.edit(|f| f.copy_from_listing(&details));
    }

    if let Some(category) = &opts.category {
        session.select_category(category);
    }
    if let Some(category_id) = &opts.category_id {
        session.set_category_id(category_id);
    }

    session.edit(|f| {
        if let Some(title) = &opts.title {
            f.title.clone_from(title);
        }
        if let Some(description) = &opts.description {
            f.description.clone_from(description);
        }
        if let Some(condition_id) = &opts.condition_id {
            f.condition_id.clone_from(condition_id);
        }
        if opts.price.is_some() {
            f.price = opts.price;
        }
        if let Some(quantity) = opts.quantity {
            f.quantity = quantity.max(1);
        }
        for url in &opts.images {
            if !f.add_image(url) {
                tracing::warn!(%url, "image skipped");
            }
        }
    });

    let category = session.form().category.clone();
    for (name, raw) in &opts.fields {
        session.set_field(name, field_value(&category, name, raw));
    }

    session.load_aspects(api).await?;

    if let Some(min_confidence) = opts.auto_fill {
        let received = session.request_suggestions(api).await?;
        let mut editor = session.open_bulk_editor();
        let filled = editor.accept_all(min_confidence, true);
        session.apply_bulk_edits(editor.save());
        tracing::info!(received, filled, "suggestions applied");
    }

    for (name, value) in &opts.aspects {
        session.set_aspect_value(name, value.as_str());
    }

    if opts.fill_description && !session.fill_description(api).await? {
        return Err(CliError::NoTemplate(session.form().category.clone()));
    }

    Ok(session)
}
