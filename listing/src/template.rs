//! HTML description templates, one per product family.
//!
//! The backend keeps a template per key (`funko`, `electronics`, ...) and
//! renders it with a [`TemplateData`] built from the form. The rendered HTML
//! replaces the listing description.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use serde::Serialize;

use crate::condition;
use crate::form::{FieldValue, ListingForm};

/// Category name → template key, matched case-insensitively.
const TEMPLATE_KEYS: &[(&str, &str)] = &[
    ("Funko Pop", "funko"),
    ("Electronics", "electronics"),
    ("Clothing", "clothing"),
    ("Automotive", "auto"),
    ("Collectibles", "collectibles"),
    ("Action Figures", "toys"),
    ("Toys", "toys"),
];

/// Template key for a category, if the backend has one.
#[must_use]
pub fn template_key(category: &str) -> Option<&'static str> {
    let category = category.trim();
    TEMPLATE_KEYS.iter().find(|(name, _)| name.eq_ignore_ascii_case(category)).map(|(_, key)| *key)
}

/// Placeholder values sent to the fill endpoint.
///
/// The Funko block is only read by Funko templates; blank entries are left
/// out so the template keeps its own defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    pub title: String,
    pub condition: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pop_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub series: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub character: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub exclusive_release: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub box_condition: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub box_damage: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub year_released: String,
    pub vaulted: bool,
}

impl TemplateData {
    #[must_use]
    pub fn from_form(form: &ListingForm) -> Self {
        let field = |name: &str| form.fields.get(name).filter(|v| !v.is_empty());
        let text = |name: &str| field(name).map(FieldValue::display).unwrap_or_default();
        let aspect = |name: &str| form.aspects.get(name).map(|v| v.trim().to_owned()).unwrap_or_default();

        let features = match field("features") {
            Some(FieldValue::Many(items)) => items.clone(),
            Some(FieldValue::One(one)) => vec![one.clone()],
            None => split_list(&aspect("Features")),
        };
        let model = Some(text("model")).filter(|m| !m.is_empty()).unwrap_or_else(|| form.mpn.trim().to_owned());
        let exclusive = text("exclusive");

        Self {
            title: form.title.trim().to_owned(),
            condition: condition::condition(&form.condition_id).map(|c| c.label.to_owned()).unwrap_or_default(),
            description: form.description.clone(),
            brand: Some(form.brand.trim().to_owned()).filter(|b| !b.is_empty()).unwrap_or_else(|| aspect("Brand")),
            model,
            features,
            images: form.images.clone(),
            pop_number: text("number"),
            series: text("series"),
            character: aspect("Character"),
            exclusive_release: if exclusive == "None" { String::new() } else { exclusive },
            box_condition: text("boxCondition"),
            box_damage: split_list(&text("boxDamage")),
            year_released: text("yearReleased"),
            vaulted: text("vaulted") == "Yes",
        }
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
}
