//! The listing form: the mutable record a seller fills in, its validation
//! gate, and the payload sent to the create endpoint.
//!
//! VALIDATION
//! ==========
//! [`ListingForm::validate`] checks the form against the current schema
//! (registry fields for the category plus fetched aspects) and returns every
//! problem at once. A form with any issue is never turned into a
//! [`ListingPayload`], so nothing incomplete reaches the network.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::{ListingDetails, ProductRecord};
use crate::aspect::AspectGroups;
use crate::category::marketplace_category_id;
use crate::condition::{self, DEFAULT_CONDITION_ID};
use crate::market::ScanMarketData;
use crate::registry::{FieldDescriptor, FieldKind};
use crate::suggestion::{SuggestionContext, SuggestionRequest};

pub const MAX_TITLE_CHARS: usize = 80;
pub const MAX_SUBTITLE_CHARS: usize = 55;
pub const MAX_IMAGES: usize = 12;

/// Aspect name -> entered value.
pub type AspectValues = BTreeMap<String, String>;

// =============================================================================
// FIELD VALUES
// =============================================================================

/// Value of a category-specific field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Multiselect.
    Many(Vec<String>),
    /// Text, number and select.
    One(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::One(String::new())
    }
}

impl FieldValue {
    /// Blank string or empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(text) => text.trim().is_empty(),
            Self::Many(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Single-line rendering; list items joined with ", ".
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::One(text) => text.clone(),
            Self::Many(items) => items.join(", "),
        }
    }

    /// Whether a multiselect value contains `option`.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        match self {
            Self::One(text) => text == option,
            Self::Many(items) => items.iter().any(|item| item == option),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

// =============================================================================
// LISTING OPTIONS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingFormat {
    #[default]
    FixedPrice,
    Auction,
    AuctionWithBuyItNow,
}

impl ListingFormat {
    pub const ALL: [Self; 3] = [Self::FixedPrice, Self::Auction, Self::AuctionWithBuyItNow];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FixedPrice => "Buy It Now",
            Self::Auction => "Auction",
            Self::AuctionWithBuyItNow => "Auction with Buy It Now",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingDuration {
    #[serde(rename = "Days_1")]
    Days1,
    #[serde(rename = "Days_3")]
    Days3,
    #[serde(rename = "Days_5")]
    Days5,
    #[serde(rename = "Days_7")]
    Days7,
    #[serde(rename = "Days_10")]
    Days10,
    #[serde(rename = "Days_30")]
    Days30,
    #[default]
    #[serde(rename = "GTC")]
    GoodTilCancelled,
}

impl ListingDuration {
    pub const ALL: [Self; 7] =
        [Self::Days1, Self::Days3, Self::Days5, Self::Days7, Self::Days10, Self::Days30, Self::GoodTilCancelled];

    /// Wire name, e.g. `Days_7`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Days1 => "Days_1",
            Self::Days3 => "Days_3",
            Self::Days5 => "Days_5",
            Self::Days7 => "Days_7",
            Self::Days10 => "Days_10",
            Self::Days30 => "Days_30",
            Self::GoodTilCancelled => "GTC",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Days1 => "1 day",
            Self::Days3 => "3 days",
            Self::Days5 => "5 days",
            Self::Days7 => "7 days",
            Self::Days10 => "10 days",
            Self::Days30 => "30 days",
            Self::GoodTilCancelled => "Good 'Til Cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingType {
    #[default]
    Calculated,
    Flat,
    Freight,
    LocalPickup,
}

impl ShippingType {
    pub const ALL: [Self; 4] = [Self::Calculated, Self::Flat, Self::Freight, Self::LocalPickup];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Calculated => "Calculated",
            Self::Flat => "Flat rate",
            Self::Freight => "Freight",
            Self::LocalPickup => "Local pickup",
        }
    }
}

/// Shipping inputs as typed by the seller. Numbers stay text until
/// [`ListingForm::prepare`] parses them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingDetails {
    pub shipping_type: ShippingType,
    pub cost: String,
    pub weight_lbs: String,
    pub weight_oz: String,
    pub length: String,
    pub width: String,
    pub height: String,
}

impl ShippingDetails {
    fn numeric_inputs(&self) -> [(&'static str, &str); 6] {
        [
            ("shipping cost", &self.cost),
            ("weight (lbs)", &self.weight_lbs),
            ("weight (oz)", &self.weight_oz),
            ("length", &self.length),
            ("width", &self.width),
            ("height", &self.height),
        ]
    }
}

// =============================================================================
// VALIDATION ISSUES
// =============================================================================

/// One reason the form cannot be submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Form field label or aspect name.
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// =============================================================================
// FORM
// =============================================================================

/// The editable listing record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingForm {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub brand: String,
    pub mpn: String,
    pub upc: String,
    /// Category name, as offered by the registry or the product lookup.
    pub category: String,
    /// Marketplace category id derived from [`Self::category`].
    pub category_id: String,
    pub condition_id: String,
    pub condition_description: String,
    pub price: Option<f64>,
    pub quantity: u32,
    pub format: ListingFormat,
    pub duration: ListingDuration,
    pub shipping: ShippingDetails,
    pub location: String,
    pub accept_offers: bool,
    pub images: Vec<String>,
    /// Category-specific field values keyed by descriptor name.
    pub fields: BTreeMap<String, FieldValue>,
    pub aspects: AspectValues,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            brand: String::new(),
            mpn: String::new(),
            upc: String::new(),
            category: String::new(),
            category_id: String::new(),
            condition_id: DEFAULT_CONDITION_ID.to_owned(),
            condition_description: String::new(),
            price: None,
            quantity: 1,
            format: ListingFormat::default(),
            duration: ListingDuration::default(),
            shipping: ShippingDetails::default(),
            location: String::new(),
            accept_offers: false,
            images: Vec::new(),
            fields: BTreeMap::new(),
            aspects: AspectValues::new(),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl ListingForm {
    /// Seed a form from a scanned product.
    ///
    /// The title is cut to the marketplace limit and at most
    /// [`MAX_IMAGES`] images are kept. The price comes from the scan's
    /// market summary when it has one, else the suggested price. A known
    /// brand also pre-fills the `Brand` aspect.
    #[must_use]
    pub fn from_product(product: &ProductRecord) -> Self {
        let mut form = Self {
            title: truncate_chars(product.title.trim(), MAX_TITLE_CHARS),
            description: product.description.clone().unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            mpn: product.mpn.clone().unwrap_or_default(),
            upc: product.upc.clone(),
            price: product
                .market_data
                .as_ref()
                .and_then(ScanMarketData::reference_price)
                .or(product.price.filter(|p| *p > 0.0)),
            quantity: product.quantity.max(1),
            images: product.images.iter().take(MAX_IMAGES).cloned().collect(),
            ..Self::default()
        };
        if let Some(category) = product.category.as_deref().and_then(non_empty) {
            form.category_id = marketplace_category_id(&category).to_owned();
            form.category = category;
        }
        if let Some(brand) = non_empty(&form.brand) {
            form.aspects.insert("Brand".to_owned(), brand);
        }
        form
    }

    /// Copy the sellable details of an existing listing into this form.
    ///
    /// Category, images and shipping are left alone; item specifics are
    /// merged over the current aspect values.
    pub fn copy_from_listing(&mut self, listing: &ListingDetails) {
        self.title = truncate_chars(listing.title.trim(), MAX_TITLE_CHARS);
        self.description.clone_from(&listing.description);
        if let Some(price) = listing.price {
            self.price = Some(price);
        }
        if let Some(id) = listing.condition_id.as_deref().filter(|id| condition::condition(id).is_some()) {
            self.condition_id = id.to_owned();
        }
        if let Some(text) = &listing.condition_description {
            self.condition_description.clone_from(text);
        }
        if let Some(quantity) = listing.quantity {
            self.quantity = quantity.max(1);
        }
        for (name, value) in &listing.item_specifics {
            if !value.trim().is_empty() {
                self.aspects.insert(name.clone(), value.clone());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Images
    // -------------------------------------------------------------------------

    /// Append an image URL. Returns `false` for blanks, duplicates, or when
    /// the form already holds [`MAX_IMAGES`].
    pub fn add_image(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || self.images.len() >= MAX_IMAGES || self.images.iter().any(|u| u == url) {
            return false;
        }
        self.images.push(url.to_owned());
        true
    }

    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Move the image at `from` to position `to`. The first image is the
    /// gallery cover.
    pub fn move_image(&mut self, from: usize, to: usize) -> bool {
        if from >= self.images.len() || to >= self.images.len() {
            return false;
        }
        let url = self.images.remove(from);
        self.images.insert(to, url);
        true
    }

    // -------------------------------------------------------------------------
    // Suggestions
    // -------------------------------------------------------------------------

    /// Body for the suggestion endpoints, built from what the form holds.
    #[must_use]
    pub fn suggestion_request(&self) -> SuggestionRequest {
        SuggestionRequest {
            category_id: self.category_id.clone(),
            context: SuggestionContext {
                title: non_empty(&self.title),
                upc: non_empty(&self.upc),
                brand: non_empty(&self.brand),
                category: non_empty(&self.category),
                description: non_empty(&self.description),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Every issue blocking submission against the given schema.
    #[must_use]
    pub fn validate(&self, fields: &[FieldDescriptor], aspects: &AspectGroups) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.validate_core(&mut issues);
        self.validate_fields(fields, &mut issues);
        self.validate_aspects(aspects, &mut issues);
        issues
    }

    fn validate_core(&self, issues: &mut Vec<ValidationIssue>) {
        let title = self.title.trim();
        if title.is_empty() {
            issues.push(ValidationIssue::required("title"));
        } else if title.chars().count() > MAX_TITLE_CHARS {
            issues.push(ValidationIssue::new("title", format!("must be at most {MAX_TITLE_CHARS} characters")));
        }
        if self.subtitle.trim().chars().count() > MAX_SUBTITLE_CHARS {
            issues.push(ValidationIssue::new("subtitle", format!("must be at most {MAX_SUBTITLE_CHARS} characters")));
        }
        if self.description.trim().is_empty() {
            issues.push(ValidationIssue::required("description"));
        }
        if self.category_id.trim().is_empty() {
            issues.push(ValidationIssue::required("category"));
        }
        if condition::condition(&self.condition_id).is_none() {
            issues.push(ValidationIssue::new("condition", "must be a known condition"));
        }
        if !self.price.is_some_and(|p| p.is_finite() && p > 0.0) {
            issues.push(ValidationIssue::new("price", "must be greater than 0"));
        }
        if self.quantity == 0 {
            issues.push(ValidationIssue::new("quantity", "must be at least 1"));
        }
        if self.images.len() > MAX_IMAGES {
            issues.push(ValidationIssue::new("images", format!("at most {MAX_IMAGES} photos")));
        }
        for (label, input) in self.shipping.numeric_inputs() {
            if parse_number(input).is_err() {
                issues.push(ValidationIssue::new(label, "must be a number"));
            }
        }
    }

    fn validate_fields(&self, fields: &[FieldDescriptor], issues: &mut Vec<ValidationIssue>) {
        for descriptor in fields {
            let value = self.fields.get(descriptor.name);
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                if descriptor.required {
                    issues.push(ValidationIssue::required(descriptor.label));
                }
                continue;
            };
            if let Some(message) = field_problem(descriptor, value) {
                issues.push(ValidationIssue::new(descriptor.label, message));
            }
        }
    }

    fn validate_aspects(&self, aspects: &AspectGroups, issues: &mut Vec<ValidationIssue>) {
        for aspect in aspects.iter() {
            let value = self.aspects.get(&aspect.name).map_or("", |v| v.trim());
            if value.is_empty() {
                if aspect.required {
                    issues.push(ValidationIssue::required(aspect.name.clone()));
                }
                continue;
            }
            if let Err(err) = aspect.check_value(value) {
                issues.push(ValidationIssue::new(aspect.name.clone(), err.to_string()));
            }
        }
    }

    /// Validate and build the create-listing payload.
    ///
    /// # Errors
    ///
    /// Returns every validation issue if the form is incomplete.
    pub fn prepare(
        &self,
        fields: &[FieldDescriptor],
        aspects: &AspectGroups,
    ) -> Result<ListingPayload, Vec<ValidationIssue>> {
        let issues = self.validate(fields, aspects);
        if !issues.is_empty() {
            return Err(issues);
        }

        let shipping = &self.shipping;
        Ok(ListingPayload {
            title: self.title.trim().to_owned(),
            subtitle: non_empty(&self.subtitle),
            description: self.description.trim().to_owned(),
            category_id: self.category_id.trim().to_owned(),
            condition_id: self.condition_id.clone(),
            condition_description: non_empty(&self.condition_description),
            price: self.price.unwrap_or_default(),
            quantity: self.quantity,
            format: self.format,
            duration: self.duration,
            brand: non_empty(&self.brand),
            mpn: non_empty(&self.mpn),
            upc: non_empty(&self.upc),
            images: self.images.clone(),
            item_specifics: format_item_specifics(&self.aspects, aspects),
            category_fields: self
                .fields
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            shipping: ShippingPayload {
                shipping_type: shipping.shipping_type,
                cost: parse_number(&shipping.cost).unwrap_or_default(),
                weight_lbs: parse_number(&shipping.weight_lbs).unwrap_or_default(),
                weight_oz: parse_number(&shipping.weight_oz).unwrap_or_default(),
                length: parse_number(&shipping.length).unwrap_or_default(),
                width: parse_number(&shipping.width).unwrap_or_default(),
                height: parse_number(&shipping.height).unwrap_or_default(),
            },
            location: non_empty(&self.location),
            accept_offers: self.accept_offers,
        })
    }
}

/// Blank -> `Ok(None)`, number -> `Ok(Some)`, anything else -> `Err`.
fn parse_number(input: &str) -> Result<Option<f64>, ()> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input.parse::<f64>().ok().filter(|n| n.is_finite()).map(Some).ok_or(())
}

fn field_problem(descriptor: &FieldDescriptor, value: &FieldValue) -> Option<&'static str> {
    match (descriptor.kind, value) {
        (FieldKind::Number, FieldValue::One(text)) if text.trim().parse::<f64>().is_err() => Some("must be a number"),
        (FieldKind::Select, FieldValue::One(text))
            if !descriptor.options.is_empty() && !descriptor.options.contains(&text.as_str()) =>
        {
            Some("must be one of the listed options")
        }
        (FieldKind::Multiselect, FieldValue::Many(items))
            if items.iter().any(|item| !descriptor.options.contains(&item.as_str())) =>
        {
            Some("must only contain listed options")
        }
        (FieldKind::Multiselect, FieldValue::One(_)) => Some("must be a list"),
        (FieldKind::Text | FieldKind::Number | FieldKind::Select, FieldValue::Many(_)) => Some("must be a single value"),
        _ => None,
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// One `{name, value}` entry of the item-specifics list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpecific {
    pub name: String,
    pub value: String,
}

/// Aspect values as the ordered list the create endpoint expects.
///
/// Aspects known for the category come first in schema order, followed by
/// any other entered values in name order. Empty values are dropped.
#[must_use]
pub fn format_item_specifics(values: &AspectValues, aspects: &AspectGroups) -> Vec<ItemSpecific> {
    let known = aspects.iter().map(|a| a.name.as_str());
    let extra = values.keys().map(String::as_str).filter(|name| aspects.get(name).is_none());

    known
        .chain(extra)
        .filter_map(|name| {
            let value = values.get(name)?.trim();
            (!value.is_empty()).then(|| ItemSpecific { name: name.to_owned(), value: value.to_owned() })
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingPayload {
    pub shipping_type: ShippingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_oz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Body of `POST /api/listing/create`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub description: String,
    pub category_id: String,
    pub condition_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_description: Option<String>,
    pub price: f64,
    pub quantity: u32,
    pub format: ListingFormat,
    pub duration: ListingDuration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    pub images: Vec<String>,
    pub item_specifics: Vec<ItemSpecific>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_fields: BTreeMap<String, FieldValue>,
    pub shipping: ShippingPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub accept_offers: bool,
}
