//! Backend REST contract shared by every transport.
//!
//! [`ListingApi`] is the seam between the domain model and HTTP. The web
//! client implements it with `gloo-net`, the CLI with `reqwest`, and tests
//! with an in-memory fake. Transports only move bytes: they send the
//! request, turn non-2xx statuses into [`ApiError::from_status`], and hand
//! the body to the `decode_*` helpers here so both read responses the same
//! way.
//!
//! Futures are not required to be `Send`; in the browser they run on the
//! single WASM thread.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aspect::Aspect;
use crate::error::ApiError;
use crate::form::ListingPayload;
use crate::market::{MarketData, MarketWindow, ScanMarketData};
use crate::suggestion::{Suggestion, SuggestionMap, SuggestionRequest};
use crate::template::TemplateData;

// =============================================================================
// ENDPOINTS
// =============================================================================

pub const SCAN_PATH: &str = "/api/upc/scan";
pub const BATCH_SCAN_PATH: &str = "/api/upc/batch";
pub const SUGGEST_ALL_PATH: &str = "/api/ai/item-specifics";
pub const CREATE_LISTING_PATH: &str = "/api/listing/create";

#[must_use]
pub fn aspects_path(category_id: &str) -> String {
    format!("/api/categories/{}/aspects", encode_segment(category_id))
}

#[must_use]
pub fn aspect_values_path(category_id: &str, aspect_name: &str) -> String {
    format!(
        "/api/categories/{}/aspects/{}/values",
        encode_segment(category_id),
        encode_segment(aspect_name)
    )
}

#[must_use]
pub fn suggest_one_path(aspect_name: &str) -> String {
    format!("/api/ai/item-specific/{}", encode_segment(aspect_name))
}

#[must_use]
pub fn listing_path(item_id: &str) -> String {
    format!("/api/listings/{}", encode_segment(item_id))
}

#[must_use]
pub fn template_path(key: &str) -> String {
    format!("/api/templates/{}", encode_segment(key))
}

#[must_use]
pub fn fill_template_path(key: &str) -> String {
    format!("/api/templates/{}/fill", encode_segment(key))
}

#[must_use]
pub fn market_path(upc: &str, window: MarketWindow) -> String {
    format!("/api/terapeak?upc={}&days={}", encode_segment(upc.trim()), window.days())
}

/// Percent-encode a path segment, leaving RFC 3986 unreserved bytes as-is.
///
/// Aspect names routinely contain spaces and slashes ("Size/Type").
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            write!(out, "%{byte:02X}").ok();
        }
    }
    out
}

// =============================================================================
// TRAIT
// =============================================================================

/// Every backend call the application makes.
#[async_trait::async_trait(?Send)]
pub trait ListingApi {
    /// `POST /api/upc/scan`
    async fn scan_upc(&self, request: &ScanRequest) -> Result<ProductRecord, ApiError>;

    /// `POST /api/upc/batch`
    async fn scan_batch(&self, items: &[ScanRequest]) -> Result<Vec<BatchScanItem>, ApiError>;

    /// `GET /api/categories/{id}/aspects`
    async fn fetch_aspects(&self, category_id: &str) -> Result<Vec<Aspect>, ApiError>;

    /// `GET /api/categories/{id}/aspects/{name}/values`
    async fn fetch_aspect_values(&self, category_id: &str, aspect_name: &str) -> Result<Vec<String>, ApiError>;

    /// `POST /api/ai/item-specifics`
    async fn suggest_all(&self, request: &SuggestionRequest) -> Result<SuggestionMap, ApiError>;

    /// `POST /api/ai/item-specific/{name}`
    async fn suggest_one(&self, aspect_name: &str, request: &SuggestionRequest)
    -> Result<Option<Suggestion>, ApiError>;

    /// `POST /api/listing/create`
    async fn create_listing(&self, payload: &ListingPayload) -> Result<CreatedListing, ApiError>;

    /// `GET /api/listings/{item_id}`
    async fn fetch_listing(&self, item_id: &str) -> Result<ListingDetails, ApiError>;

    /// `GET /api/templates/{key}`: the raw description template.
    async fn fetch_template(&self, key: &str) -> Result<String, ApiError>;

    /// `POST /api/templates/{key}/fill`: the template rendered with `data`.
    async fn fill_template(&self, key: &str, data: &TemplateData) -> Result<String, ApiError>;

    /// `GET /api/terapeak?upc={upc}&days={n}`
    async fn fetch_market_data(&self, upc: &str, window: MarketWindow) -> Result<MarketData, ApiError>;
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body for a single UPC scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub upc: String,
    pub quantity: u32,
}

impl ScanRequest {
    #[must_use]
    pub fn new(upc: impl Into<String>, quantity: u32) -> Self {
        Self { upc: upc.into().trim().to_owned(), quantity: quantity.max(1) }
    }
}

/// UPC-A, EAN-8, EAN-13 and GTIN-14 are all plain digit strings.
#[must_use]
pub fn is_valid_upc(upc: &str) -> bool {
    let upc = upc.trim();
    matches!(upc.len(), 8 | 12 | 13 | 14) && upc.bytes().all(|b| b.is_ascii_digit())
}

/// Parse batch scanner input, one `upc[,quantity]` per line.
///
/// Blank lines are skipped and a missing or unreadable quantity counts as
/// one. Returns the requests and the lines whose UPC is not valid.
#[must_use]
pub fn parse_batch(input: &str) -> (Vec<ScanRequest>, Vec<String>) {
    let mut requests = Vec::new();
    let mut rejected = Vec::new();
    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut parts = line.splitn(2, [',', '\t', ' ']);
        let upc = parts.next().unwrap_or_default().trim();
        let quantity = parts.next().and_then(|q| q.trim().parse().ok()).unwrap_or(1);
        if is_valid_upc(upc) {
            requests.push(ScanRequest::new(upc, quantity));
        } else {
            rejected.push(line.to_owned());
        }
    }
    (requests, rejected)
}

fn default_quantity() -> u32 {
    1
}

/// Product data returned by a UPC scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub upc: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mpn: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, alias = "suggested_price", deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_data: Option<ScanMarketData>,
}

/// One entry of a batch scan: the product, or the backend's error message.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchScanItem {
    pub upc: String,
    pub result: Result<ProductRecord, String>,
}

/// Response to a successful create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedListing {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An existing listing, used to pre-fill a new one ("sell similar").
///
/// The marketplace reports price, quantity and condition id as strings, and
/// a blank string when unset; numbers are accepted too.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingDetails {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub condition_id: Option<String>,
    pub condition_description: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub quantity: Option<u32>,
    pub item_specifics: BTreeMap<String, String>,
}

// =============================================================================
// LENIENT SCALARS
// =============================================================================

/// Read a JSON number or numeric string; null and blank strings are `None`.
fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => Ok(non_blank(&s)),
        Some(other) => Err(D::Error::custom(format!("expected a number or string, got {other}"))),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

pub(crate) fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    lenient_scalar(deserializer)?
        .map(|text| text.parse::<f64>().map_err(|_| D::Error::custom(format!("invalid price `{text}`"))))
        .transpose()
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    lenient_scalar(deserializer)?
        .map(|text| text.parse::<u32>().map_err(|_| D::Error::custom(format!("invalid quantity `{text}`"))))
        .transpose()
}

// =============================================================================
// DECODING
// =============================================================================

fn parse_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

fn failure_message(value: &Value) -> String {
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .unwrap_or("lookup failed")
        .to_owned()
}

fn decode_product(entry: &Value) -> Result<ProductRecord, ApiError> {
    let product = entry.get("product").ok_or_else(|| ApiError::MissingData("product".to_owned()))?;
    if product.get("title").and_then(Value::as_str).is_none() {
        return Err(ApiError::MissingData("product.title".to_owned()));
    }
    from_json(product.clone())
}

/// Decode a `{success, product}` scan response.
///
/// # Errors
///
/// [`ApiError::MissingData`] when the scan reports failure or the product
/// lacks a title; [`ApiError::Parse`] for malformed bodies.
pub fn decode_scan(body: &str) -> Result<ProductRecord, ApiError> {
    let value = parse_json(body)?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::MissingData(format!("product ({})", failure_message(&value))));
    }
    decode_product(&value)
}

/// Decode a batch scan response: a list of per-UPC scan results.
///
/// `requested` supplies the UPC for entries that do not echo one back.
///
/// # Errors
///
/// [`ApiError::Parse`] if the body is not a JSON array.
pub fn decode_batch(body: &str, requested: &[ScanRequest]) -> Result<Vec<BatchScanItem>, ApiError> {
    let value = parse_json(body)?;
    let Value::Array(entries) = value else {
        return Err(ApiError::Parse("expected an array of scan results".to_owned()));
    };

    Ok(entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let echoed = entry
                .get("upc")
                .or_else(|| entry.get("product").and_then(|p| p.get("upc")))
                .and_then(Value::as_str);
            let upc = echoed
                .map(str::to_owned)
                .or_else(|| requested.get(i).map(|r| r.upc.clone()))
                .unwrap_or_default();
            let result = if entry.get("success").and_then(Value::as_bool) == Some(true) {
                decode_product(entry).map_err(|e| e.to_string())
            } else {
                Err(failure_message(entry))
            };
            BatchScanItem { upc, result }
        })
        .collect())
}

/// Decode an aspects response.
///
/// Accepts a bare list, `{"aspects": [...]}`, or the grouped shape
/// `{"required": [...], "recommended": [...], "upcoming_required": [...],
/// "optional": [...]}`. In the grouped shape the group decides the flags:
/// `required` entries are required, `recommended` and `upcoming_required`
/// entries are recommended.
///
/// # Errors
///
/// [`ApiError::MissingData`] for an object with neither `aspects` nor
/// `required`; [`ApiError::Parse`] for any other shape.
pub fn decode_aspects(body: &str) -> Result<Vec<Aspect>, ApiError> {
    use crate::aspect::AspectUsage;

    let value = parse_json(body)?;
    match value {
        Value::Array(_) => from_json(value),
        Value::Object(mut map) => {
            if let Some(list) = map.remove("aspects") {
                return from_json(list);
            }
            if !map.contains_key("required") {
                return Err(ApiError::MissingData("aspects".to_owned()));
            }
            let mut group = |key: &str, required: bool, usage: AspectUsage| -> Result<Vec<Aspect>, ApiError> {
                let Some(list) = map.remove(key) else {
                    return Ok(Vec::new());
                };
                let mut aspects: Vec<Aspect> = from_json(list)?;
                for aspect in &mut aspects {
                    aspect.required = required;
                    aspect.usage = usage;
                }
                Ok(aspects)
            };
            let mut aspects = group("required", true, AspectUsage::Required)?;
            aspects.extend(group("recommended", false, AspectUsage::Recommended)?);
            aspects.extend(group("upcoming_required", false, AspectUsage::Recommended)?);
            aspects.extend(group("optional", false, AspectUsage::Optional)?);
            Ok(aspects)
        }
        _ => Err(ApiError::Parse("expected aspects list or object".to_owned())),
    }
}

/// Decode a list of recommended aspect values.
///
/// # Errors
///
/// [`ApiError::Parse`] if the body is not a list of strings.
pub fn decode_aspect_values(body: &str) -> Result<Vec<String>, ApiError> {
    from_json(parse_json(body)?)
}

/// Decode a create-listing response.
///
/// The id is read from `item_id`, `itemId` or `id`, first match wins;
/// numeric ids are kept as their decimal text.
///
/// # Errors
///
/// [`ApiError::MissingData`] if no item id is present.
pub fn decode_created(body: &str) -> Result<CreatedListing, ApiError> {
    let value = parse_json(body)?;
    let item_id = ["item_id", "itemId", "id"]
        .iter()
        .find_map(|key| match value.get(key)? {
            Value::String(id) => non_blank(id),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .ok_or_else(|| ApiError::MissingData("item_id".to_owned()))?;
    let url = value.get("url").and_then(Value::as_str).and_then(non_blank);
    Ok(CreatedListing { item_id, url })
}

/// Decode a listing-details response.
///
/// # Errors
///
/// [`ApiError::Parse`] for malformed bodies.
pub fn decode_listing(body: &str) -> Result<ListingDetails, ApiError> {
    from_json(parse_json(body)?)
}

/// Decode a `{"template": "..."}` response.
///
/// # Errors
///
/// [`ApiError::MissingData`] if `template` is absent or not a string.
pub fn decode_template(body: &str) -> Result<String, ApiError> {
    string_field(body, "template")
}

/// Decode a `{"html": "..."}` filled-template response.
///
/// # Errors
///
/// [`ApiError::MissingData`] if `html` is absent or not a string.
pub fn decode_filled_template(body: &str) -> Result<String, ApiError> {
    string_field(body, "html")
}

fn string_field(body: &str, key: &str) -> Result<String, ApiError> {
    parse_json(body)?
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::MissingData(key.to_owned()))
}
