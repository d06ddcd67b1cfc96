//! In-memory [`ListingApi`] for unit tests.

use std::sync::Mutex;

use crate::api::{BatchScanItem, CreatedListing, ListingApi, ListingDetails, ProductRecord, ScanRequest};
use crate::aspect::Aspect;
use crate::error::ApiError;
use crate::form::ListingPayload;
use crate::market::{MarketData, MarketWindow};
use crate::suggestion::{Suggestion, SuggestionMap, SuggestionRequest};
use crate::template::TemplateData;

/// Canned responses plus a log of every call made.
#[derive(Default)]
pub struct FakeApi {
    product: Option<ProductRecord>,
    aspects: Vec<Aspect>,
    aspects_error: Option<ApiError>,
    values: Vec<String>,
    suggestions: SuggestionMap,
    suggest_error: Option<ApiError>,
    create_error: Option<ApiError>,
    listing: Option<ListingDetails>,
    template: Option<String>,
    market: Option<MarketData>,
    calls: Mutex<Vec<String>>,
    payloads: Mutex<Vec<ListingPayload>>,
    fills: Mutex<Vec<TemplateData>>,
}

impl FakeApi {
    pub fn with_product(mut self, product: ProductRecord) -> Self {
        self.product = Some(product);
        self
    }

    pub fn with_aspects(mut self, aspects: Vec<Aspect>) -> Self {
        self.aspects = aspects;
        self
    }

    pub fn with_aspects_error(mut self, err: ApiError) -> Self {
        self.aspects_error = Some(err);
        self
    }

    pub fn with_values(mut self, values: &[&str]) -> Self {
        self.values = values.iter().map(|v| (*v).to_owned()).collect();
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.insert(suggestion.aspect_name.clone(), suggestion);
        self
    }

    pub fn with_suggest_error(mut self, err: ApiError) -> Self {
        self.suggest_error = Some(err);
        self
    }

    pub fn with_create_error(mut self, err: ApiError) -> Self {
        self.create_error = Some(err);
        self
    }

    pub fn with_listing(mut self, listing: ListingDetails) -> Self {
        self.listing = Some(listing);
        self
    }

    /// Template text; filling renders `{{title}}` from the data.
    pub fn with_template(mut self, template: &str) -> Self {
        self.template = Some(template.to_owned());
        self
    }

    pub fn with_market(mut self, market: MarketData) -> Self {
        self.market = Some(market);
        self
    }

    pub fn fills(&self) -> Vec<TemplateData> {
        self.fills.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<ListingPayload> {
        self.payloads.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait(?Send)]
impl ListingApi for FakeApi {
    async fn scan_upc(&self, request: &ScanRequest) -> Result<ProductRecord, ApiError> {
        self.record(format!("scan:{}", request.upc));
        self.product.clone().ok_or_else(|| ApiError::MissingData("product".into()))
    }

    async fn scan_batch(&self, items: &[ScanRequest]) -> Result<Vec<BatchScanItem>, ApiError> {
        self.record(format!("batch:{}", items.len()));
        Ok(items
            .iter()
            .map(|item| BatchScanItem {
                upc: item.upc.clone(),
                result: self.product.clone().ok_or_else(|| "not found".to_owned()),
            })
            .collect())
    }

    async fn fetch_aspects(&self, category_id: &str) -> Result<Vec<Aspect>, ApiError> {
        self.record(format!("aspects:{category_id}"));
        match &self.aspects_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.aspects.clone()),
        }
    }

    async fn fetch_aspect_values(&self, category_id: &str, aspect_name: &str) -> Result<Vec<String>, ApiError> {
        self.record(format!("values:{category_id}:{aspect_name}"));
        Ok(self.values.clone())
    }

    async fn suggest_all(&self, request: &SuggestionRequest) -> Result<SuggestionMap, ApiError> {
        self.record(format!("suggest_all:{}", request.category_id));
        match &self.suggest_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.suggestions.clone()),
        }
    }

    async fn suggest_one(&self, aspect_name: &str, _request: &SuggestionRequest) -> Result<Option<Suggestion>, ApiError> {
        self.record(format!("suggest_one:{aspect_name}"));
        match &self.suggest_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.suggestions.get(aspect_name).cloned()),
        }
    }

    async fn create_listing(&self, payload: &ListingPayload) -> Result<CreatedListing, ApiError> {
        self.record("create".to_owned());
        self.payloads.lock().unwrap().push(payload.clone());
        match &self.create_error {
            Some(err) => Err(err.clone()),
            None => Ok(CreatedListing { item_id: "110553".to_owned(), url: None }),
        }
    }

    async fn fetch_listing(&self, item_id: &str) -> Result<ListingDetails, ApiError> {
        self.record(format!("listing:{item_id}"));
        self.listing.clone().ok_or_else(|| ApiError::Status { status: 404, message: "not found".into() })
    }

    async fn fetch_template(&self, key: &str) -> Result<String, ApiError> {
        self.record(format!("template:{key}"));
        self.template.clone().ok_or_else(|| ApiError::Status { status: 404, message: "no template".into() })
    }

    async fn fill_template(&self, key: &str, data: &TemplateData) -> Result<String, ApiError> {
        self.record(format!("fill:{key}"));
        self.fills.lock().unwrap().push(data.clone());
        let template = self.fetch_template(key).await?;
        Ok(template.replace("{{title}}", &data.title))
    }

    async fn fetch_market_data(&self, upc: &str, window: MarketWindow) -> Result<MarketData, ApiError> {
        self.record(format!("market:{upc}:{}", window.days()));
        self.market.clone().ok_or_else(|| ApiError::MissingData("market data (none)".into()))
    }
}
