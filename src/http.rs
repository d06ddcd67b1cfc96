//! `reqwest` transport for the listing backend.
//!
//! Response bodies go through the same `listing::api` decoders the web
//! client uses, so both front ends agree on every wire shape.

use listing::ApiError;
use listing::api::{
    self as wire, BATCH_SCAN_PATH, BatchScanItem, CREATE_LISTING_PATH, CreatedListing, ListingApi, ListingDetails,
    ProductRecord, SCAN_PATH, SUGGEST_ALL_PATH, ScanRequest,
};
use listing::aspect::Aspect;
use listing::form::ListingPayload;
use listing::market::{self, MarketData, MarketWindow};
use listing::suggestion::{self, Suggestion, SuggestionMap, SuggestionRequest};
use listing::template::TemplateData;
use serde::Serialize;

use crate::config::Config;
use crate::error::CliError;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    config: Config,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    items: &'a [ScanRequest],
}

impl HttpBackend {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// [`CliError::HttpClient`] if the TLS backend fails to initialise.
    pub fn new(config: Config) -> Result<Self, CliError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.timeouts.connect());
        if let Some(limit) = config.timeouts.request() {
            builder = builder.timeout(limit);
        }
        Ok(Self { http: builder.build()?, config })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn get(&self, path: &str) -> Result<String, ApiError> {
        let url = self.config.url(path);
        tracing::debug!(%url, "GET");
        read(self.http.get(url).send().await).await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String, ApiError> {
        let url = self.config.url(path);
        tracing::debug!(%url, "POST");
        read(self.http.post(url).json(body).send().await).await
    }
}

async fn read(response: Result<reqwest::Response, reqwest::Error>) -> Result<String, ApiError> {
    let resp = response.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "backend returned an error");
        return Err(ApiError::from_status(status.as_u16(), &body));
    }
    Ok(body)
}

// =============================================================================
// LISTING API
// =============================================================================

#[async_trait::async_trait(?Send)]
impl ListingApi for HttpBackend {
    async fn scan_upc(&self, request: &ScanRequest) -> Result<ProductRecord, ApiError> {
        wire::decode_scan(&self.post(SCAN_PATH, request).await?)
    }

    async fn scan_batch(&self, items: &[ScanRequest]) -> Result<Vec<BatchScanItem>, ApiError> {
        let body = self.post(BATCH_SCAN_PATH, &BatchBody { items }).await?;
        wire::decode_batch(&body, items)
    }

    async fn fetch_aspects(&self, category_id: &str) -> Result<Vec<Aspect>, ApiError> {
        wire::decode_aspects(&self.get(&wire::aspects_path(category_id)).await?)
    }

    async fn fetch_aspect_values(&self, category_id: &str, aspect_name: &str) -> Result<Vec<String>, ApiError> {
        wire::decode_aspect_values(&self.get(&wire::aspect_values_path(category_id, aspect_name)).await?)
    }

    async fn suggest_all(&self, request: &SuggestionRequest) -> Result<SuggestionMap, ApiError> {
        suggestion::decode_suggestions(&self.post(SUGGEST_ALL_PATH, request).await?)
    }

    async fn suggest_one(
        &self,
        aspect_name: &str,
        request: &SuggestionRequest,
    ) -> Result<Option<Suggestion>, ApiError> {
        let body = self.post(&wire::suggest_one_path(aspect_name), request).await?;
        suggestion::decode_single(&body, aspect_name)
    }

    async fn create_listing(&self, payload: &ListingPayload) -> Result<CreatedListing, ApiError> {
        wire::decode_created(&self.post(CREATE_LISTING_PATH, payload).await?)
    }

    async fn fetch_listing(&self, item_id: &str) -> Result<ListingDetails, ApiError> {
        wire::decode_listing(&self.get(&wire::listing_path(item_id)).await?)
    }

    async fn fetch_template(&self, key: &str) -> Result<String, ApiError> {
        wire::decode_template(&self.get(&wire::template_path(key)).await?)
    }

    async fn fill_template(&self, key: &str, data: &TemplateData) -> Result<String, ApiError> {
        wire::decode_filled_template(&self.post(&wire::fill_template_path(key), data).await?)
    }

    async fn fetch_market_data(&self, upc: &str, window: MarketWindow) -> Result<MarketData, ApiError> {
        market::decode_market(&self.get(&wire::market_path(upc, window)).await?)
    }
}
