//! REST transport for the listing backend.
//!
//! Client-side (csr): real HTTP calls via `gloo-net` against same-origin
//! `/api/...` paths; the dev server proxies them to the backend.
//! Native builds (tests): every call fails with [`ApiError::Transport`]
//! since the endpoints are only reachable from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Bodies are read as text and handed to the shared decoders in
//! `listing::api`, so a non-2xx status, a malformed body and a missing field
//! each surface as their own `ApiError` variant for the view to display.

#![allow(clippy::unused_async)]

#[cfg(all(test, not(feature = "csr")))]
#[path = "api_test.rs"]
mod api_test;

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

/// `ListingApi` over the browser's `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserApi;

#[derive(Serialize)]
struct BatchBody<'a> {
    items: &'a [ScanRequest],
}

#[cfg(not(feature = "csr"))]
fn unavailable() -> ApiError {
    ApiError::Transport("backend is only reachable from the browser".to_owned())
}

#[cfg(feature = "csr")]
async fn read(response: Result<gloo_net::http::Response, gloo_net::Error>) -> Result<String, ApiError> {
    let resp = response.map_err(|e| ApiError::Transport(e.to_string()))?;
    let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    if !resp.ok() {
        log::warn!("{} returned {}", resp.url(), resp.status());
        return Err(ApiError::from_status(resp.status(), &body));
    }
    Ok(body)
}

async fn get(path: &str) -> Result<String, ApiError> {
    #[cfg(feature = "csr")]
    {
        read(gloo_net::http::Request::get(path).send().await).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = path;
        Err(unavailable())
    }
}

async fn post<T: Serialize>(path: &str, body: &T) -> Result<String, ApiError> {
    #[cfg(feature = "csr")]
    {
        let request = gloo_net::http::Request::post(path).json(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        read(request.send().await).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (path, body);
        Err(unavailable())
    }
}

#[async_trait::async_trait(?Send)]
impl ListingApi for BrowserApi {
    async fn scan_upc(&self, request: &ScanRequest) -> Result<ProductRecord, ApiError> {
        wire::decode_scan(&post(SCAN_PATH, request).await?)
    }

    async fn scan_batch(&self, items: &[ScanRequest]) -> Result<Vec<BatchScanItem>, ApiError> {
        let body = post(BATCH_SCAN_PATH, &BatchBody { items }).await?;
        wire::decode_batch(&body, items)
    }

    async fn fetch_aspects(&self, category_id: &str) -> Result<Vec<Aspect>, ApiError> {
        wire::decode_aspects(&get(&wire::aspects_path(category_id)).await?)
    }

    async fn fetch_aspect_values(&self, category_id: &str, aspect_name: &str) -> Result<Vec<String>, ApiError> {
        wire::decode_aspect_values(&get(&wire::aspect_values_path(category_id, aspect_name)).await?)
    }

    async fn suggest_all(&self, request: &SuggestionRequest) -> Result<SuggestionMap, ApiError> {
        suggestion::decode_suggestions(&post(SUGGEST_ALL_PATH, request).await?)
    }

    async fn suggest_one(
        &self,
        aspect_name: &str,
        request: &SuggestionRequest,
    ) -> Result<Option<Suggestion>, ApiError> {
        let body = post(&wire::suggest_one_path(aspect_name), request).await?;
        suggestion::decode_single(&body, aspect_name)
    }

    async fn create_listing(&self, payload: &ListingPayload) -> Result<CreatedListing, ApiError> {
        wire::decode_created(&post(CREATE_LISTING_PATH, payload).await?)
    }

    async fn fetch_listing(&self, item_id: &str) -> Result<ListingDetails, ApiError> {
        wire::decode_listing(&get(&wire::listing_path(item_id)).await?)
    }

    async fn fetch_template(&self, key: &str) -> Result<String, ApiError> {
        wire::decode_template(&get(&wire::template_path(key)).await?)
    }

    async fn fill_template(&self, key: &str, data: &TemplateData) -> Result<String, ApiError> {
        wire::decode_filled_template(&post(&wire::fill_template_path(key), data).await?)
    }

    async fn fetch_market_data(&self, upc: &str, window: MarketWindow) -> Result<MarketData, ApiError> {
        market::decode_market(&get(&wire::market_path(upc, window)).await?)
    }
}
