//! Sold-listing market research for a product.
//!
//! Two sources feed pricing: the summary a UPC scan may carry
//! ([`ScanMarketData`]) and the sales research endpoint
//! ([`MarketData`]), queried per UPC over a 30, 90 or 365 day window.

#[cfg(test)]
#[path = "market_test.rs"]
mod market_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{lenient_count, lenient_price};
use crate::error::ApiError;

/// How far back sales research looks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarketWindow {
    #[default]
    Month,
    Quarter,
    Year,
}

impl MarketWindow {
    pub const ALL: [Self; 3] = [Self::Month, Self::Quarter, Self::Year];

    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }

    /// The window for a day count the backend accepts.
    #[must_use]
    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.days() == days)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Month => "30 days",
            Self::Quarter => "90 days",
            Self::Year => "365 days",
        }
    }
}

/// Aggregate sales figures for the window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketMetrics {
    #[serde(deserialize_with = "lenient_count")]
    pub total_sold: Option<u32>,
    #[serde(deserialize_with = "lenient_price")]
    pub avg_sold_price: Option<f64>,
    /// Percent of listings that sold.
    #[serde(deserialize_with = "lenient_price")]
    pub sell_through: Option<f64>,
    #[serde(rename = "totalGMV", deserialize_with = "lenient_price")]
    pub total_gmv: Option<f64>,
    #[serde(deserialize_with = "lenient_price")]
    pub avg_shipping: Option<f64>,
}

/// One of the best-selling comparable listings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopListing {
    pub item_id: String,
    pub title: String,
    #[serde(deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_count")]
    pub sold_quantity: Option<u32>,
    #[serde(rename = "totalGMV", deserialize_with = "lenient_price")]
    pub total_gmv: Option<f64>,
    #[serde(deserialize_with = "lenient_price")]
    pub sell_through: Option<f64>,
}

/// Sales research for one UPC.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketData {
    pub metrics: MarketMetrics,
    /// Ordered by sales volume, best first.
    pub top_listings: Vec<TopListing>,
}

impl MarketData {
    /// Highest price among the top listings.
    #[must_use]
    pub fn highest_price(&self) -> Option<f64> {
        max_price(&self.top_listings)
    }

    /// Suggested asking range: average sold price up to the highest price
    /// of the three best sellers. `None` without both figures.
    #[must_use]
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let low = self.metrics.avg_sold_price?;
        let high = max_price(&self.top_listings[..self.top_listings.len().min(3)])?;
        Some((low.min(high), low.max(high)))
    }
}

fn max_price(listings: &[TopListing]) -> Option<f64> {
    listings.iter().filter_map(|l| l.price).filter(|p| p.is_finite()).reduce(f64::max)
}

/// Price statistics over current comparable listings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceAnalysis {
    #[serde(deserialize_with = "lenient_price")]
    pub median: Option<f64>,
    #[serde(deserialize_with = "lenient_price")]
    pub min: Option<f64>,
    #[serde(deserialize_with = "lenient_price")]
    pub max: Option<f64>,
}

/// Market summary attached to a UPC scan result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanMarketData {
    #[serde(deserialize_with = "lenient_price", skip_serializing_if = "Option::is_none")]
    pub average_price: Option<f64>,
    #[serde(deserialize_with = "lenient_price", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(deserialize_with = "lenient_price", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_listings: Option<u32>,
    #[serde(deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub sold_last_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_analysis: Option<PriceAnalysis>,
}

impl ScanMarketData {
    /// Best single price to seed a listing with: the average, else the
    /// median of current listings. Non-positive figures are ignored.
    #[must_use]
    pub fn reference_price(&self) -> Option<f64> {
        self.average_price
            .or_else(|| self.price_analysis.as_ref().and_then(|a| a.median))
            .filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Decode a `{success, data}` research response.
///
/// # Errors
///
/// [`ApiError::MissingData`] when the backend reports failure or omits
/// `data`; [`ApiError::Parse`] for malformed bodies.
pub fn decode_market(body: &str) -> Result<MarketData, ApiError> {
    let mut value: Value = serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let reason = ["message", "detail", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .unwrap_or("no data");
        return Err(ApiError::MissingData(format!("market data ({reason})")));
    }
    let data = value
        .get_mut("data")
        .map(Value::take)
        .filter(|d| !d.is_null())
        .ok_or_else(|| ApiError::MissingData("data".to_owned()))?;
    serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
}
