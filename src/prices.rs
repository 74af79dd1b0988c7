//! Latest-price lookups.
//!
//! This module handles:
//! - The `PriceSource` seam used by the allocator
//! - Fetching the latest daily close from Yahoo Finance
//! - Fixed prices held in memory or loaded from a JSON file

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::load_json;
use crate::error::{ConfigError, PriceError};

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) smart-picker/0.1";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Most recent trade price for `ticker`.
    async fn latest_price(&self, ticker: &str) -> Result<f64, PriceError>;
}

/// Prices from the Yahoo Finance chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooPriceSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooPriceSource {
    pub fn new(timeout: Duration) -> Result<Self, PriceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: YAHOO_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    async fn latest_price(&self, ticker: &str) -> Result<f64, PriceError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1d",
            self.base_url.trim_end_matches('/'),
            ticker
        );
        debug!(%url, "requesting latest close");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PriceError::NotFound(ticker.to_string()));
        }
        if !status.is_success() {
            return Err(PriceError::Unavailable {
                ticker: ticker.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let json: Value = resp.json().await?;
        extract_latest_price(&json).ok_or_else(|| PriceError::NotFound(ticker.to_string()))
    }
}

/// Last non-null close from a chart response, falling back to the quoted market price.
pub fn extract_latest_price(json: &Value) -> Option<f64> {
    let result = json["chart"]["result"].as_array()?.first()?;

    let last_close = result["indicators"]["quote"]
        .as_array()
        .and_then(|quotes| quotes.first())
        .and_then(|quote| quote["close"].as_array())
        .and_then(|closes| closes.iter().rev().find_map(Value::as_f64));

    last_close.or_else(|| result["meta"]["regularMarketPrice"].as_f64())
}

/// Fixed prices, e.g. for offline runs from `{"INFY.NS": 1520.5}`.
#[derive(Debug, Clone, Default)]
pub struct StaticPrices {
    prices: HashMap<String, f64>,
}

impl StaticPrices {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            prices: load_json(path)?,
        })
    }

    pub fn with(mut self, ticker: impl Into<String>, price: f64) -> Self {
        self.prices.insert(ticker.into(), price);
        self
    }
}

impl FromIterator<(String, f64)> for StaticPrices {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PriceSource for StaticPrices {
    async fn latest_price(&self, ticker: &str) -> Result<f64, PriceError> {
        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| PriceError::NotFound(ticker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn takes_last_non_null_close() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": { "regularMarketPrice": 1530.0 },
                    "indicators": { "quote": [{ "close": [1500.5, 1512.25, null] }] }
                }],
                "error": null
            }
        });
        assert_eq!(extract_latest_price(&body), Some(1512.25));
    }

    #[test]
    fn falls_back_to_market_price_without_closes() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": { "regularMarketPrice": 2875.4 },
                    "indicators": { "quote": [{}] }
                }]
            }
        });
        assert_eq!(extract_latest_price(&body), Some(2875.4));
    }

    #[test]
    fn error_payload_has_no_price() {
        let body = json!({
            "chart": { "result": null, "error": { "code": "Not Found" } }
        });
        assert_eq!(extract_latest_price(&body), None);
    }

    #[tokio::test]
    async fn static_prices_report_unknown_ticker() {
        let prices = StaticPrices::default().with("ITC.NS", 431.2);
        assert_eq!(prices.latest_price("ITC.NS").await.unwrap(), 431.2);
        assert!(matches!(
            prices.latest_price("LT.NS").await,
            Err(PriceError::NotFound(t)) if t == "LT.NS"
        ));
    }
}
