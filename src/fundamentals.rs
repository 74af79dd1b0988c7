//! Fundamental metrics and the providers that supply them.
//!
//! Providers:
//! - `SimulatedFundamentals`: the same fabricated ratios for every ticker
//! - `JsonFundamentals`: per-ticker ratios loaded from a JSON file

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::load_json;
use crate::error::{ConfigError, FundamentalsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "ROE")]
    Roe,
    #[serde(rename = "ROCE")]
    Roce,
    DebtEquity,
    CurrentRatio,
    ProfitGrowth,
    SalesGrowth,
    #[serde(rename = "PE")]
    Pe,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Roe,
        Metric::Roce,
        Metric::DebtEquity,
        Metric::CurrentRatio,
        Metric::ProfitGrowth,
        Metric::SalesGrowth,
        Metric::Pe,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Metric::Roe => "ROE",
            Metric::Roce => "ROCE",
            Metric::DebtEquity => "DebtEquity",
            Metric::CurrentRatio => "CurrentRatio",
            Metric::ProfitGrowth => "ProfitGrowth",
            Metric::SalesGrowth => "SalesGrowth",
            Metric::Pe => "PE",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

/// A ticker's fundamental ratios keyed by metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    values: HashMap<Metric, f64>,
}

impl FundamentalMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from raw metric names, dropping names that are not a known metric.
    pub fn from_named<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut values = HashMap::new();
        for (name, value) in entries {
            match name.parse::<Metric>() {
                Ok(metric) => {
                    values.insert(metric, value);
                }
                Err(_) => debug!(metric = name, "ignoring unknown fundamental metric"),
            }
        }
        Self { values }
    }
}

impl FromIterator<(Metric, f64)> for FundamentalMetrics {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fundamentals(&self, ticker: &str) -> Result<FundamentalMetrics, FundamentalsError>;
}

/// Returns the same fabricated ratios for every ticker until a real feed is plugged in.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFundamentals;

impl SimulatedFundamentals {
    pub fn sample() -> FundamentalMetrics {
        FundamentalMetrics::new()
            .with(Metric::Roe, 18.0)
            .with(Metric::Roce, 17.0)
            .with(Metric::DebtEquity, 0.3)
            .with(Metric::CurrentRatio, 2.0)
            .with(Metric::ProfitGrowth, 20.0)
            .with(Metric::SalesGrowth, 12.0)
            .with(Metric::Pe, 22.0)
    }
}

#[async_trait]
impl FundamentalsProvider for SimulatedFundamentals {
    async fn fundamentals(&self, ticker: &str) -> Result<FundamentalMetrics, FundamentalsError> {
        if ticker.trim().is_empty() {
            return Err(FundamentalsError::NotFound(ticker.to_string()));
        }
        Ok(Self::sample())
    }
}

/// Fundamentals read from a file shaped `{"TICKER": {"ROE": 18.0, ...}}`.
#[derive(Debug, Clone, Default)]
pub struct JsonFundamentals {
    by_ticker: HashMap<String, FundamentalMetrics>,
}

impl JsonFundamentals {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw: HashMap<String, HashMap<String, f64>> = load_json(path)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: HashMap<String, HashMap<String, f64>>) -> Self {
        let by_ticker = raw
            .into_iter()
            .map(|(ticker, metrics)| {
                let metrics =
                    FundamentalMetrics::from_named(metrics.iter().map(|(k, v)| (k.as_str(), *v)));
                (ticker, metrics)
            })
            .collect();
        Self { by_ticker }
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.by_ticker.keys().map(String::as_str)
    }
}

#[async_trait]
impl FundamentalsProvider for JsonFundamentals {
    async fn fundamentals(&self, ticker: &str) -> Result<FundamentalMetrics, FundamentalsError> {
        self.by_ticker
            .get(ticker)
            .cloned()
            .ok_or_else(|| FundamentalsError::NotFound(ticker.to_string()))
    }
}
