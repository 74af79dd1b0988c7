//! Threshold-count scoring of fundamentals.

use serde::Serialize;
use tracing::{debug, warn};

use crate::fundamentals::{FundamentalMetrics, FundamentalsProvider};
use crate::thresholds::ThresholdTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTicker {
    pub ticker: String,
    pub score: u32,
    pub metrics: FundamentalMetrics,
}

/// Count the thresholds `metrics` passes. Metrics missing on either side are skipped.
pub fn count_passed(metrics: &FundamentalMetrics, thresholds: &ThresholdTable) -> u32 {
    thresholds
        .iter()
        .filter_map(|(metric, threshold)| {
            metrics
                .get(metric)
                .map(|value| metric.direction().passes(value, threshold))
        })
        .filter(|passed| *passed)
        .count() as u32
}

pub fn score(
    ticker: impl Into<String>,
    metrics: FundamentalMetrics,
    thresholds: &ThresholdTable,
) -> ScoredTicker {
    let score = count_passed(&metrics, thresholds);
    ScoredTicker {
        ticker: ticker.into(),
        score,
        metrics,
    }
}

/// Fetch and score every ticker in universe order.
///
/// A ticker whose fundamentals cannot be fetched is left out of the result and
/// logged; the rest of the universe is still scored.
pub async fn score_universe<P>(
    tickers: &[String],
    provider: &P,
    thresholds: &ThresholdTable,
) -> Vec<ScoredTicker>
where
    P: FundamentalsProvider + ?Sized,
{
    let mut scored = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        match provider.fundamentals(ticker).await {
            Ok(metrics) => {
                let entry = score(ticker.as_str(), metrics, thresholds);
                debug!(ticker = %entry.ticker, score = entry.score, "scored");
                scored.push(entry);
            }
            Err(e) => warn!(ticker = %ticker, error = %e, "skipping ticker: fundamentals unavailable"),
        }
    }
    scored
}
