use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AllocationError, PriceError};
use crate::prices::PriceSource;
use crate::scorer::ScoredTicker;

pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// What to do when a selected ticker cannot be priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Drop the ticker and keep allocating the rest; its share stays unspent.
    #[default]
    Skip,
    /// Fail the whole allocation.
    Abort,
}

#[derive(Debug, Clone)]
pub struct AllocationConfig {
    pub top_n: usize,
    pub on_missing_price: PricePolicy,
    pub lookup_timeout: Option<Duration>,
    pub concurrent: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            on_missing_price: PricePolicy::default(),
            lookup_timeout: Some(DEFAULT_LOOKUP_TIMEOUT),
            concurrent: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentSuggestion {
    pub ticker: String,
    pub score: u32,
    pub price: f64,
    pub quantity: u64,
    pub total: f64,
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Highest-scoring `top_n` entries. The sort is stable, so ties keep input order.
pub fn select_top(scored: &[ScoredTicker], top_n: usize) -> Vec<&ScoredTicker> {
    let mut ranked: Vec<&ScoredTicker> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}

/// Whole units affordable with `share` at `price`, and their cost rounded to cents.
///
/// The cost is never rounded above `share`.
pub fn buy_quantity(share: f64, price: f64) -> (u64, f64) {
    let quantity = (share / price).floor() as u64;
    let raw = quantity as f64 * price;
    let mut total = round_cents(raw);
    if total > share {
        total = (raw.min(share) * 100.0).floor() / 100.0;
    }
    (quantity, total)
}

async fn lookup<P>(prices: &P, ticker: &str, timeout: Option<Duration>) -> Result<f64, PriceError>
where
    P: PriceSource + ?Sized,
{
    let price = match timeout {
        Some(limit) => tokio::time::timeout(limit, prices.latest_price(ticker))
            .await
            .map_err(|_| PriceError::Timeout {
                ticker: ticker.to_string(),
                timeout: limit,
            })??,
        None => prices.latest_price(ticker).await?,
    };

    if !price.is_finite() || price <= 0.0 {
        return Err(PriceError::NonPositive {
            ticker: ticker.to_string(),
            price,
        });
    }
    Ok(price)
}

/// Split `budget` evenly across the top-scoring tickers and convert each share
/// into a whole-unit purchase at the latest price.
///
/// Structural problems (non-positive budget, empty input, `top_n == 0`) fail
/// before any price is requested.
pub async fn allocate<P>(
    scored: &[ScoredTicker],
    budget: f64,
    config: &AllocationConfig,
    prices: &P,
) -> Result<Vec<InvestmentSuggestion>, AllocationError>
where
    P: PriceSource + ?Sized,
{
    if !budget.is_finite() || budget <= 0.0 {
        return Err(AllocationError::InvalidBudget(budget));
    }
    if scored.is_empty() {
        return Err(AllocationError::EmptyScoredSet);
    }
    if config.top_n == 0 {
        return Err(AllocationError::InvalidTopN);
    }

    let selected = select_top(scored, config.top_n);
    let per_ticker = budget / selected.len() as f64;
    info!(
        selected = selected.len(),
        budget, per_ticker, "allocating budget across top tickers"
    );

    let quotes: Vec<Result<f64, PriceError>> = if config.concurrent {
        join_all(
            selected
                .iter()
                .map(|entry| lookup(prices, &entry.ticker, config.lookup_timeout)),
        )
        .await
    } else {
        let mut quotes = Vec::with_capacity(selected.len());
        for entry in &selected {
            quotes.push(lookup(prices, &entry.ticker, config.lookup_timeout).await);
        }
        quotes
    };

    let mut suggestions = Vec::with_capacity(selected.len());
    for (entry, quote) in selected.iter().zip(quotes) {
        let price = match quote {
            Ok(price) => price,
            Err(source) => match config.on_missing_price {
                PricePolicy::Abort => {
                    return Err(AllocationError::PriceUnavailable {
                        ticker: entry.ticker.clone(),
                        source,
                    })
                }
                PricePolicy::Skip => {
                    warn!(ticker = %entry.ticker, error = %source, "skipping ticker: price unavailable");
                    continue;
                }
            },
        };

        let (quantity, total) = buy_quantity(per_ticker, price);
        if quantity == 0 {
            warn!(ticker = %entry.ticker, price, per_ticker, "share of budget buys no whole units");
        }
        suggestions.push(InvestmentSuggestion {
            ticker: entry.ticker.clone(),
            score: entry.score,
            price: round_cents(price),
            quantity,
            total,
        });
    }

    if suggestions.is_empty() {
        return Err(AllocationError::NoPricedTickers(selected.len()));
    }

    let spent: f64 = suggestions.iter().map(|s| s.total).sum();
    info!(spent = round_cents(spent), budget, "allocation complete");

    Ok(suggestions)
}
