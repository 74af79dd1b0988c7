use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single price lookup.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("no quote found for {0}")]
    NotFound(String),

    #[error("price provider unavailable for {ticker}: {reason}")]
    Unavailable { ticker: String, reason: String },

    #[error("non-positive price {price} quoted for {ticker}")]
    NonPositive { ticker: String, price: f64 },

    #[error("price lookup for {ticker} timed out after {timeout:?}")]
    Timeout { ticker: String, timeout: Duration },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FundamentalsError {
    #[error("no fundamentals found for {0}")]
    NotFound(String),

    #[error("fundamentals unavailable for {ticker}: {reason}")]
    Unavailable { ticker: String, reason: String },
}

/// Errors raised by the allocator before or while pricing the selection.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("cannot allocate across an empty set of scored tickers")]
    EmptyScoredSet,

    #[error("budget must be a positive amount, got {0}")]
    InvalidBudget(f64),

    #[error("top-n must select at least one ticker")]
    InvalidTopN,

    #[error("price unavailable for {ticker}: {source}")]
    PriceUnavailable {
        ticker: String,
        #[source]
        source: PriceError,
    },

    #[error("no price could be obtained for any of the {0} selected tickers")]
    NoPricedTickers(usize),
}

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read ticker file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write ticker file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ticker '{ticker}' on line {line}")]
    InvalidTicker { ticker: String, line: usize },

    #[error("ticker list at {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("ticker list download returned no symbols")]
    Empty,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to append to suggestion log '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors loading JSON configuration or data files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
