//! The set of tickers to score: a built-in NSE list, a ticker file, or a fresh
//! download of the NSE equity list.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::error::UniverseError;

pub const NSE_EQUITY_LIST_URL: &str = "https://archives.nseindia.com/content/equities/EQUITY_L.csv";
pub const NSE_SUFFIX: &str = ".NS";

pub const DEFAULT_TICKERS: &[&str] = &[
    "RELIANCE.NS",
    "INFY.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "ITC.NS",
    "LT.NS",
    "ASIANPAINT.NS",
    "MARUTI.NS",
    "ULTRACEMCO.NS",
    "NESTLEIND.NS",
];

// NSE symbols may carry '&' and '-' (e.g. M&M, BAJAJ-AUTO).
static TICKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9&\-]*(\.[A-Z]{1,3})?$").expect("valid ticker regex"));

pub fn is_valid_ticker(ticker: &str) -> bool {
    TICKER_RE.is_match(ticker)
}

pub fn default_universe() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

/// Parse a ticker file: one ticker per line, blank lines and `#` comments skipped.
/// Tickers are upper-cased and de-duplicated keeping first occurrence.
pub fn parse_tickers(contents: &str) -> Result<Vec<String>, UniverseError> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let ticker = line.to_ascii_uppercase();
        if !is_valid_ticker(&ticker) {
            return Err(UniverseError::InvalidTicker {
                ticker: line.to_string(),
                line: idx + 1,
            });
        }
        if seen.insert(ticker.clone()) {
            tickers.push(ticker);
        }
    }

    Ok(tickers)
}

pub fn load_tickers(path: impl AsRef<Path>) -> Result<Vec<String>, UniverseError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| UniverseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tickers(&contents)
}

pub fn save_tickers(path: impl AsRef<Path>, tickers: &[String]) -> Result<(), UniverseError> {
    let path = path.as_ref();
    let mut body = tickers.join("\n");
    body.push('\n');
    fs::write(path, body).map_err(|source| UniverseError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Turn the NSE equity list CSV into `.NS` tickers. The header row is skipped
/// and the first column is taken as the symbol.
pub fn parse_equity_list(csv: &str) -> Vec<String> {
    csv.lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .map(|symbol| symbol.trim().trim_matches('"').to_ascii_uppercase())
        .filter(|symbol| !symbol.is_empty())
        .map(|symbol| format!("{}{}", symbol, NSE_SUFFIX))
        .filter(|ticker| {
            let ok = is_valid_ticker(ticker);
            if !ok {
                warn!(%ticker, "dropping malformed symbol from equity list");
            }
            ok
        })
        .collect()
}

pub async fn fetch_nse_tickers(url: &str, timeout: Duration) -> Result<Vec<String>, UniverseError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("Mozilla/5.0 (X11; Linux x86_64) smart-picker/0.1")
        .build()?;

    info!(%url, "downloading NSE equity list");
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(UniverseError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let tickers = parse_equity_list(&resp.text().await?);
    if tickers.is_empty() {
        return Err(UniverseError::Empty);
    }
    info!(count = tickers.len(), "fetched NSE tickers");
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_is_valid() {
        let universe = default_universe();
        assert_eq!(universe.len(), 10);
        assert!(universe.iter().all(|t| is_valid_ticker(t)));
    }

    #[test]
    fn ticker_file_skips_comments_and_duplicates() {
        let contents = "# watchlist\ninfy.ns\n\nTCS.NS\nINFY.NS\n  M&M.NS  \n";
        let tickers = parse_tickers(contents).unwrap();
        assert_eq!(tickers, vec!["INFY.NS", "TCS.NS", "M&M.NS"]);
    }

    #[test]
    fn ticker_file_reports_bad_line() {
        let err = parse_tickers("INFY.NS\nnot a ticker\n").unwrap_err();
        match err {
            UniverseError::InvalidTicker { ticker, line } => {
                assert_eq!(ticker, "not a ticker");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn equity_list_skips_header_and_adds_suffix() {
        let csv = "SYMBOL,NAME OF COMPANY, SERIES\n\
                   20MICRONS,20 Microns Limited,EQ\n\
                   BAJAJ-AUTO,Bajaj Auto Limited,EQ\n\
                   M&M,Mahindra & Mahindra Limited,EQ\n";
        assert_eq!(
            parse_equity_list(csv),
            vec!["20MICRONS.NS", "BAJAJ-AUTO.NS", "M&M.NS"]
        );
    }

    #[test]
    fn saved_tickers_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nse_tickers.txt");
        let tickers = default_universe();

        save_tickers(&path, &tickers).unwrap();
        assert_eq!(load_tickers(&path).unwrap(), tickers);
    }
}
