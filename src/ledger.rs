use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::allocator::InvestmentSuggestion;
use crate::error::LedgerError;

pub const DEFAULT_LOG_PATH: &str = "investment_log.csv";

/// Append-only audit log of suggestions, one CSV row per suggestion and no header:
/// `ticker,score,price,quantity,total,date`.
#[derive(Debug, Clone)]
pub struct SuggestionLog {
    path: PathBuf,
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl SuggestionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_row(suggestion: &InvestmentSuggestion, date: NaiveDate) -> String {
        format!(
            "{},{},{:.2},{},{:.2},{}",
            csv_field(&suggestion.ticker),
            suggestion.score,
            suggestion.price,
            suggestion.quantity,
            suggestion.total,
            date.format("%Y-%m-%d")
        )
    }

    /// Append every suggestion stamped with `date`. Returns the number of rows written.
    pub fn append(
        &self,
        suggestions: &[InvestmentSuggestion],
        date: NaiveDate,
    ) -> Result<usize, LedgerError> {
        let io_err = |source: std::io::Error| LedgerError::Io {
            path: self.path.clone(),
            source,
        };

        let mut body = String::new();
        for suggestion in suggestions {
            body.push_str(&Self::format_row(suggestion, date));
            body.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(body.as_bytes()).map_err(io_err)?;

        info!(rows = suggestions.len(), path = %self.path.display(), "suggestion log updated");
        Ok(suggestions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn suggestion(ticker: &str, quantity: u64, price: f64) -> InvestmentSuggestion {
        InvestmentSuggestion {
            ticker: ticker.to_string(),
            score: 6,
            price,
            quantity,
            total: quantity as f64 * price,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn row_has_fixed_column_order() {
        let row = SuggestionLog::format_row(&suggestion("INFY.NS", 16, 100.0), date());
        assert_eq!(row, "INFY.NS,6,100.00,16,1600.00,2026-10-16");
    }

    #[test]
    fn odd_tickers_are_quoted() {
        let row = SuggestionLog::format_row(&suggestion("A,B", 1, 2.5), date());
        assert!(row.starts_with("\"A,B\",6,2.50,"));
    }

    #[test]
    fn appends_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = SuggestionLog::new(dir.path().join("investment_log.csv"));

        log.append(&[suggestion("TCS.NS", 1, 3900.5)], date()).unwrap();
        let written = log
            .append(&[suggestion("ITC.NS", 10, 430.0), suggestion("LT.NS", 2, 3500.0)], date())
            .unwrap();
        assert_eq!(written, 2);

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "TCS.NS,6,3900.50,1,3900.50,2026-10-16",
                "ITC.NS,6,430.00,10,4300.00,2026-10-16",
                "LT.NS,6,3500.00,2,7000.00,2026-10-16",
            ]
        );
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let log = SuggestionLog::new(dir.path().join("missing").join("log.csv"));
        let err = log.append(&[suggestion("ITC.NS", 1, 1.0)], date()).unwrap_err();
        assert!(err.to_string().contains("log.csv"));
    }
}
