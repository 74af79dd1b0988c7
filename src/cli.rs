//! Command-line arguments.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `suggest` | Score the universe and suggest this month's purchases |
//! | `fetch-tickers` | Download the NSE equity list into a ticker file |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use smart_picker::allocator::{DEFAULT_TOP_N, PricePolicy};
use smart_picker::ledger::DEFAULT_LOG_PATH;
use smart_picker::universe::NSE_EQUITY_LIST_URL;

/// Pick fundamentally strong stocks to invest in every month.
#[derive(Debug, Parser)]
#[command(name = "smart-picker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score tickers and suggest how to split the monthly budget.
    Suggest(SuggestArgs),
    /// Download NSE ticker symbols to a file.
    FetchTickers(FetchTickersArgs),
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// Monthly investment amount.
    #[arg(long, default_value_t = 5000.0)]
    pub budget: f64,

    /// Number of top-scoring tickers to buy.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// What to do when a selected ticker has no usable price.
    #[arg(long, value_enum, default_value_t = MissingPrice::Skip)]
    pub on_missing_price: MissingPrice,

    /// Look prices up one after another instead of concurrently.
    #[arg(long)]
    pub sequential: bool,

    /// Per-lookup timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub price_timeout_secs: u64,

    /// JSON threshold table, e.g. {"ROE": 15, "DebtEquity": 0.5}.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Ticker file, one per line. Defaults to the built-in NSE list.
    #[arg(long)]
    pub tickers: Option<PathBuf>,

    /// JSON fundamentals per ticker. Defaults to simulated values.
    #[arg(long)]
    pub fundamentals: Option<PathBuf>,

    /// JSON prices per ticker instead of live Yahoo quotes.
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// Suggestion log to append to.
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,

    /// Do not append to the suggestion log.
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Debug, Args)]
pub struct FetchTickersArgs {
    #[arg(long, default_value = "nse_tickers.txt")]
    pub output: PathBuf,

    #[arg(long, default_value = NSE_EQUITY_LIST_URL)]
    pub url: String,

    /// Download timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingPrice {
    Skip,
    Abort,
}

impl From<MissingPrice> for PricePolicy {
    fn from(value: MissingPrice) -> Self {
        match value {
            MissingPrice::Skip => PricePolicy::Skip,
            MissingPrice::Abort => PricePolicy::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_defaults() {
        let cli = Cli::try_parse_from(["smart-picker", "suggest"]).unwrap();
        let Command::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.budget, 5000.0);
        assert_eq!(args.top_n, 3);
        assert_eq!(args.on_missing_price, MissingPrice::Skip);
        assert_eq!(args.log, PathBuf::from("investment_log.csv"));
        assert!(!args.sequential && !args.no_log);
    }

    #[test]
    fn abort_policy_flag() {
        let cli = Cli::try_parse_from([
            "smart-picker",
            "suggest",
            "--budget",
            "12000",
            "--on-missing-price",
            "abort",
        ])
        .unwrap();
        let Command::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.budget, 12000.0);
        assert_eq!(PricePolicy::from(args.on_missing_price), PricePolicy::Abort);
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
