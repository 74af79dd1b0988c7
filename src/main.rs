use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use smart_picker::allocator::{allocate, AllocationConfig, InvestmentSuggestion};
use smart_picker::fundamentals::{FundamentalsProvider, JsonFundamentals, SimulatedFundamentals};
use smart_picker::ledger::SuggestionLog;
use smart_picker::logger::setup_logger;
use smart_picker::prices::{PriceSource, StaticPrices, YahooPriceSource};
use smart_picker::scorer::{score_universe, ScoredTicker};
use smart_picker::thresholds::ThresholdTable;
use smart_picker::universe::{default_universe, fetch_nse_tickers, load_tickers, save_tickers};

mod cli;

use cli::{Cli, Command, FetchTickersArgs, SuggestArgs};

fn print_scores(scored: &[ScoredTicker]) {
    let mut ranked: Vec<&ScoredTicker> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    println!("Stock Scores");
    println!("{:<16} {:>5}", "Ticker", "Score");
    for entry in ranked {
        println!("{:<16} {:>5}", entry.ticker, entry.score);
    }
    println!();
}

fn print_suggestions(suggestions: &[InvestmentSuggestion], budget: f64) {
    println!("Suggested Investments");
    println!(
        "{:<16} {:>5} {:>12} {:>8} {:>12}",
        "Ticker", "Score", "Price", "Buy Qty", "Total"
    );
    for s in suggestions {
        println!(
            "{:<16} {:>5} {:>12.2} {:>8} {:>12.2}",
            s.ticker, s.score, s.price, s.quantity, s.total
        );
    }
    let spent: f64 = suggestions.iter().map(|s| s.total).sum();
    println!("Spent {:.2} of {:.2} ({:.2} remaining)", spent, budget, budget - spent);
}

async fn suggest(args: SuggestArgs) -> Result<()> {
    let thresholds = match &args.thresholds {
        Some(path) => ThresholdTable::load(path).context("loading threshold table")?,
        None => ThresholdTable::default(),
    };

    let tickers = match &args.tickers {
        Some(path) => load_tickers(path).context("loading ticker universe")?,
        None => default_universe(),
    };

    let fundamentals: Box<dyn FundamentalsProvider> = match &args.fundamentals {
        Some(path) => Box::new(JsonFundamentals::load(path).context("loading fundamentals")?),
        None => Box::new(SimulatedFundamentals),
    };

    let timeout = Duration::from_secs(args.price_timeout_secs);
    let prices: Box<dyn PriceSource> = match &args.prices {
        Some(path) => Box::new(StaticPrices::load(path).context("loading prices")?),
        None => Box::new(YahooPriceSource::new(timeout).context("building price client")?),
    };

    info!(tickers = tickers.len(), "scoring universe");
    let scored = score_universe(&tickers, fundamentals.as_ref(), &thresholds).await;
    print_scores(&scored);

    let config = AllocationConfig {
        top_n: args.top_n,
        on_missing_price: args.on_missing_price.into(),
        lookup_timeout: Some(timeout),
        concurrent: !args.sequential,
    };
    let suggestions = allocate(&scored, args.budget, &config, prices.as_ref())
        .await
        .context("allocating budget")?;
    print_suggestions(&suggestions, args.budget);

    if !args.no_log {
        let log = SuggestionLog::new(&args.log);
        log.append(&suggestions, chrono::Local::now().date_naive())?;
        println!("Investment log updated in '{}'", log.path().display());
    }

    Ok(())
}

async fn fetch_tickers(args: FetchTickersArgs) -> Result<()> {
    let tickers = fetch_nse_tickers(&args.url, Duration::from_secs(args.timeout_secs))
        .await
        .context("fetching NSE ticker list")?;
    save_tickers(&args.output, &tickers)?;
    println!("Saved {} NSE tickers to '{}'", tickers.len(), args.output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger();
    let cli = Cli::parse();

    match cli.command {
        Command::Suggest(args) => suggest(args).await,
        Command::FetchTickers(args) => fetch_tickers(args).await,
    }
}
