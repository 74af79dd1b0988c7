pub mod allocator;
pub mod config;
pub mod error;
pub mod fundamentals;
pub mod ledger;
pub mod logger;
pub mod prices;
pub mod scorer;
pub mod thresholds;
pub mod universe;

pub use allocator::{allocate, AllocationConfig, InvestmentSuggestion, PricePolicy};
pub use error::{
    AllocationError, ConfigError, FundamentalsError, LedgerError, PriceError, UniverseError,
};
pub use fundamentals::{
    FundamentalMetrics, FundamentalsProvider, JsonFundamentals, Metric, SimulatedFundamentals,
};
pub use ledger::SuggestionLog;
pub use prices::{PriceSource, StaticPrices, YahooPriceSource};
pub use scorer::{count_passed, score, score_universe, ScoredTicker};
pub use thresholds::{Direction, ThresholdTable};
