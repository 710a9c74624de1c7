//! Derived metrics and classification over snapshot rows.
//!
//! - `metrics` - per-row derivations (synthetic high/low, volume scale, volatility)
//! - `aggregates` - snapshot-wide means and totals, computed once per snapshot
//! - `classify` - signal, regime and volatility-level rules
//! - `filter` - change-range and signal-subset views
//! - `movers` - top gainers/losers, market-cap ordering, market summary
//! - `comparison` - single-coin insight against the market average
//! - `correlation` - Pearson matrix over the numeric columns

mod aggregates;
mod classify;
mod comparison;
mod correlation;
mod filter;
pub mod metrics;
mod movers;

pub(crate) use aggregates::out_of_range;
pub use aggregates::SnapshotAggregates;
pub use classify::{classify_regime, classify_signal, volatility_level};
pub use comparison::{CoinInsight, ComparisonMetric, ComparisonRow};
pub use correlation::{pearson, CorrelationField, CorrelationMatrix};
pub use filter::SnapshotFilter;
pub use movers::{by_market_cap, top_gainers, top_losers, MarketSummary, DEFAULT_TOP_MOVERS};
