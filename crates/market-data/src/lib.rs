//! Coinpulse Market Data Crate
//!
//! Fetches cryptocurrency listings and price histories from public APIs,
//! derives the metrics the market and single-coin dashboards display, and
//! caches results for a fixed time-to-live.
//!
//! # Architecture
//!
//! ```text
//! +---------------------------+     +---------------------------+
//! |  MarketSnapshotProvider   |     |   CoinHistoryProvider     |
//! +---------------------------+     +---------------------------+
//!        |            |                  |        |         |
//!        v            v                  v        v         v
//! +-----------+  +-----------+    +-----------+ +-----------+ +-----------+
//! | TtlCache  |  | Listings- |    | SymbolMap | | TtlCache  | | PriceHist-|
//! |           |  | Source    |    |           | |           | | orySource |
//! +-----------+  +-----------+    +-----------+ +-----------+ +-----------+
//!                     |                                             |
//!                     v                                             v
//!             CoinMarketCapClient                             CoinGeckoClient
//!                     |
//!                     v
//!     Snapshot::from_listings (aggregates -> per-row derive -> regime)
//! ```
//!
//! # Core Types
//!
//! - [`Snapshot`] - Immutable market table with aggregates and regime
//! - [`CoinQuote`] - One snapshot row with derived metrics and signal
//! - [`HistorySeries`] - Ascending price history for one coin
//! - [`SnapshotFilter`] - Change-range and signal-subset view
//! - [`MarketDataError`] - Upstream, unsupported-symbol and degenerate failures

pub mod analytics;
pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod service;
pub mod symbol_map;
pub mod upstream;

pub use analytics::{
    CoinInsight, ComparisonMetric, ComparisonRow, CorrelationField, CorrelationMatrix,
    MarketSummary, SnapshotAggregates, SnapshotFilter,
};
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use config::MarketDataConfig;
pub use errors::{MarketDataError, RetryClass};
pub use models::{
    CoinQuote, HistoryPoint, HistorySeries, ListingQuote, MarketRegime, MarketSignal, Snapshot,
    VolatilityLevel,
};
pub use service::{CoinHistoryProvider, MarketSnapshotProvider};
pub use symbol_map::SymbolMap;
pub use upstream::{CoinGeckoClient, CoinMarketCapClient, ListingsSource, PriceHistorySource};
