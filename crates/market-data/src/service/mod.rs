//! The two read paths the dashboards depend on.
//!
//! - [`MarketSnapshotProvider`]: cached top-N market table with derived metrics
//! - [`CoinHistoryProvider`]: cached short price history per supported symbol

mod history_provider;
mod snapshot_provider;

pub use history_provider::CoinHistoryProvider;
pub use snapshot_provider::MarketSnapshotProvider;
