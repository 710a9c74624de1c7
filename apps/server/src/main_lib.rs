use std::sync::Arc;

use coinpulse_market_data::{CoinHistoryProvider, MarketSnapshotProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub snapshot_provider: Arc<MarketSnapshotProvider>,
    pub history_provider: Arc<CoinHistoryProvider>,
}

impl AppState {
    pub fn new(
        snapshot_provider: Arc<MarketSnapshotProvider>,
        history_provider: Arc<CoinHistoryProvider>,
    ) -> Self {
        Self {
            snapshot_provider,
            history_provider,
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("COINPULSE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let md = &config.market_data;
    tracing::info!(
        "Market data: top {} in {}, {}-day history for {} symbols, cache TTL {:?}",
        md.page_size,
        md.currency,
        md.history_days,
        md.symbol_map.len(),
        md.cache_ttl
    );
    let snapshot_provider = Arc::new(MarketSnapshotProvider::from_config(md)?);
    let history_provider = Arc::new(CoinHistoryProvider::from_config(md)?);
    Ok(Arc::new(AppState::new(snapshot_provider, history_provider)))
}
