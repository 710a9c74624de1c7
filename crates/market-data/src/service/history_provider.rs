use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tracing::warn;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::HistorySeries;
use crate::symbol_map::{normalize_symbol, SymbolMap};
use crate::upstream::{CoinGeckoClient, PriceHistorySource};

/// Serves short price histories for symbols listed in the [`SymbolMap`].
pub struct CoinHistoryProvider {
    source: Arc<dyn PriceHistorySource>,
    symbols: SymbolMap,
    cache: TtlCache<HistorySeries>,
    clock: Arc<dyn Clock>,
}

impl CoinHistoryProvider {
    pub fn new(
        source: Arc<dyn PriceHistorySource>,
        symbols: SymbolMap,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            symbols,
            cache: TtlCache::new(ttl, clock.clone()),
            clock,
        }
    }

    /// Production wiring: CoinGecko history and the wall clock.
    pub fn from_config(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        let source = Arc::new(CoinGeckoClient::new(config)?);
        Ok(Self::new(
            source,
            config.symbol_map.clone(),
            Arc::new(SystemClock),
            config.cache_ttl,
        ))
    }

    pub fn supports(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn symbol_map(&self) -> &SymbolMap {
        &self.symbols
    }

    /// History for `symbol`.
    ///
    /// Unmapped symbols fail with [`MarketDataError::SymbolUnsupported`]
    /// before any network call. Upstream failures are returned as
    /// [`MarketDataError::UpstreamUnavailable`] and not cached.
    pub async fn get_history(&self, symbol: &str) -> Result<Arc<HistorySeries>, MarketDataError> {
        let key = normalize_symbol(symbol);
        let coin_id = self
            .symbols
            .resolve(&key)
            .ok_or_else(|| MarketDataError::SymbolUnsupported(key.clone()))?
            .to_string();

        if let Some(series) = self.cache.get(&key) {
            return Ok(series);
        }

        debug!("No fresh history for {} ({}), fetching", key, coin_id);
        let points = self
            .source
            .fetch_price_history(&coin_id)
            .await
            .map_err(|e| {
                warn!("History fetch for {} from {} failed: {}", key, self.source.id(), e);
                e
            })?;

        let series = HistorySeries {
            symbol: key.clone(),
            coin_id,
            currency: self.source.currency().to_string(),
            days: self.source.days(),
            fetched_at: self.clock.now(),
            points,
        };
        Ok(self.cache.put(key, series))
    }
}
