use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tracing::{info, warn};

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::Snapshot;
use crate::upstream::{CoinMarketCapClient, ListingsSource};

/// Serves market snapshots, going to the listings upstream at most once per
/// TTL window.
pub struct MarketSnapshotProvider {
    source: Arc<dyn ListingsSource>,
    cache: TtlCache<Snapshot>,
    clock: Arc<dyn Clock>,
}

impl MarketSnapshotProvider {
    pub fn new(source: Arc<dyn ListingsSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl, clock.clone()),
            clock,
        }
    }

    /// Production wiring: CoinMarketCap listings and the wall clock.
    pub fn from_config(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        let source = Arc::new(CoinMarketCapClient::new(config)?);
        Ok(Self::new(source, Arc::new(SystemClock), config.cache_ttl))
    }

    /// Cached snapshot if younger than the TTL, otherwise one upstream
    /// request. Failures and empty listings are returned, never cached.
    pub async fn get_snapshot(&self) -> Result<Arc<Snapshot>, MarketDataError> {
        let key = self.source.request_key();
        if let Some(snapshot) = self.cache.get(&key) {
            return Ok(snapshot);
        }

        debug!("No fresh snapshot for {}, fetching", key);
        let listings = self.source.fetch_listings().await.map_err(|e| {
            warn!("Listings fetch from {} failed: {}", self.source.id(), e);
            e
        })?;

        let snapshot = Snapshot::from_listings(listings, self.source.currency(), self.clock.now())
            .map_err(|e| {
                warn!("Unusable listings from {}: {}", self.source.id(), e);
                e
            })?;

        info!(
            "Built snapshot of {} coins ({})",
            snapshot.len(),
            snapshot.regime
        );
        Ok(self.cache.put(key, snapshot))
    }
}
