use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregates::SnapshotAggregates;
use crate::models::{CoinQuote, Currency, MarketRegime, Snapshot};

pub const DEFAULT_TOP_MOVERS: usize = 5;

/// The `n` biggest 24h gainers, highest change first. Ties keep snapshot order.
pub fn top_gainers(snapshot: &Snapshot, n: usize) -> Vec<&CoinQuote> {
    let mut rows: Vec<&CoinQuote> = snapshot.quotes.iter().collect();
    rows.sort_by_key(|q| Reverse(q.percent_change_24h));
    rows.truncate(n);
    rows
}

/// The `n` biggest 24h losers, lowest change first. Ties keep snapshot order.
pub fn top_losers(snapshot: &Snapshot, n: usize) -> Vec<&CoinQuote> {
    let mut rows: Vec<&CoinQuote> = snapshot.quotes.iter().collect();
    rows.sort_by_key(|q| q.percent_change_24h);
    rows.truncate(n);
    rows
}

/// Every row ordered by market cap, largest first.
pub fn by_market_cap(snapshot: &Snapshot) -> Vec<&CoinQuote> {
    let mut rows: Vec<&CoinQuote> = snapshot.quotes.iter().collect();
    rows.sort_by_key(|q| Reverse(q.market_cap));
    rows
}

/// Headline figures for the market view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub fetched_at: DateTime<Utc>,
    pub currency: Currency,
    pub regime: MarketRegime,
    pub aggregates: SnapshotAggregates,
    pub top_gainers: Vec<CoinQuote>,
    pub top_losers: Vec<CoinQuote>,
}

impl MarketSummary {
    pub fn from_snapshot(snapshot: &Snapshot, movers: usize) -> Self {
        Self {
            fetched_at: snapshot.fetched_at,
            currency: snapshot.currency.clone(),
            regime: snapshot.regime,
            aggregates: snapshot.aggregates.clone(),
            top_gainers: top_gainers(snapshot, movers).into_iter().cloned().collect(),
            top_losers: top_losers(snapshot, movers).into_iter().cloned().collect(),
        }
    }
}
