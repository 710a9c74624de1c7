use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{CoinQuote, MarketSignal, Snapshot};

const DEFAULT_MIN_CHANGE: Decimal = dec!(-5);
const DEFAULT_MAX_CHANGE: Decimal = dec!(5);

/// User-selected view over a snapshot: an inclusive 24h change range and a
/// subset of signal labels.
///
/// `Default` mirrors the dashboard's initial state (-5%..=5%, every signal).
/// A missing bound is open. An inverted range matches nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFilter {
    pub min_change: Option<Decimal>,
    pub max_change: Option<Decimal>,
    pub signals: BTreeSet<MarketSignal>,
}

impl Default for SnapshotFilter {
    fn default() -> Self {
        Self {
            min_change: Some(DEFAULT_MIN_CHANGE),
            max_change: Some(DEFAULT_MAX_CHANGE),
            signals: MarketSignal::ALL.into_iter().collect(),
        }
    }
}

impl SnapshotFilter {
    /// A filter that lets every row through.
    pub fn unbounded() -> Self {
        Self {
            min_change: None,
            max_change: None,
            signals: MarketSignal::ALL.into_iter().collect(),
        }
    }

    pub fn with_change_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_change = min;
        self.max_change = max;
        self
    }

    pub fn with_signals(mut self, signals: impl IntoIterator<Item = MarketSignal>) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    pub fn matches(&self, quote: &CoinQuote) -> bool {
        let change = quote.percent_change_24h;
        self.min_change.map_or(true, |min| change >= min)
            && self.max_change.map_or(true, |max| change <= max)
            && self.signals.contains(&quote.market_signal)
    }

    /// Rows that pass the filter, in snapshot order.
    pub fn apply<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a CoinQuote> {
        snapshot.quotes.iter().filter(|q| self.matches(q)).collect()
    }
}
