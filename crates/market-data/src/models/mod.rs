//! Market data models
//!
//! - `types` - Type aliases for common identifiers (Currency, Symbol, CoinId)
//! - `quote` - Raw listings (ListingQuote) and derived snapshot rows (CoinQuote)
//! - `signal` - Classification labels (MarketSignal, MarketRegime, VolatilityLevel)
//! - `snapshot` - The immutable market table (Snapshot)
//! - `history` - Single-coin price history (HistoryPoint, HistorySeries)

mod history;
mod quote;
mod signal;
mod snapshot;
mod types;

pub use history::{HistoryPoint, HistorySeries};
pub use quote::{CoinQuote, ListingQuote};
pub use signal::{MarketRegime, MarketSignal, VolatilityLevel};
pub use snapshot::Snapshot;
pub use types::{CoinId, Currency, Symbol};
