//! Upstream market-data APIs.
//!
//! - [`ListingsSource`] / [`PriceHistorySource`]: the traits providers depend on
//! - [`CoinMarketCapClient`]: top-N listings with per-currency quotes
//! - [`CoinGeckoClient`]: short price histories by coin id

pub mod coingecko;
pub mod coinmarketcap;
mod http;
#[cfg(test)]
mod stub_server;
mod traits;

pub use coingecko::CoinGeckoClient;
pub use coinmarketcap::CoinMarketCapClient;
pub use traits::{ListingsSource, PriceHistorySource};
