//! Pipeline configuration.
//!
//! Credentials and endpoints come from the environment; nothing sensitive is
//! compiled in. Unparsable numeric values fall back to their defaults.

use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::errors::MarketDataError;
use crate::symbol_map::SymbolMap;

pub const DEFAULT_LISTINGS_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
pub const DEFAULT_HISTORY_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_PAGE_START: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_HISTORY_DAYS: u32 = 3;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

pub const ENV_API_KEY: &str = "COINPULSE_CMC_API_KEY";
pub const ENV_LISTINGS_URL: &str = "COINPULSE_CMC_URL";
pub const ENV_HISTORY_URL: &str = "COINPULSE_HISTORY_URL";
pub const ENV_CURRENCY: &str = "COINPULSE_CURRENCY";
pub const ENV_PAGE_SIZE: &str = "COINPULSE_PAGE_SIZE";
pub const ENV_HISTORY_DAYS: &str = "COINPULSE_HISTORY_DAYS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "COINPULSE_HTTP_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "COINPULSE_CACHE_TTL_SECS";
pub const ENV_SYMBOL_MAP_FILE: &str = "COINPULSE_SYMBOL_MAP_FILE";

#[derive(Clone, Debug)]
pub struct MarketDataConfig {
    pub listings_url: String,
    pub api_key: String,
    pub history_url: String,
    /// Quote currency code, upper-case (e.g. "INR").
    pub currency: String,
    pub page_start: u32,
    pub page_size: u32,
    pub history_days: u32,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub symbol_map: SymbolMap,
}

impl MarketDataConfig {
    /// Defaults for everything except the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            listings_url: DEFAULT_LISTINGS_URL.to_string(),
            api_key: api_key.into(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            page_start: DEFAULT_PAGE_START,
            page_size: DEFAULT_PAGE_SIZE,
            history_days: DEFAULT_HISTORY_DAYS,
            request_timeout: DEFAULT_HTTP_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            symbol_map: SymbolMap::default(),
        }
    }

    pub fn from_env() -> Result<Self, MarketDataError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MarketDataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY)
            .ok_or_else(|| MarketDataError::Config(format!("{} is not set", ENV_API_KEY)))?;
        let mut config = Self::new(api_key);

        if let Some(url) = get(ENV_LISTINGS_URL) {
            config.listings_url = url;
        }
        if let Some(url) = get(ENV_HISTORY_URL) {
            config.history_url = url.trim_end_matches('/').to_string();
        }
        if let Some(currency) = get(ENV_CURRENCY) {
            config.currency = currency.to_ascii_uppercase();
        }
        config.page_size = parse_or(ENV_PAGE_SIZE, get(ENV_PAGE_SIZE), DEFAULT_PAGE_SIZE);
        config.history_days =
            parse_or(ENV_HISTORY_DAYS, get(ENV_HISTORY_DAYS), DEFAULT_HISTORY_DAYS);
        config.request_timeout = Duration::from_secs(parse_or(
            ENV_HTTP_TIMEOUT_SECS,
            get(ENV_HTTP_TIMEOUT_SECS),
            DEFAULT_HTTP_TIMEOUT.as_secs(),
        ));
        config.cache_ttl = Duration::from_secs(parse_or(
            ENV_CACHE_TTL_SECS,
            get(ENV_CACHE_TTL_SECS),
            DEFAULT_CACHE_TTL.as_secs(),
        ));

        if let Some(path) = get(ENV_SYMBOL_MAP_FILE) {
            let extra = SymbolMap::from_json_file(PathBuf::from(path))?;
            config.symbol_map.merge(extra);
        }

        Ok(config)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + PartialOrd + Default,
{
    match raw {
        None => default,
        Some(raw) => match raw.parse::<T>() {
            Ok(v) if v > T::default() => v,
            _ => {
                warn!("Ignoring invalid value {:?} for {}, using default", raw, key);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = MarketDataConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, MarketDataError::Config(_)));

        let err = MarketDataConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap_err();
        assert!(matches!(err, MarketDataError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config = MarketDataConfig::from_lookup(lookup(&[(ENV_API_KEY, "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.listings_url, DEFAULT_LISTINGS_URL);
        assert_eq!(config.currency, "INR");
        assert_eq!(config.page_start, 1);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.history_days, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.symbol_map, SymbolMap::default());
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = MarketDataConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "k"),
            (ENV_CURRENCY, "usd"),
            (ENV_HISTORY_URL, "http://localhost:9000/api/"),
            (ENV_PAGE_SIZE, "20"),
            (ENV_HISTORY_DAYS, "seven"),
            (ENV_HTTP_TIMEOUT_SECS, "0"),
            (ENV_CACHE_TTL_SECS, "60"),
        ]))
        .unwrap();

        assert_eq!(config.currency, "USD");
        assert_eq!(config.history_url, "http://localhost:9000/api");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.history_days, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_symbol_map_file_extends_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dot": "polkadot"}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = MarketDataConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "k"),
            (ENV_SYMBOL_MAP_FILE, path.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.symbol_map.resolve("DOT"), Some("polkadot"));
        assert_eq!(config.symbol_map.resolve("BTC"), Some("bitcoin"));
    }
}
