//! Ticker symbol to history-API coin id lookup.
//!
//! Ships with the coins the dashboards have always supported and can be
//! extended from a JSON object file (`{"SYMBOL": "coin-id"}`).

use std::collections::BTreeMap;
use std::path::Path;

use lazy_static::lazy_static;

use crate::errors::MarketDataError;
use crate::models::{CoinId, Symbol};

lazy_static! {
    static ref DEFAULT_ENTRIES: BTreeMap<Symbol, CoinId> = [
        ("BTC", "bitcoin"),
        ("ETH", "ethereum"),
        ("BNB", "binancecoin"),
        ("SOL", "solana"),
        ("XRP", "ripple"),
        ("ADA", "cardano"),
        ("DOGE", "dogecoin"),
    ]
    .into_iter()
    .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
    .collect();
}

/// Static configuration: entries never change while providers are running.
/// Symbols are stored upper-cased and looked up case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolMap {
    entries: BTreeMap<Symbol, CoinId>,
}

impl Default for SymbolMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES.clone(),
        }
    }
}

impl SymbolMap {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_pairs<S, I>(pairs: impl IntoIterator<Item = (S, I)>) -> Self
    where
        S: AsRef<str>,
        I: Into<String>,
    {
        let mut map = Self::empty();
        map.extend(pairs);
        map
    }

    /// Parse a JSON object of `symbol -> coin id`.
    pub fn from_json_str(json: &str) -> Result<Self, MarketDataError> {
        let pairs: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|e| MarketDataError::Config(format!("Invalid symbol map JSON: {}", e)))?;
        Ok(Self::from_pairs(pairs))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MarketDataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MarketDataError::Config(format!(
                "Failed to read symbol map {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Add or override entries. Blank symbols or ids are ignored.
    pub fn extend<S, I>(&mut self, pairs: impl IntoIterator<Item = (S, I)>)
    where
        S: AsRef<str>,
        I: Into<String>,
    {
        for (symbol, id) in pairs {
            let symbol = normalize_symbol(symbol.as_ref());
            let id: String = id.into();
            let id = id.trim();
            if symbol.is_empty() || id.is_empty() {
                continue;
            }
            self.entries.insert(symbol, id.to_string());
        }
    }

    /// Entries of `other` win over existing ones.
    pub fn merge(&mut self, other: SymbolMap) {
        self.entries.extend(other.entries);
    }

    pub fn resolve(&self, symbol: &str) -> Option<&str> {
        self.entries
            .get(&normalize_symbol(symbol))
            .map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.resolve(symbol).is_some()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn normalize_symbol(symbol: &str) -> Symbol {
    symbol.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_entries() {
        let map = SymbolMap::default();
        assert_eq!(map.len(), 7);
        assert_eq!(map.resolve("BTC"), Some("bitcoin"));
        assert_eq!(map.resolve("bnb"), Some("binancecoin"));
        assert_eq!(map.resolve(" doge "), Some("dogecoin"));
        assert_eq!(map.resolve("PEPE"), None);
    }

    #[test]
    fn test_extend_overrides_and_skips_blanks() {
        let mut map = SymbolMap::default();
        map.extend([("dot", "polkadot"), ("BTC", "wrapped-bitcoin"), ("", "x"), ("LTC", " ")]);

        assert_eq!(map.resolve("DOT"), Some("polkadot"));
        assert_eq!(map.resolve("BTC"), Some("wrapped-bitcoin"));
        assert!(!map.contains("LTC"));
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn test_from_json_str() {
        let map = SymbolMap::from_json_str(r#"{"avax": "avalanche-2", "LINK": "chainlink"}"#)
            .unwrap();
        assert_eq!(map.symbols().collect::<Vec<_>>(), vec!["AVAX", "LINK"]);

        let err = SymbolMap::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, MarketDataError::Config(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"MATIC": "matic-network"}}"#).unwrap();

        let map = SymbolMap::from_json_file(file.path()).unwrap();
        assert_eq!(map.resolve("matic"), Some("matic-network"));

        let err = SymbolMap::from_json_file("/nonexistent/symbols.json").unwrap_err();
        assert!(matches!(err, MarketDataError::Config(_)));
    }
}
