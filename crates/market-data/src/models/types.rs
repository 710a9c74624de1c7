/// Quote currency code (ISO 4217), e.g. "INR"
pub type Currency = String;

/// Upper-cased ticker symbol, e.g. "BTC"
pub type Symbol = String;

/// Identifier of a coin in the history API, e.g. "bitcoin"
pub type CoinId = String;
