//! Rule-based signal, regime and volatility classifiers.
//!
//! All classifiers are total, pure functions of their inputs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{MarketRegime, MarketSignal, VolatilityLevel};

const BULLISH_MIN_CHANGE: Decimal = dec!(2);
const BEARISH_MAX_CHANGE: Decimal = dec!(-2);
const BEARISH_MIN_VOLATILITY: Decimal = dec!(10);

const BULL_MARKET_MIN_CHANGE: Decimal = dec!(1);
const BULL_MARKET_MAX_VOLATILITY: Decimal = dec!(8);
const BEAR_MARKET_MAX_CHANGE: Decimal = dec!(-1);
const BEAR_MARKET_MIN_VOLATILITY: Decimal = dec!(10);

const LOW_VOLATILITY_BELOW: Decimal = dec!(2);
const MEDIUM_VOLATILITY_BELOW: Decimal = dec!(5);

/// Classify one coin against the snapshot it belongs to.
///
/// Bullish is checked before Bearish; anything else is Neutral.
pub fn classify_signal(
    percent_change_24h: Decimal,
    volume_millions: Decimal,
    volatility_score: Decimal,
    mean_volume_millions: Decimal,
) -> MarketSignal {
    if percent_change_24h > BULLISH_MIN_CHANGE && volume_millions > mean_volume_millions {
        MarketSignal::Bullish
    } else if percent_change_24h < BEARISH_MAX_CHANGE && volatility_score > BEARISH_MIN_VOLATILITY
    {
        MarketSignal::Bearish
    } else {
        MarketSignal::Neutral
    }
}

/// Classify the whole market from the mean change and mean volatility.
pub fn classify_regime(mean_change: Decimal, mean_volatility: Decimal) -> MarketRegime {
    if mean_change > BULL_MARKET_MIN_CHANGE && mean_volatility < BULL_MARKET_MAX_VOLATILITY {
        MarketRegime::BullMarket
    } else if mean_change < BEAR_MARKET_MAX_CHANGE && mean_volatility > BEAR_MARKET_MIN_VOLATILITY
    {
        MarketRegime::BearMarket
    } else {
        MarketRegime::SidewaysMarket
    }
}

pub fn volatility_level(volatility_score: Decimal) -> VolatilityLevel {
    if volatility_score < LOW_VOLATILITY_BELOW {
        VolatilityLevel::Low
    } else if volatility_score < MEDIUM_VOLATILITY_BELOW {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::High
    }
}
