use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-coin classification derived from price change, volume and volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketSignal {
    pub const ALL: [MarketSignal; 3] = [Self::Bullish, Self::Bearish, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for MarketSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => Ok(Self::Bullish),
            "bearish" => Ok(Self::Bearish),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("Unknown market signal: {}", other)),
        }
    }
}

/// Whole-market classification derived from aggregate change and volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    BullMarket,
    BearMarket,
    SidewaysMarket,
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BullMarket => write!(f, "Bull Market"),
            Self::BearMarket => write!(f, "Bear Market"),
            Self::SidewaysMarket => write!(f, "Sideways Market"),
        }
    }
}

/// Single-coin risk bucket based on the absolute 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}
