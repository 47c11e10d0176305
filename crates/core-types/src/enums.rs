use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed universe of tradable instruments.
///
/// The set is closed for the lifetime of a run: every per-instrument table
/// (default prices, position limits, strategy assignments) is keyed by this
/// enum and validated at configuration load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Abalone,
    Breadfruit,
    Cacao,
    Cordial,
    Guava,
    Sextant,
}

impl Product {
    /// All products, in a stable order. Useful for per-tick iteration.
    pub const ALL: [Product; 6] = [
        Product::Abalone,
        Product::Breadfruit,
        Product::Cacao,
        Product::Cordial,
        Product::Guava,
        Product::Sextant,
    ];
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Product::Abalone => "abalone",
            Product::Breadfruit => "breadfruit",
            Product::Cacao => "cacao",
            Product::Cordial => "cordial",
            Product::Guava => "guava",
            Product::Sextant => "sextant",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Product {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abalone" => Ok(Product::Abalone),
            "breadfruit" => Ok(Product::Breadfruit),
            "cacao" => Ok(Product::Cacao),
            "cordial" => Ok(Product::Cordial),
            "guava" => Ok(Product::Guava),
            "sextant" => Ok(Product::Sextant),
            other => Err(CoreError::UnknownProduct(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side of the order
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    /// The sign convention used throughout: positive quantities buy, negative sell.
    pub fn sign(&self) -> i64 {
        match self {
            OrderSide::Buy => 1,
            OrderSide::Sell => -1,
        }
    }
}

/// Identifies which strategy produced a batch of orders (or a failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    MarketMaking,
    PairsArbitrage,
    TrendSignal,
    Seasonal,
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyId::MarketMaking => "market_making",
            StrategyId::PairsArbitrage => "pairs_arbitrage",
            StrategyId::TrendSignal => "trend_signal",
            StrategyId::Seasonal => "seasonal",
        };
        write!(f, "{}", name)
    }
}
