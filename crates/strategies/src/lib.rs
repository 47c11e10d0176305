//! # Atoll Strategy Library
//!
//! This crate contains the core trading logic for the Atoll decision engine.
//! It defines a universal `Strategy` trait and provides the concrete
//! implementations: two-sided market making, pairs statistical arbitrage, the
//! signal-driven trend machine, and the timed seasonal one-shot.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   the harness, execution, or bookkeeping. It depends only on `core-types`,
//!   `analytics`, and `configuration`.
//! - **Strategy Agnostic Engine:** By using the `Strategy` trait, the engine
//!   can run any strategy set without knowing its internal details, and a
//!   failure inside one strategy never touches another.
//! - **Extensibility:** Adding a new strategy involves creating a new module,
//!   implementing the `Strategy` trait, and wiring it into the factory.
//!
//! ## Public API
//!
//! The primary public components are:
//! - `Strategy`: the core trait all strategies implement.
//! - `TickContext`: the read-only view of the current tick handed to each
//!   strategy.
//! - `create_strategies`: the factory that builds the configured strategy
//!   set.
//! - The concrete strategy structs themselves (e.g. `PairsArbitrage`).

// Declare all the modules that constitute this crate.
pub mod error;
pub mod factory;
pub mod market_making;
pub mod pairs_arb;
pub mod seasonal;
pub mod trend_signal;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use factory::create_strategies;
pub use market_making::MarketMaking;
pub use pairs_arb::PairsArbitrage;
pub use seasonal::Seasonal;
pub use trend_signal::{TrendDirection, TrendSignal};

use analytics::PriceHistory;
use core_types::{OrderRequest, Product, StrategyId, TickInput};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// The read-only view of one tick that strategies evaluate against.
///
/// Mids and EMAs are resolved by the engine's price estimator *before* any
/// strategy runs, so every product has a value for both by the time a
/// strategy sees the context.
pub struct TickContext<'a> {
    pub timestamp: i64,
    pub input: &'a TickInput,
    /// Resolved mid price per product (book mid, else EMA, else default).
    pub mids: &'a HashMap<Product, Decimal>,
    /// EMA fair values, already updated with this tick's mids.
    pub emas: &'a HashMap<Product, Decimal>,
    pub history: &'a PriceHistory,
}

impl<'a> TickContext<'a> {
    /// Resolved mid for a product. The estimator guarantees one per product;
    /// a miss here means the engine was wired wrong, not a market condition.
    pub fn mid(&self, product: Product) -> Result<Decimal, StrategyError> {
        self.mids
            .get(&product)
            .copied()
            .ok_or_else(|| StrategyError::MissingData(format!("no resolved mid for {}", product)))
    }

    /// Current EMA fair value for a product.
    pub fn ema(&self, product: Product) -> Result<Decimal, StrategyError> {
        self.emas
            .get(&product)
            .copied()
            .ok_or_else(|| StrategyError::MissingData(format!("no EMA value for {}", product)))
    }

    /// Externally reported signed position, defaulting to flat.
    pub fn position(&self, product: Product) -> i64 {
        self.input.position(product)
    }

    /// The external scalar observation for this tick, if the harness
    /// supplied one.
    pub fn observation(&self) -> Option<Decimal> {
        self.input.observation
    }
}

/// The core trait that all trading strategies must implement.
///
/// The `&mut self` in `evaluate` is crucial, as most strategies maintain
/// internal state across ticks (rolling windows, shadow positions, the trend
/// machine). The `Send + Sync` bounds keep strategies usable from a
/// multi-threaded harness even though the engine itself is single-threaded.
pub trait Strategy: Send + Sync {
    /// Identifies the strategy for failure reporting and logging.
    fn id(&self) -> StrategyId;

    /// Evaluates the strategy against the current tick.
    ///
    /// # Returns
    ///
    /// * `Ok(orders)` - the orders this strategy wants resting this tick
    ///   (possibly empty).
    /// * `Err(StrategyError)` - an evaluation failure; the engine logs it and
    ///   omits this strategy's orders for the tick without affecting others.
    fn evaluate(&mut self, ctx: &TickContext) -> Result<Vec<OrderRequest>, StrategyError>;
}
