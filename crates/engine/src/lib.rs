//! # Atoll Decision Engine
//!
//! The central orchestrator: one `DecisionEngine` instance owns all mutable
//! per-session state (EMA table, price history, strategy set, cash
//! bookkeeping) and turns each tick of market data into an order set.
//!
//! ## Architectural Principles
//!
//! - **One synchronous pass per tick:** the harness calls `process_tick`
//!   strictly sequentially and the next tick is never delivered until the
//!   current call returns, so no locking is needed anywhere in the core.
//! - **Failure isolation:** each strategy is evaluated independently; a
//!   failure is logged, reported in the output, and never blocks the other
//!   strategies or the tick.
//!
//! ## Public API
//!
//! - `DecisionEngine`: construct once per run from a validated `Config`,
//!   then call `process_tick` per tick.
//! - `PriceEstimator` / `Portfolio`: the engine-owned collaborators, exposed
//!   for inspection.
//! - `EngineError`: the specific error types this crate can return.

use analytics::PriceHistory;
use configuration::Config;
use core_types::{Product, StrategyFailure, TickInput, TickOutput};
use risk::OrderRouter;
use rust_decimal::Decimal;
use std::collections::HashMap;
use strategies::{create_strategies, Strategy, TickContext};

pub mod error;
pub mod estimator;
pub mod portfolio;

pub use error::EngineError;
pub use estimator::PriceEstimator;
pub use portfolio::Portfolio;

/// The per-tick decision engine.
///
/// Owns every piece of mutable state exclusively; nothing outside the engine
/// may mutate the EMA table, the price history, or a strategy's internals.
pub struct DecisionEngine {
    estimator: PriceEstimator,
    history: PriceHistory,
    strategies: Vec<Box<dyn Strategy>>,
    router: OrderRouter,
    portfolio: Portfolio,
}

impl DecisionEngine {
    /// Builds an engine from a configuration, wiring every component.
    ///
    /// The config is re-validated here so an engine can never be constructed
    /// from a struct that bypassed `load_config`.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        configuration::validate(&config)?;

        let estimator = PriceEstimator::new(&config)?;

        let mut history = PriceHistory::new();
        let pairs = &config.strategies.pairs_arb;
        history.track_spread(pairs.leg_a, pairs.leg_b, pairs.hedge_ratio);

        let strategies = create_strategies(&config)?;
        let router = OrderRouter::new(&config)?;
        let portfolio = Portfolio::new(config.engine.tick_interval);

        Ok(Self {
            estimator,
            history,
            strategies,
            router,
            portfolio,
        })
    }

    /// Runs one full decision pass.
    ///
    /// Data flow: book the previous tick's fills, resolve mids and update the
    /// EMA table, append to the price history, evaluate every strategy in
    /// isolation, then clamp the combined order set through the router.
    pub fn process_tick(&mut self, input: &TickInput) -> TickOutput {
        self.portfolio.apply_trades(input);

        let mut mids: HashMap<Product, Decimal> = HashMap::new();
        for product in Product::ALL {
            let mid = self
                .estimator
                .resolve_mid(product, input.books.get(&product));
            self.estimator.update_ema(product, mid);
            self.history.record(product, input.timestamp, mid);
            tracing::trace!(
                product = %product,
                %mid,
                position = input.position(product),
                "resolved mid"
            );
            mids.insert(product, mid);
        }
        let emas = self.estimator.ema_snapshot();

        let ctx = TickContext {
            timestamp: input.timestamp,
            input,
            mids: &mids,
            emas: &emas,
            history: &self.history,
        };

        let mut requested = Vec::new();
        let mut failures = Vec::new();
        for strategy in &mut self.strategies {
            match strategy.evaluate(&ctx) {
                Ok(orders) => requested.extend(orders),
                Err(e) => {
                    tracing::error!(
                        strategy = %strategy.id(),
                        error = %e,
                        "strategy evaluation failed; skipping its orders this tick"
                    );
                    failures.push(StrategyFailure {
                        strategy: strategy.id(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let routed = self.router.route(requested, &input.positions);
        let mut output = TickOutput {
            orders: HashMap::new(),
            failures,
        };
        for order in routed {
            output.push(order);
        }

        let marked = self.portfolio.mark_to_market(&input.positions, &mids);
        tracing::debug!(
            timestamp = input.timestamp,
            cash = %self.portfolio.cash(),
            marked_value = %marked,
            orders = output.orders.values().map(Vec::len).sum::<usize>(),
            "tick complete"
        );

        output
    }

    /// The engine's cash/PnL bookkeeping, for reporting.
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// The engine's fair-value estimator, for reporting.
    pub fn estimator(&self) -> &PriceEstimator {
        &self.estimator
    }
}
