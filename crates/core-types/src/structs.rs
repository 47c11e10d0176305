use crate::enums::{OrderSide, Product, StrategyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// One side-aggregated order book snapshot for a single product.
///
/// Both maps are price -> resting quantity; either side may be empty. The
/// snapshot is read-only input to the engine: nothing in the decision core
/// mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: BTreeMap<Decimal, i64>,
    pub asks: BTreeMap<Decimal, i64>,
}

impl OrderBook {
    /// Highest bid price, if any bids are resting.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest ask price, if any asks are resting.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// The book mid-price, defined only when both sides are populated.
    pub fn mid(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }
}

/// A fill of one of our own orders, as reported back by the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnTrade {
    pub product: Product,
    pub side: OrderSide,
    pub price: Decimal,
    /// Filled quantity, always positive; direction is carried by `side`.
    pub quantity: i64,
    pub timestamp: i64,
}

/// An order the engine wants resting on the book.
///
/// Quantity is signed: positive buys, negative sells. A request with
/// quantity zero is meaningless and is dropped by the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub client_order_id: Uuid,
    pub product: Product,
    pub price: Decimal,
    pub quantity: i64,
}

impl OrderRequest {
    /// Creates a request with a fresh client order id.
    pub fn new(product: Product, price: Decimal, quantity: i64) -> Self {
        Self {
            client_order_id: Uuid::new_v4(),
            product,
            price,
            quantity,
        }
    }

    /// The side implied by the quantity sign. Zero-quantity requests have no
    /// side and report `None`.
    pub fn side(&self) -> Option<OrderSide> {
        match self.quantity {
            q if q > 0 => Some(OrderSide::Buy),
            q if q < 0 => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

/// Everything the harness hands the engine for one decision pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Monotonic exchange timestamp, advancing by a fixed step per tick.
    pub timestamp: i64,
    pub books: HashMap<Product, OrderBook>,
    /// Externally reported signed positions. Missing products are flat.
    pub positions: HashMap<Product, i64>,
    /// Our own fills since the previous tick.
    pub own_trades: HashMap<Product, Vec<OwnTrade>>,
    /// The external correlated signal consumed by the trend strategy.
    pub observation: Option<Decimal>,
}

impl TickInput {
    /// Reported position for a product, defaulting to flat.
    pub fn position(&self, product: Product) -> i64 {
        self.positions.get(&product).copied().unwrap_or(0)
    }
}

/// A strategy that failed this tick, with the reason. The failure is
/// isolated: other strategies' orders are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: StrategyId,
    pub reason: String,
}

/// The engine's answer for one tick: routed orders per product, plus any
/// per-strategy failures for the surrounding observability layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickOutput {
    pub orders: HashMap<Product, Vec<OrderRequest>>,
    pub failures: Vec<StrategyFailure>,
}

impl TickOutput {
    /// Appends an order under its product key.
    pub fn push(&mut self, order: OrderRequest) {
        self.orders.entry(order.product).or_default().push(order);
    }
}
