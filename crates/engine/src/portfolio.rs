use core_types::{OrderSide, Product, TickInput};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Cash and mark-to-market bookkeeping for the session.
///
/// Positions themselves are owned by the harness and arrive on every tick;
/// this struct only tracks the cash consequences of our own fills and prices
/// the reported inventory. It is accounting, not decision logic: no strategy
/// reads it.
#[derive(Debug, Clone)]
pub struct Portfolio {
    cash: Decimal,
    tick_interval: i64,
}

impl Portfolio {
    pub fn new(tick_interval: i64) -> Self {
        Self {
            cash: Decimal::ZERO,
            tick_interval,
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Books the fills reported for the previous tick.
    ///
    /// The harness reports fills exactly one tick late, so only trades
    /// stamped `now - tick_interval` are new; anything older was already
    /// booked on an earlier pass and is skipped.
    pub fn apply_trades(&mut self, input: &TickInput) {
        for trades in input.own_trades.values() {
            for trade in trades {
                if trade.timestamp != input.timestamp - self.tick_interval {
                    continue;
                }
                let notional = trade.price * Decimal::from(trade.quantity);
                match trade.side {
                    OrderSide::Buy => self.cash -= notional,
                    OrderSide::Sell => self.cash += notional,
                }
            }
        }
    }

    /// Cash plus the value of the reported inventory at the resolved mids.
    pub fn mark_to_market(
        &self,
        positions: &HashMap<Product, i64>,
        mids: &HashMap<Product, Decimal>,
    ) -> Decimal {
        let inventory_value: Decimal = positions
            .iter()
            .filter_map(|(product, quantity)| {
                mids.get(product)
                    .map(|mid| *mid * Decimal::from(*quantity))
            })
            .sum();
        self.cash + inventory_value
    }
}
