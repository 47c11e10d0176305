use crate::error::StrategyError;
use crate::{Strategy, TickContext};
use analytics::RollingWindow;
use configuration::TrendSignalParams;
use core_types::{OrderRequest, StrategyId};
use rust_decimal::prelude::*;

/// Direction currently held by the trend machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrendDirection {
    Flat,
    Long,
    Short,
}

/// Signal-driven directional strategy with hysteresis-based reversal.
///
/// Entry is triggered by a percentage jump in the external observation, a
/// leading indicator that is not derived from the traded product's own book.
/// A single contrary reading of that indicator cannot be trusted as a
/// reversal, so the exit side watches a lagging confirmation instead: the
/// smoothed momentum of the product's own mid-price. Only after the minimum
/// holding duration, and only after `confirmations` consecutive contrary
/// momentum readings, does the machine unwind; one agreeing reading resets
/// the count.
pub struct TrendSignal {
    params: TrendSignalParams,
    position_limit: i64,
    direction: TrendDirection,
    /// Confirmation accumulator. Contrary momentum steps it away from zero,
    /// opposite the held direction; agreeing momentum resets it.
    counter: i64,
    opened_at: Option<i64>,
    last_observation: Option<Decimal>,
    /// One-tick percentage changes of the product's own mid.
    momentum: RollingWindow,
    last_mid: Option<Decimal>,
}

impl TrendSignal {
    /// Creates a new `TrendSignal` instance.
    pub fn new(params: TrendSignalParams, position_limit: i64) -> Result<Self, StrategyError> {
        if position_limit <= 0 {
            return Err(StrategyError::InvalidParameters(
                "position limit must be positive".to_string(),
            ));
        }
        if params.confirmations <= 0 {
            return Err(StrategyError::InvalidParameters(
                "confirmations must be positive".to_string(),
            ));
        }
        let momentum = RollingWindow::new(params.momentum_window).map_err(|e| {
            StrategyError::InvalidParameters(format!("failed to build momentum window: {}", e))
        })?;
        Ok(Self {
            params,
            position_limit,
            direction: TrendDirection::Flat,
            counter: 0,
            opened_at: None,
            last_observation: None,
            momentum,
            last_mid: None,
        })
    }

    pub fn direction(&self) -> TrendDirection {
        self.direction
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    fn reset(&mut self) {
        self.direction = TrendDirection::Flat;
        self.counter = 0;
        self.opened_at = None;
    }
}

impl Strategy for TrendSignal {
    fn id(&self) -> StrategyId {
        StrategyId::TrendSignal
    }

    fn evaluate(&mut self, ctx: &TickContext) -> Result<Vec<OrderRequest>, StrategyError> {
        let mid = ctx.mid(self.params.product)?;

        // The momentum series accrues every tick, whatever the machine is
        // currently doing, so it is already warm when a reversal check needs it.
        if let Some(prev) = self.last_mid {
            if !prev.is_zero() {
                let change = ((mid - prev) / prev).to_f64().ok_or_else(|| {
                    StrategyError::Indicator("mid-price change does not fit in f64".to_string())
                })?;
                self.momentum.push(change);
            }
        }
        self.last_mid = Some(mid);

        // The first observation only seeds the change baseline.
        let Some(prev_obs) = self.last_observation else {
            self.last_observation = ctx.observation();
            return Ok(Vec::new());
        };

        // A tick without an observation reads as "no change": it cannot arm,
        // and it leaves the baseline untouched.
        let delta = match ctx.observation() {
            Some(x) if !prev_obs.is_zero() => (x - prev_obs) / prev_obs,
            _ => Decimal::ZERO,
        };

        let position = ctx.position(self.params.product);
        let confirmations = self.params.confirmations;
        let unwinding = self.counter.abs() == confirmations;
        let mut orders = Vec::new();

        // Arming and top-up, long side. Once long, the machine ignores short
        // signals until it is flat again; while unwinding it ignores both.
        if (delta > self.params.pct_change_threshold || self.direction == TrendDirection::Long)
            && self.direction != TrendDirection::Short
            && !unwinding
        {
            if self.direction == TrendDirection::Flat {
                self.opened_at = Some(ctx.timestamp);
                tracing::info!(product = %self.params.product, %delta, "trend machine armed long");
            }
            self.direction = TrendDirection::Long;
            if position < self.position_limit {
                let volume = (self.position_limit - position).min(self.params.clip);
                orders.push(OrderRequest::new(
                    self.params.product,
                    mid + self.params.entry_offset,
                    volume,
                ));
            }
        }

        // Short side, symmetric.
        if (delta < -self.params.pct_change_threshold || self.direction == TrendDirection::Short)
            && self.direction != TrendDirection::Long
            && !unwinding
        {
            if self.direction == TrendDirection::Flat {
                self.opened_at = Some(ctx.timestamp);
                tracing::info!(product = %self.params.product, %delta, "trend machine armed short");
            }
            self.direction = TrendDirection::Short;
            if position > -self.position_limit {
                let volume = (-self.position_limit - position).max(-self.params.clip);
                orders.push(OrderRequest::new(
                    self.params.product,
                    mid - self.params.entry_offset,
                    volume,
                ));
            }
        }

        if ctx.observation().is_some() {
            self.last_observation = ctx.observation();
        }

        // Reversal detection, gated on the minimum dwell time.
        if self.direction != TrendDirection::Flat {
            let held_long_enough = self
                .opened_at
                .is_some_and(|t| ctx.timestamp - t > self.params.min_hold_time);

            if held_long_enough {
                if self.counter.abs() != confirmations {
                    let Some(momentum) = self.momentum.mean() else {
                        // Momentum undefined: hold the position and leave the
                        // counter alone.
                        return Ok(orders);
                    };

                    if self.direction == TrendDirection::Long && self.counter > -confirmations {
                        if momentum < 0.0 {
                            self.counter -= 1;
                        } else {
                            self.counter = 0;
                        }
                    } else if self.direction == TrendDirection::Short
                        && self.counter < confirmations
                    {
                        if momentum > 0.0 {
                            self.counter += 1;
                        } else {
                            self.counter = 0;
                        }
                    }
                    tracing::debug!(
                        counter = self.counter,
                        momentum,
                        direction = ?self.direction,
                        "reversal confirmation"
                    );
                }

                // Unwind with clip-sized marketable orders until the reported
                // position is exactly flat, then reset. Volume is clamped
                // toward zero so the unwind cannot run through flat.
                if self.direction == TrendDirection::Short && self.counter == confirmations {
                    if position == 0 {
                        self.reset();
                    } else {
                        let volume = (-position).min(self.params.clip);
                        orders.push(OrderRequest::new(
                            self.params.product,
                            mid + self.params.entry_offset,
                            volume,
                        ));
                    }
                } else if self.direction == TrendDirection::Long && self.counter == -confirmations
                {
                    if position == 0 {
                        self.reset();
                    } else {
                        let volume = (-position).max(-self.params.clip);
                        orders.push(OrderRequest::new(
                            self.params.product,
                            mid - self.params.entry_offset,
                            volume,
                        ));
                    }
                }
            }
        }

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::PriceHistory;
    use core_types::{Product, TickInput};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn params(momentum_window: usize) -> TrendSignalParams {
        TrendSignalParams {
            product: Product::Sextant,
            pct_change_threshold: dec!(0.002),
            clip: 10,
            entry_offset: dec!(200),
            min_hold_time: 200,
            momentum_window,
            confirmations: 3,
        }
    }

    fn step(
        strategy: &mut TrendSignal,
        timestamp: i64,
        mid: Decimal,
        observation: Decimal,
        position: i64,
    ) -> Vec<OrderRequest> {
        let mut input = TickInput::default();
        input.timestamp = timestamp;
        input.positions.insert(Product::Sextant, position);
        input.observation = Some(observation);
        let mids = HashMap::from([(Product::Sextant, mid)]);
        let emas = HashMap::from([(Product::Sextant, mid)]);
        let history = PriceHistory::new();
        let ctx = TickContext {
            timestamp,
            input: &input,
            mids: &mids,
            emas: &emas,
            history: &history,
        };
        strategy.evaluate(&ctx).unwrap()
    }

    #[test]
    fn observation_jump_arms_long_with_aggressive_buy() {
        let mut strategy = TrendSignal::new(params(3), 50).unwrap();

        // First observation only seeds the baseline.
        assert!(step(&mut strategy, 0, dec!(99000), dec!(1000), 0).is_empty());
        // No change: stays flat.
        assert!(step(&mut strategy, 100, dec!(99000), dec!(1000), 0).is_empty());

        // +1% against a 0.2% threshold.
        let orders = step(&mut strategy, 200, dec!(99000), dec!(1010), 0);
        assert_eq!(strategy.direction(), TrendDirection::Long);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].price, dec!(99200));
        assert_eq!(orders[0].quantity, 10);
    }

    #[test]
    fn opposite_signal_is_ignored_while_armed() {
        let mut strategy = TrendSignal::new(params(3), 50).unwrap();
        step(&mut strategy, 0, dec!(99000), dec!(1000), 0);
        step(&mut strategy, 100, dec!(99000), dec!(1010), 0);
        assert_eq!(strategy.direction(), TrendDirection::Long);

        // A hard downward observation move must not flip an armed machine.
        let orders = step(&mut strategy, 200, dec!(99000), dec!(990), 10);
        assert_eq!(strategy.direction(), TrendDirection::Long);
        // The only order is the long top-up, not a short entry.
        assert_eq!(orders.len(), 1);
        assert!(orders[0].quantity > 0);
    }

    /// Drives the machine long at t=100 with the position pinned at the
    /// limit so later steps emit no top-up noise.
    fn armed_long() -> TrendSignal {
        let mut strategy = TrendSignal::new(params(3), 50).unwrap();
        step(&mut strategy, 0, dec!(10000), dec!(1000), 0);
        step(&mut strategy, 100, dec!(10000), dec!(1010), 0);
        assert_eq!(strategy.direction(), TrendDirection::Long);
        strategy
    }

    #[test]
    fn contrary_momentum_before_min_hold_does_not_count() {
        let mut strategy = armed_long();

        // 200 - 100 = 100 <= min_hold (200): reversal logic must not run,
        // even with falling prices.
        step(&mut strategy, 200, dec!(9900), dec!(1010), 50);
        assert_eq!(strategy.counter(), 0);
        // 300 - 100 = 200 is not strictly greater than min_hold either.
        step(&mut strategy, 300, dec!(9800), dec!(1010), 50);
        assert_eq!(strategy.counter(), 0);
    }

    #[test]
    fn two_contrary_then_agreeing_resets_counter() {
        let mut strategy = armed_long();
        step(&mut strategy, 200, dec!(9900), dec!(1010), 50);
        step(&mut strategy, 300, dec!(9800), dec!(1010), 50);

        // Two contrary readings past the dwell gate...
        step(&mut strategy, 400, dec!(9700), dec!(1010), 50);
        assert_eq!(strategy.counter(), -1);
        step(&mut strategy, 500, dec!(9600), dec!(1010), 50);
        assert_eq!(strategy.counter(), -2);

        // ...then one agreeing reading: counter resets, no flatten.
        let orders = step(&mut strategy, 600, dec!(10100), dec!(1010), 50);
        assert_eq!(strategy.counter(), 0);
        assert_eq!(strategy.direction(), TrendDirection::Long);
        assert!(orders.is_empty());
    }

    #[test]
    fn three_contrary_readings_flatten_and_reset() {
        let mut strategy = armed_long();
        step(&mut strategy, 200, dec!(9900), dec!(1010), 50);
        step(&mut strategy, 300, dec!(9800), dec!(1010), 50);

        step(&mut strategy, 400, dec!(9700), dec!(1010), 50);
        step(&mut strategy, 500, dec!(9600), dec!(1010), 50);
        let orders = step(&mut strategy, 600, dec!(9500), dec!(1010), 50);
        assert_eq!(strategy.counter(), -3);

        // Third contrary reading: clip-sized unwinding sell, priced to cross.
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, -10);
        assert_eq!(orders[0].price, dec!(9300));

        // Once the reported position is flat, the machine resets.
        let orders = step(&mut strategy, 700, dec!(9500), dec!(1010), 0);
        assert!(orders.is_empty());
        assert_eq!(strategy.direction(), TrendDirection::Flat);
        assert_eq!(strategy.counter(), 0);
    }

    #[test]
    fn undefined_momentum_takes_no_closing_action() {
        // Momentum window far larger than the test run: mean stays undefined.
        let mut strategy = TrendSignal::new(params(50), 50).unwrap();
        step(&mut strategy, 0, dec!(10000), dec!(1000), 0);
        step(&mut strategy, 100, dec!(10000), dec!(1010), 0);

        for (ts, mid) in [(200, dec!(9900)), (300, dec!(9800)), (400, dec!(9700))] {
            let orders = step(&mut strategy, ts, mid, dec!(1010), 50);
            assert!(orders.is_empty());
            assert_eq!(strategy.counter(), 0);
        }
        assert_eq!(strategy.direction(), TrendDirection::Long);
    }
}
