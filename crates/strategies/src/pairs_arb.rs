use crate::error::StrategyError;
use crate::{Strategy, TickContext};
use analytics::RollingWindow;
use configuration::PairsArbParams;
use core_types::{OrderRequest, StrategyId};
use rust_decimal::prelude::*;

/// Pairs statistical arbitrage on the spread between two correlated products.
///
/// The engine records the hedge-weighted spread into the price history each
/// tick; this strategy keeps a long rolling window (mean / stddev) and a
/// short "fast" window over it, and trades when the fast spread deviates from
/// the long mean by more than `entry_threshold` standard deviations.
///
/// The two legs are not always filled 1:1 in the same tick, so the strategy
/// tracks its own shadow position counter rather than trusting the reported
/// positions; the counter is what the cap throttle applies to. Near the cap,
/// only entries that move the counter back toward zero are allowed.
pub struct PairsArbitrage {
    params: PairsArbParams,
    /// Hard cap on the shadow counter, taken from leg A's position limit.
    cap: i64,
    long_window: RollingWindow,
    fast_window: RollingWindow,
    pair_position: i64,
}

impl PairsArbitrage {
    /// Creates a new `PairsArbitrage` instance.
    pub fn new(params: PairsArbParams, cap: i64) -> Result<Self, StrategyError> {
        if cap <= 0 {
            return Err(StrategyError::InvalidParameters(
                "pair cap must be positive".to_string(),
            ));
        }
        if params.window <= params.fast_window {
            return Err(StrategyError::InvalidParameters(
                "long window must exceed fast window".to_string(),
            ));
        }
        let long_window = RollingWindow::new(params.window).map_err(|e| {
            StrategyError::InvalidParameters(format!("failed to build long window: {}", e))
        })?;
        let fast_window = RollingWindow::new(params.fast_window).map_err(|e| {
            StrategyError::InvalidParameters(format!("failed to build fast window: {}", e))
        })?;
        Ok(Self {
            params,
            cap,
            long_window,
            fast_window,
            pair_position: 0,
        })
    }

    /// The strategy's shadow net exposure, in leg-B clip units.
    pub fn pair_position(&self) -> i64 {
        self.pair_position
    }

    /// Sell leg A / buy leg B, moving the shadow counter down.
    fn sell_a_buy_b(&mut self) -> Vec<OrderRequest> {
        self.pair_position -= self.params.leg_b_clip;
        vec![
            OrderRequest::new(
                self.params.leg_a,
                self.params.crossing_sell_price,
                -self.params.leg_a_clip,
            ),
            OrderRequest::new(
                self.params.leg_b,
                self.params.crossing_buy_price,
                self.params.leg_b_clip,
            ),
        ]
    }

    /// Buy leg A / sell leg B, moving the shadow counter up.
    fn buy_a_sell_b(&mut self) -> Vec<OrderRequest> {
        self.pair_position += self.params.leg_b_clip;
        vec![
            OrderRequest::new(
                self.params.leg_a,
                self.params.crossing_buy_price,
                self.params.leg_a_clip,
            ),
            OrderRequest::new(
                self.params.leg_b,
                self.params.crossing_sell_price,
                -self.params.leg_b_clip,
            ),
        ]
    }
}

impl Strategy for PairsArbitrage {
    fn id(&self) -> StrategyId {
        StrategyId::PairsArbitrage
    }

    /// Evaluates the spread z-score policy for this tick.
    ///
    /// Emits nothing until the long window is full (cold start) and treats a
    /// zero standard deviation as "no signal" rather than dividing by it.
    fn evaluate(&mut self, ctx: &TickContext) -> Result<Vec<OrderRequest>, StrategyError> {
        let spread = ctx
            .history
            .spread_latest()
            .ok_or_else(|| StrategyError::MissingData("no spread series recorded".to_string()))?;
        let spread = spread
            .to_f64()
            .ok_or_else(|| StrategyError::Indicator("spread does not fit in f64".to_string()))?;

        self.long_window.push(spread);
        self.fast_window.push(spread);

        // Cold-start guard: every statistic must be defined before trading.
        let (Some(avg), Some(std), Some(fast)) = (
            self.long_window.mean(),
            self.long_window.std_dev(),
            self.fast_window.mean(),
        ) else {
            return Ok(Vec::new());
        };

        if std == 0.0 {
            tracing::debug!("spread window is flat, skipping entry");
            return Ok(Vec::new());
        }

        let threshold = self
            .params
            .entry_threshold
            .to_f64()
            .ok_or_else(|| StrategyError::Indicator("entry threshold does not fit in f64".to_string()))?;
        let lower = avg - threshold * std;
        let upper = avg + threshold * std;

        tracing::debug!(
            avg,
            std,
            fast,
            pair_position = self.pair_position,
            "spread statistics"
        );

        let orders = if self.pair_position.abs() < self.cap - self.params.cap_buffer {
            // Free to trade either direction.
            if fast < lower {
                self.sell_a_buy_b()
            } else if fast > upper {
                self.buy_a_sell_b()
            } else {
                Vec::new()
            }
        } else if self.pair_position > 0 {
            // Near the cap while net long: only the unwinding direction fires.
            if fast < lower {
                self.sell_a_buy_b()
            } else {
                Vec::new()
            }
        } else {
            if fast > upper {
                self.buy_a_sell_b()
            } else {
                Vec::new()
            }
        };

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::PriceHistory;
    use core_types::{Product, TickInput};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn params() -> PairsArbParams {
        PairsArbParams {
            leg_a: Product::Cacao,
            leg_b: Product::Cordial,
            hedge_ratio: dec!(1.5),
            window: 20,
            fast_window: 5,
            entry_threshold: dec!(1.5),
            leg_a_clip: 10,
            leg_b_clip: 5,
            cap_buffer: 30,
            crossing_buy_price: dec!(100000),
            crossing_sell_price: dec!(1),
        }
    }

    /// Feeds one spread observation through the strategy by recording leg
    /// prices that produce it, then evaluating.
    fn step(strategy: &mut PairsArbitrage, history: &mut PriceHistory, tick: i64, spread: Decimal) -> Vec<OrderRequest> {
        // mid(a) = 1000 keeps the hedge leg constant; spread is then
        // mid(b) - 1500.
        history.record(Product::Cacao, tick, dec!(1000));
        history.record(Product::Cordial, tick, dec!(1500) + spread);

        let input = TickInput::default();
        let mids = HashMap::new();
        let emas = HashMap::new();
        let ctx = TickContext {
            timestamp: tick,
            input: &input,
            mids: &mids,
            emas: &emas,
            history,
        };
        strategy.evaluate(&ctx).unwrap()
    }

    fn new_tracked_history() -> PriceHistory {
        let mut history = PriceHistory::new();
        history.track_spread(Product::Cacao, Product::Cordial, dec!(1.5));
        history
    }

    #[test]
    fn silent_until_long_window_full() {
        let mut strategy = PairsArbitrage::new(params(), 600).unwrap();
        let mut history = new_tracked_history();

        for tick in 0..19 {
            // Wildly swinging spread; still no orders while warming up.
            let spread = if tick % 2 == 0 { dec!(50) } else { dec!(-50) };
            let orders = step(&mut strategy, &mut history, tick, spread);
            assert!(orders.is_empty(), "order emitted during cold start");
        }
    }

    #[test]
    fn high_spread_buys_a_and_sells_b() {
        let mut strategy = PairsArbitrage::new(params(), 600).unwrap();
        let mut history = new_tracked_history();

        // Alternate around zero to build a nonzero stddev, then spike.
        for tick in 0..20 {
            let spread = if tick % 2 == 0 { dec!(2) } else { dec!(-2) };
            step(&mut strategy, &mut history, tick, spread);
        }
        let mut fired = Vec::new();
        for tick in 20..30 {
            fired = step(&mut strategy, &mut history, tick, dec!(40));
            if !fired.is_empty() {
                break;
            }
        }

        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].product, Product::Cacao);
        assert_eq!(fired[0].quantity, 10);
        assert_eq!(fired[0].price, dec!(100000));
        assert_eq!(fired[1].product, Product::Cordial);
        assert_eq!(fired[1].quantity, -5);
        assert_eq!(fired[1].price, dec!(1));
        assert_eq!(strategy.pair_position(), 5);
    }

    #[test]
    fn zero_std_dev_never_divides_or_trades() {
        let mut strategy = PairsArbitrage::new(params(), 600).unwrap();
        let mut history = new_tracked_history();

        for tick in 0..40 {
            let orders = step(&mut strategy, &mut history, tick, dec!(10));
            assert!(orders.is_empty());
        }
    }

    #[test]
    fn cap_throttle_only_allows_mean_reverting_entries() {
        // cap 40, buffer 30: the free-trade region is |counter| < 10.
        let mut strategy = PairsArbitrage::new(params(), 40).unwrap();
        let mut history = new_tracked_history();

        for tick in 0..20 {
            let spread = if tick % 2 == 0 { dec!(2) } else { dec!(-2) };
            step(&mut strategy, &mut history, tick, spread);
        }

        // Park the counter at the throttle boundary.
        strategy.pair_position = 10;

        // The high-spread side would grow the position; it must stay silent
        // even though the threshold is crossed hard.
        for tick in 20..30 {
            let orders = step(&mut strategy, &mut history, tick, dec!(40));
            assert!(orders.is_empty(), "throttled entry grew the position");
            assert_eq!(strategy.pair_position(), 10);
        }

        // Flush the burst back out of the long window, then swing low; the
        // unwinding side still fires from the throttled state.
        for tick in 30..55 {
            let spread = if tick % 2 == 0 { dec!(2) } else { dec!(-2) };
            let orders = step(&mut strategy, &mut history, tick, spread);
            assert!(orders.is_empty());
        }
        let mut unwound = false;
        for tick in 55..75 {
            let orders = step(&mut strategy, &mut history, tick, dec!(-40));
            if !orders.is_empty() {
                assert_eq!(orders[0].quantity, -10);
                assert_eq!(orders[1].quantity, 5);
                unwound = true;
                break;
            }
        }
        assert!(unwound, "throttled strategy never mean-reverted");
        assert_eq!(strategy.pair_position(), 5);
    }

    #[test]
    fn counter_never_exceeds_cap_under_repeated_crossings() {
        // cap 12, buffer 4: free region is |counter| < 8, so two entries
        // park the counter at 10 and everything after must be throttled.
        let mut tight = params();
        tight.cap_buffer = 4;
        let mut strategy = PairsArbitrage::new(tight, 12).unwrap();
        let mut history = new_tracked_history();

        let mut fired = 0;
        let mut tick = 0;
        for _cycle in 0..6 {
            // A stable stretch long enough to flush the previous burst out
            // of the long window, followed by a hard upward burst.
            for _ in 0..20 {
                let spread = if tick % 2 == 0 { dec!(2) } else { dec!(-2) };
                step(&mut strategy, &mut history, tick, spread);
                tick += 1;
            }
            for _ in 0..6 {
                if !step(&mut strategy, &mut history, tick, dec!(40)).is_empty() {
                    fired += 1;
                }
                tick += 1;
                assert!(strategy.pair_position().abs() <= 12);
            }
        }

        // Every burst crossed the threshold, but only the first two grew the
        // position before the throttle pinned the counter.
        assert_eq!(fired, 2);
        assert_eq!(strategy.pair_position(), 10);
    }
}
