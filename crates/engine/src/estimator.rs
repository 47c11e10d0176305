use configuration::Config;
use core_types::{OrderBook, Product};
use crate::error::EngineError;
use configuration::error::ConfigError;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Per-product fair-value state: the running EMA and the static fallback.
#[derive(Debug, Clone)]
struct EmaState {
    value: Option<Decimal>,
    default_price: Decimal,
}

/// Resolves a usable mid-price per product per tick and maintains the EMA
/// fair values.
///
/// Resolution priority: order-book mid when both sides are present, else the
/// EMA, else the instrument's static default. The three-level fallback means
/// resolution always produces a value; a thin or missing book is a market
/// condition here, not an error.
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    alpha: Decimal,
    states: HashMap<Product, EmaState>,
}

impl PriceEstimator {
    /// Creates an estimator seeded with every product's static default.
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        let alpha = config.engine.ema_alpha;
        if alpha <= Decimal::ZERO || alpha > Decimal::ONE {
            return Err(EngineError::Configuration(ConfigError::ValidationError(
                "ema_alpha must lie in (0, 1]".to_string(),
            )));
        }

        let mut states = HashMap::new();
        for product in Product::ALL {
            let instrument = config.instrument(product).ok_or_else(|| {
                EngineError::Configuration(ConfigError::ValidationError(format!(
                    "missing instrument settings for {}",
                    product
                )))
            })?;
            states.insert(
                product,
                EmaState {
                    value: None,
                    default_price: instrument.default_price,
                },
            );
        }

        Ok(Self { alpha, states })
    }

    /// Resolves the mid for one product against this tick's book.
    pub fn resolve_mid(&self, product: Product, book: Option<&OrderBook>) -> Decimal {
        if let Some(mid) = book.and_then(OrderBook::mid) {
            return mid;
        }
        let state = self
            .states
            .get(&product)
            .expect("estimator is seeded for every product at construction");
        state.value.unwrap_or(state.default_price)
    }

    /// Applies the EMA update rule for one product. Called exactly once per
    /// product per tick, before any strategy consumes the value.
    pub fn update_ema(&mut self, product: Product, mid: Decimal) {
        let state = self
            .states
            .get_mut(&product)
            .expect("estimator is seeded for every product at construction");
        state.value = Some(match state.value {
            Some(ema) => self.alpha * mid + (Decimal::ONE - self.alpha) * ema,
            None => mid,
        });
    }

    /// Current EMA value for one product, if one has been observed.
    pub fn ema(&self, product: Product) -> Option<Decimal> {
        self.states.get(&product).and_then(|state| state.value)
    }

    /// Snapshot of every product's current EMA, for the tick context.
    pub fn ema_snapshot(&self) -> HashMap<Product, Decimal> {
        self.states
            .iter()
            .filter_map(|(product, state)| state.value.map(|ema| (*product, ema)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::{
        EngineSettings, InstrumentSettings, MarketMakingParams, PairsArbParams, QuoteAnchor,
        SeasonalParams, Strategies, TrendSignalParams,
    };
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        let mut instruments = HashMap::new();
        for product in Product::ALL {
            instruments.insert(
                product,
                InstrumentSettings {
                    default_price: dec!(10000),
                    position_limit: 20,
                },
            );
        }
        Config {
            engine: EngineSettings {
                tick_interval: 100,
                ema_alpha: dec!(0.5),
            },
            instruments,
            strategies: Strategies {
                market_making: vec![MarketMakingParams {
                    product: Product::Abalone,
                    anchor: QuoteAnchor::DefaultPrice,
                }],
                pairs_arb: PairsArbParams {
                    leg_a: Product::Cacao,
                    leg_b: Product::Cordial,
                    hedge_ratio: dec!(1.551),
                    window: 200,
                    fast_window: 5,
                    entry_threshold: dec!(1.5),
                    leg_a_clip: 10,
                    leg_b_clip: 5,
                    cap_buffer: 30,
                    crossing_buy_price: dec!(100000),
                    crossing_sell_price: dec!(1),
                },
                trend_signal: TrendSignalParams {
                    product: Product::Sextant,
                    pct_change_threshold: dec!(0.002),
                    clip: 10,
                    entry_offset: dec!(200),
                    min_hold_time: 2000,
                    momentum_window: 200,
                    confirmations: 3,
                },
                seasonal: SeasonalParams {
                    product: Product::Guava,
                    buy_time: 200_000,
                    sell_time: 500_000,
                    tolerance: 800,
                    clip: 40,
                    buy_price: dec!(10000),
                    sell_price: dec!(1),
                },
            },
        }
    }

    fn two_sided_book(bid: Decimal, ask: Decimal) -> OrderBook {
        let mut book = OrderBook::default();
        book.bids.insert(bid, 5);
        book.asks.insert(ask, 5);
        book
    }

    #[test]
    fn resolves_book_mid_when_both_sides_present() {
        let estimator = PriceEstimator::new(&test_config()).unwrap();
        let book = two_sided_book(dec!(9998), dec!(10004));
        assert_eq!(
            estimator.resolve_mid(Product::Abalone, Some(&book)),
            dec!(10001)
        );
    }

    #[test]
    fn falls_back_to_default_before_any_observation() {
        let estimator = PriceEstimator::new(&test_config()).unwrap();
        assert_eq!(estimator.resolve_mid(Product::Abalone, None), dec!(10000));

        // One-sided books fall through the same path.
        let mut bids_only = OrderBook::default();
        bids_only.bids.insert(dec!(9999), 3);
        assert_eq!(
            estimator.resolve_mid(Product::Abalone, Some(&bids_only)),
            dec!(10000)
        );
    }

    #[test]
    fn falls_back_to_ema_once_seeded() {
        let mut estimator = PriceEstimator::new(&test_config()).unwrap();
        estimator.update_ema(Product::Abalone, dec!(10100));
        assert_eq!(estimator.resolve_mid(Product::Abalone, None), dec!(10100));
    }

    #[test]
    fn mid_is_always_finite_and_positive() {
        let mut estimator = PriceEstimator::new(&test_config()).unwrap();
        for product in Product::ALL {
            assert!(estimator.resolve_mid(product, None) > Decimal::ZERO);
            estimator.update_ema(product, dec!(123.45));
            assert!(estimator.resolve_mid(product, None) > Decimal::ZERO);
        }
    }

    #[test]
    fn ema_converges_on_a_constant_mid() {
        let mut estimator = PriceEstimator::new(&test_config()).unwrap();
        estimator.update_ema(Product::Breadfruit, dec!(5000));

        // Feed a new constant level; with alpha = 0.5 the gap halves per
        // tick, so 30 ticks close a 1000-unit gap to well under a cent.
        for _ in 0..30 {
            estimator.update_ema(Product::Breadfruit, dec!(6000));
        }
        let ema = estimator.ema(Product::Breadfruit).unwrap();
        assert!((ema - dec!(6000)).abs() < dec!(0.01));
    }
}
