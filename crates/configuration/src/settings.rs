use core_types::Product;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineSettings,
    /// Static per-instrument data, keyed by product. Immutable for the run.
    pub instruments: HashMap<Product, InstrumentSettings>,
    pub strategies: Strategies,
}

impl Config {
    /// Static data for one instrument. `None` only before validation has run.
    pub fn instrument(&self, product: Product) -> Option<&InstrumentSettings> {
        self.instruments.get(&product)
    }
}

/// Engine-wide settings shared by every component.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// The fixed timestamp step between consecutive ticks. Own fills are
    /// reported exactly one step late, so bookkeeping needs this too.
    pub tick_interval: i64,
    /// Smoothing parameter for the fair-value EMA, shared by all products.
    /// Must lie in (0, 1].
    pub ema_alpha: Decimal,
}

/// Static data for a single instrument.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentSettings {
    /// Fair-value fallback used before any market data has been seen.
    pub default_price: Decimal,
    /// Hard cap on absolute signed inventory.
    pub position_limit: i64,
}

/// Contains the parameter sets for all available strategies.
#[derive(Debug, Clone, Deserialize)]
pub struct Strategies {
    pub market_making: Vec<MarketMakingParams>,
    pub pairs_arb: PairsArbParams,
    pub trend_signal: TrendSignalParams,
    pub seasonal: SeasonalParams,
}

/// Which fair value a market-making quoter anchors its two-sided quotes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteAnchor {
    /// Quote around the instrument's static default price.
    DefaultPrice,
    /// Quote around the rolling EMA fair value, skewed by inventory.
    Ema,
}

/// Parameters for one market-making quoter instance.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketMakingParams {
    pub product: Product,
    pub anchor: QuoteAnchor,
}

/// Parameters for the pairs statistical-arbitrage strategy.
///
/// The spread is `mid(leg_b) - hedge_ratio * mid(leg_a)`; the strategy's
/// shadow position counter is capped by leg A's position limit minus
/// `cap_buffer`.
#[derive(Debug, Clone, Deserialize)]
pub struct PairsArbParams {
    pub leg_a: Product,
    pub leg_b: Product,
    pub hedge_ratio: Decimal,
    /// Long window for the spread mean and standard deviation.
    pub window: usize,
    /// Short window for the smoothed "fast" spread.
    pub fast_window: usize,
    /// Entry fires when the fast spread deviates from the long mean by more
    /// than this multiple of the long standard deviation.
    pub entry_threshold: Decimal,
    /// Per-action order size on leg A (the hedge leg).
    pub leg_a_clip: i64,
    /// Per-action order size on leg B; the shadow counter moves by this much.
    pub leg_b_clip: i64,
    /// Entries that grow the shadow position stop this many units short of
    /// the cap; mean-reverting exits still fire.
    pub cap_buffer: i64,
    /// Limit price for the buying leg, high enough to cross any book.
    pub crossing_buy_price: Decimal,
    /// Limit price for the selling leg, low enough to cross any book.
    pub crossing_sell_price: Decimal,
}

/// Parameters for the signal-driven trend strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendSignalParams {
    pub product: Product,
    /// Percentage change in the external observation that arms a direction.
    pub pct_change_threshold: Decimal,
    /// Maximum order size per tick, entering or unwinding.
    pub clip: i64,
    /// Entry/unwind orders are priced at mid +/- this offset to cross the book.
    pub entry_offset: Decimal,
    /// Minimum holding duration (in timestamp units) before the reversal
    /// detector is consulted.
    pub min_hold_time: i64,
    /// Trailing window for the smoothed momentum of the traded product's own
    /// mid-price (mean of one-tick percentage changes).
    pub momentum_window: usize,
    /// Consecutive contrary momentum readings required before unwinding.
    pub confirmations: i64,
}

/// Parameters for the timed one-shot seasonal strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonalParams {
    pub product: Product,
    /// Timestamp around which the accumulation order fires.
    pub buy_time: i64,
    /// Timestamp around which the liquidation order fires.
    pub sell_time: i64,
    /// Half-width of the firing window, in timestamp units.
    pub tolerance: i64,
    pub clip: i64,
    /// Limit price for the buy, high enough to cross any book.
    pub buy_price: Decimal,
    /// Limit price for the sell, low enough to cross any book.
    pub sell_price: Decimal,
}
