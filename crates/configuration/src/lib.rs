use crate::error::ConfigError;
use core_types::Product;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, EngineSettings, InstrumentSettings, MarketMakingParams, PairsArbParams, QuoteAnchor,
    SeasonalParams, Strategies, TrendSignalParams,
};

/// Loads the application configuration from the given TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and validates the result before handing it out. A config that
/// passes here is safe for every downstream constructor to rely on.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects configurations that would put a downstream component into an
/// unrepresentable state.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.engine.tick_interval <= 0 {
        return Err(ConfigError::ValidationError(
            "engine.tick_interval must be positive".to_string(),
        ));
    }
    if config.engine.ema_alpha <= Decimal::ZERO || config.engine.ema_alpha > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "engine.ema_alpha must lie in (0, 1]".to_string(),
        ));
    }

    // Every product needs its static data; strategies cross-reference it.
    for product in Product::ALL {
        let instrument = config.instrument(product).ok_or_else(|| {
            ConfigError::ValidationError(format!("missing [instruments.{}] section", product))
        })?;
        if instrument.default_price <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "instruments.{}.default_price must be positive",
                product
            )));
        }
        if instrument.position_limit <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "instruments.{}.position_limit must be positive",
                product
            )));
        }
    }

    let mut quoted = std::collections::HashSet::new();
    for mm in &config.strategies.market_making {
        if !quoted.insert(mm.product) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate market_making entry for {}",
                mm.product
            )));
        }
    }

    let pairs = &config.strategies.pairs_arb;
    if pairs.leg_a == pairs.leg_b {
        return Err(ConfigError::ValidationError(
            "pairs_arb legs must be distinct products".to_string(),
        ));
    }
    if pairs.fast_window == 0 || pairs.window <= pairs.fast_window {
        return Err(ConfigError::ValidationError(
            "pairs_arb.window must exceed pairs_arb.fast_window, both nonzero".to_string(),
        ));
    }
    if pairs.leg_a_clip <= 0 || pairs.leg_b_clip <= 0 {
        return Err(ConfigError::ValidationError(
            "pairs_arb leg clips must be positive".to_string(),
        ));
    }
    if pairs.entry_threshold <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "pairs_arb.entry_threshold must be positive".to_string(),
        ));
    }
    if pairs.crossing_buy_price <= Decimal::ZERO || pairs.crossing_sell_price <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "pairs_arb crossing prices must be positive".to_string(),
        ));
    }
    let leg_a_limit = config
        .instrument(pairs.leg_a)
        .map(|i| i.position_limit)
        .unwrap_or(0);
    if pairs.cap_buffer < 0 || pairs.cap_buffer >= leg_a_limit {
        return Err(ConfigError::ValidationError(
            "pairs_arb.cap_buffer must be non-negative and below leg A's position limit"
                .to_string(),
        ));
    }

    let trend = &config.strategies.trend_signal;
    if trend.pct_change_threshold <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "trend_signal.pct_change_threshold must be positive".to_string(),
        ));
    }
    if trend.clip <= 0 || trend.confirmations <= 0 {
        return Err(ConfigError::ValidationError(
            "trend_signal clip and confirmations must be positive".to_string(),
        ));
    }
    if trend.momentum_window == 0 {
        return Err(ConfigError::ValidationError(
            "trend_signal.momentum_window must be nonzero".to_string(),
        ));
    }
    if trend.min_hold_time < 0 {
        return Err(ConfigError::ValidationError(
            "trend_signal.min_hold_time must be non-negative".to_string(),
        ));
    }

    let seasonal = &config.strategies.seasonal;
    if seasonal.tolerance < 0 || seasonal.clip <= 0 {
        return Err(ConfigError::ValidationError(
            "seasonal tolerance must be non-negative and clip positive".to_string(),
        ));
    }
    if seasonal.buy_price <= Decimal::ZERO || seasonal.sell_price <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "seasonal prices must be positive".to_string(),
        ));
    }

    Ok(())
}
