use crate::error::StrategyError;
use crate::market_making::MarketMaking;
use crate::pairs_arb::PairsArbitrage;
use crate::seasonal::Seasonal;
use crate::trend_signal::TrendSignal;
use crate::Strategy;
use configuration::Config;
use core_types::Product;

/// Position limit lookup with a typed error for dangling config references.
fn position_limit(config: &Config, product: Product) -> Result<i64, StrategyError> {
    config
        .instrument(product)
        .map(|i| i.position_limit)
        .ok_or_else(|| {
            StrategyError::InvalidParameters(format!("no instrument settings for {}", product))
        })
}

/// Builds the full strategy set described by the configuration.
///
/// Each strategy receives only its own parameter struct plus the static
/// instrument data it needs; none of them ever sees the config file itself.
pub fn create_strategies(config: &Config) -> Result<Vec<Box<dyn Strategy>>, StrategyError> {
    let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();

    for params in &config.strategies.market_making {
        let instrument = config.instrument(params.product).ok_or_else(|| {
            StrategyError::InvalidParameters(format!("no instrument settings for {}", params.product))
        })?;
        strategies.push(Box::new(MarketMaking::new(
            params.clone(),
            instrument.default_price,
            instrument.position_limit,
        )?));
    }

    let pairs = &config.strategies.pairs_arb;
    strategies.push(Box::new(PairsArbitrage::new(
        pairs.clone(),
        position_limit(config, pairs.leg_a)?,
    )?));

    let seasonal = &config.strategies.seasonal;
    strategies.push(Box::new(Seasonal::new(
        seasonal.clone(),
        position_limit(config, seasonal.product)?,
    )?));

    let trend = &config.strategies.trend_signal;
    strategies.push(Box::new(TrendSignal::new(
        trend.clone(),
        position_limit(config, trend.product)?,
    )?));

    Ok(strategies)
}
