use crate::error::StrategyError;
use crate::{Strategy, TickContext};
use configuration::SeasonalParams;
use core_types::{OrderRequest, StrategyId};

/// Timed one-shot accumulation and liquidation.
///
/// The product has a known seasonal price pattern, so the strategy simply
/// buys toward the limit inside a window around `buy_time` and sells toward
/// the opposite limit around `sell_time`, with marketable prices on both
/// sides. Outside those windows it does nothing.
pub struct Seasonal {
    params: SeasonalParams,
    position_limit: i64,
}

impl Seasonal {
    /// Creates a new `Seasonal` instance.
    pub fn new(params: SeasonalParams, position_limit: i64) -> Result<Self, StrategyError> {
        if position_limit <= 0 {
            return Err(StrategyError::InvalidParameters(
                "position limit must be positive".to_string(),
            ));
        }
        if params.buy_time >= params.sell_time {
            return Err(StrategyError::InvalidParameters(
                "seasonal buy_time must precede sell_time".to_string(),
            ));
        }
        Ok(Self {
            params,
            position_limit,
        })
    }
}

impl Strategy for Seasonal {
    fn id(&self) -> StrategyId {
        StrategyId::Seasonal
    }

    fn evaluate(&mut self, ctx: &TickContext) -> Result<Vec<OrderRequest>, StrategyError> {
        let position = ctx.position(self.params.product);
        let mut orders = Vec::new();

        if (ctx.timestamp - self.params.buy_time).abs() <= self.params.tolerance
            && self.position_limit - position > 0
        {
            let volume = (self.position_limit - position).min(self.params.clip);
            orders.push(OrderRequest::new(
                self.params.product,
                self.params.buy_price,
                volume,
            ));
        }

        if (ctx.timestamp - self.params.sell_time).abs() <= self.params.tolerance
            && position + self.position_limit > 0
        {
            let volume = (-self.position_limit - position).max(-self.params.clip);
            orders.push(OrderRequest::new(
                self.params.product,
                self.params.sell_price,
                volume,
            ));
        }

        Ok(orders)
    }
}
