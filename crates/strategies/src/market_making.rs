use crate::error::StrategyError;
use crate::{Strategy, TickContext};
use configuration::{MarketMakingParams, QuoteAnchor};
use core_types::{OrderRequest, Product, StrategyId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Two-sided quoting around a fair-value anchor.
///
/// The quoter always offers to trade back to both limits: the bid is sized to
/// fill up to `+limit`, the ask down to `-limit`. With the EMA anchor the
/// quoted prices are skewed one tick against the current inventory, so a long
/// book leans on the ask and a short book leans on the bid.
pub struct MarketMaking {
    product: Product,
    anchor: QuoteAnchor,
    default_price: Decimal,
    position_limit: i64,
}

impl MarketMaking {
    /// Creates a new `MarketMaking` quoter for one product.
    pub fn new(
        params: MarketMakingParams,
        default_price: Decimal,
        position_limit: i64,
    ) -> Result<Self, StrategyError> {
        if position_limit <= 0 {
            return Err(StrategyError::InvalidParameters(
                "position limit must be positive".to_string(),
            ));
        }
        Ok(Self {
            product: params.product,
            anchor: params.anchor,
            default_price,
            position_limit,
        })
    }

    /// The bid/ask price pair for the current anchor and inventory.
    fn quote_prices(&self, ctx: &TickContext, position: i64) -> Result<(Decimal, Decimal), StrategyError> {
        match self.anchor {
            QuoteAnchor::DefaultPrice => Ok((
                self.default_price - Decimal::ONE,
                self.default_price + Decimal::ONE,
            )),
            QuoteAnchor::Ema => {
                let ema = ctx.ema(self.product)?;
                // Inventory skew: lean the passive side toward the anchor so
                // fills drain the position rather than grow it.
                let (bid, ask) = if position > 0 {
                    (ema - dec!(2), ema)
                } else if position < 0 {
                    (ema, ema + dec!(2))
                } else {
                    (ema - Decimal::ONE, ema + Decimal::ONE)
                };
                Ok((bid.floor(), ask.ceil()))
            }
        }
    }
}

impl Strategy for MarketMaking {
    fn id(&self) -> StrategyId {
        StrategyId::MarketMaking
    }

    /// Emits the two resting quotes for this product.
    ///
    /// Quantities may come out zero when the book is pinned at a limit; the
    /// router drops those.
    fn evaluate(&mut self, ctx: &TickContext) -> Result<Vec<OrderRequest>, StrategyError> {
        let position = ctx.position(self.product);

        let bid_volume = self.position_limit - position;
        let ask_volume = -self.position_limit - position;

        let (bid_price, ask_price) = self.quote_prices(ctx, position)?;
        tracing::debug!(
            product = %self.product,
            position,
            %bid_price,
            %ask_price,
            "market making quotes"
        );

        Ok(vec![
            OrderRequest::new(self.product, bid_price, bid_volume),
            OrderRequest::new(self.product, ask_price, ask_volume),
        ])
    }
}
