use core_types::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One resolved price fact: a product's mid at a tick. Append-only, never
/// revised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub price: Decimal,
}

/// The hedge-weighted spread between two products, recomputed incrementally
/// as price points arrive.
///
/// Invariant: the spread series is exactly as long as the shorter of the two
/// leg series.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpreadSeries {
    leg_a: Product,
    leg_b: Product,
    hedge_ratio: Decimal,
    values: Vec<PricePoint>,
}

/// Append-only rolling record of resolved mid prices per product.
///
/// The engine records one point per product per tick; strategies read but
/// never write. When a pair is configured, the derived spread
/// `mid(leg_b) - hedge_ratio * mid(leg_a)` is extended automatically as soon
/// as both legs have a point for the tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    series: HashMap<Product, Vec<PricePoint>>,
    spread: Option<SpreadSeries>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables spread tracking for a product pair.
    pub fn track_spread(&mut self, leg_a: Product, leg_b: Product, hedge_ratio: Decimal) {
        self.spread = Some(SpreadSeries {
            leg_a,
            leg_b,
            hedge_ratio,
            values: Vec::new(),
        });
    }

    /// Appends one price point and extends the spread series if both legs
    /// have caught up.
    pub fn record(&mut self, product: Product, timestamp: i64, price: Decimal) {
        self.series
            .entry(product)
            .or_default()
            .push(PricePoint { timestamp, price });

        if let Some(spread) = self.spread.as_mut() {
            let len_a = self.series.get(&spread.leg_a).map_or(0, Vec::len);
            let len_b = self.series.get(&spread.leg_b).map_or(0, Vec::len);
            while spread.values.len() < len_a.min(len_b) {
                let index = spread.values.len();
                let a = self.series[&spread.leg_a][index];
                let b = self.series[&spread.leg_b][index];
                spread.values.push(PricePoint {
                    timestamp: b.timestamp,
                    price: b.price - spread.hedge_ratio * a.price,
                });
            }
        }
    }

    /// Most recent recorded price for a product.
    pub fn latest(&self, product: Product) -> Option<Decimal> {
        self.series
            .get(&product)
            .and_then(|points| points.last())
            .map(|point| point.price)
    }

    /// Number of points recorded for a product.
    pub fn len(&self, product: Product) -> usize {
        self.series.get(&product).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, product: Product) -> bool {
        self.len(product) == 0
    }

    /// Most recent spread value, if a pair is tracked and both legs have
    /// at least one point.
    pub fn spread_latest(&self) -> Option<Decimal> {
        self.spread
            .as_ref()
            .and_then(|spread| spread.values.last())
            .map(|point| point.price)
    }

    /// Length of the derived spread series.
    pub fn spread_len(&self) -> usize {
        self.spread.as_ref().map_or(0, |spread| spread.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn spread_tracks_shorter_leg() {
        let mut history = PriceHistory::new();
        history.track_spread(Product::Cacao, Product::Cordial, dec!(1.5));

        history.record(Product::Cacao, 100, dec!(8000));
        assert_eq!(history.spread_len(), 0);

        history.record(Product::Cordial, 100, dec!(15000));
        assert_eq!(history.spread_len(), 1);
        // 15000 - 1.5 * 8000 = 3000
        assert_eq!(history.spread_latest(), Some(dec!(3000)));

        // Leg A runs ahead; spread must not.
        history.record(Product::Cacao, 200, dec!(8100));
        history.record(Product::Cacao, 300, dec!(8200));
        assert_eq!(history.spread_len(), 1);

        history.record(Product::Cordial, 200, dec!(15075));
        assert_eq!(history.spread_len(), 2);
        assert_eq!(history.spread_latest(), Some(dec!(-75)));
    }

    #[test]
    fn latest_and_len_per_product() {
        let mut history = PriceHistory::new();
        assert_eq!(history.latest(Product::Guava), None);

        history.record(Product::Guava, 0, dec!(3900));
        history.record(Product::Guava, 100, dec!(3905));
        assert_eq!(history.len(Product::Guava), 2);
        assert_eq!(history.latest(Product::Guava), Some(dec!(3905)));
        assert!(history.is_empty(Product::Sextant));
    }
}
