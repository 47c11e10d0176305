use crate::error::RiskError;
use configuration::Config;
use core_types::{OrderRequest, Product};
use std::collections::HashMap;

/// Clamps every requested order against the instrument's hard position limit.
///
/// Buys and sells are accounted separately within a tick, the way the
/// exchange checks them: the reported position plus all accepted buys must
/// stay at or below `+limit`, and the position minus all accepted sells at or
/// above `-limit`. A two-sided quote therefore passes intact even though its
/// legs could not both fill. Requests that clamp to zero are dropped.
#[derive(Debug, Clone)]
pub struct OrderRouter {
    limits: HashMap<Product, i64>,
}

impl OrderRouter {
    /// Creates a router from the validated configuration.
    pub fn new(config: &Config) -> Result<Self, RiskError> {
        let mut limits = HashMap::new();
        for product in Product::ALL {
            let instrument = config.instrument(product).ok_or_else(|| {
                RiskError::InvalidParameters(format!("no instrument settings for {}", product))
            })?;
            if instrument.position_limit <= 0 {
                return Err(RiskError::InvalidParameters(format!(
                    "position limit for {} must be positive",
                    product
                )));
            }
            limits.insert(product, instrument.position_limit);
        }
        Ok(Self { limits })
    }

    /// Clamps one tick's worth of requested orders. Side-effect free: the
    /// router owns no state beyond the static limits.
    pub fn route(
        &self,
        requests: Vec<OrderRequest>,
        positions: &HashMap<Product, i64>,
    ) -> Vec<OrderRequest> {
        // Accepted magnitudes so far, per product and side.
        let mut bought: HashMap<Product, i64> = HashMap::new();
        let mut sold: HashMap<Product, i64> = HashMap::new();
        let mut routed = Vec::with_capacity(requests.len());

        for mut request in requests {
            let Some(&limit) = self.limits.get(&request.product) else {
                tracing::warn!(product = %request.product, "dropping order for unknown product");
                continue;
            };
            let position = positions.get(&request.product).copied().unwrap_or(0);

            if request.quantity > 0 {
                let taken = bought.entry(request.product).or_insert(0);
                let headroom = (limit - position - *taken).max(0);
                request.quantity = request.quantity.min(headroom);
                *taken += request.quantity;
            } else {
                let taken = sold.entry(request.product).or_insert(0);
                let headroom = (limit + position - *taken).max(0);
                request.quantity = request.quantity.max(-headroom);
                *taken += -request.quantity;
            }

            if request.quantity == 0 {
                continue;
            }
            routed.push(request);
        }

        routed
    }
}
