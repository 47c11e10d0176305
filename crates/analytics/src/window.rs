use crate::error::AnalyticsError;
use std::collections::VecDeque;

/// A fixed-capacity rolling window with incrementally maintained running sum
/// and sum-of-squares.
///
/// Pushing is O(1) and so are `mean` and `std_dev`, regardless of capacity.
/// Both statistics are deliberately undefined until the window is full: a
/// partially warmed window would otherwise leak unstable early estimates into
/// entry decisions.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindow {
    /// Creates a window holding the trailing `capacity` observations.
    pub fn new(capacity: usize) -> Result<Self, AnalyticsError> {
        if capacity == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "rolling window capacity must be nonzero".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            sum: 0.0,
            sum_sq: 0.0,
        })
    }

    /// Appends an observation, evicting the oldest once at capacity.
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
                self.sum_sq -= evicted * evicted;
            }
        }
        self.values.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Mean over the full window; `None` while still warming up.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.sum / self.capacity as f64)
    }

    /// Sample standard deviation over the full window; `None` while warming
    /// up or when the window holds a single observation.
    pub fn std_dev(&self) -> Option<f64> {
        if !self.is_full() || self.capacity < 2 {
            return None;
        }
        let n = self.capacity as f64;
        // Running-sum variance can dip fractionally below zero; clamp it.
        let variance = ((self.sum_sq - self.sum * self.sum / n) / (n - 1.0)).max(0.0);
        Some(variance.sqrt())
    }
}
