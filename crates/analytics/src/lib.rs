//! # Atoll Analytics
//!
//! Numerical building blocks for the decision engine: rolling-window
//! statistics and the append-only price history.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure calculation crate. It has no knowledge
//!   of order books, strategies, or execution. It depends only on
//!   `core-types`.
//! - **O(1) per tick:** every statistic is maintained incrementally
//!   (running sum / sum-of-squares over a fixed-capacity buffer) so per-tick
//!   cost does not grow with window size or session length.
//!
//! ## Public API
//!
//! - `RollingWindow`: fixed-capacity window with O(1) mean and stddev.
//! - `PriceHistory`: append-only per-product price series plus the derived
//!   hedge-weighted spread series.
//! - `AnalyticsError`: the specific error types this crate can return.

// Declare the modules that constitute this crate.
pub mod error;
pub mod history;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use history::{PriceHistory, PricePoint};
pub use window::RollingWindow;
