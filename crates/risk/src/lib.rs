//! # Atoll Risk
//!
//! The last gate between strategy intent and the outgoing order set: every
//! requested order is clamped against the instrument's hard position limit
//! before it leaves the engine.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on
//!   `core-types` and `configuration`.
//! - **Stateless Routing:** The router holds nothing but the static limit
//!   table; clamping a tick's orders has no side effects beyond the returned
//!   list.

pub mod error;
pub mod router;

pub use error::RiskError;
pub use router::OrderRouter;
