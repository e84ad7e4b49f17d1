//! Delta-correlating prefetcher library.
//!
//! This crate models the prediction side of a hardware data prefetcher that is driven
//! by a surrounding memory-system simulator. It provides the following:
//! 1. **Delta correlation:** Per-pc circular delta histories searched for recurring
//!    delta pairs, with full and partial (jitter-tolerant) matching.
//! 2. **Stride prediction:** A per-pc reference prediction table that prefetches on
//!    an immediately repeated stride.
//! 3. **Adaptive selection:** A meta-controller that measures prefetch accuracy per
//!    window and re-selects the active predictor with accuracy-weighted probability.
//! 4. **Host contract:** The `Host` trait through which the simulator exposes its
//!    cache, miss queue, and prefetch bits, plus the gates applied before issuance.
//! 5. **Support:** Configuration, statistics, and error types.

/// Common types (modular index, access records, constants, errors).
pub mod common;
/// Prefetcher configuration (defaults, enums, validation).
pub mod config;
/// Host-side collaborator contract and prefetch issuance gates.
pub mod host;
/// Prediction engines (LRU tables, delta correlation, stride, adaptive controller).
pub mod prefetch;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// One memory access event as reported by the host.
pub use crate::common::AccessStat;
/// Host collaborator trait implemented by the surrounding simulator.
pub use crate::host::Host;
/// Top-level predictor; construct once per simulation run.
pub use crate::prefetch::AdaptivePredictor;
