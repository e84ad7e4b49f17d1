//! Common utilities and types used throughout the prefetcher.
//!
//! This module provides the building blocks shared by the prediction engines:
//! 1. **Modular Index:** A wrapping cursor for fixed-size circular buffers.
//! 2. **Access Records:** The per-access event reported by the host.
//! 3. **Constants:** Fixed structural parameters of the delta history.
//! 4. **Error Handling:** Configuration errors.

/// Fixed structural constants.
pub mod constants;

/// Memory access event definitions.
pub mod data;

/// Error types.
pub mod error;

/// Modular (wrapping) index type.
pub mod modint;

pub use constants::NUM_DELTAS;
pub use data::AccessStat;
pub use error::ConfigError;
pub use modint::ModularIndex;
