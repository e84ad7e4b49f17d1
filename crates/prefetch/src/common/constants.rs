//! Global Prefetcher Constants.
//!
//! Structural parameters that size fixed arrays and therefore cannot come from
//! runtime configuration.

/// Number of deltas retained per delta-correlation entry.
pub const NUM_DELTAS: usize = 16;

/// Delta stored in place of a zero address difference.
///
/// A zero delta would be indistinguishable from an unwritten history slot.
pub const MIN_DELTA: i32 = 1;

/// Upper bound on the configurable delta width in bits.
///
/// Keeps `2^delta_bits` and its negation representable in an `i32`.
pub const MAX_DELTA_BITS: u32 = 30;

/// Range of the uniform draw used for algorithm selection.
pub const SELECTION_RANGE: u32 = 100;
