//! Configuration error definitions.
//!
//! Prediction itself never fails: degenerate deltas are normalized and rejected
//! prefetches are dropped. The only fallible step is building a predictor from a
//! configuration, which is reported through [`ConfigError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for the config schema.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A size or count that must be at least one was zero.
    #[error("{field} must be non-zero")]
    Zero {
        /// Dotted name of the offending field.
        field: &'static str,
    },

    /// The cache block size is not a power of two.
    #[error("block size {0} is not a power of two")]
    BlockSize(u64),

    /// The delta unit divisor does not fit in the block size.
    #[error("block divisor {divisor} exceeds block size {block_size}")]
    BlockDivisor {
        /// Configured divisor.
        divisor: u64,
        /// Configured block size.
        block_size: u64,
    },

    /// The delta width is outside the supported range.
    #[error("delta width {bits} outside 1..={max}")]
    DeltaBits {
        /// Configured width.
        bits: u32,
        /// Largest supported width.
        max: u32,
    },

    /// The partial-match mask would cover the whole delta.
    #[error("masked bits {masked} must be below delta width {bits}")]
    MaskedBits {
        /// Configured number of masked low bits.
        masked: u32,
        /// Configured delta width.
        bits: u32,
    },

    /// The initial accuracy is not a probability.
    #[error("initial accuracy {0} outside [0, 1]")]
    Accuracy(f64),
}
