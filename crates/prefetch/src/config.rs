//! Configuration system for the prefetcher.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the prediction engines. It provides:
//! 1. **Defaults:** Reference host limits, table capacities, and delta encoding widths.
//! 2. **Structures:** Hierarchical config for the host, both tables, and the adaptive controller.
//! 3. **Enums:** Predictor algorithm and selection mode.
//! 4. **Validation:** Rejection of parameter combinations the engines cannot honor.
//!
//! Configuration is supplied as JSON (`Config::from_json` / `Config::from_file`) or
//! built from `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;
use crate::common::constants::MAX_DELTA_BITS;

/// Default configuration constants for the prefetcher.
///
/// These values reproduce the reference configuration when not explicitly
/// overridden in a JSON configuration.
mod defaults {
    /// Cache block size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Capacity of the host's prefetch queue.
    pub const MAX_QUEUE_SIZE: usize = 100;

    /// Highest valid physical address (256 MiB of memory).
    pub const MAX_PHYSICAL_ADDRESS: u64 = 256 * 1024 * 1024 - 1;

    /// Delta-correlation table capacity.
    pub const DCPT_TABLE_SIZE: usize = 42;

    /// Width of a stored delta; magnitudes saturate at `2^DELTA_BITS`.
    pub const DELTA_BITS: u32 = 22;

    /// Low-order bits ignored by the partial matcher.
    pub const MASKED_BITS: u32 = 8;

    /// Deltas are measured in units of `BLOCK_SIZE / BLOCK_DIVISOR` bytes.
    ///
    /// A sub-block unit lets the matcher lock on before a full block's worth of
    /// misses has accumulated.
    pub const BLOCK_DIVISOR: u64 = 2;

    /// Stride (reference prediction) table capacity.
    pub const STRIDE_TABLE_SIZE: usize = 128;

    /// Accesses per accuracy measurement window.
    pub const WINDOW: u64 = 800_000;

    /// Accuracy assumed for each algorithm before it has been measured.
    pub const INITIAL_ACCURACY: f64 = 0.5;

    /// Seed for the algorithm selection draw.
    pub const SEED: u64 = 0x5EED_DC97;
}

/// Prediction algorithm driving miss handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Algorithm {
    /// Single-stride reference prediction table.
    ///
    /// Prefetches `address + stride` when the last stride repeats.
    #[default]
    #[serde(alias = "RPT", alias = "Rpt")]
    Stride,
    /// Delta-correlation prediction table.
    ///
    /// Replays the historical continuation of a recurring delta pair.
    #[serde(alias = "DCPT", alias = "Dcpt")]
    DeltaCorrelation,
}

/// How the active algorithm is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PredictorMode {
    /// Re-select the algorithm at every window boundary from measured accuracy.
    #[default]
    Adaptive,
    /// Always use the delta-correlation table.
    #[serde(alias = "DCPT", alias = "Dcpt")]
    DeltaCorrelation,
    /// Always use the stride table.
    #[serde(alias = "RPT", alias = "Rpt")]
    Stride,
}

impl PredictorMode {
    /// Returns the algorithm this mode pins, or `None` for adaptive selection.
    pub const fn pinned(self) -> Option<Algorithm> {
        match self {
            Self::Adaptive => None,
            Self::DeltaCorrelation => Some(Algorithm::DeltaCorrelation),
            Self::Stride => Some(Algorithm::Stride),
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use dcpt_core::config::{Algorithm, Config, PredictorMode};
///
/// let json = r#"{
///     "host": { "block_size": 64, "max_queue_size": 32 },
///     "dcpt": { "table_size": 82, "next_line_fallback": true },
///     "adaptive": { "mode": "Adaptive", "initial_algorithm": "DCPT", "window": 1000 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.host.max_queue_size, 32);
/// assert_eq!(config.dcpt.table_size, 82);
/// assert_eq!(config.stride.table_size, 128);
/// assert_eq!(config.adaptive.mode, PredictorMode::Adaptive);
/// assert_eq!(config.adaptive.initial_algorithm, Algorithm::DeltaCorrelation);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host cache and queue limits
    pub host: HostConfig,
    /// Delta-correlation table parameters
    pub dcpt: DcptConfig,
    /// Stride table parameters
    pub stride: StrideConfig,
    /// Adaptive controller parameters
    pub adaptive: AdaptiveConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation error
    /// reported by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks that every parameter is usable by the prediction engines.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = &self.host;
        if host.block_size == 0 {
            return Err(ConfigError::Zero {
                field: "host.block_size",
            });
        }
        if !host.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(host.block_size));
        }
        if host.max_queue_size == 0 {
            return Err(ConfigError::Zero {
                field: "host.max_queue_size",
            });
        }

        let dcpt = &self.dcpt;
        if dcpt.table_size == 0 {
            return Err(ConfigError::Zero {
                field: "dcpt.table_size",
            });
        }
        if dcpt.block_divisor == 0 {
            return Err(ConfigError::Zero {
                field: "dcpt.block_divisor",
            });
        }
        if dcpt.block_divisor > host.block_size {
            return Err(ConfigError::BlockDivisor {
                divisor: dcpt.block_divisor,
                block_size: host.block_size,
            });
        }
        if dcpt.delta_bits == 0 || dcpt.delta_bits > MAX_DELTA_BITS {
            return Err(ConfigError::DeltaBits {
                bits: dcpt.delta_bits,
                max: MAX_DELTA_BITS,
            });
        }
        if dcpt.masked_bits >= dcpt.delta_bits {
            return Err(ConfigError::MaskedBits {
                masked: dcpt.masked_bits,
                bits: dcpt.delta_bits,
            });
        }

        if self.stride.table_size == 0 {
            return Err(ConfigError::Zero {
                field: "stride.table_size",
            });
        }

        let adaptive = &self.adaptive;
        if adaptive.window == 0 {
            return Err(ConfigError::Zero {
                field: "adaptive.window",
            });
        }
        if !(0.0..=1.0).contains(&adaptive.initial_accuracy) {
            return Err(ConfigError::Accuracy(adaptive.initial_accuracy));
        }
        Ok(())
    }
}

/// Limits imposed by the host memory system.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Cache block size in bytes
    #[serde(default = "HostConfig::default_block_size")]
    pub block_size: u64,

    /// Prefetch queue capacity; no prefetch is issued while the queue is full
    #[serde(default = "HostConfig::default_max_queue_size")]
    pub max_queue_size: usize,

    /// Prefetches at or above this address are never issued
    #[serde(default = "HostConfig::default_max_physical_address")]
    pub max_physical_address: u64,
}

impl HostConfig {
    /// Returns the default block size in bytes.
    const fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default prefetch queue capacity.
    const fn default_max_queue_size() -> usize {
        defaults::MAX_QUEUE_SIZE
    }

    /// Returns the default physical address bound.
    const fn default_max_physical_address() -> u64 {
        defaults::MAX_PHYSICAL_ADDRESS
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            block_size: Self::default_block_size(),
            max_queue_size: Self::default_max_queue_size(),
            max_physical_address: Self::default_max_physical_address(),
        }
    }
}

/// Delta-correlation table configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DcptConfig {
    /// Maximum number of tracked pcs
    #[serde(default = "DcptConfig::default_table_size")]
    pub table_size: usize,

    /// Stored delta width in bits (magnitudes saturate at `2^delta_bits`)
    #[serde(default = "DcptConfig::default_delta_bits")]
    pub delta_bits: u32,

    /// Low-order delta bits ignored by partial matching
    #[serde(default = "DcptConfig::default_masked_bits")]
    pub masked_bits: u32,

    /// Delta unit is `block_size / block_divisor` bytes
    #[serde(default = "DcptConfig::default_block_divisor")]
    pub block_divisor: u64,

    /// Prefetch the next block when no delta pattern matches
    #[serde(default)]
    pub next_line_fallback: bool,
}

impl DcptConfig {
    /// Returns the default table capacity.
    const fn default_table_size() -> usize {
        defaults::DCPT_TABLE_SIZE
    }

    /// Returns the default delta width in bits.
    const fn default_delta_bits() -> u32 {
        defaults::DELTA_BITS
    }

    /// Returns the default number of masked low bits.
    const fn default_masked_bits() -> u32 {
        defaults::MASKED_BITS
    }

    /// Returns the default block divisor.
    const fn default_block_divisor() -> u64 {
        defaults::BLOCK_DIVISOR
    }
}

impl Default for DcptConfig {
    fn default() -> Self {
        Self {
            table_size: Self::default_table_size(),
            delta_bits: Self::default_delta_bits(),
            masked_bits: Self::default_masked_bits(),
            block_divisor: Self::default_block_divisor(),
            next_line_fallback: false,
        }
    }
}

/// Stride table configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StrideConfig {
    /// Maximum number of tracked pcs
    #[serde(default = "StrideConfig::default_table_size")]
    pub table_size: usize,
}

impl StrideConfig {
    /// Returns the default table capacity.
    const fn default_table_size() -> usize {
        defaults::STRIDE_TABLE_SIZE
    }
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            table_size: Self::default_table_size(),
        }
    }
}

/// Adaptive controller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdaptiveConfig {
    /// Selection mode
    #[serde(default)]
    pub mode: PredictorMode,

    /// Algorithm active before the first window closes (adaptive mode only)
    #[serde(default)]
    pub initial_algorithm: Algorithm,

    /// Accesses per accuracy measurement window
    #[serde(default = "AdaptiveConfig::default_window")]
    pub window: u64,

    /// Accuracy assumed for both algorithms before measurement
    #[serde(default = "AdaptiveConfig::default_initial_accuracy")]
    pub initial_accuracy: f64,

    /// Seed for the selection draw
    #[serde(default = "AdaptiveConfig::default_seed")]
    pub seed: u64,
}

impl AdaptiveConfig {
    /// Returns the default window length.
    const fn default_window() -> u64 {
        defaults::WINDOW
    }

    /// Returns the default initial accuracy.
    const fn default_initial_accuracy() -> f64 {
        defaults::INITIAL_ACCURACY
    }

    /// Returns the default selection seed.
    const fn default_seed() -> u64 {
        defaults::SEED
    }
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            mode: PredictorMode::default(),
            initial_algorithm: Algorithm::default(),
            window: Self::default_window(),
            initial_accuracy: Self::default_initial_accuracy(),
            seed: Self::default_seed(),
        }
    }
}
