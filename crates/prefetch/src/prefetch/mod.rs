//! Prediction engines.
//!
//! This module contains the per-pc tables and the controller that chooses
//! between them:
//! 1. **Table:** Bounded LRU storage shared by both predictors.
//! 2. **DCPT:** Delta-correlating prediction over a 16-delta history.
//! 3. **Stride:** Single-stride reference prediction.
//! 4. **Adaptive:** Accuracy-weighted selection between the two.

/// Adaptive selection between the delta-correlation and stride tables.
pub mod adaptive;

/// Delta-correlating prediction table.
pub mod dcpt;

/// Stride (reference prediction) table.
pub mod stride;

/// Generic per-pc LRU table.
pub mod table;

pub use self::adaptive::{AdaptivePredictor, scaled_accuracy, select_algorithm};
pub use self::dcpt::{DeltaCorrelationTable, DeltaHistoryEntry, DeltaIndex, DeltaParams, LOOKAHEAD};
pub use self::stride::{StrideEntry, StrideTable};
pub use self::table::{LruTable, TableEntry};
pub use crate::config::{Algorithm, PredictorMode};
