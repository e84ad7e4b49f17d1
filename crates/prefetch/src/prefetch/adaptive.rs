//! Adaptive predictor selection.
//!
//! The controller owns both tables and routes every miss to the one that is
//! currently active. It counts accesses (`hits`) and accesses served by a
//! prefetched block (`successes`). When `hits` reaches the window length, the
//! ratio is stored as the measured accuracy of the algorithm that ran during the
//! window, both counters restart at `hits = 1, successes = 0`, and the next
//! algorithm is drawn:
//!
//! - The algorithm with the higher measured accuracy is favoured (ties favour
//!   delta correlation).
//! - A uniform draw in `[0, 100)` selects the favoured algorithm iff it is below
//!   `round(100 × accuracy)` of that algorithm, otherwise the other one.
//!
//! Selection is therefore probabilistic: a transient, unrepresentative window
//! cannot lock the controller onto one algorithm.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::common::constants::SELECTION_RANGE;
use crate::common::{AccessStat, ConfigError};
use crate::config::{Algorithm, Config, PredictorMode};
use crate::host::{Host, IssueGate};
use crate::prefetch::dcpt::DeltaCorrelationTable;
use crate::prefetch::stride::StrideTable;
use crate::stats::PrefetchStats;

/// Scales an accuracy in `[0, 1]` to the selection range.
pub fn scaled_accuracy(accuracy: f64) -> u32 {
    (accuracy.clamp(0.0, 1.0) * f64::from(SELECTION_RANGE)).round() as u32
}

/// Chooses the next algorithm from a draw in `[0, 100)` and both accuracies.
pub fn select_algorithm(draw: u32, accuracy_dcpt: f64, accuracy_stride: f64) -> Algorithm {
    if accuracy_dcpt >= accuracy_stride {
        if draw < scaled_accuracy(accuracy_dcpt) {
            Algorithm::DeltaCorrelation
        } else {
            Algorithm::Stride
        }
    } else if draw < scaled_accuracy(accuracy_stride) {
        Algorithm::Stride
    } else {
        Algorithm::DeltaCorrelation
    }
}

/// Meta-controller over the delta-correlation and stride tables.
///
/// Created once per simulation run; all state is dropped with it.
#[derive(Debug)]
pub struct AdaptivePredictor {
    /// Selection mode.
    mode: PredictorMode,
    /// Algorithm handling misses in the current window.
    active: Algorithm,
    /// Delta-correlation table.
    dcpt: DeltaCorrelationTable,
    /// Stride table.
    stride: StrideTable,
    /// Admission checks for every prefetch.
    gate: IssueGate,
    /// Window length in accesses.
    window: u64,
    /// Accesses in the current window, starting at one.
    hits: u64,
    /// Prefetch-served hits in the current window.
    successes: u64,
    /// Last measured accuracy of delta correlation.
    accuracy_dcpt: f64,
    /// Last measured accuracy of the stride table.
    accuracy_stride: f64,
    /// Source of selection draws.
    rng: StdRng,
    /// Run-wide statistics.
    stats: PrefetchStats,
}

impl AdaptivePredictor {
    /// Builds the tables and controller for one simulation run.
    ///
    /// # Errors
    ///
    /// Returns the first constraint of `config` that fails validation.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let adaptive = &config.adaptive;
        let mode = adaptive.mode;
        let active = mode.pinned().unwrap_or(adaptive.initial_algorithm);

        debug!(
            ?mode,
            ?active,
            dcpt_entries = config.dcpt.table_size,
            stride_entries = config.stride.table_size,
            window = adaptive.window,
            "prefetcher initialized"
        );

        Ok(Self {
            mode,
            active,
            dcpt: DeltaCorrelationTable::from_config(config),
            stride: StrideTable::from_config(config),
            gate: IssueGate::from_config(&config.host),
            window: adaptive.window,
            hits: 1,
            successes: 0,
            accuracy_dcpt: adaptive.initial_accuracy,
            accuracy_stride: adaptive.initial_accuracy,
            rng: StdRng::seed_from_u64(adaptive.seed),
            stats: PrefetchStats::default(),
        })
    }

    /// Returns the selection mode.
    pub const fn mode(&self) -> PredictorMode {
        self.mode
    }

    /// Returns the algorithm handling misses in the current window.
    pub const fn active(&self) -> Algorithm {
        self.active
    }

    /// Returns the accesses counted in the current window.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the prefetch-served hits counted in the current window.
    pub const fn successes(&self) -> u64 {
        self.successes
    }

    /// Returns the last measured accuracy of `algorithm`.
    pub const fn accuracy(&self, algorithm: Algorithm) -> f64 {
        match algorithm {
            Algorithm::DeltaCorrelation => self.accuracy_dcpt,
            Algorithm::Stride => self.accuracy_stride,
        }
    }

    /// Returns the delta-correlation table.
    pub const fn dcpt(&self) -> &DeltaCorrelationTable {
        &self.dcpt
    }

    /// Returns the stride table.
    pub const fn stride(&self) -> &StrideTable {
        &self.stride
    }

    /// Returns the run-wide statistics.
    pub const fn stats(&self) -> &PrefetchStats {
        &self.stats
    }

    /// Handles one access reported by the host.
    ///
    /// Counts the access, credits a success if it hit a prefetched block, lets
    /// the active table handle it if it missed, and closes the window when the
    /// access count reaches the window length.
    ///
    /// # Returns
    ///
    /// The prefetch addresses handed to the host for this access.
    pub fn on_access<H: Host + ?Sized>(&mut self, stat: &AccessStat, host: &mut H) -> Vec<u64> {
        self.hits += 1;
        self.stats.accesses += 1;
        if !stat.miss && host.get_prefetch_bit(stat.address) {
            self.successes += 1;
            self.stats.prefetch_hits += 1;
        }

        let issued = if stat.miss {
            self.stats.misses += 1;
            self.handle_miss(stat.pc, stat.address, host)
        } else {
            Vec::new()
        };

        if self.hits >= self.window {
            self.close_window();
        }
        issued
    }

    /// Notifies the controller that a previously issued prefetch has completed.
    ///
    /// Completion does not influence prediction; it is only counted.
    pub fn on_prefetch_completed(&mut self, addr: u64) {
        self.stats.prefetches_completed += 1;
        trace!("prefetch completed: {addr:#x}");
    }

    /// Routes a miss to the active table.
    fn handle_miss<H: Host + ?Sized>(&mut self, pc: u64, address: u64, host: &mut H) -> Vec<u64> {
        match self.active {
            Algorithm::DeltaCorrelation => {
                let issued = self.dcpt.on_miss(pc, address, host, &self.gate);
                self.stats.dcpt_prefetches += issued.len() as u64;
                issued
            }
            Algorithm::Stride => {
                let issued: Vec<u64> = self
                    .stride
                    .on_miss(pc, address, host, &self.gate)
                    .into_iter()
                    .collect();
                self.stats.stride_prefetches += issued.len() as u64;
                issued
            }
        }
    }

    /// Stores the window's accuracy, restarts the counters, and draws the next algorithm.
    fn close_window(&mut self) {
        let accuracy = self.successes as f64 / self.hits as f64;
        match self.active {
            Algorithm::DeltaCorrelation => self.accuracy_dcpt = accuracy,
            Algorithm::Stride => self.accuracy_stride = accuracy,
        }
        self.hits = 1;
        self.successes = 0;
        self.stats.windows += 1;

        let next = match self.mode.pinned() {
            Some(algorithm) => algorithm,
            None => {
                let draw = self.rng.gen_range(0..SELECTION_RANGE);
                select_algorithm(draw, self.accuracy_dcpt, self.accuracy_stride)
            }
        };

        debug!(
            measured = ?self.active,
            accuracy,
            accuracy_dcpt = self.accuracy_dcpt,
            accuracy_stride = self.accuracy_stride,
            selected = ?next,
            "accuracy window closed"
        );

        if next != self.active {
            self.stats.switches += 1;
            self.active = next;
        }
    }
}
