//! Prefetcher statistics collection and reporting.
//!
//! This module tracks run-wide metrics for the prefetcher. It provides:
//! 1. **Traffic:** Accesses and misses reported by the host.
//! 2. **Usefulness:** Hits served by prefetched blocks, and completed prefetches.
//! 3. **Issuance:** Prefetches handed to the host, per algorithm.
//! 4. **Selection:** Windows evaluated and algorithm switches.
//!
//! Unlike the per-window counters of the adaptive controller, these counters are
//! never reset during a run.

use std::time::Instant;

/// Run-wide prefetcher statistics.
#[derive(Clone, Debug)]
pub struct PrefetchStats {
    start_time: Instant,
    /// Accesses reported by the host.
    pub accesses: u64,
    /// Accesses that missed in the cache.
    pub misses: u64,
    /// Hits on blocks that carried the prefetch mark.
    pub prefetch_hits: u64,
    /// Prefetches issued by the delta-correlation table.
    pub dcpt_prefetches: u64,
    /// Prefetches issued by the stride table.
    pub stride_prefetches: u64,
    /// Prefetches the host reported as completed.
    pub prefetches_completed: u64,
    /// Accuracy windows evaluated.
    pub windows: u64,
    /// Window boundaries at which the active algorithm changed.
    pub switches: u64,
}

impl Default for PrefetchStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            accesses: 0,
            misses: 0,
            prefetch_hits: 0,
            dcpt_prefetches: 0,
            stride_prefetches: 0,
            prefetches_completed: 0,
            windows: 0,
            switches: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"predictor"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "predictor"];

impl PrefetchStats {
    /// Returns the total number of prefetches issued.
    pub const fn prefetches_issued(&self) -> u64 {
        self.dcpt_prefetches + self.stride_prefetches
    }

    /// Returns the fraction of issued prefetches later hit, or 0 if none were issued.
    pub fn accuracy(&self) -> f64 {
        let issued = self.prefetches_issued();
        if issued == 0 {
            0.0
        } else {
            self.prefetch_hits as f64 / issued as f64
        }
    }

    /// Returns the fraction of accesses that missed, or 0 if there were none.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        println!("\n==========================================================");
        println!("PREFETCHER STATISTICS");
        println!("==========================================================");
        if want("summary") {
            println!("host_seconds             {seconds:.4} s");
            println!("accesses                 {}", self.accesses);
            println!("misses                   {}", self.misses);
            println!("miss_rate                {:.2}%", self.miss_rate() * 100.0);
            println!("----------------------------------------------------------");
        }
        if want("predictor") {
            println!("PREDICTOR");
            println!("  pf.issued              {}", self.prefetches_issued());
            println!("  pf.issued.dcpt         {}", self.dcpt_prefetches);
            println!("  pf.issued.stride       {}", self.stride_prefetches);
            println!("  pf.completed           {}", self.prefetches_completed);
            println!("  pf.useful              {}", self.prefetch_hits);
            println!("  pf.accuracy            {:.2}%", self.accuracy() * 100.0);
            println!("  sel.windows            {}", self.windows);
            println!("  sel.switches           {}", self.switches);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
