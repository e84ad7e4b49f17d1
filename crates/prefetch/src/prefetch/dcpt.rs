//! Delta-Correlating Prediction Table (DCPT).
//!
//! Each tracked pc keeps a circular history of the deltas between its
//! successive miss addresses. On every miss the two most recent deltas are
//! searched for further back in the history. If the pair recurred, the deltas
//! that followed it last time are replayed from the current address to produce
//! prefetch candidates.
//!
//! Matching runs in two passes:
//! 1. **Full match:** both deltas of a historical pair equal the current pair.
//! 2. **Partial match:** only if no full match exists; the low `masked_bits` of
//!    every delta are ignored, tolerating jitter in otherwise regular strides.
//!
//! In both passes the most recent matching pair wins. The deltas that followed
//! it, up to the newest one, form the period that is replayed until
//! [`LOOKAHEAD`] candidates exist, so a steady stream keeps one prefetch per
//! miss a full history ahead of the access.
//!
//! # Performance
//!
//! - **Time Complexity:** O(N) per miss, N = 16 history slots
//! - **Space Complexity:** O(C × N) for a table of C entries
//! - **Best Case:** Repeating multi-delta patterns (strided loops over structs, tiled kernels)
//! - **Worst Case:** Pointer chasing without recurring deltas

use crate::common::ModularIndex;
use crate::common::constants::{MAX_DELTA_BITS, MIN_DELTA, NUM_DELTAS};
use crate::config::Config;
use crate::host::{Host, IssueGate};
use crate::prefetch::table::{LruTable, TableEntry};

/// Cursor into a delta history.
pub type DeltaIndex = ModularIndex<NUM_DELTAS>;

/// Mask that keeps every delta bit.
const FULL_MASK: i32 = !0;

/// Candidates extrapolated per match.
pub const LOOKAHEAD: usize = NUM_DELTAS - 1;

/// Delta encoding parameters shared by every entry of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaParams {
    /// Bytes per delta unit.
    unit: u64,
    /// Largest storable delta magnitude.
    max_delta: i32,
    /// Mask applied by the partial matcher.
    partial_mask: i32,
}

impl DeltaParams {
    /// Creates delta parameters.
    ///
    /// # Arguments
    ///
    /// * `block_size` - Cache block size in bytes.
    /// * `block_divisor` - Deltas count units of `block_size / block_divisor` bytes.
    /// * `delta_bits` - Magnitudes saturate at `2^delta_bits`.
    /// * `masked_bits` - Low-order bits ignored by partial matching.
    pub fn new(block_size: u64, block_divisor: u64, delta_bits: u32, masked_bits: u32) -> Self {
        let delta_bits = delta_bits.min(MAX_DELTA_BITS);
        let masked_bits = masked_bits.min(delta_bits);
        Self {
            unit: (block_size / block_divisor.max(1)).max(1),
            max_delta: 1 << delta_bits,
            partial_mask: !((1 << masked_bits) - 1),
        }
    }

    /// Creates delta parameters from the host and DCPT sections of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.host.block_size,
            config.dcpt.block_divisor,
            config.dcpt.delta_bits,
            config.dcpt.masked_bits,
        )
    }

    /// Returns the number of bytes per delta unit.
    pub const fn unit(&self) -> u64 {
        self.unit
    }

    /// Returns the saturation magnitude.
    pub const fn max_delta(&self) -> i32 {
        self.max_delta
    }

    /// Returns the partial-match mask.
    pub const fn partial_mask(&self) -> i32 {
        self.partial_mask
    }

    /// Converts the step from `from` to `to` into a stored delta.
    ///
    /// The byte difference is divided into units, saturated at `±max_delta`, and
    /// a zero result is replaced by [`MIN_DELTA`].
    pub fn quantize(&self, from: u64, to: u64) -> i32 {
        let raw = (to.wrapping_sub(from) as i64) / self.unit as i64;
        let max = i64::from(self.max_delta);
        match raw.clamp(-max, max) {
            0 => MIN_DELTA,
            delta => delta as i32,
        }
    }

    /// Converts a stored delta back into a byte offset.
    pub fn offset(&self, delta: i32) -> i64 {
        i64::from(delta) * self.unit as i64
    }
}

impl Default for DeltaParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Per-pc delta history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaHistoryEntry {
    /// Tracked pc.
    pc: u64,
    /// Last miss address seen for this pc.
    last_address: u64,
    /// Last address this entry issued a prefetch for.
    last_prefetch: Option<u64>,
    /// Circular delta history. Zero marks a slot that was never written.
    deltas: [i32; NUM_DELTAS],
    /// Next slot to write.
    cursor: DeltaIndex,
}

impl TableEntry for DeltaHistoryEntry {
    fn new(pc: u64) -> Self {
        Self {
            pc,
            last_address: 0,
            last_prefetch: None,
            deltas: [0; NUM_DELTAS],
            cursor: DeltaIndex::default(),
        }
    }

    fn pc(&self) -> u64 {
        self.pc
    }
}

impl DeltaHistoryEntry {
    /// Returns the last miss address recorded.
    pub const fn last_address(&self) -> u64 {
        self.last_address
    }

    /// Returns the last address this entry issued a prefetch for.
    pub const fn last_prefetch(&self) -> Option<u64> {
        self.last_prefetch
    }

    /// Returns the slot the next delta will be written to.
    pub const fn cursor(&self) -> DeltaIndex {
        self.cursor
    }

    /// Returns the recorded deltas from oldest to newest.
    pub fn deltas(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(NUM_DELTAS);
        let mut i = self.cursor;
        for _ in 0..NUM_DELTAS {
            let delta = self.deltas[i.value()];
            if delta != 0 {
                out.push(delta);
            }
            i.increment();
        }
        out
    }

    /// Records a miss and returns the filtered prefetch candidates.
    ///
    /// # Returns
    ///
    /// `None` if no delta pair matched. Otherwise the extrapolated candidates,
    /// minus every candidate up to and including the last issued prefetch.
    pub fn observe(&mut self, address: u64, params: &DeltaParams) -> Option<Vec<u64>> {
        let delta = params.quantize(self.last_address, address);
        let newest = self.cursor;
        let start = newest - 1;

        self.deltas[newest.value()] = delta;
        self.cursor.increment();
        self.last_address = address;

        let previous = self.deltas[start.value()];
        if previous == 0 {
            return None;
        }

        let matched = self
            .find_match(start, previous, delta, FULL_MASK)
            .or_else(|| self.find_match(start, previous, delta, params.partial_mask))?;

        Some(self.filter(self.extrapolate(matched, newest, params)))
    }

    /// Issues `candidates` in order through `gate`.
    ///
    /// Every accepted candidate becomes the new last prefetch.
    ///
    /// # Returns
    ///
    /// The addresses handed to the host.
    pub fn issue<H: Host + ?Sized>(
        &mut self,
        candidates: &[u64],
        host: &mut H,
        gate: &IssueGate,
    ) -> Vec<u64> {
        let mut issued = Vec::with_capacity(candidates.len());
        for &addr in candidates {
            if gate.try_issue(host, addr) {
                self.last_prefetch = Some(addr);
                issued.push(addr);
            }
        }
        issued
    }

    /// Handles a miss: records the delta, searches for a pattern, and issues
    /// the surviving candidates.
    ///
    /// # Returns
    ///
    /// The addresses handed to the host; empty if no pattern matched.
    pub fn on_miss<H: Host + ?Sized>(
        &mut self,
        address: u64,
        params: &DeltaParams,
        host: &mut H,
        gate: &IssueGate,
    ) -> Vec<u64> {
        match self.observe(address, params) {
            Some(candidates) => self.issue(&candidates, host, gate),
            None => Vec::new(),
        }
    }

    /// Scans backwards from `start` for the most recent pair equal to
    /// `(previous, newest)` under `mask`.
    ///
    /// The current pair itself and pairs touching an unwritten slot are skipped.
    /// Returns the index of the second delta of the matching pair.
    fn find_match(
        &self,
        start: DeltaIndex,
        previous: i32,
        newest: i32,
        mask: i32,
    ) -> Option<DeltaIndex> {
        let (a, b) = (previous & mask, newest & mask);
        let mut i = start;
        while i != self.cursor {
            let older = self.deltas[(i - 1).value()];
            let newer = self.deltas[i.value()];
            if older != 0 && newer != 0 && older & mask == a && newer & mask == b {
                return Some(i);
            }
            i.decrement();
        }
        None
    }

    /// Replays the deltas after `matched` up to and including `newest`,
    /// repeating that period until [`LOOKAHEAD`] candidates have been
    /// accumulated from the current address.
    fn extrapolate(&self, matched: DeltaIndex, newest: DeltaIndex, params: &DeltaParams) -> Vec<u64> {
        let first = matched + 1;
        let mut candidates = Vec::with_capacity(LOOKAHEAD);
        let mut addr = self.last_address;
        let mut i = first;
        while candidates.len() < LOOKAHEAD {
            addr = addr.wrapping_add_signed(params.offset(self.deltas[i.value()]));
            candidates.push(addr);
            i = if i == newest { first } else { i + 1 };
        }
        candidates
    }

    /// Drops every candidate up to and including the last issued prefetch.
    fn filter(&self, mut candidates: Vec<u64>) -> Vec<u64> {
        let last = self.last_prefetch;
        match candidates.iter().rposition(|&c| Some(c) == last) {
            Some(pos) => candidates.split_off(pos + 1),
            None => candidates,
        }
    }
}

/// LRU table of delta histories.
#[derive(Debug, Clone)]
pub struct DeltaCorrelationTable {
    /// Per-pc histories.
    entries: LruTable<DeltaHistoryEntry>,
    /// Delta encoding shared by all entries.
    params: DeltaParams,
    /// Cache block size in bytes, used by the next-line fallback.
    block_size: u64,
    /// Prefetch the next block when no pattern matches.
    next_line_fallback: bool,
}

impl DeltaCorrelationTable {
    /// Creates a table without next-line fallback.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of tracked pcs.
    /// * `params` - Delta encoding parameters.
    pub fn new(capacity: usize, params: DeltaParams) -> Self {
        Self {
            entries: LruTable::new(capacity),
            params,
            block_size: 0,
            next_line_fallback: false,
        }
    }

    /// Enables prefetching `address + block_size` when no pattern matches.
    #[must_use]
    pub fn with_next_line_fallback(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self.next_line_fallback = true;
        self
    }

    /// Creates a table from the host and DCPT sections of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            entries: LruTable::new(config.dcpt.table_size),
            params: DeltaParams::from_config(config),
            block_size: config.host.block_size,
            next_line_fallback: config.dcpt.next_line_fallback,
        }
    }

    /// Returns the delta encoding parameters.
    pub const fn params(&self) -> &DeltaParams {
        &self.params
    }

    /// Returns the underlying LRU table.
    pub const fn entries(&self) -> &LruTable<DeltaHistoryEntry> {
        &self.entries
    }

    /// Returns the history for `pc`, creating it if necessary, and promotes it to MRU.
    pub fn get_or_create(&mut self, pc: u64) -> &mut DeltaHistoryEntry {
        self.entries.get_or_create(pc)
    }

    /// Returns the history for `pc` without changing recency.
    pub fn peek(&self, pc: u64) -> Option<&DeltaHistoryEntry> {
        self.entries.peek(pc)
    }

    /// Returns `true` if `pc` is tracked.
    pub fn contains(&self, pc: u64) -> bool {
        self.entries.contains(pc)
    }

    /// Returns the number of tracked pcs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no pc is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes a miss to the history for `pc`.
    ///
    /// # Returns
    ///
    /// The addresses handed to the host.
    pub fn on_miss<H: Host + ?Sized>(
        &mut self,
        pc: u64,
        address: u64,
        host: &mut H,
        gate: &IssueGate,
    ) -> Vec<u64> {
        let params = self.params;
        let fallback = self
            .next_line_fallback
            .then_some(address.wrapping_add(self.block_size));
        let entry = self.entries.get_or_create(pc);
        match (entry.observe(address, &params), fallback) {
            (Some(candidates), _) => entry.issue(&candidates, host, gate),
            (None, Some(next_line)) => entry.issue(&[next_line], host, gate),
            (None, None) => Vec::new(),
        }
    }
}
