//! Stride Prefetcher (Reference Prediction Table).
//!
//! Tracks the last miss address and the last stride for each pc. A prefetch
//! for `address + stride` is issued only when the stride just observed repeats
//! the previous one. There is no deeper history, so this predictor detects
//! immediate stride repetition only.
//!
//! # Performance
//!
//! - **Time Complexity:** O(1) per miss plus the table lookup
//! - **Space Complexity:** O(C) for a table of C entries
//! - **Best Case:** Constant-stride array walks
//! - **Worst Case:** Alternating or multi-delta patterns

use crate::config::Config;
use crate::host::{Host, IssueGate};
use crate::prefetch::table::{LruTable, TableEntry};

/// Per-pc stride state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrideEntry {
    /// Tracked pc.
    pc: u64,
    /// Last miss address seen for this pc.
    last_address: u64,
    /// Most recent stride in bytes.
    delta: i64,
}

impl TableEntry for StrideEntry {
    fn new(pc: u64) -> Self {
        Self {
            pc,
            last_address: 0,
            delta: 0,
        }
    }

    fn pc(&self) -> u64 {
        self.pc
    }
}

impl StrideEntry {
    /// Returns the last miss address recorded.
    pub const fn last_address(&self) -> u64 {
        self.last_address
    }

    /// Returns the most recent stride in bytes.
    pub const fn delta(&self) -> i64 {
        self.delta
    }

    /// Handles a miss at `address`.
    ///
    /// If the new stride equals the previous one, `address + stride` is offered
    /// to the host. A repeated stride of zero never prefetches.
    ///
    /// # Returns
    ///
    /// The address handed to the host, if any.
    pub fn on_miss<H: Host + ?Sized>(
        &mut self,
        address: u64,
        host: &mut H,
        gate: &IssueGate,
    ) -> Option<u64> {
        let new_delta = address.wrapping_sub(self.last_address) as i64;

        let mut issued = None;
        if new_delta == self.delta && new_delta != 0 {
            let target = address.wrapping_add_signed(new_delta);
            if gate.try_issue(host, target) {
                issued = Some(target);
            }
        }

        self.delta = new_delta;
        self.last_address = address;
        issued
    }
}

/// LRU table of stride entries.
#[derive(Debug, Clone)]
pub struct StrideTable {
    /// Per-pc stride state.
    entries: LruTable<StrideEntry>,
}

impl StrideTable {
    /// Creates a table tracking at most `capacity` pcs.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruTable::new(capacity),
        }
    }

    /// Creates a table from the stride section of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stride.table_size)
    }

    /// Returns the underlying LRU table.
    pub const fn entries(&self) -> &LruTable<StrideEntry> {
        &self.entries
    }

    /// Returns the entry for `pc`, creating it if necessary, and promotes it to MRU.
    pub fn get_or_create(&mut self, pc: u64) -> &mut StrideEntry {
        self.entries.get_or_create(pc)
    }

    /// Returns the entry for `pc` without changing recency.
    pub fn peek(&self, pc: u64) -> Option<&StrideEntry> {
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

    /// Routes a miss to the entry for `pc`.
    pub fn on_miss<H: Host + ?Sized>(
        &mut self,
        pc: u64,
        address: u64,
        host: &mut H,
        gate: &IssueGate,
    ) -> Option<u64> {
        self.entries.get_or_create(pc).on_miss(address, host, gate)
    }
}
