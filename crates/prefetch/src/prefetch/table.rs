//! Least-Recently-Used per-pc table.
//!
//! Both predictors keep their per-pc state in a bounded table ordered by
//! recency. Entries live in a slot arena that never moves; a usage stack of slot
//! indices records recency (index 0 is MRU, the last index is LRU) and a pc map
//! gives constant-time lookup.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `get_or_create()`: O(C) for the usage-stack shuffle, O(1) lookup
//!   - `peek()`: O(1)
//! - **Space Complexity:** O(C) where C is the table capacity (tens to hundreds of entries)

use std::collections::HashMap;

use tracing::trace;

/// Per-pc state stored in an [`LruTable`].
pub trait TableEntry {
    /// Creates the initial state for a newly tracked pc.
    fn new(pc: u64) -> Self;

    /// Returns the pc this entry tracks.
    fn pc(&self) -> u64;
}

/// Bounded, recency-ordered collection of per-pc entries.
///
/// Each pc appears at most once. Inserting into a full table evicts the least
/// recently used entry first, so the length never exceeds the capacity.
#[derive(Debug, Clone)]
pub struct LruTable<E> {
    /// Entry arena; slot indices are stable for the lifetime of an entry.
    entries: Vec<E>,
    /// Maps a tracked pc to its slot.
    slots: HashMap<u64, usize>,
    /// Slot usage stack. Index 0 is MRU, last index is LRU.
    usage: Vec<usize>,
    /// Maximum number of entries.
    capacity: usize,
}

impl<E: TableEntry> LruTable<E> {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of tracked pcs.
    ///
    /// Validated configurations never pass zero; a zero capacity is clamped to
    /// one so that a directly built table still accepts an entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            usage: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of tracked pcs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no pc is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `pc` is tracked.
    pub fn contains(&self, pc: u64) -> bool {
        self.slots.contains_key(&pc)
    }

    /// Returns the entry for `pc` without changing recency.
    pub fn peek(&self, pc: u64) -> Option<&E> {
        self.slots.get(&pc).map(|&slot| &self.entries[slot])
    }

    /// Returns the entry for `pc` and promotes it to MRU, without creating one.
    pub fn get(&mut self, pc: u64) -> Option<&mut E> {
        let slot = self.slots.get(&pc).copied()?;
        self.touch(slot);
        Some(&mut self.entries[slot])
    }

    /// Returns the entry for `pc`, creating it if necessary, and promotes it to MRU.
    ///
    /// When a new entry is needed and the table is full, the LRU entry is
    /// evicted and its slot reused.
    pub fn get_or_create(&mut self, pc: u64) -> &mut E {
        if let Some(slot) = self.slots.get(&pc).copied() {
            self.touch(slot);
            return &mut self.entries[slot];
        }

        let victim = if self.entries.len() >= self.capacity {
            self.usage.pop()
        } else {
            None
        };

        let slot = match victim {
            Some(slot) => {
                let evicted = self.entries[slot].pc();
                let _ = self.slots.remove(&evicted);
                trace!("evicting pc {evicted:#x} for {pc:#x}");
                self.entries[slot] = E::new(pc);
                slot
            }
            None => {
                self.entries.push(E::new(pc));
                self.entries.len() - 1
            }
        };

        let _ = self.slots.insert(pc, slot);
        self.usage.insert(0, slot);
        &mut self.entries[slot]
    }

    /// Returns the pc that would be evicted next, if any.
    pub fn lru_pc(&self) -> Option<u64> {
        self.usage.last().map(|&slot| self.entries[slot].pc())
    }

    /// Iterates over entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.usage.iter().map(|&slot| &self.entries[slot])
    }

    /// Iterates over tracked pcs from most to least recently used.
    pub fn pcs(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().map(TableEntry::pc)
    }

    /// Moves `slot` to the MRU position of the usage stack.
    fn touch(&mut self, slot: usize) {
        if let Some(pos) = self.usage.iter().position(|&s| s == slot) {
            let slot = self.usage.remove(pos);
            self.usage.insert(0, slot);
        }
    }
}
