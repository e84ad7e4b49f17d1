//! Host collaborator contract.
//!
//! The prefetcher does not model the cache, the miss queue, or memory timing. The
//! surrounding simulator exposes them through the [`Host`] trait, and every
//! prefetch the engines produce passes through an [`IssueGate`] before it reaches
//! the host. A rejected candidate is simply dropped: it is an expected outcome, not
//! an error.

use tracing::trace;

use crate::config::HostConfig;

/// Services the surrounding memory-system simulator provides to the prefetcher.
pub trait Host {
    /// Returns `true` if the block containing `addr` is resident in the cache.
    fn in_cache(&self, addr: u64) -> bool;

    /// Returns `true` if `addr` already has an outstanding miss or prefetch.
    fn in_mshr_queue(&self, addr: u64) -> bool;

    /// Returns the number of prefetches currently queued.
    fn current_queue_size(&self) -> usize;

    /// Enqueues a prefetch for `addr`.
    fn issue_prefetch(&mut self, addr: u64);

    /// Marks the block containing `addr` as brought in by a prefetch.
    fn set_prefetch_bit(&mut self, addr: u64);

    /// Returns `true` if the block containing `addr` carries the prefetch mark.
    fn get_prefetch_bit(&self, addr: u64) -> bool;
}

/// Admission checks applied to every prefetch candidate.
///
/// A candidate is issued only if it is not cached, not already queued, below the
/// physical address bound, and the prefetch queue has room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueGate {
    /// Prefetch queue capacity.
    max_queue_size: usize,
    /// Exclusive upper bound on prefetchable addresses.
    max_physical_address: u64,
}

impl IssueGate {
    /// Creates a gate with explicit limits.
    pub const fn new(max_queue_size: usize, max_physical_address: u64) -> Self {
        Self {
            max_queue_size,
            max_physical_address,
        }
    }

    /// Creates a gate from the host section of the configuration.
    pub const fn from_config(config: &HostConfig) -> Self {
        Self::new(config.max_queue_size, config.max_physical_address)
    }

    /// Returns `true` if `addr` passes every gate against the current host state.
    pub fn admits<H: Host + ?Sized>(&self, host: &H, addr: u64) -> bool {
        addr < self.max_physical_address
            && host.current_queue_size() < self.max_queue_size
            && !host.in_cache(addr)
            && !host.in_mshr_queue(addr)
    }

    /// Issues and marks a prefetch for `addr` if it passes every gate.
    ///
    /// # Returns
    ///
    /// `true` if the prefetch was handed to the host.
    pub fn try_issue<H: Host + ?Sized>(&self, host: &mut H, addr: u64) -> bool {
        if !self.admits(host, addr) {
            return false;
        }
        host.issue_prefetch(addr);
        host.set_prefetch_bit(addr);
        trace!("prefetch issued: {addr:#x}");
        true
    }
}
