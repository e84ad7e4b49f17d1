//! Issue Gate Tests.
//!
//! Verifies that a prefetch reaches the host only when the address is below
//! the physical bound, the queue has room, and the block is neither cached nor
//! already outstanding. Accepted prefetches must be both queued and marked.

use dcpt_core::config::HostConfig;
use dcpt_core::host::{Host, IssueGate};
use mockall::predicate::eq;

use crate::common::mocks::host::{FakeHost, MockSimulator};

const GATE: IssueGate = IssueGate::new(4, 0x1_0000);

// ══════════════════════════════════════════════════════════
// 1. Admission
// ══════════════════════════════════════════════════════════

/// An idle host admits any in-range address.
#[test]
fn admits_when_idle() {
    let host = FakeHost::default();
    assert!(GATE.admits(&host, 0x1000));
}

/// Addresses at or above the bound are never admitted.
#[test]
fn rejects_at_physical_bound() {
    let host = FakeHost::default();
    assert!(GATE.admits(&host, 0xFFFF));
    assert!(!GATE.admits(&host, 0x1_0000));
    assert!(!GATE.admits(&host, u64::MAX));
}

/// Cached blocks are rejected, including other offsets in the same block.
#[test]
fn rejects_cached_block() {
    let mut host = FakeHost::default();
    host.fill(0x2000);
    assert!(!GATE.admits(&host, 0x2000));
    assert!(!GATE.admits(&host, 0x2030));
    assert!(GATE.admits(&host, 0x2040));
}

/// A block already in flight is not requested twice.
#[test]
fn rejects_outstanding_block() {
    let mut host = FakeHost::default();
    assert!(GATE.try_issue(&mut host, 0x3000));
    assert!(!GATE.try_issue(&mut host, 0x3000));
    assert_eq!(host.issued, vec![0x3000]);
}

/// Nothing is admitted once the queue is at capacity.
#[test]
fn rejects_when_queue_full() {
    let mut host = FakeHost::default();
    host.occupy_queue(4);
    assert_eq!(host.current_queue_size(), 4);
    assert!(!GATE.admits(&host, 0x1000));
}

/// Limits come straight from the host section of the configuration.
#[test]
fn from_config_uses_host_limits() {
    let config = HostConfig {
        block_size: 64,
        max_queue_size: 1,
        max_physical_address: 0x100,
    };
    let gate = IssueGate::from_config(&config);
    let mut host = FakeHost::default();

    assert!(!gate.admits(&host, 0x100));
    assert!(gate.try_issue(&mut host, 0x40));
    assert!(!gate.try_issue(&mut host, 0x80), "queue of one is now full");
}

// ══════════════════════════════════════════════════════════
// 2. Host interaction
// ══════════════════════════════════════════════════════════

/// An accepted prefetch is issued and marked exactly once.
#[test]
fn accepted_prefetch_is_issued_and_marked() {
    let mut host = MockSimulator::idle();
    let _ = host
        .expect_issue_prefetch()
        .with(eq(0x1040))
        .times(1)
        .return_const(());
    let _ = host
        .expect_set_prefetch_bit()
        .with(eq(0x1040))
        .times(1)
        .return_const(());

    assert!(GATE.try_issue(&mut host, 0x1040));
}

/// A rejected prefetch never touches the host's queue or marks.
#[test]
fn rejected_prefetch_has_no_side_effects() {
    let mut host = MockSimulator::new();
    let _ = host.expect_current_queue_size().return_const(0_usize);
    let _ = host.expect_in_cache().with(eq(0x1040)).return_const(true);
    let _ = host.expect_issue_prefetch().never();
    let _ = host.expect_set_prefetch_bit().never();

    assert!(!GATE.try_issue(&mut host, 0x1040));
}

/// The address bound is checked before the host is consulted at all.
#[test]
fn out_of_range_skips_host_queries() {
    let mut host = MockSimulator::new();
    let _ = host.expect_current_queue_size().never();
    let _ = host.expect_in_cache().never();
    let _ = host.expect_in_mshr_queue().never();
    let _ = host.expect_issue_prefetch().never();

    assert!(!GATE.try_issue(&mut host, 0x2_0000));
}
