//! Memory access event definitions.

/// A single memory access as observed by the host.
///
/// The host reports one `AccessStat` per access, hit or miss, so that the
/// adaptive controller can measure how many hits were served by prefetched blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessStat {
    /// Address of the instruction that performed the access.
    pub pc: u64,
    /// Accessed memory address.
    pub address: u64,
    /// Whether the access missed in the cache.
    pub miss: bool,
}

impl AccessStat {
    /// Creates an access record for a cache miss.
    #[inline]
    pub const fn miss(pc: u64, address: u64) -> Self {
        Self {
            pc,
            address,
            miss: true,
        }
    }

    /// Creates an access record for a cache hit.
    #[inline]
    pub const fn hit(pc: u64, address: u64) -> Self {
        Self {
            pc,
            address,
            miss: false,
        }
    }
}
