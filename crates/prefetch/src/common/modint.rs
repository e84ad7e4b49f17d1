//! Modular index type.
//!
//! `ModularIndex<N>` holds a value in `[0, N)` and wraps on every arithmetic
//! operation, so circular buffers of length `N` can be walked forwards and
//! backwards without bounds checks at the call site.

use std::fmt;
use std::ops::{Add, Sub};

/// An index into a circular buffer of length `N`.
///
/// Increment, decrement, and offset arithmetic all wrap at the boundary.
/// Equality compares reduced values, including against plain integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModularIndex<const N: usize> {
    value: usize,
}

impl<const N: usize> ModularIndex<N> {
    /// The modulus.
    pub const MODULUS: usize = N;

    /// Creates an index from any integer, reducing it modulo `N`.
    #[inline(always)]
    pub const fn new(value: usize) -> Self {
        Self { value: value % N }
    }

    /// Returns the reduced value in `[0, N)`.
    #[inline(always)]
    pub const fn value(self) -> usize {
        self.value
    }

    /// Advances the index by one, wrapping from `N - 1` to `0`.
    #[inline(always)]
    pub const fn increment(&mut self) {
        self.value = (self.value + 1) % N;
    }

    /// Moves the index back by one, wrapping from `0` to `N - 1`.
    #[inline(always)]
    pub const fn decrement(&mut self) {
        self.value = (self.value + N - 1) % N;
    }
}

impl<const N: usize> Add<usize> for ModularIndex<N> {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        Self::new(self.value + rhs % N)
    }
}

impl<const N: usize> Sub<usize> for ModularIndex<N> {
    type Output = Self;

    fn sub(self, rhs: usize) -> Self {
        Self::new(self.value + N - rhs % N)
    }
}

impl<const N: usize> PartialEq<usize> for ModularIndex<N> {
    fn eq(&self, other: &usize) -> bool {
        self.value == other % N
    }
}

impl<const N: usize> From<ModularIndex<N>> for usize {
    fn from(index: ModularIndex<N>) -> Self {
        index.value
    }
}

impl<const N: usize> fmt::Display for ModularIndex<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.value, N)
    }
}
