//! Injectable randomness for the noise fields of a pattern
//!
//! Generators never reach for a global RNG. They take a `&mut dyn
//! RandomSource`, which every [`rand::RngCore`] satisfies, so production runs
//! pass `thread_rng()` or a seeded `StdRng` while tests can pin the output.

use rand::{Rng, RngCore};

/// Source of the uniformly distributed values behind noise fields
pub trait RandomSource {
    /// Uniform sample from the inclusive range `[low, high]`
    ///
    /// Callers guarantee `low <= high`.
    fn range_u32(&mut self, low: u32, high: u32) -> u32;

    /// Fair coin flip
    fn coin(&mut self) -> bool;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        self.gen_range(low..=high)
    }

    fn coin(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

/// Deterministic source that always lands on one edge of the range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedSource {
    /// Always the low bound, coin always false
    Low,
    /// Always the high bound, coin always true
    High,
}

impl RandomSource for FixedSource {
    fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        match self {
            FixedSource::Low => low,
            FixedSource::High => high,
        }
    }

    fn coin(&mut self) -> bool {
        matches!(self, FixedSource::High)
    }
}
