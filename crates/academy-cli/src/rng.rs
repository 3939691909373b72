//! Production RNG.

use academy_core::rng::DeterministicRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// [`DeterministicRng`] backed by `rand`'s standard generator.
#[derive(Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeded explicitly, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for StdRandom {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }
}
