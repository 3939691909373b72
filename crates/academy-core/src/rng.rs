//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests a seeded or scripted
//! implementation is injected so shuffled mission content is repeatable.

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Shuffles `items` in place (Fisher–Yates) using the injected RNG.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn DeterministicRng) {
    for i in (1..items.len()).rev() {
        let upper = u32::try_from(i).unwrap_or(u32::MAX);
        let j = rng.next_u32_range(0, upper) as usize;
        items.swap(i, j.min(i));
    }
}
