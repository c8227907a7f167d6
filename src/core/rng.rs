//! Seeded randomness.
//!
//! Two clients built from the same seed shuffle decks and the discovery
//! pile identically. Outcomes only one side rolls (survey discoveries, AI
//! coin flips) never need to line up: discoveries travel in the message,
//! and the AI draws from its own `"ai"` stream.
//!
//! ```
//! use orbital_ccg::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.shuffled(0..10), b.shuffled(0..10));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// An independent stream keyed by `context`. The same seed and context
    /// always give the same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Succeed with probability `chance`, clamped to `[0, 1]`. NaN never
    /// succeeds.
    pub fn roll(&mut self, chance: f64) -> bool {
        if chance.is_nan() {
            return false;
        }
        self.inner.gen_bool(chance.clamp(0.0, 1.0))
    }

    /// Collect `items` in a random order.
    pub fn shuffled<T>(&mut self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut out: Vec<T> = items.into_iter().collect();
        out.shuffle(&mut self.inner);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..5 {
            assert_eq!(a.shuffled(0..20), b.shuffled(0..20));
        }
    }

    #[test]
    fn test_context_streams_differ() {
        let rng = GameRng::new(42);
        let mut ai = rng.for_context("ai");
        let mut other = rng.for_context("deck");

        assert_ne!(ai.shuffled(0..20), other.shuffled(0..20));
        assert_eq!(rng.for_context("ai").seed(), rng.for_context("ai").seed());
    }

    #[test]
    fn test_roll_clamps() {
        let mut rng = GameRng::new(7);
        for _ in 0..20 {
            assert!(rng.roll(1.5));
            assert!(!rng.roll(-0.2));
            assert!(!rng.roll(f64::NAN));
        }
    }

    #[test]
    fn test_shuffled_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data = rng.shuffled(1..=10);

        assert_ne!(data, (1..=10).collect::<Vec<_>>());
        data.sort_unstable();
        assert_eq!(data, (1..=10).collect::<Vec<_>>());
    }
}
