//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for different consumers
//!   (one per AI seat), so adding a consumer never shifts another's rolls
//! - **Serializable**: O(1) state capture and restore, used to checkpoint
//!   an AI seat mid-match
//!
//! ```
//! use pawn_tactics::core::GameRng;
//!
//! let root = GameRng::new(42);
//! let mut seat0 = root.for_context("ai-seat-0");
//! let mut again = GameRng::new(42).for_context("ai-seat-0");
//!
//! assert_eq!(seat0.gen_range_u64(0..1000), again.gen_range_u64(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG built on ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self::new(context_seed)
    }

    /// Generate a random u64 in the given range. Empty ranges return the start.
    pub fn gen_range_u64(&mut self, range: std::ops::Range<u64>) -> u64 {
        if range.is_empty() {
            return range.start;
        }
        self.inner.gen_range(range)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Choose a random index with weighted probability.
    ///
    /// Weights do not need to sum to 1.0.
    /// Returns `None` if weights are empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f32>() * total;

        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold <= 0.0 && weight > 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|&w| w > 0.0)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_u64(0..1000), rng2.gen_range_u64(0..1000));
        }
    }

    #[test]
    fn test_context_produces_different_sequence() {
        let rng = GameRng::new(42);
        let mut ctx1 = rng.for_context("ai-seat-0");
        let mut ctx2 = rng.for_context("ai-seat-1");

        let seq1: Vec<_> = (0..10).map(|_| ctx1.gen_range_u64(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| ctx2.gen_range_u64(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_empty_range_returns_start() {
        let mut rng = GameRng::new(1);
        assert_eq!(rng.gen_range_u64(5..5), 5);
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);

        let weights = vec![0.0, 100.0, 0.0];
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&weights), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_state_roundtrip_continues_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.gen_range_u64(0..1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range_u64(0..1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range_u64(0..1000)).collect();

        assert_eq!(expected, actual);
    }
}
