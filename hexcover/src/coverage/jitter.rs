//! Sources of opportunity score jitter.

use h3o::CellIndex;
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

use super::score::MAX_SCORE_JITTER;

/// Supplies the random term of an opportunity score.
///
/// Implementations are shared across rayon workers, so they take `&self`.
pub trait ScoreJitter: Send + Sync {
    /// Jitter for a cell, expected within ±[`MAX_SCORE_JITTER`].
    fn sample(&self, cell: CellIndex) -> f64;
}

/// No jitter at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl ScoreJitter for NoJitter {
    fn sample(&self, _cell: CellIndex) -> f64 {
        0.0
    }
}

/// Reproducible jitter derived from a seed and the cell id.
///
/// The same `(seed, cell)` pair always yields the same value regardless of
/// the order cells are scored in.
#[derive(Debug, Clone, Copy)]
pub struct SeededJitter {
    seed: u64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ScoreJitter for SeededJitter {
    fn sample(&self, cell: CellIndex) -> f64 {
        let mut rng = StdRng::seed_from_u64(self.seed ^ u64::from(cell));
        rng.gen_range(-MAX_SCORE_JITTER..=MAX_SCORE_JITTER)
    }
}

/// Fresh thread-local randomness on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl ScoreJitter for RandomJitter {
    fn sample(&self, _cell: CellIndex) -> f64 {
        thread_rng().gen_range(-MAX_SCORE_JITTER..=MAX_SCORE_JITTER)
    }
}
