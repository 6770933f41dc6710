//! Weighted Question Selector
//!
//! Samples questions without replacement, biased toward low mastery.
//!
//! Algorithm (successive re-normalized draws):
//! 1. `count >= |pool|` -> the full pool, no weighting
//! 2. otherwise, until `count` chosen: weigh every remaining candidate, draw
//!    `r` in `[0, total)`, walk candidates subtracting weights until `r <= 0`,
//!    take that candidate out of the pool
//! 3. weights are recomputed after every removal
//!
//! Cost is O(n * k). Pools above the reservoir threshold use a single-pass
//! weighted reservoir instead (see [`reservoir`]) with the same weights and the
//! same draw distribution.

pub mod reservoir;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::mastery::selection_weight;
use crate::shuffle;
use crate::types::Question;

// ==================== Constants ====================

/// Pool size above which the reservoir path is used
pub const DEFAULT_RESERVOIR_THRESHOLD: usize = 2048;

// ==================== Sampling ====================

/// Select up to `count` distinct questions by successive weighted draws
pub fn select_questions<R: Rng + ?Sized>(pool: &[Question], count: usize, rng: &mut R) -> Vec<Question> {
    if count >= pool.len() {
        debug!(available = pool.len(), requested = count, "returning full pool");
        return pool.to_vec();
    }
    if count == 0 {
        return Vec::new();
    }

    debug!(available = pool.len(), requested = count, "weighted selection");

    let mut available: Vec<&Question> = pool.iter().collect();
    let mut selected = Vec::with_capacity(count);

    while selected.len() < count && !available.is_empty() {
        let weights: Vec<f64> = available.iter().map(|q| selection_weight(q.mastery)).collect();
        let total: f64 = weights.iter().sum();

        let index = draw_index(&weights, total, rng);
        let chosen = available.remove(index);
        debug!(
            question_id = %chosen.id,
            mastery = chosen.mastery,
            difficulty = chosen.difficulty.as_str(),
            "selected"
        );
        selected.push(chosen.clone());
    }

    selected
}

/// Walk `weights` with `r ~ U[0, total)`; the first index where `r` drops to
/// zero or below wins. Rounding can leave `r` marginally positive after the
/// walk, in which case the last index is taken.
fn draw_index<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let mut r = rng.gen::<f64>() * total;
    for (i, weight) in weights.iter().enumerate() {
        r -= weight;
        if r <= 0.0 {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

// ==================== Selector ====================

/// Selector configuration
#[derive(Clone, Debug)]
pub struct SelectorOptions {
    /// Pools larger than this use the reservoir path
    pub reservoir_threshold: usize,
    /// Random seed for reproducibility (optional)
    pub seed: Option<u64>,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            reservoir_threshold: DEFAULT_RESERVOIR_THRESHOLD,
            seed: None,
        }
    }
}

/// Owns the random source used for selection and presentation shuffling
pub struct WeightedSelector {
    rng: ChaCha8Rng,
    reservoir_threshold: usize,
}

impl WeightedSelector {
    /// Entropy-seeded selector with default options
    pub fn new() -> Self {
        Self::with_options(SelectorOptions::default())
    }

    pub fn with_options(options: SelectorOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            rng,
            reservoir_threshold: options.reservoir_threshold.max(1),
        }
    }

    /// Deterministic selector (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self::with_options(SelectorOptions {
            seed: Some(seed),
            ..SelectorOptions::default()
        })
    }

    /// Draw `min(count, |pool|)` distinct questions
    pub fn select(&mut self, pool: &[Question], count: usize) -> Vec<Question> {
        if pool.len() > self.reservoir_threshold && count < pool.len() {
            reservoir::select_questions(pool, count, &mut self.rng)
        } else {
            select_questions(pool, count, &mut self.rng)
        }
    }

    /// Select, then shuffle into presentation order
    pub fn select_and_shuffle(&mut self, pool: &[Question], count: usize) -> Vec<Question> {
        let mut selected = self.select(pool, count);
        shuffle::shuffle(&mut selected, &mut self.rng);
        selected
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        shuffle::shuffle(items, &mut self.rng);
    }
}

impl Default for WeightedSelector {
    fn default() -> Self {
        Self::new()
    }
}
