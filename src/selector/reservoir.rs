//! Weighted reservoir sampling (Efraimidis-Spirakis)
//!
//! Each candidate gets the key `u^(1/w)` with `u ~ U(0, 1]`; the `k` largest keys
//! form the sample. The resulting ordered sample has the same distribution as
//! `k` successive re-normalized draws without replacement, in one pass.
//!
//! Keys are compared in log space (`ln(u) / w`) to avoid underflow for small weights.

use std::cmp::Ordering;

use rand::Rng;
use tracing::debug;

use crate::mastery::selection_weight;
use crate::types::Question;

/// Select up to `count` distinct questions in one pass; ordered by draw rank
pub fn select_questions<R: Rng + ?Sized>(pool: &[Question], count: usize, rng: &mut R) -> Vec<Question> {
    if count >= pool.len() {
        return pool.to_vec();
    }
    if count == 0 {
        return Vec::new();
    }

    let mut keyed: Vec<(f64, usize)> = pool
        .iter()
        .enumerate()
        .map(|(index, question)| {
            // gen() is [0, 1); flip it to (0, 1] so ln() stays finite
            let u: f64 = 1.0 - rng.gen::<f64>();
            (u.ln() / selection_weight(question.mastery), index)
        })
        .collect();

    keyed.sort_unstable_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    keyed.truncate(count);

    debug!(available = pool.len(), requested = count, "reservoir selection");

    keyed.into_iter().map(|(_, index)| pool[index].clone()).collect()
}
