//! Fisher-Yates shuffle
//!
//! Presentation order only; independent of mastery and weights.

use rand::Rng;

/// Shuffle in place, visiting indices from last to first and swapping each with
/// a uniformly chosen index in `0..=i`
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffled copy of `items`
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(&mut out, rng);
    out
}
