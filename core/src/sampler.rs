//! Weighted categorical sampling.
//!
//! One uniform draw, one cumulative scan. Weights are expected to sum to
//! roughly 1.0 but this is not enforced: if floating-point slack leaves the
//! draw above the final cumulative sum, the last category is returned.

use crate::rng::SimRng;

/// An ordered list of (label, probability) pairs.
pub type Distribution<T> = [(T, f64)];

/// Draw one label. Consumes exactly one random draw.
///
/// Panics on an empty distribution; every distribution the engine samples
/// is either a non-empty constant or checked by `SimConfig::validate`.
pub fn weighted_pick<'a, T>(rng: &mut SimRng, dist: &'a Distribution<T>) -> &'a T {
    let roll = rng.next_f64();
    pick_with_roll(roll, dist)
}

/// The cumulative scan on its own, for a draw that was already taken.
pub fn pick_with_roll<T>(roll: f64, dist: &Distribution<T>) -> &T {
    let mut cumulative = 0.0;
    for (label, p) in dist {
        cumulative += p;
        if roll <= cumulative {
            return label;
        }
    }
    &dist.last().expect("weighted_pick on an empty distribution").0
}
