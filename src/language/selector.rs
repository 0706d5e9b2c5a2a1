use super::core::{Direction, WordPair};
use crate::stats::ErrorCounts;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Weight of a word with no recorded mistakes.
pub const BASE_WEIGHT: u32 = 10;

/// Selection weight for a word with `error_count` mistakes, never below 1.
pub fn weight(error_count: u32) -> u32 {
    BASE_WEIGHT.saturating_sub(error_count).max(1)
}

/// Trait for different pair selection strategies
pub trait PairSelector {
    /// Pick the next pair to drill, or `None` when the list is empty.
    fn select<'a>(
        &self,
        pairs: &'a [WordPair],
        counts: &ErrorCounts,
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Option<&'a WordPair>;
}

/// Uniform selection that ignores the error counts
pub struct UniformSelector;

impl PairSelector for UniformSelector {
    fn select<'a>(
        &self,
        pairs: &'a [WordPair],
        _counts: &ErrorCounts,
        _direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Option<&'a WordPair> {
        pairs.choose(rng)
    }
}

/// Error-weighted selection: each pair is drawn with probability proportional
/// to `weight(errors[key])`.
pub struct WeightedSelector;

impl PairSelector for WeightedSelector {
    fn select<'a>(
        &self,
        pairs: &'a [WordPair],
        counts: &ErrorCounts,
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Option<&'a WordPair> {
        let weights = pair_weights(pairs, counts, direction);
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut remaining = rng.gen::<f64>() * total as f64;
        for (pair, w) in pairs.iter().zip(&weights) {
            remaining -= f64::from(*w);
            if remaining <= 0.0 {
                return Some(pair);
            }
        }

        // float rounding can leave a sliver past the last pair
        pairs.last()
    }
}

fn pair_weights(pairs: &[WordPair], counts: &ErrorCounts, direction: Direction) -> Vec<u32> {
    pairs
        .iter()
        .map(|pair| weight(counts.get(direction.key_of(pair))))
        .collect()
}

/// Probability of each pair being drawn by [`WeightedSelector`], in list order.
pub fn selection_probabilities(
    pairs: &[WordPair],
    counts: &ErrorCounts,
    direction: Direction,
) -> Vec<f64> {
    let weights = pair_weights(pairs, counts, direction);
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    weights
        .into_iter()
        .map(|w| f64::from(w) / total as f64)
        .collect()
}
