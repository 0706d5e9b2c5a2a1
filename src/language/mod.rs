pub mod core;
pub mod selector;

// Re-export the main types for convenience
pub use core::{Direction, WordList, WordPair};
pub use selector::{
    selection_probabilities, weight, PairSelector, UniformSelector, WeightedSelector,
};
