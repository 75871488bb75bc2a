//! Training infrastructure for BPE tokenizers.

pub mod counter;
pub mod trainer;

pub use counter::{PairCounter, Word, WordCounts};
pub use trainer::{BpeTrainer, TrainerConfig};
