//! Bytepair-training - BPE training infrastructure
//!
//! This crate learns byte-level BPE vocabularies and merge rules from a
//! streaming corpus.
//!
//! # Features
//!
//! - Streaming corpus consumption with a per-document skip policy
//! - Parallel initial pair counting with an order-independent reduction
//! - Incremental pair-count maintenance: each merge touches only the
//!   words that contained the merged pair
//! - Deterministic merge selection (frequency, then lexicographic
//!   tie-break) for reproducible training runs
//!
//! # Example
//!
//! ```rust,ignore
//! use bytepair_training::{read_documents, BpeTrainer, TrainerConfig};
//!
//! let config = TrainerConfig { vocab_size: 32_000, ..Default::default() };
//! let mut trainer = BpeTrainer::new(config)?;
//! trainer.feed(read_documents(Path::new("corpus.txt"))?)?;
//! let model = trainer.train()?;
//! model.save(Path::new("model"))?;
//! ```

pub use bytepair_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{BpeTrainer, PairCounter, TrainerConfig, Word, WordCounts};

// Corpus access
pub mod corpus;
pub use corpus::read_documents;
