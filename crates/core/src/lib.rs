//! Bytepair-core - Core byte-level BPE implementation
//!
//! This crate provides the fundamental data structures and algorithms for
//! byte-pair encoding over raw bytes, independent of any pre-tokenization
//! policy or storage format.
//!
//! # Features
//!
//! - Vocabulary storage with insertion-ordered, never-reused ids
//! - Special token registry with role resolution (pad/unk/cls/sep/mask)
//! - Ordered merge rules with fast pair lookup and in-place word rewriting
//! - The fixed byte <-> printable-symbol bijection shared by the pipeline
//!
//! # Example
//!
//! ```rust
//! use bytepair_core::{ByteLevelMap, Vocabulary};
//!
//! let map = ByteLevelMap::new();
//! let vocab = Vocabulary::byte_level(&["[PAD]", "[UNK]"], &map).unwrap();
//! assert_eq!(vocab.get_id("[PAD]"), Some(0));
//! assert_eq!(vocab.len(), 2 + 256);
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE data structures
pub mod core;
pub use core::{
    MergeCandidate, MergeMap, MergeRule, MergeTable, Pair, PairPriorityQueue, SpecialTokens,
    Vocab, VocabR, Vocabulary,
};

// Byte-level symbol mapping
pub mod encoding;
pub use encoding::ByteLevelMap;
