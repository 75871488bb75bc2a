//! Core BPE data structures.
//!
//! This module contains the fundamental data structures for byte-pair
//! encoding: the vocabulary, the merge rule table, and the training-time
//! priority queue.

pub mod merges;
pub mod priority;
pub mod vocab;

pub use merges::{MergeMap, MergeRule, MergeTable, Pair};
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use vocab::{SpecialTokens, Vocab, VocabR, Vocabulary};
