//! Bytepair-tokenizer - High-level byte-level BPE tokenizer API
//!
//! This crate provides the trained tokenizer model and everything around
//! it: the pre-tokenization pipeline (special-token extraction, Unicode
//! normalization, word splitting), encode/decode, and model persistence.
//!
//! # Features
//!
//! - Two splitting grammars: whitespace attachment and the fixed
//!   lexical-class grammar used by modern GPT-style tokenizers
//! - Total byte-level encoding: any input round-trips exactly
//! - Parallel batch encoding over a shared immutable model
//! - Versioned JSON persistence plus vocab/merges export
//!
//! # Example
//!
//! ```rust
//! use bytepair_tokenizer::{NormalizationForm, SplitGrammar, Tokenizer};
//!
//! let tokenizer = Tokenizer::byte_level(
//!     &["[PAD]", "[UNK]"],
//!     SplitGrammar::Whitespace { add_prefix_space: false },
//!     NormalizationForm::None,
//! )?;
//!
//! let ids = tokenizer.encode("Hello, world!")?;
//! assert_eq!(tokenizer.decode(&ids, false)?, "Hello, world!");
//! # Ok::<(), bytepair_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use bytepair_core::{
    ByteLevelMap, MergeRule, MergeTable, Result, SpecialTokens, TokenizerError, Vocabulary,
};

// Tokenizer model
pub mod tokenizer;
pub use tokenizer::Tokenizer;

// IO/Serialization
pub mod io;
pub use io::{TokenizerLoader, TokenizerSaver, FORMAT_VERSION};

// Pre-tokenization
pub mod pre_tokenizer;
pub use pre_tokenizer::{NormalizationForm, Normalizer, SplitGrammar, Splitter};

// Utilities
pub mod utils;
pub use utils::EncodingCache;
