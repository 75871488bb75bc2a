//! Pre-tokenization pipeline.
//!
//! Text entering the tokenizer flows through three stages before BPE
//! merges apply: special-token extraction, Unicode normalization, and
//! word splitting. Merges never cross word boundaries produced here.

pub mod normalize;
pub mod special;
pub mod split;

pub use normalize::{NormalizationForm, Normalizer};
pub use special::{split_specials, Segment};
pub use split::{SplitGrammar, Splitter};
