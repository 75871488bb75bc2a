//! Vocabulary storage and lookup.
//!
//! This module provides efficient vocabulary storage using AHashMap for fast
//! lookups and CompactString for memory-efficient symbol storage, plus the
//! special-token registry that reserves the lowest ids before training.

use crate::encoding::ByteLevelMap;
use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use compact_str::CompactString;

/// Forward mapping: symbol string -> ID
pub type Vocab = AHashMap<CompactString, u32>;

/// Reverse mapping: ID -> symbol string
pub type VocabR = AHashMap<u32, CompactString>;

/// Registry of special tokens reserved at the bottom of the id space.
///
/// Special tokens are registered as an ordered list of literals before any
/// other symbol is inserted, so the literal at position `i` always has id `i`.
/// Roles are resolved by case-insensitive substring match on the literal
/// ("pad", "unk", "cls", "sep", "mask"); the first matching literal wins per
/// role and unmatched roles stay `None`.
#[derive(Debug, Clone, Default)]
pub struct SpecialTokens {
    /// Ordered literals; position == assigned id
    tokens: Vec<CompactString>,
    /// Padding token ID
    pub pad: Option<u32>,
    /// Unknown token ID
    pub unk: Option<u32>,
    /// Classification token ID
    pub cls: Option<u32>,
    /// Separator token ID
    pub sep: Option<u32>,
    /// Mask token ID
    pub mask: Option<u32>,
}

impl SpecialTokens {
    /// Build the registry from an ordered list of literals.
    ///
    /// Returns an error on duplicate literals; role resolution cannot be
    /// made unambiguous otherwise.
    pub fn from_literals<S: AsRef<str>>(literals: &[S]) -> Result<Self> {
        let mut tokens: Vec<CompactString> = Vec::with_capacity(literals.len());

        for literal in literals {
            let literal = literal.as_ref();
            if tokens.iter().any(|t| t == literal) {
                return Err(TokenizerError::InvalidConfig(format!(
                    "Duplicate special token: {}",
                    literal
                )));
            }
            tokens.push(CompactString::new(literal));
        }

        let find_role = |needle: &str| -> Option<u32> {
            tokens
                .iter()
                .position(|t| t.to_lowercase().contains(needle))
                .map(|pos| pos as u32)
        };

        Ok(Self {
            pad: find_role("pad"),
            unk: find_role("unk"),
            cls: find_role("cls"),
            sep: find_role("sep"),
            mask: find_role("mask"),
            tokens,
        })
    }

    /// Number of registered special tokens.
    #[inline]
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Iterate the registered literals in id order.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.as_str())
    }

    /// Check if an ID belongs to a special token.
    #[inline]
    pub fn is_special(&self, id: u32) -> bool {
        (id as usize) < self.tokens.len()
    }

    /// Get the literal for a special token id.
    #[inline]
    pub fn literal(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(|t| t.as_str())
    }
}

/// Vocabulary with forward and reverse mappings.
///
/// Ids are assigned in insertion order and never reused: special tokens
/// occupy `0..k-1`, the 256 byte symbols follow, and merge products take
/// the ids after that in the order they are learned.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Forward mapping: symbol string -> ID
    pub vocab: Vocab,
    /// Reverse mapping: ID -> symbol string
    pub vocab_r: VocabR,
    /// Special token registry (cached role ids for fast access)
    pub special: SpecialTokens,
}

impl Vocabulary {
    /// Create a byte-level base vocabulary: the special tokens first,
    /// then one symbol per byte value 0..=255.
    pub fn byte_level<S: AsRef<str>>(specials: &[S], map: &ByteLevelMap) -> Result<Self> {
        let special = SpecialTokens::from_literals(specials)?;
        let mut vocab = Self {
            vocab: Vocab::with_capacity(special.count() + 256),
            vocab_r: VocabR::with_capacity(special.count() + 256),
            special,
        };

        let literals: Vec<CompactString> = vocab
            .special
            .literals()
            .map(CompactString::new)
            .collect();
        for literal in &literals {
            vocab.add_new_token(literal)?;
        }

        for byte in 0..=255u8 {
            let symbol = map.symbol_for_byte(byte);
            let mut buf = [0u8; 4];
            vocab.add_new_token(symbol.encode_utf8(&mut buf)).map_err(|_| {
                TokenizerError::InvalidConfig(format!(
                    "Special token collides with byte symbol {:?}",
                    symbol
                ))
            })?;
        }

        Ok(vocab)
    }

    /// Rebuild a vocabulary from its id-ordered symbol list.
    ///
    /// `tokens[i]` receives id `i`; the first `specials.len()` entries must
    /// equal the special literals.
    pub fn from_ordered_tokens<S: AsRef<str>>(
        tokens: Vec<CompactString>,
        specials: &[S],
    ) -> Result<Self> {
        let special = SpecialTokens::from_literals(specials)?;

        if special.count() > tokens.len() {
            return Err(TokenizerError::Load(format!(
                "Vocabulary has {} entries but {} special tokens are declared",
                tokens.len(),
                special.count()
            )));
        }
        for (id, literal) in special.literals().enumerate() {
            if tokens[id] != literal {
                return Err(TokenizerError::Load(format!(
                    "Special token {} expected at id {}, found {}",
                    literal, id, tokens[id]
                )));
            }
        }

        let mut vocab = Self {
            vocab: Vocab::with_capacity(tokens.len()),
            vocab_r: VocabR::with_capacity(tokens.len()),
            special,
        };
        for token in &tokens {
            vocab.add_new_token(token)?;
        }

        Ok(vocab)
    }

    /// Add a symbol, returning its id.
    ///
    /// If the symbol is already present its existing id is returned and the
    /// vocabulary does not grow; ids are never reassigned.
    pub fn add_token(&mut self, token: &str) -> Result<u32> {
        let token = CompactString::new(token);

        if let Some(&id) = self.vocab.get(&token) {
            return Ok(id);
        }

        let id = self.vocab.len() as u32;
        self.vocab_r.insert(id, token.clone());
        self.vocab.insert(token, id);

        Ok(id)
    }

    /// Add a symbol that must not already exist.
    fn add_new_token(&mut self, token: &str) -> Result<u32> {
        if self.vocab.contains_key(token) {
            return Err(TokenizerError::InvalidConfig(format!(
                "Symbol already present: {}",
                token
            )));
        }
        self.add_token(token)
    }

    /// Get the ID for a symbol string.
    #[inline]
    pub fn get_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    /// Get the symbol string for an ID.
    #[inline]
    pub fn get_token(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(&id).map(|s| s.as_str())
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Symbols in id order (ids are contiguous by construction).
    pub fn ordered_tokens(&self) -> Vec<&str> {
        (0..self.vocab.len() as u32)
            .map(|id| self.get_token(id).unwrap_or(""))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_token_ids_are_ordered() {
        let map = ByteLevelMap::new();
        let vocab =
            Vocabulary::byte_level(&["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]"], &map).unwrap();

        assert_eq!(vocab.get_id("[PAD]"), Some(0));
        assert_eq!(vocab.get_id("[UNK]"), Some(1));
        assert_eq!(vocab.get_id("[CLS]"), Some(2));
        assert_eq!(vocab.get_id("[SEP]"), Some(3));
        assert_eq!(vocab.get_id("[MASK]"), Some(4));
        assert_eq!(vocab.len(), 5 + 256);
    }

    #[test]
    fn test_role_resolution_is_substring_based() {
        let special = SpecialTokens::from_literals(&["<pad>", "<unknown>", "<s>", "</s>"]).unwrap();

        assert_eq!(special.pad, Some(0));
        assert_eq!(special.unk, Some(1));
        assert_eq!(special.cls, None);
        assert_eq!(special.sep, None);
        assert_eq!(special.mask, None);
    }

    #[test]
    fn test_role_first_match_wins() {
        let special = SpecialTokens::from_literals(&["[PAD]", "[PAD2]", "[UNK]"]).unwrap();

        assert_eq!(special.pad, Some(0));
        assert_eq!(special.unk, Some(2));
    }

    #[test]
    fn test_duplicate_special_rejected() {
        let result = SpecialTokens::from_literals(&["[PAD]", "[PAD]"]);
        assert!(matches!(result, Err(TokenizerError::InvalidConfig(_))));
    }

    #[test]
    fn test_add_token_reuses_existing_id() {
        let map = ByteLevelMap::new();
        let mut vocab = Vocabulary::byte_level(&["[UNK]"], &map).unwrap();

        let id1 = vocab.add_token("he").unwrap();
        let id2 = vocab.add_token("he").unwrap();

        assert_eq!(id1, id2);
        assert_eq!(vocab.len(), 1 + 256 + 1);
    }

    #[test]
    fn test_byte_symbols_follow_specials() {
        let map = ByteLevelMap::new();
        let vocab = Vocabulary::byte_level(&["[PAD]", "[UNK]"], &map).unwrap();

        // Byte symbols are inserted in byte order right after the specials.
        let id_a = vocab.get_id("a").unwrap();
        assert_eq!(id_a, 2 + b'a' as u32);
    }

    #[test]
    fn test_from_ordered_tokens_roundtrip() {
        let map = ByteLevelMap::new();
        let mut vocab = Vocabulary::byte_level(&["[PAD]", "[UNK]"], &map).unwrap();
        vocab.add_token("ab").unwrap();

        let tokens: Vec<CompactString> = vocab
            .ordered_tokens()
            .into_iter()
            .map(CompactString::new)
            .collect();
        let rebuilt = Vocabulary::from_ordered_tokens(tokens, &["[PAD]", "[UNK]"]).unwrap();

        assert_eq!(rebuilt.len(), vocab.len());
        assert_eq!(rebuilt.get_id("ab"), vocab.get_id("ab"));
        assert_eq!(rebuilt.special.pad, Some(0));
        assert_eq!(rebuilt.special.unk, Some(1));
    }

    #[test]
    fn test_from_ordered_tokens_rejects_misplaced_special() {
        let tokens = vec![CompactString::new("x"), CompactString::new("[PAD]")];
        let result = Vocabulary::from_ordered_tokens(tokens, &["[PAD]"]);
        assert!(matches!(result, Err(TokenizerError::Load(_))));
    }
}
