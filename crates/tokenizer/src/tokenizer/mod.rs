//! Main tokenizer implementation.
//!
//! A [`Tokenizer`] is the immutable artifact of training: a vocabulary, an
//! ordered merge rule table, and the pre-tokenization configuration the
//! rules were learned under. It is `Send + Sync` and never mutated after
//! construction, so independent texts can be encoded from many threads
//! against the same instance.

use crate::pre_tokenizer::{
    split_specials, NormalizationForm, Normalizer, Segment, SplitGrammar, Splitter,
};
use crate::utils::EncodingCache;
use bytepair_core::{
    ByteLevelMap, MergeTable, Result, TokenizerError, Vocabulary,
};
use rayon::prelude::*;
use std::path::Path;

/// Byte-level BPE tokenizer model.
pub struct Tokenizer {
    /// Vocabulary (specials, byte symbols, merge products)
    vocab: Vocabulary,
    /// Ordered merge rules
    merges: MergeTable,
    /// Byte <-> symbol bijection
    byte_map: ByteLevelMap,
    /// Word splitter
    splitter: Splitter,
    /// Unicode normalizer
    normalizer: Normalizer,
}

impl Tokenizer {
    /// Assemble a tokenizer from trained parts.
    pub fn from_parts(
        vocab: Vocabulary,
        merges: MergeTable,
        grammar: SplitGrammar,
        normalization: NormalizationForm,
    ) -> Result<Self> {
        Ok(Self {
            vocab,
            merges,
            byte_map: ByteLevelMap::new(),
            splitter: Splitter::new(grammar)?,
            normalizer: Normalizer::new(normalization),
        })
    }

    /// Build a merge-free byte-level tokenizer.
    ///
    /// This is the degenerate model a training run produces when the target
    /// vocabulary size leaves no room for merges; every word encodes to one
    /// id per byte.
    pub fn byte_level<S: AsRef<str>>(
        specials: &[S],
        grammar: SplitGrammar,
        normalization: NormalizationForm,
    ) -> Result<Self> {
        let byte_map = ByteLevelMap::new();
        let vocab = Vocabulary::byte_level(specials, &byte_map)?;
        Ok(Self {
            vocab,
            merges: MergeTable::new(),
            byte_map,
            splitter: Splitter::new(grammar)?,
            normalizer: Normalizer::new(normalization),
        })
    }

    /// Encode text to token IDs.
    ///
    /// Special-token literals are matched first and map to their reserved
    /// ids without being split; everything else is normalized, split into
    /// words, lifted to byte symbols, and contracted by the merge rules.
    /// Empty input encodes to an empty sequence.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        self.encode_inner(text, None)
    }

    /// Encode text, memoizing per-word results in the supplied cache.
    ///
    /// Natural-language input repeats words heavily; when encoding many
    /// documents against the same model, a shared cache skips the merge
    /// loop for every repeated word.
    pub fn encode_with_cache(&self, text: &str, cache: &mut EncodingCache) -> Result<Vec<u32>> {
        self.encode_inner(text, Some(cache))
    }

    fn encode_inner(&self, text: &str, mut cache: Option<&mut EncodingCache>) -> Result<Vec<u32>> {
        let mut ids = Vec::new();

        for segment in split_specials(text, &self.vocab.special) {
            match segment {
                Segment::Special(id) => ids.push(id),
                Segment::Text(chunk) => {
                    let normalized = self.normalizer.normalize(chunk);
                    for word in self.splitter.split(&normalized)? {
                        let symbols = self.byte_map.encode_bytes(word.as_bytes());
                        let word_ids = match cache.as_deref_mut() {
                            Some(cache) => cache
                                .get_or_encode(&symbols, |s| self.encode_word(s))?,
                            None => self.encode_word(&symbols)?,
                        };
                        ids.extend(word_ids);
                    }
                }
            }
        }

        Ok(ids)
    }

    /// Encode one word, given as its byte-symbol string.
    fn encode_word(&self, symbols: &str) -> Result<Vec<u32>> {
        let mut ids = Vec::with_capacity(symbols.chars().count());
        let mut buf = [0u8; 4];

        for ch in symbols.chars() {
            let symbol = ch.encode_utf8(&mut buf);
            match self.vocab.get_id(symbol) {
                Some(id) => ids.push(id),
                // Unreachable through the byte-level path, where every
                // symbol is seeded; kept for models with partial
                // vocabularies.
                None => match self.vocab.special.unk {
                    Some(unk) => ids.push(unk),
                    None => return Err(TokenizerError::UnknownToken(symbol.to_string())),
                },
            }
        }

        self.merges.apply(&mut ids);
        Ok(ids)
    }

    /// Encode a batch of texts in parallel.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<u32>>> {
        texts.par_iter().map(|text| self.encode(text)).collect()
    }

    /// Decode token IDs back to the raw bytes they represent.
    ///
    /// An id outside the vocabulary is an `UnknownTokenId` error. Special
    /// tokens contribute their literal text unless `skip_special` is set.
    pub fn decode_bytes(&self, ids: &[u32], skip_special: bool) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();

        for &id in ids {
            let token = self
                .vocab
                .get_token(id)
                .ok_or(TokenizerError::UnknownTokenId(id))?;

            if self.vocab.special.is_special(id) {
                if !skip_special {
                    bytes.extend_from_slice(token.as_bytes());
                }
            } else {
                bytes.extend(self.byte_map.decode_str(token)?);
            }
        }

        Ok(bytes)
    }

    /// Decode token IDs back to text.
    ///
    /// Any id sequence produced by [`encode`](Self::encode) decodes back to
    /// the exact input. An arbitrary caller-supplied sequence may decode to
    /// bytes that are not valid UTF-8; those are replaced rather than
    /// treated as a failure (use [`decode_bytes`](Self::decode_bytes) for
    /// the exact bytes).
    pub fn decode(&self, ids: &[u32], skip_special: bool) -> Result<String> {
        let bytes = self.decode_bytes(ids, skip_special)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Save the model to a directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::TokenizerSaver::new(self).save(path)
    }

    /// Load a model from a directory.
    pub fn load(path: &Path) -> Result<Self> {
        crate::io::TokenizerLoader::load(path)
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Get a reference to the vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Get a reference to the merge rules.
    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    /// The splitting grammar this model was trained with.
    pub fn grammar(&self) -> SplitGrammar {
        self.splitter.grammar()
    }

    /// The normalization form this model was trained with.
    pub fn normalization(&self) -> NormalizationForm {
        self.normalizer.form()
    }
}
