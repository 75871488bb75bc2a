//! Load functionality for trained tokenizers.

use super::format::{SerializedTokenizer, FORMAT_VERSION};
use crate::pre_tokenizer::{NormalizationForm, SplitGrammar};
use crate::tokenizer::Tokenizer;
use bytepair_core::{MergeRule, MergeTable, Result, TokenizerError, Vocabulary};
use compact_str::CompactString;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a trained model from disk.
pub struct TokenizerLoader;

impl TokenizerLoader {
    /// Load a model from the `tokenizer.json` inside `path`.
    pub fn load(path: &Path) -> Result<Tokenizer> {
        let file_path = path.join("tokenizer.json");
        let file = File::open(&file_path).map_err(|e| {
            TokenizerError::Load(format!("Failed to open {}: {}", file_path.display(), e))
        })?;

        let serialized: SerializedTokenizer = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| TokenizerError::Load(format!("Failed to parse model: {}", e)))?;

        Self::from_serialized(serialized)
    }

    /// Reconstruct a model from its serialized representation.
    pub(crate) fn from_serialized(serialized: SerializedTokenizer) -> Result<Tokenizer> {
        if serialized.version != FORMAT_VERSION {
            return Err(TokenizerError::Load(format!(
                "Unsupported format version {} (expected {})",
                serialized.version, FORMAT_VERSION
            )));
        }

        // Entry order is id order; ids must be contiguous from zero.
        let mut tokens: Vec<CompactString> = Vec::with_capacity(serialized.vocab.len());
        for (index, entry) in serialized.vocab.iter().enumerate() {
            if entry.id as usize != index {
                return Err(TokenizerError::Load(format!(
                    "Vocabulary entry {} has id {}, expected {}",
                    entry.token, entry.id, index
                )));
            }
            tokens.push(CompactString::new(&entry.token));
        }

        let vocab = Vocabulary::from_ordered_tokens(tokens, &serialized.special_tokens)?;

        let mut merges = MergeTable::with_capacity(serialized.merges.len());
        for merge in &serialized.merges {
            let resolve = |token: &str| {
                vocab.get_id(token).ok_or_else(|| {
                    TokenizerError::Load(format!("Merge references unknown symbol: {}", token))
                })
            };
            merges.push(MergeRule {
                left: resolve(&merge.left)?,
                right: resolve(&merge.right)?,
                new_id: resolve(&merge.new)?,
            });
        }

        let grammar = match serialized.pre_tokenizer.grammar.as_str() {
            "whitespace" => SplitGrammar::Whitespace {
                add_prefix_space: serialized.pre_tokenizer.add_prefix_space,
            },
            "lexical" => SplitGrammar::LexicalClass,
            other => {
                return Err(TokenizerError::Load(format!(
                    "Unknown pre-tokenizer grammar: {}",
                    other
                )))
            }
        };

        let normalization = NormalizationForm::parse(&serialized.pre_tokenizer.normalization)
            .ok_or_else(|| {
                TokenizerError::Load(format!(
                    "Unknown normalization form: {}",
                    serialized.pre_tokenizer.normalization
                ))
            })?;

        Tokenizer::from_parts(vocab, merges, grammar, normalization)
    }
}
