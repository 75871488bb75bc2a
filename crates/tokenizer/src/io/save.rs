//! Save functionality for trained tokenizers.

use super::format::{
    SerializedMerge, SerializedPreTokenizer, SerializedRoles, SerializedTokenizer, VocabEntry,
    FORMAT_VERSION,
};
use crate::pre_tokenizer::SplitGrammar;
use crate::tokenizer::Tokenizer;
use bytepair_core::{Result, TokenizerError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a trained model to disk.
pub struct TokenizerSaver<'a> {
    tokenizer: &'a Tokenizer,
}

impl<'a> TokenizerSaver<'a> {
    /// Create a saver for a model.
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Save the model as `tokenizer.json` inside `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            TokenizerError::Save(format!("Failed to create directory {}: {}", path.display(), e))
        })?;

        let file_path = path.join("tokenizer.json");
        let file = File::create(&file_path).map_err(|e| {
            TokenizerError::Save(format!("Failed to create {}: {}", file_path.display(), e))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.serialize())
            .map_err(|e| TokenizerError::Save(format!("Failed to serialize model: {}", e)))?;

        Ok(())
    }

    /// Export the model as `vocab.json` + `merges.txt` inside `path`, the
    /// split layout consumed by common model-serving stacks.
    pub fn export_vocab_merges(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            TokenizerError::Save(format!("Failed to create directory {}: {}", path.display(), e))
        })?;

        let vocab_path = path.join("vocab.json");
        let vocab_file = File::create(&vocab_path)
            .map_err(|e| TokenizerError::Save(format!("Failed to create vocab.json: {}", e)))?;

        let vocab_map: std::collections::BTreeMap<String, u32> = self
            .tokenizer
            .vocab()
            .ordered_tokens()
            .into_iter()
            .enumerate()
            .map(|(id, token)| (token.to_string(), id as u32))
            .collect();
        serde_json::to_writer_pretty(BufWriter::new(vocab_file), &vocab_map)
            .map_err(|e| TokenizerError::Save(format!("Failed to serialize vocab: {}", e)))?;

        let merges_path = path.join("merges.txt");
        let merges_file = File::create(&merges_path)
            .map_err(|e| TokenizerError::Save(format!("Failed to create merges.txt: {}", e)))?;
        let mut merges_writer = BufWriter::new(merges_file);

        let vocab = self.tokenizer.vocab();
        for rule in self.tokenizer.merges().rules() {
            let left = vocab.get_token(rule.left).unwrap_or("");
            let right = vocab.get_token(rule.right).unwrap_or("");
            writeln!(merges_writer, "{} {}", left, right)
                .map_err(|e| TokenizerError::Save(format!("Failed to write merges: {}", e)))?;
        }

        Ok(())
    }

    /// Build the serialized representation of the model.
    pub(crate) fn serialize(&self) -> SerializedTokenizer {
        let vocab = self.tokenizer.vocab();

        let entries: Vec<VocabEntry> = vocab
            .ordered_tokens()
            .into_iter()
            .enumerate()
            .map(|(id, token)| VocabEntry { token: token.to_string(), id: id as u32 })
            .collect();

        let merges: Vec<SerializedMerge> = self
            .tokenizer
            .merges()
            .rules()
            .iter()
            .map(|rule| SerializedMerge {
                left: vocab.get_token(rule.left).unwrap_or("").to_string(),
                right: vocab.get_token(rule.right).unwrap_or("").to_string(),
                new: vocab.get_token(rule.new_id).unwrap_or("").to_string(),
            })
            .collect();

        let literal_for = |id: Option<u32>| {
            id.and_then(|id| vocab.special.literal(id))
                .map(|s| s.to_string())
        };
        let roles = SerializedRoles {
            pad: literal_for(vocab.special.pad),
            unk: literal_for(vocab.special.unk),
            cls: literal_for(vocab.special.cls),
            sep: literal_for(vocab.special.sep),
            mask: literal_for(vocab.special.mask),
        };

        let add_prefix_space = match self.tokenizer.grammar() {
            SplitGrammar::Whitespace { add_prefix_space } => add_prefix_space,
            SplitGrammar::LexicalClass => false,
        };

        SerializedTokenizer {
            version: FORMAT_VERSION,
            pre_tokenizer: SerializedPreTokenizer {
                grammar: self.tokenizer.grammar().name().to_string(),
                add_prefix_space,
                normalization: self.tokenizer.normalization().name().to_string(),
            },
            special_tokens: vocab.special.literals().map(|s| s.to_string()).collect(),
            roles,
            vocab: entries,
            merges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre_tokenizer::NormalizationForm;

    #[test]
    fn test_serialize_shape() {
        let tokenizer = Tokenizer::byte_level(
            &["[PAD]", "[UNK]"],
            SplitGrammar::Whitespace { add_prefix_space: true },
            NormalizationForm::Nfc,
        )
        .unwrap();

        let serialized = TokenizerSaver::new(&tokenizer).serialize();

        assert_eq!(serialized.version, FORMAT_VERSION);
        assert_eq!(serialized.vocab.len(), 2 + 256);
        assert_eq!(serialized.vocab[0].token, "[PAD]");
        assert_eq!(serialized.vocab[0].id, 0);
        assert!(serialized.merges.is_empty());
        assert_eq!(serialized.pre_tokenizer.grammar, "whitespace");
        assert!(serialized.pre_tokenizer.add_prefix_space);
        assert_eq!(serialized.pre_tokenizer.normalization, "nfc");
        assert_eq!(serialized.roles.pad.as_deref(), Some("[PAD]"));
        assert_eq!(serialized.roles.unk.as_deref(), Some("[UNK]"));
        assert_eq!(serialized.roles.cls, None);
    }
}
