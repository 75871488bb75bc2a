//! Serialized model format.
//!
//! A trained model is persisted as a single versioned `tokenizer.json`.
//! Vocabulary entries and merge rules are stored as ordered lists (entry
//! order is id order, merge order is rank order) so the artifact is
//! canonical: a reloaded model is bit-identical in encode/decode behavior
//! to the one that was saved.

use serde::{Deserialize, Serialize};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// One vocabulary entry; entries are serialized in ascending id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEntry {
    /// Symbol string
    pub token: String,
    /// Assigned id
    pub id: u32,
}

/// One merge rule; rules are serialized in rank (training) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedMerge {
    /// Left symbol of the pair
    pub left: String,
    /// Right symbol of the pair
    pub right: String,
    /// Symbol produced by the merge
    pub new: String,
}

/// Pre-tokenizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedPreTokenizer {
    /// Grammar identifier: "whitespace" or "lexical"
    pub grammar: String,
    /// Prefix-space flag (whitespace grammar only)
    #[serde(default)]
    pub add_prefix_space: bool,
    /// Normalization form identifier
    pub normalization: String,
}

/// Resolved role assignments, stored for inspection; the literals are the
/// source of truth and roles are re-derived on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedRoles {
    pub pad: Option<String>,
    pub unk: Option<String>,
    pub cls: Option<String>,
    pub sep: Option<String>,
    pub mask: Option<String>,
}

/// Complete serialized model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedTokenizer {
    /// Format version
    pub version: u32,
    /// Pre-tokenizer configuration
    pub pre_tokenizer: SerializedPreTokenizer,
    /// Special token literals in id order
    pub special_tokens: Vec<String>,
    /// Role assignments derived from the literals
    pub roles: SerializedRoles,
    /// Vocabulary entries in id order
    pub vocab: Vec<VocabEntry>,
    /// Merge rules in rank order
    pub merges: Vec<SerializedMerge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_roundtrips_through_json() {
        let model = SerializedTokenizer {
            version: FORMAT_VERSION,
            pre_tokenizer: SerializedPreTokenizer {
                grammar: "whitespace".to_string(),
                add_prefix_space: true,
                normalization: "nfc".to_string(),
            },
            special_tokens: vec!["[PAD]".to_string(), "[UNK]".to_string()],
            roles: SerializedRoles {
                pad: Some("[PAD]".to_string()),
                unk: Some("[UNK]".to_string()),
                ..Default::default()
            },
            vocab: vec![
                VocabEntry { token: "[PAD]".to_string(), id: 0 },
                VocabEntry { token: "[UNK]".to_string(), id: 1 },
            ],
            merges: vec![SerializedMerge {
                left: "a".to_string(),
                right: "b".to_string(),
                new: "ab".to_string(),
            }],
        };

        let json = serde_json::to_string(&model).unwrap();
        let back: SerializedTokenizer = serde_json::from_str(&json).unwrap();

        assert_eq!(back.version, FORMAT_VERSION);
        assert_eq!(back.special_tokens, model.special_tokens);
        assert_eq!(back.vocab.len(), 2);
        assert_eq!(back.merges.len(), 1);
        assert_eq!(back.merges[0].new, "ab");
        assert_eq!(back.roles.pad.as_deref(), Some("[PAD]"));
    }

    #[test]
    fn test_missing_prefix_space_defaults_to_false() {
        let json = r#"{
            "version": 1,
            "pre_tokenizer": { "grammar": "lexical", "normalization": "none" },
            "special_tokens": [],
            "roles": {},
            "vocab": [],
            "merges": []
        }"#;

        let model: SerializedTokenizer = serde_json::from_str(json).unwrap();
        assert!(!model.pre_tokenizer.add_prefix_space);
    }
}
