//! Text splitting for pre-tokenization.
//!
//! Splitting partitions raw text into the words whose boundaries merges are
//! never allowed to cross. Two grammars are supported: plain whitespace
//! attachment, and the fixed lexical-class grammar used by modern GPT-style
//! tokenizers. Both are restartable and deterministic, and neither drops
//! characters: the concatenation of the produced words equals the input
//! (plus the optional prefix space described below).

use bytepair_core::{Result, TokenizerError};
use fancy_regex::Regex;

/// The fixed lexical-class grammar, in priority order: contraction
/// suffixes, an optional non-alphanumeric lead plus letters, 1-3 digit
/// runs, a punctuation run with trailing newlines, whitespace ending
/// before a final non-whitespace character, and trailing whitespace.
/// Needs a lookahead, hence fancy-regex.
const LEXICAL_PATTERN: &str = r"(?i:'s|'t|'re|'ve|'m|'ll|'d)|[^\r\n\p{L}\p{N}]?\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]|\s+(?!\S)|\s+";

/// Splitting grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitGrammar {
    /// Split at whitespace boundaries; each word carries the whitespace run
    /// that precedes it, and a trailing whitespace run forms a word of its
    /// own. With `add_prefix_space`, a single space is prepended when the
    /// text does not already start with whitespace, so a word encodes the
    /// same whether or not it is sentence-initial.
    Whitespace { add_prefix_space: bool },
    /// The fixed lexical-class grammar; merges never cross contraction,
    /// letter/digit/punctuation or digit-grouping boundaries.
    LexicalClass,
}

impl Default for SplitGrammar {
    fn default() -> Self {
        Self::Whitespace { add_prefix_space: true }
    }
}

impl SplitGrammar {
    /// Stable identifier used in the serialized model.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Whitespace { .. } => "whitespace",
            Self::LexicalClass => "lexical",
        }
    }
}

/// Text splitter for pre-tokenization.
pub struct Splitter {
    /// Active grammar
    grammar: SplitGrammar,
    /// Compiled pattern (lexical-class mode only)
    pattern: Option<Regex>,
}

impl Splitter {
    /// Create a new splitter for the given grammar.
    pub fn new(grammar: SplitGrammar) -> Result<Self> {
        let pattern = match grammar {
            SplitGrammar::LexicalClass => Some(Regex::new(LEXICAL_PATTERN).map_err(|e| {
                TokenizerError::InvalidConfig(format!("Lexical grammar failed to compile: {}", e))
            })?),
            SplitGrammar::Whitespace { .. } => None,
        };

        Ok(Self { grammar, pattern })
    }

    /// The active grammar.
    pub fn grammar(&self) -> SplitGrammar {
        self.grammar
    }

    /// Split text into words.
    ///
    /// Empty input yields zero words.
    pub fn split(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        match self.grammar {
            SplitGrammar::Whitespace { add_prefix_space } => {
                Ok(split_whitespace_attached(text, add_prefix_space))
            }
            SplitGrammar::LexicalClass => {
                let pattern = self.pattern.as_ref().expect("pattern compiled in new");
                let mut words = Vec::new();
                for m in pattern.find_iter(text) {
                    let m = m.map_err(|e| {
                        TokenizerError::Tokenization(format!("Lexical split failed: {}", e))
                    })?;
                    words.push(m.as_str().to_string());
                }
                Ok(words)
            }
        }
    }
}

/// Whitespace-boundary splitting: a word is a (possibly empty) whitespace
/// run followed by a non-whitespace run, scanned left to right; whatever
/// whitespace remains at the end is emitted as a final word.
fn split_whitespace_attached(text: &str, add_prefix_space: bool) -> Vec<String> {
    let prefixed;
    let mut rest = if add_prefix_space && !text.starts_with(char::is_whitespace) {
        prefixed = format!(" {}", text);
        prefixed.as_str()
    } else {
        text
    };

    let mut words = Vec::new();
    while !rest.is_empty() {
        let ws_end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        if ws_end == rest.len() {
            words.push(rest.to_string());
            break;
        }
        let word_end = rest[ws_end..]
            .find(char::is_whitespace)
            .map(|i| ws_end + i)
            .unwrap_or(rest.len());
        words.push(rest[..word_end].to_string());
        rest = &rest[word_end..];
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(grammar: SplitGrammar, text: &str) -> Vec<String> {
        Splitter::new(grammar).unwrap().split(text).unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_words() {
        assert!(split(SplitGrammar::Whitespace { add_prefix_space: false }, "").is_empty());
        assert!(split(SplitGrammar::Whitespace { add_prefix_space: true }, "").is_empty());
        assert!(split(SplitGrammar::LexicalClass, "").is_empty());
    }

    #[test]
    fn test_whitespace_words_carry_leading_spaces() {
        let words = split(SplitGrammar::Whitespace { add_prefix_space: false }, "hello  world");
        assert_eq!(words, vec!["hello", "  world"]);
    }

    #[test]
    fn test_whitespace_concatenation_preserves_input() {
        let text = " a  bb\tccc \n d ";
        let words = split(SplitGrammar::Whitespace { add_prefix_space: false }, text);
        assert_eq!(words.concat(), text);
    }

    #[test]
    fn test_whitespace_trailing_run_is_own_word() {
        let words = split(SplitGrammar::Whitespace { add_prefix_space: false }, "a  ");
        assert_eq!(words, vec!["a", "  "]);
    }

    #[test]
    fn test_prefix_space_added_when_absent() {
        let words = split(SplitGrammar::Whitespace { add_prefix_space: true }, "hello world");
        assert_eq!(words, vec![" hello", " world"]);

        // Already-leading whitespace is left alone.
        let words = split(SplitGrammar::Whitespace { add_prefix_space: true }, " hello");
        assert_eq!(words, vec![" hello"]);
    }

    #[test]
    fn test_lexical_contractions_are_separate_words() {
        let words = split(SplitGrammar::LexicalClass, "I'm");
        assert_eq!(words, vec!["I", "'m"]);

        let words = split(SplitGrammar::LexicalClass, "they'LL");
        assert_eq!(words, vec!["they", "'LL"]);
    }

    #[test]
    fn test_lexical_digit_runs_cap_at_three() {
        let words = split(SplitGrammar::LexicalClass, "12345");
        assert_eq!(words, vec!["123", "45"]);
    }

    #[test]
    fn test_lexical_punctuation_breaks_letters() {
        let words = split(SplitGrammar::LexicalClass, "Hello world!");
        assert_eq!(words, vec!["Hello", " world", "!"]);
    }

    #[test]
    fn test_lexical_concatenation_preserves_input() {
        let text = "It's 2024, isn't it?\n  Yes -- 100%!\t";
        let words = split(SplitGrammar::LexicalClass, text);
        assert_eq!(words.concat(), text);
    }

    #[test]
    fn test_lexical_interior_whitespace_keeps_last_space_with_word() {
        let words = split(SplitGrammar::LexicalClass, "a   b");
        assert_eq!(words, vec!["a", "  ", " b"]);
    }
}
