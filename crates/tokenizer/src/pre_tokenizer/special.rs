//! Special-token extraction.
//!
//! Special tokens are opaque: the splitter must never cut through them and
//! merges must never touch them, so their literals are carved out of the raw
//! text before normalization and splitting ever see it.

use bytepair_core::SpecialTokens;

/// One span of input: either plain text to run through the pipeline, or a
/// special token resolved directly to its reserved id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text between special tokens
    Text(&'a str),
    /// A special token occurrence, carrying its reserved id
    Special(u32),
}

/// Split raw text into plain-text and special-token segments.
///
/// Matches are literal and case-sensitive. The leftmost occurrence wins;
/// when two literals match at the same position the longer one wins, so a
/// literal that is a prefix of another cannot shadow it.
pub fn split_specials<'a>(text: &'a str, special: &SpecialTokens) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    if text.is_empty() {
        return segments;
    }
    if special.count() == 0 {
        segments.push(Segment::Text(text));
        return segments;
    }

    let mut rest = text;
    while !rest.is_empty() {
        let mut best: Option<(usize, usize, u32)> = None; // (start, len, id)
        for (id, literal) in special.literals().enumerate() {
            if let Some(start) = rest.find(literal) {
                let better = match best {
                    None => true,
                    Some((s, l, _)) => start < s || (start == s && literal.len() > l),
                };
                if better {
                    best = Some((start, literal.len(), id as u32));
                }
            }
        }

        match best {
            Some((start, len, id)) => {
                if start > 0 {
                    segments.push(Segment::Text(&rest[..start]));
                }
                segments.push(Segment::Special(id));
                rest = &rest[start + len..];
            }
            None => {
                segments.push(Segment::Text(rest));
                break;
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(literals: &[&str]) -> SpecialTokens {
        SpecialTokens::from_literals(literals).unwrap()
    }

    #[test]
    fn test_no_specials_passes_text_through() {
        let special = registry(&[]);
        let segments = split_specials("hello", &special);
        assert_eq!(segments, vec![Segment::Text("hello")]);
    }

    #[test]
    fn test_specials_are_carved_out() {
        let special = registry(&["[PAD]", "[SEP]"]);
        let segments = split_specials("a[SEP]b[PAD]", &special);
        assert_eq!(
            segments,
            vec![
                Segment::Text("a"),
                Segment::Special(1),
                Segment::Text("b"),
                Segment::Special(0),
            ]
        );
    }

    #[test]
    fn test_adjacent_specials() {
        let special = registry(&["[PAD]", "[UNK]"]);
        let segments = split_specials("[PAD][UNK]", &special);
        assert_eq!(segments, vec![Segment::Special(0), Segment::Special(1)]);
    }

    #[test]
    fn test_longest_literal_wins_at_same_position() {
        let special = registry(&["<t>", "<t>2"]);
        let segments = split_specials("<t>2", &special);
        assert_eq!(segments, vec![Segment::Special(1)]);
    }

    #[test]
    fn test_empty_text_yields_no_segments() {
        let special = registry(&["[PAD]"]);
        assert!(split_specials("", &special).is_empty());
    }
}
