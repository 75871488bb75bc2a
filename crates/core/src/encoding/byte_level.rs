//! Byte-level symbol mapping.
//!
//! BPE over raw bytes needs every byte value to have a printable, splittable
//! string form: control characters and whitespace would otherwise be invisible
//! in vocabularies and ambiguous to splitting grammars. This module provides
//! the fixed bijection between byte values 0..=255 and single Unicode
//! characters used everywhere in the pipeline.
//!
//! # Mapping table
//!
//! Printable single-byte characters keep their own identity:
//!
//! - `!` (0x21) through `~` (0x7E)
//! - `¡` (0xA1) through `¬` (0xAC)
//! - `®` (0xAE) through `ÿ` (0xFF)
//!
//! The remaining 68 byte values map to U+0100, U+0101, ... in ascending byte
//! order, so e.g. the space byte 0x20 maps to `Ġ` (U+0120). The table is a
//! fixed convention of this library; both directions are total on their
//! domains and exact round-tripping is guaranteed for every byte sequence.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;

/// Bijective byte <-> character map.
#[derive(Debug, Clone)]
pub struct ByteLevelMap {
    /// byte value -> symbol character
    byte_to_char: [char; 256],
    /// symbol character -> byte value
    char_to_byte: AHashMap<char, u8>,
}

impl ByteLevelMap {
    /// Build the fixed mapping table.
    pub fn new() -> Self {
        let mut byte_to_char = ['\0'; 256];

        let is_direct = |b: u8| {
            (0x21..=0x7E).contains(&b) || (0xA1..=0xAC).contains(&b) || (0xAE..=0xFF).contains(&b)
        };

        let mut fallback = 0x100u32;
        for b in 0..=255u8 {
            if is_direct(b) {
                byte_to_char[b as usize] = b as char;
            } else {
                // 68 remapped bytes land in U+0100..=U+0143; always valid chars.
                byte_to_char[b as usize] = char::from_u32(fallback).unwrap();
                fallback += 1;
            }
        }

        let mut char_to_byte = AHashMap::with_capacity(256);
        for (byte, &ch) in byte_to_char.iter().enumerate() {
            char_to_byte.insert(ch, byte as u8);
        }

        Self { byte_to_char, char_to_byte }
    }

    /// The symbol character for a byte value.
    #[inline]
    pub fn symbol_for_byte(&self, byte: u8) -> char {
        self.byte_to_char[byte as usize]
    }

    /// The byte value for a symbol character, if it is part of the table.
    #[inline]
    pub fn byte_for_symbol(&self, symbol: char) -> Option<u8> {
        self.char_to_byte.get(&symbol).copied()
    }

    /// Encode raw bytes into their symbol-string form.
    pub fn encode_bytes(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.byte_to_char[b as usize]).collect()
    }

    /// Decode a symbol string back into the raw bytes it represents.
    ///
    /// Fails on the first character that is not part of the mapping table.
    pub fn decode_str(&self, symbols: &str) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(symbols.len());
        for ch in symbols.chars() {
            match self.char_to_byte.get(&ch) {
                Some(&b) => bytes.push(b),
                None => {
                    return Err(TokenizerError::Tokenization(format!(
                        "Character {:?} is not a byte-level symbol",
                        ch
                    )))
                }
            }
        }
        Ok(bytes)
    }
}

impl Default for ByteLevelMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_bijective() {
        let map = ByteLevelMap::new();
        let mut seen = std::collections::HashSet::new();

        for b in 0..=255u8 {
            let ch = map.symbol_for_byte(b);
            assert!(seen.insert(ch), "duplicate symbol {:?} for byte {}", ch, b);
            assert_eq!(map.byte_for_symbol(ch), Some(b));
        }
    }

    #[test]
    fn test_printable_ascii_maps_to_itself() {
        let map = ByteLevelMap::new();
        assert_eq!(map.symbol_for_byte(b'A'), 'A');
        assert_eq!(map.symbol_for_byte(b'!'), '!');
        assert_eq!(map.symbol_for_byte(b'~'), '~');
    }

    #[test]
    fn test_space_maps_to_g_with_dot() {
        let map = ByteLevelMap::new();
        assert_eq!(map.symbol_for_byte(b' '), '\u{0120}');
        assert_eq!(map.symbol_for_byte(b'\n'), '\u{010A}');
        assert_eq!(map.symbol_for_byte(0), '\u{0100}');
    }

    #[test]
    fn test_roundtrip_all_bytes() {
        let map = ByteLevelMap::new();
        let bytes: Vec<u8> = (0..=255u8).collect();

        let symbols = map.encode_bytes(&bytes);
        let decoded = map.decode_str(&symbols).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_roundtrip_utf8_text() {
        let map = ByteLevelMap::new();
        let text = "héllo wörld — 你好";

        let symbols = map.encode_bytes(text.as_bytes());
        let decoded = map.decode_str(&symbols).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), text);
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        let map = ByteLevelMap::new();
        // U+0200 is outside the table.
        assert!(map.decode_str("ab\u{0200}").is_err());
    }
}
