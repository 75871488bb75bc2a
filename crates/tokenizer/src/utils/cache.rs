//! Word-level encoding cache.
//!
//! Encoding concatenates independently-computed per-word id runs, and
//! natural text repeats words constantly, so memoizing the merge loop per
//! word pays for itself quickly. The cache is a plain LRU keyed by the
//! word's byte-symbol string.

use bytepair_core::Result;
use std::collections::HashMap;

/// LRU cache mapping a word's symbol string to its encoded ids.
pub struct EncodingCache {
    /// word symbols -> encoded ids
    cache: HashMap<String, Vec<u32>>,
    /// Maximum number of entries
    capacity: usize,
    /// Recency order, oldest first
    recency: Vec<String>,
}

impl EncodingCache {
    /// Create a cache with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(capacity),
            capacity,
            recency: Vec::with_capacity(capacity),
        }
    }

    /// Create a cache with the default capacity (1024 words).
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Get the cached ids for a word, or compute and remember them.
    pub fn get_or_encode<F>(&mut self, word: &str, encode: F) -> Result<Vec<u32>>
    where
        F: FnOnce(&str) -> Result<Vec<u32>>,
    {
        if let Some(ids) = self.cache.get(word).cloned() {
            if let Some(pos) = self.recency.iter().position(|w| w == word) {
                let w = self.recency.remove(pos);
                self.recency.push(w);
            }
            return Ok(ids);
        }

        let ids = encode(word)?;

        if self.recency.len() >= self.capacity {
            let oldest = self.recency.remove(0);
            self.cache.remove(&oldest);
        }
        self.cache.insert(word.to_string(), ids.clone());
        self.recency.push(word.to_string());

        Ok(ids)
    }

    /// Number of cached words.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all cached entries.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.recency.clear();
    }
}

impl Default for EncodingCache {
    fn default() -> Self {
        Self::new()
    }
}
