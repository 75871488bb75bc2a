//! Word and pair counting for BPE training.
//!
//! Counting happens in two stages. [`WordCounts`] is the streaming stage:
//! documents are reduced to word-frequency totals without keeping the
//! corpus in memory. [`PairCounter`] is the training stage: the word
//! multiset is materialized as symbol-id sequences, adjacent pair
//! frequencies are tallied (optionally in parallel), and a reverse index
//! from pair to containing words keeps each merge step proportional to the
//! merged pair's occurrences instead of the corpus size.

use ahash::{AHashMap, AHashSet};
use bytepair_core::{Pair, Result, TokenizerError, Vocabulary};
use compact_str::CompactString;
use rayon::prelude::*;

/// Streaming accumulator of word frequencies.
///
/// Words are keyed by their byte-symbol string form.
#[derive(Debug, Default)]
pub struct WordCounts {
    counts: AHashMap<CompactString, u64>,
}

impl WordCounts {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of a word.
    pub fn observe(&mut self, word: &str) {
        *self.counts.entry(CompactString::new(word)).or_insert(0) += 1;
    }

    /// Fold another accumulator into this one.
    ///
    /// Summation is commutative, so partial counts gathered by parallel
    /// workers can be merged in any order.
    pub fn merge(&mut self, other: WordCounts) {
        for (word, count) in other.counts {
            *self.counts.entry(word).or_insert(0) += count;
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total word occurrences across the corpus.
    pub fn total_occurrences(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate (word, count) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(w, &c)| (w.as_str(), c))
    }
}

/// One corpus word as a mutable symbol-id sequence with its frequency.
#[derive(Debug, Clone)]
pub struct Word {
    /// Symbol ids, contracted in place as merges apply
    pub ids: Vec<u32>,
    /// Occurrences of this word in the corpus
    pub count: u64,
}

/// Pair frequency table with a pair -> containing-words reverse index.
pub struct PairCounter {
    /// The word multiset
    words: Vec<Word>,
    /// pair -> aggregate frequency
    pair_counts: AHashMap<Pair, u64>,
    /// pair -> indices of words that contained the pair at some point.
    /// Entries can go stale after rewrites; merge_pair re-checks each word.
    pair_index: AHashMap<Pair, AHashSet<usize>>,
}

impl PairCounter {
    /// Materialize the word multiset against a seeded vocabulary.
    pub fn from_word_counts(word_counts: &WordCounts, vocab: &Vocabulary) -> Result<Self> {
        let mut words = Vec::with_capacity(word_counts.len());
        let mut buf = [0u8; 4];

        for (word, count) in word_counts.iter() {
            let mut ids = Vec::with_capacity(word.chars().count());
            for ch in word.chars() {
                let symbol = ch.encode_utf8(&mut buf);
                let id = vocab
                    .get_id(symbol)
                    .ok_or_else(|| TokenizerError::UnknownToken(symbol.to_string()))?;
                ids.push(id);
            }
            words.push(Word { ids, count });
        }

        Ok(Self {
            words,
            pair_counts: AHashMap::new(),
            pair_index: AHashMap::new(),
        })
    }

    /// Tally adjacent pair frequencies and build the reverse index.
    ///
    /// The parallel path reduces per-worker partial tables; both sum and
    /// set-union are commutative, so the result is independent of worker
    /// scheduling.
    pub fn count_pairs(&mut self, parallel: bool) {
        type Partial = (AHashMap<Pair, u64>, AHashMap<Pair, AHashSet<usize>>);

        fn tally(acc: &mut Partial, index: usize, word: &Word) {
            for window in word.ids.windows(2) {
                let pair = (window[0], window[1]);
                *acc.0.entry(pair).or_insert(0) += word.count;
                acc.1.entry(pair).or_default().insert(index);
            }
        }

        fn combine(mut left: Partial, right: Partial) -> Partial {
            for (pair, count) in right.0 {
                *left.0.entry(pair).or_insert(0) += count;
            }
            for (pair, indices) in right.1 {
                left.1.entry(pair).or_default().extend(indices);
            }
            left
        }

        let (counts, index) = if parallel {
            self.words
                .par_iter()
                .enumerate()
                .fold(
                    || (AHashMap::new(), AHashMap::new()),
                    |mut acc, (i, word)| {
                        tally(&mut acc, i, word);
                        acc
                    },
                )
                .reduce(|| (AHashMap::new(), AHashMap::new()), combine)
        } else {
            let mut acc: Partial = (AHashMap::new(), AHashMap::new());
            for (i, word) in self.words.iter().enumerate() {
                tally(&mut acc, i, word);
            }
            acc
        };

        self.pair_counts = counts;
        self.pair_index = index;
    }

    /// Current pair frequency table.
    pub fn pair_counts(&self) -> &AHashMap<Pair, u64> {
        &self.pair_counts
    }

    /// The word multiset.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Rewrite every word containing `pair`, replacing non-overlapping
    /// occurrences left to right with `new_id`.
    ///
    /// Only words in the reverse index are touched. Returns the aggregate
    /// frequency deltas for the neighbor pairs broken and formed at each
    /// merge site; the merged pair itself is simply retired. New pairs are
    /// added to the reverse index as they appear.
    pub fn merge_pair(&mut self, pair: Pair, new_id: u32) -> AHashMap<Pair, i64> {
        let mut deltas: AHashMap<Pair, i64> = AHashMap::new();
        let Some(indices) = self.pair_index.remove(&pair) else {
            self.pair_counts.remove(&pair);
            return deltas;
        };

        for word_index in indices {
            let count = self.words[word_index].count as i64;
            let ids = &mut self.words[word_index].ids;

            let mut i = 0;
            while i + 1 < ids.len() {
                if ids[i] == pair.0 && ids[i + 1] == pair.1 {
                    if i > 0 {
                        let broken = (ids[i - 1], ids[i]);
                        if broken != pair {
                            *deltas.entry(broken).or_insert(0) -= count;
                        }
                        let formed = (ids[i - 1], new_id);
                        *deltas.entry(formed).or_insert(0) += count;
                        self.pair_index.entry(formed).or_default().insert(word_index);
                    }
                    if i + 2 < ids.len() {
                        let broken = (ids[i + 1], ids[i + 2]);
                        if broken != pair {
                            *deltas.entry(broken).or_insert(0) -= count;
                        }
                        let formed = (new_id, ids[i + 2]);
                        *deltas.entry(formed).or_insert(0) += count;
                        self.pair_index.entry(formed).or_default().insert(word_index);
                    }

                    ids[i] = new_id;
                    ids.remove(i + 1);
                } else {
                    i += 1;
                }
            }
        }

        self.pair_counts.remove(&pair);
        deltas
    }

    /// Apply frequency deltas, returning each touched pair's new count.
    pub fn apply_deltas(&mut self, deltas: AHashMap<Pair, i64>) -> Vec<(Pair, u64)> {
        let mut updated = Vec::with_capacity(deltas.len());

        for (pair, delta) in deltas {
            let current = self.pair_counts.get(&pair).copied().unwrap_or(0) as i64;
            let next = (current + delta).max(0) as u64;
            if next > 0 {
                self.pair_counts.insert(pair, next);
            } else {
                self.pair_counts.remove(&pair);
            }
            updated.push((pair, next));
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytepair_core::ByteLevelMap;

    fn seeded_vocab() -> Vocabulary {
        Vocabulary::byte_level(&["[UNK]"], &ByteLevelMap::new()).unwrap()
    }

    fn id(vocab: &Vocabulary, s: &str) -> u32 {
        vocab.get_id(s).unwrap()
    }

    #[test]
    fn test_word_counts_accumulate() {
        let mut counts = WordCounts::new();
        counts.observe("ab");
        counts.observe("ab");
        counts.observe("cd");

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total_occurrences(), 3);
    }

    #[test]
    fn test_word_counts_merge_partials() {
        let mut left = WordCounts::new();
        left.observe("ab");
        let mut right = WordCounts::new();
        right.observe("ab");
        right.observe("cd");

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.total_occurrences(), 3);
    }

    #[test]
    fn test_pair_counts_are_frequency_weighted() {
        let vocab = seeded_vocab();
        let mut counts = WordCounts::new();
        counts.observe("aaab");
        counts.observe("aaab");
        counts.observe("aaab");
        counts.observe("abab");

        let mut counter = PairCounter::from_word_counts(&counts, &vocab).unwrap();
        counter.count_pairs(false);

        let a = id(&vocab, "a");
        let b = id(&vocab, "b");
        assert_eq!(counter.pair_counts().get(&(a, a)), Some(&6));
        assert_eq!(counter.pair_counts().get(&(a, b)), Some(&5));
        assert_eq!(counter.pair_counts().get(&(b, a)), Some(&1));
    }

    #[test]
    fn test_parallel_counting_matches_sequential() {
        let vocab = seeded_vocab();
        let mut counts = WordCounts::new();
        for word in ["alpha", "beta", "gamma", "alpha", "delta"] {
            counts.observe(word);
        }

        let mut sequential = PairCounter::from_word_counts(&counts, &vocab).unwrap();
        sequential.count_pairs(false);
        let mut parallel = PairCounter::from_word_counts(&counts, &vocab).unwrap();
        parallel.count_pairs(true);

        assert_eq!(sequential.pair_counts().len(), parallel.pair_counts().len());
        for (pair, count) in sequential.pair_counts() {
            assert_eq!(parallel.pair_counts().get(pair), Some(count));
        }
    }

    #[test]
    fn test_merge_pair_rewrites_and_reports_deltas() {
        let vocab = seeded_vocab();
        let mut counts = WordCounts::new();
        counts.observe("aaab");

        let mut counter = PairCounter::from_word_counts(&counts, &vocab).unwrap();
        counter.count_pairs(false);

        let a = id(&vocab, "a");
        let b = id(&vocab, "b");
        let new_id = 9999;

        let deltas = counter.merge_pair((a, a), new_id);

        // "aaab" -> [aa, a, b]
        assert_eq!(counter.words()[0].ids, vec![new_id, a, b]);
        // The merged pair is retired outright, not delta-adjusted.
        assert!(!counter.pair_counts().contains_key(&(a, a)));
        assert_eq!(deltas.get(&(new_id, a)), Some(&1));

        let updated = counter.apply_deltas(deltas);
        assert!(updated.contains(&((new_id, a), 1)));
        assert_eq!(counter.pair_counts().get(&(new_id, a)), Some(&1));
    }

    #[test]
    fn test_merge_pair_handles_overlapping_runs() {
        let vocab = seeded_vocab();
        let mut counts = WordCounts::new();
        counts.observe("aaaa");

        let mut counter = PairCounter::from_word_counts(&counts, &vocab).unwrap();
        counter.count_pairs(false);

        let a = id(&vocab, "a");
        let new_id = 9999;
        let deltas = counter.merge_pair((a, a), new_id);

        // Left-to-right non-overlapping: [a,a,a,a] -> [aa, aa]
        assert_eq!(counter.words()[0].ids, vec![new_id, new_id]);

        let updated = counter.apply_deltas(deltas);
        assert!(updated.contains(&((new_id, new_id), 1)));
    }

    #[test]
    fn test_merge_pair_touches_only_indexed_words() {
        let vocab = seeded_vocab();
        let mut counts = WordCounts::new();
        counts.observe("ab");
        counts.observe("xy");

        let mut counter = PairCounter::from_word_counts(&counts, &vocab).unwrap();
        counter.count_pairs(false);

        let a = id(&vocab, "a");
        let b = id(&vocab, "b");
        counter.merge_pair((a, b), 9999);

        let xy: Vec<u32> = vec![id(&vocab, "x"), id(&vocab, "y")];
        let untouched = counter.words().iter().find(|w| w.ids == xy);
        assert!(untouched.is_some());
    }
}
