//! BPE trainer implementation.
//!
//! Training consumes a streaming document sequence, accumulates word and
//! pair frequencies, then repeatedly freezes the most frequent adjacent
//! pair as a new vocabulary symbol and merge rule. The merge loop is
//! strictly sequential; only the initial counting fans out across workers.
//! Given the same corpus order and configuration, two runs produce
//! identical vocabularies and rule lists.

use super::counter::{PairCounter, WordCounts};
use bytepair_core::{
    ByteLevelMap, MergeCandidate, MergeRule, MergeTable, PairPriorityQueue, Result,
    SpecialTokens, TokenizerError, Vocabulary,
};
use bytepair_tokenizer::{NormalizationForm, Normalizer, SplitGrammar, Splitter, Tokenizer};
use compact_str::CompactString;

/// Skip-rate enforcement starts once this many documents have been offered.
const SKIP_CHECK_MIN_DOCS: u64 = 16;

/// Configuration for BPE training.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Target vocabulary size (specials + byte symbols + merges)
    pub vocab_size: usize,
    /// Minimum pair frequency for a merge
    pub min_frequency: u64,
    /// Special token literals, reserved at ids 0..k-1
    pub special_tokens: Vec<String>,
    /// Word splitting grammar
    pub grammar: SplitGrammar,
    /// Unicode normalization applied before splitting
    pub normalization: NormalizationForm,
    /// Fan initial pair counting out across workers
    pub parallel: bool,
    /// Optional hard bound on the number of merges
    pub max_merges: Option<usize>,
    /// Fraction of unreadable documents tolerated before training aborts
    pub max_skip_ratio: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            vocab_size: 64_000,
            min_frequency: 2,
            special_tokens: ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]"]
                .map(String::from)
                .to_vec(),
            grammar: SplitGrammar::default(),
            normalization: NormalizationForm::Nfc,
            parallel: true,
            max_merges: None,
            max_skip_ratio: 0.1,
        }
    }
}

/// BPE trainer.
///
/// Documents are fed in streaming fashion with [`feed`](Self::feed); the
/// corpus itself is never materialized, only word-frequency totals.
/// [`train`](Self::train) then runs the merge loop and produces the
/// finished [`Tokenizer`].
pub struct BpeTrainer {
    config: TrainerConfig,
    splitter: Splitter,
    normalizer: Normalizer,
    byte_map: ByteLevelMap,
    word_counts: WordCounts,
    documents_seen: u64,
    documents_skipped: u64,
}

impl BpeTrainer {
    /// Create a trainer, validating the configuration before any corpus
    /// work begins.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        if config.special_tokens.is_empty() {
            return Err(TokenizerError::InvalidConfig(
                "At least one special token is required; the unknown-token role \
                 cannot be resolved from an empty list"
                    .to_string(),
            ));
        }
        if config.vocab_size < config.special_tokens.len() {
            return Err(TokenizerError::InvalidConfig(format!(
                "vocab_size {} is smaller than the {} reserved special tokens",
                config.vocab_size,
                config.special_tokens.len()
            )));
        }
        // Surfaces duplicate literals now rather than after a corpus pass.
        SpecialTokens::from_literals(&config.special_tokens)?;

        let splitter = Splitter::new(config.grammar)?;
        let normalizer = Normalizer::new(config.normalization);

        Ok(Self {
            config,
            splitter,
            normalizer,
            byte_map: ByteLevelMap::new(),
            word_counts: WordCounts::new(),
            documents_seen: 0,
            documents_skipped: 0,
        })
    }

    /// Consume a batch of documents, accumulating word frequencies.
    ///
    /// Unreadable documents are skipped and counted; when the skip rate
    /// passes the configured threshold the batch fails instead.
    pub fn feed<I>(&mut self, documents: I) -> Result<()>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
    {
        for document in documents {
            match document {
                Ok(text) => {
                    self.documents_seen += 1;
                    self.observe(&text)?;
                }
                Err(err) => {
                    self.documents_skipped += 1;
                    log::warn!("Skipping unreadable document: {}", err);
                    self.check_skip_rate()?;
                }
            }
        }
        Ok(())
    }

    fn observe(&mut self, text: &str) -> Result<()> {
        let normalized = self.normalizer.normalize(text);
        for word in self.splitter.split(&normalized)? {
            let symbols = self.byte_map.encode_bytes(word.as_bytes());
            self.word_counts.observe(&symbols);
        }
        Ok(())
    }

    fn check_skip_rate(&self) -> Result<()> {
        let total = self.documents_seen + self.documents_skipped;
        if total >= SKIP_CHECK_MIN_DOCS
            && self.documents_skipped as f64 > self.config.max_skip_ratio * total as f64
        {
            return Err(TokenizerError::SkipRateExceeded {
                skipped: self.documents_skipped,
                total,
            });
        }
        Ok(())
    }

    /// Documents accepted so far.
    pub fn documents_seen(&self) -> u64 {
        self.documents_seen
    }

    /// Documents skipped so far.
    pub fn documents_skipped(&self) -> u64 {
        self.documents_skipped
    }

    /// Run the merge loop and build the final model.
    ///
    /// Stops at the target vocabulary size, or earlier when no pair
    /// reaches the minimum frequency; stopping early is a normal outcome
    /// reported through the achieved vocabulary size.
    pub fn train(self) -> Result<Tokenizer> {
        let config = self.config;

        let mut vocab = Vocabulary::byte_level(&config.special_tokens, &self.byte_map)?;
        let target = config.vocab_size;

        let mut counter = PairCounter::from_word_counts(&self.word_counts, &vocab)?;
        counter.count_pairs(config.parallel);
        log::info!(
            "Counted {} distinct words, {} distinct pairs",
            self.word_counts.len(),
            counter.pair_counts().len()
        );

        let symbol = |vocab: &Vocabulary, id: u32| -> CompactString {
            vocab.get_token(id).map(CompactString::new).unwrap_or_default()
        };

        let mut queue = PairPriorityQueue::with_capacity(counter.pair_counts().len());
        for (&pair, &count) in counter.pair_counts() {
            queue.push(MergeCandidate::new(
                pair,
                count,
                symbol(&vocab, pair.0),
                symbol(&vocab, pair.1),
            ));
        }

        let mut merges = MergeTable::new();
        let max_merges = config.max_merges.unwrap_or(usize::MAX);

        while vocab.len() < target && merges.len() < max_merges {
            let Some(candidate) = queue.pop() else { break };
            if candidate.count < config.min_frequency {
                break;
            }

            let new_token = format!("{}{}", candidate.left, candidate.right);
            let new_id = vocab.add_token(&new_token)?;
            merges.push(MergeRule {
                left: candidate.pair.0,
                right: candidate.pair.1,
                new_id,
            });

            let deltas = counter.merge_pair(candidate.pair, new_id);
            queue.remove(candidate.pair);
            for (pair, count) in counter.apply_deltas(deltas) {
                queue.update(pair, count, symbol(&vocab, pair.0), symbol(&vocab, pair.1));
            }

            if merges.len() % 1000 == 0 {
                log::debug!(
                    "Learned {} merges, vocabulary at {} of {}",
                    merges.len(),
                    vocab.len(),
                    target
                );
            }
        }

        log::info!(
            "Training finished: vocabulary {} (target {}), {} merge rules",
            vocab.len(),
            target,
            merges.len()
        );

        Tokenizer::from_parts(vocab, merges, config.grammar, config.normalization)
    }

    /// Validate, feed a document source once, and train.
    pub fn train_from<I>(config: TrainerConfig, documents: I) -> Result<Tokenizer>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
    {
        let mut trainer = Self::new(config)?;
        trainer.feed(documents)?;
        trainer.train()
    }
}
