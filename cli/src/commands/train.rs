//! Train command implementation.

use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training data (one document per line)
    #[arg(short, long)]
    pub input: String,

    /// Output directory for the trained model
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size
    #[arg(short, long, default_value_t = 64_000)]
    pub vocab_size: usize,

    /// Minimum pair frequency for merges
    #[arg(short, long, default_value_t = 2)]
    pub min_frequency: u64,

    /// Splitting grammar: "whitespace" or "lexical"
    #[arg(short, long, default_value = "whitespace")]
    pub grammar: String,

    /// Prepend a space to text that does not start with one (whitespace grammar)
    #[arg(long, default_value_t = true)]
    pub add_prefix_space: bool,

    /// Unicode normalization: none, nfc, nfd, nfkc or nfkd
    #[arg(short, long, default_value = "nfc")]
    pub normalization: String,

    /// Comma-separated special token literals
    #[arg(short, long, default_value = "[PAD],[UNK],[CLS],[SEP],[MASK]")]
    pub special_tokens: String,

    /// Disable parallel pair counting
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Also export vocab.json + merges.txt alongside tokenizer.json
    #[arg(long, default_value_t = false)]
    pub export_vocab_merges: bool,
}

use anyhow::{bail, Result as AnyhowResult};
use bytepair_tokenizer::{NormalizationForm, SplitGrammar, TokenizerSaver};
use bytepair_training::{read_documents, BpeTrainer, TrainerConfig};
use std::path::Path;
use std::time::Instant;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    let grammar = match cmd.grammar.as_str() {
        "whitespace" => SplitGrammar::Whitespace { add_prefix_space: cmd.add_prefix_space },
        "lexical" => SplitGrammar::LexicalClass,
        other => bail!("Unknown grammar {:?}; expected \"whitespace\" or \"lexical\"", other),
    };
    let Some(normalization) = NormalizationForm::parse(&cmd.normalization) else {
        bail!("Unknown normalization form {:?}", cmd.normalization);
    };

    let config = TrainerConfig {
        vocab_size: cmd.vocab_size,
        min_frequency: cmd.min_frequency,
        special_tokens: cmd
            .special_tokens
            .split(',')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        grammar,
        normalization,
        parallel: !cmd.sequential,
        ..Default::default()
    };

    println!("Training tokenizer...");
    println!("  Input: {}", cmd.input);
    println!("  Output: {}", cmd.output);
    println!("  Vocab size: {}", cmd.vocab_size);
    println!("  Grammar: {}", grammar.name());
    println!();

    let start = Instant::now();
    let mut trainer = BpeTrainer::new(config)?;
    trainer.feed(read_documents(Path::new(&cmd.input))?)?;
    println!(
        "Counted {} documents ({} skipped) in {:.2}s",
        trainer.documents_seen(),
        trainer.documents_skipped(),
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let model = trainer.train()?;
    println!("Training completed in {:.2}s", start.elapsed().as_secs_f64());
    println!("Final vocab size: {}", model.vocab_size());
    println!("Merge rules: {}", model.merges().len());
    println!();

    let output_path = Path::new(&cmd.output);
    model.save(output_path)?;
    if cmd.export_vocab_merges {
        TokenizerSaver::new(&model).export_vocab_merges(output_path)?;
    }
    println!("Model saved to {}", cmd.output);

    Ok(())
}
