//! Inspect command implementation.

use clap::Parser;

/// Inspect command arguments.
#[derive(Parser)]
pub struct InspectCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,
}

use anyhow::Result as AnyhowResult;
use bytepair_tokenizer::Tokenizer;
use std::path::Path;

pub fn run(cmd: InspectCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(Path::new(&cmd.tokenizer))?;
    let vocab = tokenizer.vocab();

    println!("Model: {}", cmd.tokenizer);
    println!("  Vocab size: {}", tokenizer.vocab_size());
    println!("  Merge rules: {}", tokenizer.merges().len());
    println!("  Grammar: {}", tokenizer.grammar().name());
    println!("  Normalization: {}", tokenizer.normalization().name());

    println!("  Special tokens:");
    for (id, literal) in vocab.special.literals().enumerate() {
        let mut roles = Vec::new();
        let id = id as u32;
        if vocab.special.pad == Some(id) {
            roles.push("pad");
        }
        if vocab.special.unk == Some(id) {
            roles.push("unk");
        }
        if vocab.special.cls == Some(id) {
            roles.push("cls");
        }
        if vocab.special.sep == Some(id) {
            roles.push("sep");
        }
        if vocab.special.mask == Some(id) {
            roles.push("mask");
        }
        if roles.is_empty() {
            println!("    {:>5}  {}", id, literal);
        } else {
            println!("    {:>5}  {}  ({})", id, literal, roles.join(", "));
        }
    }

    Ok(())
}
