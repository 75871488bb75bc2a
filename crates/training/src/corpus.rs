//! Streaming corpus access.
//!
//! The trainer consumes any `IntoIterator` of document results; this module
//! provides the common case of newline-delimited documents in a file,
//! yielding them lazily so the corpus is never held in memory.

use bytepair_core::{Result, TokenizerError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a newline-delimited document file as a lazy document source.
///
/// Each line is one document. Read failures surface as per-item errors so
/// the trainer's skip policy can decide whether to continue.
pub fn read_documents(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let file = File::open(path).map_err(|err| TokenizerError::Io {
        path: path.to_path_buf(),
        err,
    })?;
    Ok(BufReader::new(file).lines())
}
