//! Crate error kinds.
//!
//! Division-by-zero degeneracies in the statistics are deliberately not
//! errors: they surface as infinity sentinels in the output so that the
//! rest of the table survives (see [`crate::gof`]).

use std::path::PathBuf;
use thiserror::Error;

/// Errors fatal to a run.
#[derive(Debug, Error)]
pub enum Error {
    /// A source or output file could not be opened or read.
    #[error("could not open file {}: {source}", .path.display())]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The output path already exists; refusing to overwrite.
    #[error("file already exists: {}", .0.display())]
    OutputExists(PathBuf),
    /// A source file contained no usable lines.
    #[error("0 sequences found in file: {}", .0.display())]
    EmptyInput(PathBuf),
    /// A line could not be parsed into a sequence and a count.
    #[error("{}:{line}: {reason}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    /// A comparison-set, library, or arena index exceeds its bound.
    #[error("index {index} out of range (limit {limit})")]
    IndexOutOfRange { index: usize, limit: usize },
    /// The arena was reserved while still holding data.
    #[error("arena is already initialized; clear it before reserving")]
    AlreadyInitialized,
}
