//! Count-file ingestion: one `<sequence> <count>` text file per library.
//!
//! The first file fixes the run's k-mer length (taken from its first
//! non-empty line) and the library count, and sizes the store from an
//! estimated line count: file bytes divided by the k-mer length plus a
//! fixed per-line overhead.

use crate::encode::{SEGMENT_DIGITS, encode};
use crate::error::Error;
use crate::store::CountStore;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

/// Bytes per line beyond the sequence itself (separator, count digits,
/// newline) assumed by the line-count estimate.
const NONSEQ_CHARS: u64 = 3;

/// Parse every library file into a [`CountStore`].
///
/// Files are assigned library slots in argument order. Fails with
/// [`Error::FileUnavailable`], [`Error::EmptyInput`], or
/// [`Error::MalformedLine`]; all are fatal to the run.
pub fn read_counts(files: &[PathBuf]) -> Result<CountStore, Error> {
    let mut store = CountStore::new(files.len());
    let mut merlen = 0usize;

    for (lib, path) in files.iter().enumerate() {
        info!(file = %path.display(), "reading file");
        let file = File::open(path).map_err(|source| Error::FileUnavailable {
            path: path.clone(),
            source,
        })?;
        let bytes = file
            .metadata()
            .map_err(|source| Error::FileUnavailable {
                path: path.clone(),
                source,
            })?
            .len();

        let mut usable = 0u64;
        let mut lineno = 0u64;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| Error::FileUnavailable {
                path: path.clone(),
                source,
            })?;
            lineno += 1;
            let mut tokens = line.split_whitespace();
            let (seq, count) = match (tokens.next(), tokens.next()) {
                (Some(s), Some(c)) => (s, c),
                (None, _) => continue, // blank line
                (Some(_), None) => {
                    return Err(malformed(path, lineno, "expected <sequence> <count>"));
                }
            };

            if usable == 0 && lib == 0 {
                merlen = seq.len();
                info!(k = merlen, "kmer length detected");
                store.reserve(estimate_lines(bytes, merlen));
            }
            if seq.len() != merlen {
                return Err(malformed(
                    path,
                    lineno,
                    &format!("sequence length {} differs from k = {}", seq.len(), merlen),
                ));
            }
            let count: u64 = count
                .parse()
                .map_err(|_| malformed(path, lineno, &format!("invalid count token {count:?}")))?;

            let key = encode(seq, SEGMENT_DIGITS)
                .ok_or_else(|| malformed(path, lineno, "empty sequence"))?;
            store.upsert(key, lib, count)?;
            usable += 1;
        }

        if usable == 0 {
            return Err(Error::EmptyInput(path.clone()));
        }
    }
    info!(kmers = store.len(), "kmer sequences in the dataset");
    Ok(store)
}

/// Approximate line count of a file from its byte length.
fn estimate_lines(bytes: u64, merlen: usize) -> usize {
    if merlen == 0 {
        return 0;
    }
    (bytes as f64 / (merlen as u64 + NONSEQ_CHARS) as f64).ceil() as usize
}

fn malformed(path: &Path, line: u64, reason: &str) -> Error {
    Error::MalformedLine {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}
