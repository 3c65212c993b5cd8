//! `kmpare`: compare k-mer count libraries with a weighted goodness-of-fit
//! statistic.
//!
//! Pipeline
//! - [`ingest::read_counts`] parses one count file per library into a
//!   [`CountStore`] keyed by digit-encoded sequences ([`encode`]).
//! - [`gof::fit`] computes one GOF value per k-mer per comparison set and
//!   writes them into a [`BlockArena`] in the store's iteration order.
//! - [`report`] prints the table, walking store and arena in lock-step.
//!
//! The store's iteration order is stable between the fit and report stages
//! of a run; the arena's logical index `kmer_rank * nsets + set_rank`
//! depends on it.

pub mod arena;
pub mod encode;
pub mod error;
pub mod gof;
pub mod ingest;
pub mod report;
pub mod store;

pub use arena::BlockArena;
pub use encode::{SEGMENT_DIGITS, SeqKey, decode, encode};
pub use error::Error;
pub use gof::{fit, library_probs, weighted_gof};
pub use ingest::read_counts;
pub use store::CountStore;
