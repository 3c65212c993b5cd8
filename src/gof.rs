//! Weighted goodness-of-fit statistics over pooled library totals.
//!
//! Degenerate divisions never abort a run: a zero pooled total or zero
//! expected count degrades that one statistic to an infinity sentinel,
//! logged at warn level, and every other k-mer/set value survives.

use crate::arena::BlockArena;
use crate::error::Error;
use crate::store::CountStore;
use tracing::{debug, warn};

/// Probability that a random k-mer drawn from the pool of `set` comes
/// from each of its libraries: `totals[i] / sum(totals over set)`.
///
/// A zero pooled total yields infinity sentinels for every slot.
pub fn library_probs(set: &[usize], totals: &[u64]) -> Vec<f64> {
    let pool: u64 = set.iter().map(|&i| totals[i]).sum();
    if pool == 0 {
        warn!("division by zero: comparison set has no counts");
        return vec![f64::INFINITY; set.len()];
    }
    set.iter()
        .map(|&i| totals[i] as f64 / pool as f64)
        .collect()
}

/// Weighted chi-square-like statistic for one record over one set.
///
/// `expected[p] = probs[p] * sum(counts over set)`; accumulates
/// `(observed - expected)^2 / expected`. A zero expected count aborts
/// the whole statistic to positive infinity rather than skipping terms.
pub fn weighted_gof(probs: &[f64], counts: &[u64], set: &[usize]) -> f64 {
    let total: u64 = set.iter().map(|&i| counts[i]).sum();
    let mut stat = 0.0;
    for (&p, &i) in probs.iter().zip(set) {
        let expected = p * total as f64;
        if expected == 0.0 {
            warn!("division by zero in goodness-of-fit");
            return f64::INFINITY;
        }
        let d = counts[i] as f64 - expected;
        stat += d * d / expected;
    }
    stat
}

/// Compute one GOF value per record per comparison set, filling `arena`
/// in row-major `(kmer_rank, set_rank)` order.
///
/// `kmer_rank` follows the store's iteration order, which the caller
/// must keep unchanged until the report is written. Library indices in
/// `sets` are 0-based and must be below `store.nlibs()`. A still-
/// initialized arena is cleared first, with a warning.
pub fn fit(
    store: &CountStore,
    sets: &[Vec<usize>],
    arena: &mut BlockArena<f64>,
) -> Result<(), Error> {
    for set in sets {
        for &i in set {
            if i >= store.nlibs() {
                return Err(Error::IndexOutOfRange {
                    index: i,
                    limit: store.nlibs(),
                });
            }
        }
    }

    let probs: Vec<Vec<f64>> = sets
        .iter()
        .map(|set| library_probs(set, store.totals()))
        .collect();

    if !arena.is_empty() {
        warn!("arena already initialized; clearing before fit");
        arena.clear();
    }
    debug!(
        kmers = store.len(),
        sets = sets.len(),
        "allocating space for goodness-of-fit statistics"
    );
    arena.format_reserve(store.len() * sets.len(), 0.0)?;

    let mut i = 0usize;
    for (_, counts) in store.iter() {
        for (set, p) in sets.iter().zip(&probs) {
            arena.write(i, weighted_gof(p, counts, set))?;
            i += 1;
        }
    }
    Ok(())
}
