//! CountStore: hash table from [`SeqKey`] to per-library counts.
//!
//! Layout: a dense entry vector (insertion order) plus an index-bucket
//! array. Iteration walks the dense vector, so the order is stable across
//! rehashes — the fit and report stages of one run see identical order.
//!
//! Growth is amortized, not doubling: once the live entry count exceeds
//! the bucket capacity, capacity grows by the over-reserve factor
//! (default 0.50) and every entry is re-bucketed under the new modulus.

use crate::encode::SeqKey;
use crate::error::Error;
use tracing::warn;

/// Fraction of extra capacity reserved beyond the estimate, and the
/// growth increment applied on each rehash.
pub const DEFAULT_OVER_RESERVE: f64 = 0.50;

/// Multiplier of the polynomial rolling hash.
const HASH_MULTIPLIER: u64 = 31;

const INITIAL_CAPACITY: usize = 16;

/// Polynomial rolling hash over the key's segments, reduced by an
/// explicit `modulus` at every step.
///
/// The modulus is the table's current bucket capacity, passed at call
/// time: the same key legitimately lands in different buckets across
/// table generations, which is why growth always re-buckets every entry.
#[inline]
pub fn bucket_hash(key: &SeqKey, modulus: u64) -> u64 {
    debug_assert!(modulus > 0);
    let mut h: u64 = 0;
    for &seg in key.segments() {
        h = (h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(seg as u64)) % modulus;
    }
    h
}

struct Entry {
    key: SeqKey,
    counts: Vec<u64>,
}

/// Hash table of per-library k-mer counts with running library totals.
pub struct CountStore {
    buckets: Vec<Vec<usize>>,
    entries: Vec<Entry>,
    capacity: usize,
    over_reserve: f64,
    totals: Vec<u64>,
    nlibs: usize,
    rehashes: usize,
}

impl CountStore {
    /// Create an empty store for `nlibs` libraries.
    pub fn new(nlibs: usize) -> Self {
        CountStore {
            buckets: vec![Vec::new(); INITIAL_CAPACITY],
            entries: Vec::new(),
            capacity: INITIAL_CAPACITY,
            over_reserve: DEFAULT_OVER_RESERVE,
            totals: vec![0; nlibs],
            nlibs,
            rehashes: 0,
        }
    }

    /// Override the over-reserve fraction (growth factor is `1 + frac`).
    pub fn with_over_reserve(mut self, frac: f64) -> Self {
        self.over_reserve = frac.max(0.0);
        self
    }

    /// Reserve buckets for an estimated entry count, inflated by the
    /// over-reserve fraction to limit mid-run rehashing.
    pub fn reserve(&mut self, estimated: usize) {
        let target = estimated + (estimated as f64 * self.over_reserve) as usize;
        if target > self.capacity {
            self.rebuild(target);
        }
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bucket capacity (the hash modulus).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of libraries per record.
    #[inline]
    pub fn nlibs(&self) -> usize {
        self.nlibs
    }

    /// Running per-library totals across all processed lines.
    #[inline]
    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    /// Number of full rehashes performed since creation.
    #[inline]
    pub fn rehashes(&self) -> usize {
        self.rehashes
    }

    /// Insert or update the record for `key`.
    ///
    /// A first sighting creates a zero-filled record and sets slot `lib`;
    /// a repeat sighting overwrites slot `lib`. The library total is
    /// raised by `count` unconditionally, so a sequence repeated within
    /// one file counts once in its record but each time in the totals
    /// (historical behavior, kept for output parity).
    pub fn upsert(&mut self, key: SeqKey, lib: usize, count: u64) -> Result<(), Error> {
        if lib >= self.nlibs {
            return Err(Error::IndexOutOfRange {
                index: lib,
                limit: self.nlibs,
            });
        }
        self.totals[lib] += count;

        let b = bucket_hash(&key, self.capacity as u64) as usize;
        let found = self.buckets[b]
            .iter()
            .copied()
            .find(|&i| self.entries[i].key == key);
        if let Some(i) = found {
            self.entries[i].counts[lib] = count;
            return Ok(());
        }

        let mut counts = vec![0u64; self.nlibs];
        counts[lib] = count;
        let idx = self.entries.len();
        self.entries.push(Entry { key, counts });
        self.buckets[b].push(idx);
        self.growth_check();
        Ok(())
    }

    /// Look up the counts recorded for `key`.
    pub fn get(&self, key: &SeqKey) -> Option<&[u64]> {
        let b = bucket_hash(key, self.capacity as u64) as usize;
        self.buckets[b]
            .iter()
            .find(|&&i| self.entries[i].key == *key)
            .map(|&i| self.entries[i].counts.as_slice())
    }

    /// Iterate records in insertion order. Stable for a given table
    /// state; the fit and report stages rely on seeing the same order.
    pub fn iter(&self) -> impl Iterator<Item = (&SeqKey, &[u64])> {
        self.entries.iter().map(|e| (&e.key, e.counts.as_slice()))
    }

    /// Grow and fully rehash once the live count exceeds capacity.
    fn growth_check(&mut self) {
        if self.entries.len() > self.capacity {
            let next = (self.capacity as f64 * (1.0 + self.over_reserve)) as usize;
            warn!(
                entries = self.entries.len(),
                capacity = self.capacity,
                next,
                "increasing reserve to accommodate additional kmers"
            );
            self.rebuild(next.max(self.capacity + 1));
        }
    }

    /// Re-bucket every entry under a new capacity. Never extends in
    /// place: the hash modulus changed, so old bucket indices are stale.
    fn rebuild(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.buckets.clear();
        self.buckets.resize(capacity, Vec::new());
        for (i, e) in self.entries.iter().enumerate() {
            let b = bucket_hash(&e.key, capacity as u64) as usize;
            self.buckets[b].push(i);
        }
        self.rehashes += 1;
    }
}
