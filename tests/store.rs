use kmpare::encode::{SeqKey, encode};
use kmpare::store::{CountStore, bucket_hash};

fn key(seq: &str) -> SeqKey {
    encode(seq, 19).unwrap()
}

#[test]
fn test_hash_is_reduced_by_explicit_modulus() {
    let k = key("ACGTACGT");
    for m in [1u64, 2, 7, 16, 24, 1_000_003] {
        assert!(bucket_hash(&k, m) < m);
    }
}

#[test]
fn test_hash_changes_with_modulus() {
    // Same key, different table generations: the bucket legitimately moves.
    let k = SeqKey::from_segments(vec![17]);
    assert_eq!(bucket_hash(&k, 16), 1);
    assert_eq!(bucket_hash(&k, 24), 17);
}

#[test]
fn test_colliding_keys_resolve_to_distinct_records() {
    // Segments 1 and 17 collide under the initial modulus of 16.
    let k1 = SeqKey::from_segments(vec![1]);
    let k2 = SeqKey::from_segments(vec![17]);
    assert_eq!(bucket_hash(&k1, 16), bucket_hash(&k2, 16));

    let mut store = CountStore::new(1);
    store.upsert(k1.clone(), 0, 3).unwrap();
    store.upsert(k2.clone(), 0, 9).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&k1), Some(&[3u64][..]));
    assert_eq!(store.get(&k2), Some(&[9u64][..]));
}

#[test]
fn test_upsert_overwrites_slot_but_totals_accumulate() {
    let mut store = CountStore::new(2);
    store.upsert(key("AAC"), 0, 5).unwrap();
    store.upsert(key("AAC"), 0, 7).unwrap();
    // Record holds the last write for that library slot...
    assert_eq!(store.get(&key("AAC")), Some(&[7u64, 0][..]));
    // ...while totals saw every line (historical divergence, preserved).
    assert_eq!(store.totals(), &[12, 0]);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_second_library_fills_its_own_slot() {
    let mut store = CountStore::new(2);
    store.upsert(key("AAC"), 0, 5).unwrap();
    store.upsert(key("AAG"), 1, 3).unwrap();
    store.upsert(key("AAC"), 1, 2).unwrap();
    assert_eq!(store.get(&key("AAC")), Some(&[5u64, 2][..]));
    assert_eq!(store.get(&key("AAG")), Some(&[0u64, 3][..]));
    assert_eq!(store.totals(), &[5, 5]);
}

#[test]
fn test_library_index_out_of_range() {
    let mut store = CountStore::new(2);
    assert!(store.upsert(key("AAC"), 2, 1).is_err());
}

#[test]
fn test_growth_triggers_single_full_rehash_at_capacity() {
    let mut store = CountStore::new(1);
    assert_eq!(store.capacity(), 16);

    // Fill to exactly the bucket capacity: no growth yet.
    let seqs = gen_kmers(17);
    for s in &seqs[..16] {
        store.upsert(key(s), 0, 1).unwrap();
    }
    assert_eq!(store.rehashes(), 0);
    assert_eq!(store.capacity(), 16);

    // The 17th live entry exceeds capacity: exactly one rehash, 16 * 1.5.
    store.upsert(key(&seqs[16]), 0, 1).unwrap();
    assert_eq!(store.rehashes(), 1);
    assert_eq!(store.capacity(), 24);

    // Every key still resolves after re-bucketing under the new modulus.
    for s in &seqs {
        assert_eq!(store.get(&key(s)), Some(&[1u64][..]));
    }
}

#[test]
fn test_reserve_prevents_mid_run_rehash() {
    let mut store = CountStore::new(1);
    store.reserve(100); // 100 * 1.5 = 150 buckets
    assert_eq!(store.capacity(), 150);
    let base = store.rehashes();
    for s in gen_kmers(100) {
        store.upsert(key(&s), 0, 1).unwrap();
    }
    assert_eq!(store.rehashes(), base);
}

#[test]
fn test_iteration_order_is_insertion_order_and_rehash_stable() {
    let mut store = CountStore::new(1);
    let seqs = gen_kmers(40); // enough to force growth past 16 and 24
    for s in &seqs {
        store.upsert(key(s), 0, 1).unwrap();
    }
    assert!(store.rehashes() >= 1);
    let order: Vec<_> = store.iter().map(|(k, _)| k.clone()).collect();
    let expect: Vec<_> = seqs.iter().map(|s| key(s)).collect();
    assert_eq!(order, expect);
}

/// Distinct 4-mers in a deterministic order.
fn gen_kmers(n: usize) -> Vec<String> {
    let alpha = [b'A', b'C', b'G', b'T'];
    (0..n)
        .map(|i| {
            let mut s = Vec::new();
            let mut v = i;
            for _ in 0..4 {
                s.push(alpha[v % 4]);
                v /= 4;
            }
            String::from_utf8(s).unwrap()
        })
        .collect()
}
