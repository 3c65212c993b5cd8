use kmpare::{BlockArena, CountStore, encode, fit, library_probs, weighted_gof};

fn key(seq: &str) -> kmpare::SeqKey {
    encode(seq, 19).unwrap()
}

#[test]
fn test_library_probs_from_pooled_totals() {
    let probs = library_probs(&[0, 1], &[5, 3]);
    assert_eq!(probs, vec![0.625, 0.375]);
}

#[test]
fn test_library_probs_subset_pools_only_named_libraries() {
    let probs = library_probs(&[0, 2], &[2, 100, 6]);
    assert_eq!(probs, vec![0.25, 0.75]);
}

#[test]
fn test_library_probs_zero_pool_yields_infinity_sentinels() {
    let probs = library_probs(&[0, 1], &[0, 0]);
    assert!(probs.iter().all(|p| p.is_infinite() && *p > 0.0));
}

#[test]
fn test_weighted_gof_worked_example() {
    // observed [10, 0], probs [0.5, 0.5] -> expected [5, 5] ->
    // (10-5)^2/5 + (0-5)^2/5 = 10.0
    let stat = weighted_gof(&[0.5, 0.5], &[10, 0], &[0, 1]);
    assert_eq!(stat, 10.0);
}

#[test]
fn test_weighted_gof_zero_expected_aborts_to_infinity() {
    // Zero observed total makes every expected count zero.
    let stat = weighted_gof(&[0.5, 0.5], &[0, 0], &[0, 1]);
    assert!(stat.is_infinite() && stat > 0.0);
}

#[test]
fn test_fit_writes_row_major_kmer_then_set() {
    let mut store = CountStore::new(2);
    store.upsert(key("AAC"), 0, 5).unwrap();
    store.upsert(key("AAG"), 1, 3).unwrap();
    // totals [5, 3]

    let sets = vec![vec![0, 1], vec![0]];
    let mut arena = BlockArena::<f64>::new();
    fit(&store, &sets, &mut arena).unwrap();
    assert_eq!(arena.len(), 4);

    // Row 0: AAC counts [5, 0].
    // Set {0,1}: p = [0.625, 0.375], total 5, expected [3.125, 1.875]
    //   -> (5-3.125)^2/3.125 + (0-1.875)^2/1.875 = 1.125 + 1.875 = 3.0
    assert_eq!(arena.get(0).unwrap(), 3.0);
    // Set {0}: p = [1.0], expected 5 -> 0.0
    assert_eq!(arena.get(1).unwrap(), 0.0);

    // Row 1: AAG counts [0, 3].
    // Set {0,1}: total 3, expected [1.875, 1.125] -> 1.875 + 3.125 = 5.0
    assert_eq!(arena.get(2).unwrap(), 5.0);
    // Set {0}: observed total 0 -> zero expected -> +inf sentinel.
    assert!(arena.get(3).unwrap().is_infinite());
}

#[test]
fn test_fit_rejects_out_of_range_set_index() {
    let mut store = CountStore::new(2);
    store.upsert(key("AAC"), 0, 5).unwrap();
    let mut arena = BlockArena::<f64>::new();
    assert!(fit(&store, &[vec![0, 2]], &mut arena).is_err());
}

#[test]
fn test_fit_clears_an_initialized_arena() {
    let mut store = CountStore::new(1);
    store.upsert(key("AAC"), 0, 5).unwrap();
    let mut arena = BlockArena::<f64>::new();
    arena.format_reserve(100, -1.0).unwrap();
    fit(&store, &[vec![0]], &mut arena).unwrap();
    assert_eq!(arena.len(), 1);
    assert_eq!(arena.get(0).unwrap(), 0.0);
}
