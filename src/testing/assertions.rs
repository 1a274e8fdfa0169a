//! Assertions for collected dataset outputs.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two collections of key-value pairs are equal after sorting by key.
///
/// # Panics
///
/// Panics if the collections differ after sorting by key.
pub fn assert_kv_collections_equal<K, V>(mut actual: Vec<(K, V)>, mut expected: Vec<(K, V)>)
where
    K: Debug + Ord,
    V: Debug + PartialEq,
{
    actual.sort_by(|a, b| a.0.cmp(&b.0));
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        actual, expected,
        "Keyed collections differ:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Assert two keyed float results have the same keys and values within `eps`.
///
/// # Panics
///
/// Panics on a missing or extra key, or a value further than `eps` away.
pub fn assert_f64_map_close<K>(actual: &HashMap<K, f64>, expected: &HashMap<K, f64>, eps: f64)
where
    K: Debug + Eq + Hash,
{
    assert_eq!(
        actual.len(),
        expected.len(),
        "Key count mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (k, e) in expected {
        let a = actual
            .get(k)
            .unwrap_or_else(|| panic!("Missing key {k:?} in {actual:?}"));
        assert!(
            (a - e).abs() <= eps,
            "Value mismatch for key {k:?}: expected {e}, actual {a}"
        );
    }
}

/// Group `(K, V)` pairs in memory with `combine`, as a reference result for
/// `reduce_by_key`.
pub fn group_locally<K, V, F>(pairs: impl IntoIterator<Item = (K, V)>, combine: F) -> HashMap<K, V>
where
    K: Eq + Hash,
    F: Fn(V, V) -> V,
{
    let mut out: HashMap<K, V> = HashMap::new();
    for (k, v) in pairs {
        let merged = match out.remove(&k) {
            Some(prev) => combine(prev, v),
            None => v,
        };
        out.insert(k, merged);
    }
    out
}
