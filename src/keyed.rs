//! Keyed operations on `Dataset<(K, V)>`.
//!
//! [`reduce_by_key`](Dataset::reduce_by_key) runs in two phases: each partition
//! folds its own pairs into one value per key, then partial results are
//! scattered into key shards by hash and every shard is folded again with the
//! same combiner. Because a key's partials may meet in any order and grouping,
//! the combiner must be commutative and associative; with such a combiner the
//! value per key does not depend on how the input was partitioned.

use crate::dataset::{Dataset, Element};
use crate::error::Result;
use crate::node::{GatherFn, LocalFn, Node, ScatterFn};
use crate::type_token::{Partition, downcast_partition};
use std::collections::HashMap;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

impl<T: Element> Dataset<T> {
    /// Derive a key and produce `(K, T)`.
    pub fn key_by<K, F>(&self, key_fn: F) -> Dataset<(K, T)>
    where
        K: Element + Eq + Hash,
        F: 'static + Send + Sync + Fn(&T) -> K,
    {
        self.map(move |t| (key_fn(t), t.clone()))
    }
}

impl<T: Element + Eq + Hash> Dataset<T> {
    /// Drop duplicate elements. Built on `reduce_by_key`, so output order is
    /// unspecified.
    pub fn distinct(&self) -> Dataset<T> {
        self.map(|t| (t.clone(), ()))
            .reduce_by_key(|_, _| ())
            .map(|(t, _)| t.clone())
    }
}

impl<K: Element + Eq + Hash, V: Element> Dataset<(K, V)> {
    /// Map only the value: `(K, V) -> (K, O)`.
    pub fn map_values<O, F>(&self, f: F) -> Dataset<(K, O)>
    where
        O: Element,
        F: 'static + Send + Sync + Fn(&V) -> O,
    {
        self.map(move |kv: &(K, V)| (kv.0.clone(), f(&kv.1)))
    }

    /// Number of pairs per key.
    pub fn count_by_key(&self) -> Dataset<(K, u64)> {
        self.map(|kv: &(K, V)| (kv.0.clone(), 1u64))
            .reduce_by_key(|a, b| a + b)
    }

    /// Combine all values sharing a key into one, yielding one pair per
    /// distinct key. `combine` must be commutative and associative.
    pub fn reduce_by_key<F>(&self, combine: F) -> Dataset<(K, V)>
    where
        F: 'static + Send + Sync + Fn(V, V) -> V,
    {
        let combine = Arc::new(combine);

        let local: LocalFn = {
            let combine = Arc::clone(&combine);
            Arc::new(move |p: Partition| -> Result<Partition> {
                let pairs = downcast_partition::<Vec<(K, V)>>(p, "reduce_by_key local")?;
                let mut acc: HashMap<K, V> = HashMap::new();
                for (k, v) in pairs {
                    fold_into(&mut acc, k, v, combine.as_ref());
                }
                Ok(Box::new(acc))
            })
        };

        let scatter: ScatterFn = Arc::new(|p: Partition, n: usize| -> Result<Vec<Partition>> {
            let acc = downcast_partition::<HashMap<K, V>>(p, "reduce_by_key scatter")?;
            let mut shards: Vec<HashMap<K, V>> = (0..n).map(|_| HashMap::new()).collect();
            for (k, v) in acc {
                shards[shard_of(&k, n)].insert(k, v);
            }
            Ok(shards
                .into_iter()
                .map(|s| Box::new(s) as Partition)
                .collect())
        });

        let gather: GatherFn = {
            let combine = Arc::clone(&combine);
            Arc::new(move |parts: Vec<Partition>| -> Result<Partition> {
                let mut acc: HashMap<K, V> = HashMap::new();
                for p in parts {
                    let shard = downcast_partition::<HashMap<K, V>>(p, "reduce_by_key gather")?;
                    for (k, v) in shard {
                        fold_into(&mut acc, k, v, combine.as_ref());
                    }
                }
                Ok(Box::new(acc.into_iter().collect::<Vec<(K, V)>>()))
            })
        };

        self.derive(Node::ReduceByKey {
            local,
            scatter,
            gather,
        })
    }
}

fn fold_into<K, V, F>(acc: &mut HashMap<K, V>, k: K, v: V, combine: &F)
where
    K: Eq + Hash,
    F: Fn(V, V) -> V + ?Sized,
{
    match acc.entry(k) {
        Entry::Vacant(e) => {
            e.insert(v);
        }
        Entry::Occupied(e) => {
            let (k, prev) = e.remove_entry();
            acc.insert(k, combine(prev, v));
        }
    }
}

/// Shard index for `key`. `DefaultHasher::new` uses fixed keys, so the layout
/// is stable across calls within a process.
fn shard_of<K: Hash>(key: &K, n: usize) -> usize {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    (h.finish() % n.max(1) as u64) as usize
}
