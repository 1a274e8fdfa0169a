//! Actions: the only operations that evaluate a dataset.
//!
//! Each action builds a plan from the dataset's chain, runs it with the
//! pipeline's [`Runner`] (or an explicit one for the `_with` forms), and returns
//! a local value. Nothing is cached; calling an action twice evaluates the chain
//! twice.

use crate::dataset::{Dataset, Element};
use crate::error::{Error, Result};
use crate::node::{GatherFn, LocalFn};
use crate::planner::build_plan;
use crate::runner::Runner;
use crate::type_token::{Partition, downcast_partition};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

impl<T: Element> Dataset<T> {
    /// Every element, partitions concatenated in partition order.
    ///
    /// Only call this on results known to fit in memory, typically the output
    /// of a grouped reduction.
    pub fn collect(&self) -> Result<Vec<T>> {
        self.collect_with(self.pipeline.runner())
    }

    pub fn collect_with(&self, runner: &Runner) -> Result<Vec<T>> {
        runner.run_collect::<T>(&self.pipeline, self.id)
    }

    /// Elements grouped by partition, as evaluated.
    pub fn collect_partitions(&self) -> Result<Vec<Vec<T>>> {
        self.pipeline
            .runner()
            .run_partitions::<T>(&self.pipeline, self.id)
    }

    /// Total number of elements across all partitions.
    pub fn count(&self) -> Result<usize> {
        self.count_with(self.pipeline.runner())
    }

    pub fn count_with(&self, runner: &Runner) -> Result<usize> {
        let parts = runner.run_partitions::<T>(&self.pipeline, self.id)?;
        let n = parts.iter().map(Vec::len).sum();
        debug!(count = n, partitions = parts.len(), "count");
        Ok(n)
    }

    /// First element in partition order.
    ///
    /// # Errors
    /// [`Error::EmptyDataset`] if the dataset has no elements.
    pub fn first(&self) -> Result<T> {
        self.pipeline
            .runner()
            .run_first::<T>(&self.pipeline, self.id)?
            .ok_or(Error::EmptyDataset { action: "first" })
    }

    /// Fold all elements with `combine`: first within each partition, then
    /// across the partition results.
    ///
    /// `combine` must be commutative and associative; the runner may merge
    /// partial results in any order.
    ///
    /// # Errors
    /// [`Error::EmptyDataset`] if the dataset has no elements.
    pub fn reduce<F>(&self, combine: F) -> Result<T>
    where
        F: 'static + Send + Sync + Fn(T, T) -> T,
    {
        let combine = Arc::new(combine);

        let local: LocalFn = {
            let combine = Arc::clone(&combine);
            Arc::new(move |p: Partition| -> Result<Partition> {
                let rows = downcast_partition::<Vec<T>>(p, "reduce local")?;
                let acc: Option<T> = rows.into_iter().reduce(|a, b| combine(a, b));
                Ok(Box::new(acc))
            })
        };

        let merge: GatherFn = {
            let combine = Arc::clone(&combine);
            Arc::new(move |parts: Vec<Partition>| -> Result<Partition> {
                let mut acc: Option<T> = None;
                for p in parts {
                    let Some(v) = downcast_partition::<Option<T>>(p, "reduce merge")? else {
                        continue;
                    };
                    acc = Some(match acc.take() {
                        Some(a) => combine(a, v),
                        None => v,
                    });
                }
                Ok(Box::new(acc.into_iter().collect::<Vec<T>>()))
            })
        };

        let plan = build_plan(&self.pipeline, self.id)?.with_reduce(local, merge);
        self.pipeline
            .runner()
            .run_plan::<T>(&plan)?
            .into_iter()
            .flatten()
            .next()
            .ok_or(Error::EmptyDataset { action: "reduce" })
    }

    /// The fused execution chain for this dataset, e.g.
    /// `source(..) | map -> filter | reduce_by_key`.
    pub fn explain(&self) -> Result<String> {
        Ok(build_plan(&self.pipeline, self.id)?.describe())
    }
}

impl<T: Element + Ord> Dataset<T> {
    pub fn collect_sorted(&self) -> Result<Vec<T>> {
        let mut v = self.collect()?;
        v.sort();
        Ok(v)
    }
}

impl<K: Element + Ord, V: Element> Dataset<(K, V)> {
    /// Collect pairs sorted by key only, for outputs whose values are not `Ord`
    /// (ratios, averages).
    pub fn collect_sorted_by_key(&self) -> Result<Vec<(K, V)>> {
        let mut v = self.collect()?;
        v.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(v)
    }
}

impl<K: Element + Eq + Hash, V: Element> Dataset<(K, V)> {
    /// Collect into a map. Later pairs win on duplicate keys, which cannot
    /// happen after `reduce_by_key`.
    pub fn collect_map(&self) -> Result<HashMap<K, V>> {
        Ok(self.collect()?.into_iter().collect())
    }
}
