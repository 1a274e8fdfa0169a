//! Plan execution.
//!
//! The runner always works on partitions, even in [`ExecMode::Sequential`]:
//! the source is cut into at least [`MIN_PARTITIONS`] chunks, element-wise
//! stages run on each chunk independently, and barriers fold each chunk before
//! folding the per-chunk results. Sequential mode does exactly the same work on
//! the calling thread; parallel mode spreads per-partition work over rayon.
//!
//! Nothing is cached between actions: every call re-evaluates the plan from its
//! source.

use crate::error::{Error, Result};
use crate::node::DynOp;
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::planner::{Plan, Stage, build_plan};
use crate::type_token::{Partition, downcast_partition};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace};

/// Lower bound on the number of partitions a source is cut into.
pub const MIN_PARTITIONS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
        }
    }
}

impl Runner {
    pub fn sequential(partitions: usize) -> Self {
        Self {
            mode: ExecMode::Sequential,
            default_partitions: partitions,
        }
    }

    pub fn parallel(threads: Option<usize>, partitions: Option<usize>) -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads,
                partitions,
            },
            ..Default::default()
        }
    }

    /// Partition count requested from flat sources.
    pub fn partitions(&self) -> usize {
        let requested = match self.mode {
            ExecMode::Parallel {
                partitions: Some(n),
                ..
            } => n,
            _ => self.default_partitions,
        };
        requested.max(MIN_PARTITIONS)
    }

    /// Evaluate the chain ending at `terminal` and return its partitions.
    pub fn run_partitions<T: 'static>(&self, p: &Pipeline, terminal: NodeId) -> Result<Vec<Vec<T>>> {
        self.run_plan::<T>(&build_plan(p, terminal)?)
    }

    /// Evaluate an already built plan.
    pub(crate) fn run_plan<T: 'static>(&self, plan: &Plan) -> Result<Vec<Vec<T>>> {
        let parts = self.in_pool(|| self.evaluate(plan))?;
        parts
            .into_iter()
            .map(|part| downcast_partition::<Vec<T>>(part, "terminal"))
            .collect()
    }

    /// Evaluate and concatenate partitions in partition order.
    pub fn run_collect<T: 'static>(&self, p: &Pipeline, terminal: NodeId) -> Result<Vec<T>> {
        Ok(self.run_partitions::<T>(p, terminal)?.concat_owned())
    }

    /// First element in partition order.
    ///
    /// Without a barrier in the plan, partitions are evaluated one at a time and
    /// evaluation stops at the first non-empty result.
    pub fn run_first<T: 'static>(&self, p: &Pipeline, terminal: NodeId) -> Result<Option<T>> {
        let plan = build_plan(p, terminal)?;
        if plan.has_barrier() {
            let parts = self.in_pool(|| self.evaluate(&plan))?;
            for part in parts {
                let rows = downcast_partition::<Vec<T>>(part, "terminal")?;
                if let Some(first) = rows.into_iter().next() {
                    return Ok(Some(first));
                }
            }
            return Ok(None);
        }

        debug!(plan = %plan, "evaluating partitions lazily for first()");
        for (idx, part) in plan.source.partitions(self.partitions())?.into_iter().enumerate() {
            let mut out = part;
            for stage in &plan.stages {
                if let Stage::ElementWise(ops) = stage {
                    out = fuse_element_wise(ops, out)?;
                }
            }
            let rows = downcast_partition::<Vec<T>>(out, "terminal")?;
            if let Some(first) = rows.into_iter().next() {
                trace!(partition = idx, "first element found");
                return Ok(Some(first));
            }
        }
        Ok(None)
    }

    fn in_pool<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> Result<R> + Send,
    {
        match self.mode {
            ExecMode::Parallel {
                threads: Some(t), ..
            } => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(t).build()?;
                pool.install(f)
            }
            _ => f(),
        }
    }

    fn evaluate(&self, plan: &Plan) -> Result<Vec<Partition>> {
        let n = self.partitions();
        debug!(plan = %plan, partitions = n, mode = ?self.mode, "evaluating plan");

        let mut parts = plan.source.partitions(n)?;
        for stage in &plan.stages {
            parts = self.run_stage(stage, parts, n)?;
        }
        Ok(parts)
    }

    fn run_stage(&self, stage: &Stage, parts: Vec<Partition>, n: usize) -> Result<Vec<Partition>> {
        match stage {
            Stage::ElementWise(ops) => self.each(parts, |part| fuse_element_wise(ops, part)),
            Stage::ReduceByKey {
                local,
                scatter,
                gather,
            } => {
                let partials = self.each(parts, |part| local(part))?;
                let sharded = self.each(partials, |partial| scatter(partial, n))?;

                // shard i of every partial result feeds output partition i
                let mut buckets: Vec<Vec<Partition>> =
                    (0..n).map(|_| Vec::with_capacity(sharded.len())).collect();
                for shards in sharded {
                    if shards.len() != n {
                        return Err(Error::invalid_plan(format!(
                            "scatter produced {} shards, expected {n}",
                            shards.len()
                        )));
                    }
                    for (bucket, shard) in buckets.iter_mut().zip(shards) {
                        bucket.push(shard);
                    }
                }
                trace!(shards = n, "reduce_by_key merge");
                self.each(buckets, |bucket| gather(bucket))
            }
            Stage::Reduce { local, merge } => {
                let partials = self.each(parts, |part| local(part))?;
                trace!(partials = partials.len(), "reduce merge");
                Ok(vec![merge(partials)?])
            }
        }
    }

    /// Apply `f` to every item, on the calling thread or through rayon,
    /// preserving input order in the output.
    fn each<I, O, F>(&self, items: Vec<I>, f: F) -> Result<Vec<O>>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> Result<O> + Send + Sync,
    {
        match self.mode {
            ExecMode::Sequential => items.into_iter().map(f).collect(),
            ExecMode::Parallel { .. } => items.into_par_iter().map(f).collect(),
        }
    }
}

/// Run a fused element-wise stage over one partition.
fn fuse_element_wise(ops: &[Arc<dyn DynOp>], input: Partition) -> Result<Partition> {
    ops.iter().try_fold(input, |acc, op| op.apply(acc))
}

trait ConcatOwned<T> {
    fn concat_owned(self) -> Vec<T>;
}

impl<T> ConcatOwned<T> for Vec<Vec<T>> {
    fn concat_owned(self) -> Vec<T> {
        let total = self.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(total);
        for part in self {
            out.extend(part);
        }
        out
    }
}
