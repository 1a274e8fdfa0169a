//! Graph nodes: the tagged description of a pending computation.
//!
//! Each transform on a [`Dataset`](crate::Dataset) inserts exactly one node and
//! links it to its source. Nothing here runs until an action hands the chain to
//! the [`planner`](crate::planner) and [`runner`](crate::runner).

use crate::error::Result;
use crate::type_token::{Partition, SourceOps, TypeTag};
use std::any::Any;
use std::sync::Arc;

/// A type-erased element-wise operation applied to one partition.
pub trait DynOp: Send + Sync {
    fn apply(&self, input: Partition) -> Result<Partition>;

    /// Operator name used in plan descriptions.
    fn name(&self) -> &'static str;
}

/// Partition -> partition step of a barrier.
pub type LocalFn = Arc<dyn Fn(Partition) -> Result<Partition> + Send + Sync>;
/// Split one partial result into `n` key shards.
pub type ScatterFn = Arc<dyn Fn(Partition, usize) -> Result<Vec<Partition>> + Send + Sync>;
/// Fold several partial results into one partition.
pub type GatherFn = Arc<dyn Fn(Vec<Partition>) -> Result<Partition> + Send + Sync>;

#[derive(Clone)]
pub enum Node {
    Source {
        payload: Arc<dyn Any + Send + Sync>,
        ops: Arc<dyn SourceOps>,
        elem_tag: TypeTag,
    },
    Map(Arc<dyn DynOp>),
    Filter(Arc<dyn DynOp>),
    FlatMap(Arc<dyn DynOp>),

    /// Grouped reduction
    /// - `local`: `Vec<(K, V)>` -> `HashMap<K, V>` (per partition)
    /// - `scatter`: `HashMap<K, V>` -> `n` shards of `HashMap<K, V>`, by key hash
    /// - `gather`: one shard index from every partition -> `Vec<(K, V)>`
    ReduceByKey {
        local: LocalFn,
        scatter: ScatterFn,
        gather: GatherFn,
    },
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Source { .. } => "source",
            Node::Map(_) => "map",
            Node::Filter(_) => "filter",
            Node::FlatMap(_) => "flat_map",
            Node::ReduceByKey { .. } => "reduce_by_key",
        }
    }

    /// Barriers need every partition of their input before producing output.
    pub fn is_barrier(&self) -> bool {
        matches!(self, Node::ReduceByKey { .. })
    }
}
