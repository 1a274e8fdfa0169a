//! The lazy partitioned dataset and its element-wise transforms.
//!
//! A [`Dataset<T>`] is a handle to one node of a [`Pipeline`] graph. Transforms
//! (`map`, `filter`, `flat_map` and their fallible `try_` forms) add a node and
//! return a new handle without touching any data; the source handle stays
//! usable, so one dataset can feed several analyses.
//!
//! Within a partition, element-wise transforms preserve order. Order across
//! partitions is not part of the contract.

use crate::error::Result;
use crate::node::{DynOp, Node};
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::type_token::{Partition, TypeTag, downcast_partition, flat_source_ops, preset_source_ops};
use std::marker::PhantomData;
use std::sync::Arc;

/// Bound shared by every element type a dataset can carry.
pub trait Element: 'static + Send + Sync + Clone {}
impl<T> Element for T where T: 'static + Send + Sync + Clone {}

pub struct Dataset<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
    _t: PhantomData<fn() -> T>,
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            id: self.id,
            _t: PhantomData,
        }
    }
}

/// Source from an in-memory vector; the runner decides the partition layout.
pub fn from_vec<T: Element>(p: &Pipeline, data: Vec<T>) -> Dataset<T> {
    let id = p.insert_node(Node::Source {
        payload: Arc::new(data),
        ops: flat_source_ops::<T>(),
        elem_tag: TypeTag::of::<T>(),
    });
    Dataset::at(p.clone(), id)
}

/// Create a dataset from any owned iterator (collected into a `Vec<T>`).
pub fn from_iter<T, I>(p: &Pipeline, iter: I) -> Dataset<T>
where
    T: Element,
    I: IntoIterator<Item = T>,
{
    from_vec(p, iter.into_iter().collect())
}

/// Source whose partition layout is fixed by the caller, as a loader reading
/// several shards would produce. The runner's partition count is ignored.
pub fn from_partitions<T: Element>(p: &Pipeline, partitions: Vec<Vec<T>>) -> Dataset<T> {
    let id = p.insert_node(Node::Source {
        payload: Arc::new(partitions),
        ops: preset_source_ops::<T>(),
        elem_tag: TypeTag::of::<T>(),
    });
    Dataset::at(p.clone(), id)
}

/* ---------- element-wise ops ---------- */

pub(crate) struct MapOp<I, O, F>(F, PhantomData<fn(I) -> O>);

impl<I, O, F> DynOp for MapOp<I, O, F>
where
    I: Element,
    O: Element,
    F: Send + Sync + Fn(&I) -> Result<O> + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let rows = downcast_partition::<Vec<I>>(input, "map")?;
        let out = rows.iter().map(|r| (self.0)(r)).collect::<Result<Vec<O>>>()?;
        Ok(Box::new(out))
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

pub(crate) struct FilterOp<T, P>(P, PhantomData<fn(T)>);

impl<T, P> DynOp for FilterOp<T, P>
where
    T: Element,
    P: Send + Sync + Fn(&T) -> Result<bool> + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let rows = downcast_partition::<Vec<T>>(input, "filter")?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if (self.0)(&row)? {
                out.push(row);
            }
        }
        Ok(Box::new(out))
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

pub(crate) struct FlatMapOp<I, O, F>(F, PhantomData<fn(I) -> O>);

impl<I, O, F> DynOp for FlatMapOp<I, O, F>
where
    I: Element,
    O: Element,
    F: Send + Sync + Fn(&I) -> Result<Vec<O>> + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let rows = downcast_partition::<Vec<I>>(input, "flat_map")?;
        let mut out: Vec<O> = Vec::new();
        for row in &rows {
            out.extend((self.0)(row)?);
        }
        Ok(Box::new(out))
    }

    fn name(&self) -> &'static str {
        "flat_map"
    }
}

impl<T> Dataset<T> {
    fn at(pipeline: Pipeline, id: NodeId) -> Self {
        Self {
            pipeline,
            id,
            _t: PhantomData,
        }
    }

    /// Insert `node` downstream of this dataset and return a handle to it.
    pub(crate) fn derive<O>(&self, node: Node) -> Dataset<O> {
        let id = self.pipeline.insert_node(node);
        self.pipeline.connect(self.id, id);
        Dataset::at(self.pipeline.clone(), id)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<T: Element> Dataset<T> {
    pub fn map<O, F>(&self, f: F) -> Dataset<O>
    where
        O: Element,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        self.try_map(move |t| Ok(f(t)))
    }

    /// Like [`map`](Self::map); the first `Err` aborts the action that
    /// evaluates this dataset and is returned from it.
    pub fn try_map<O, F>(&self, f: F) -> Dataset<O>
    where
        O: Element,
        F: 'static + Send + Sync + Fn(&T) -> Result<O>,
    {
        let op: Arc<dyn DynOp> = Arc::new(MapOp::<T, O, F>(f, PhantomData));
        self.derive(Node::Map(op))
    }

    pub fn filter<P>(&self, pred: P) -> Dataset<T>
    where
        P: 'static + Send + Sync + Fn(&T) -> bool,
    {
        self.try_filter(move |t| Ok(pred(t)))
    }

    pub fn try_filter<P>(&self, pred: P) -> Dataset<T>
    where
        P: 'static + Send + Sync + Fn(&T) -> Result<bool>,
    {
        let op: Arc<dyn DynOp> = Arc::new(FilterOp::<T, P>(pred, PhantomData));
        self.derive(Node::Filter(op))
    }

    pub fn flat_map<O, F>(&self, f: F) -> Dataset<O>
    where
        O: Element,
        F: 'static + Send + Sync + Fn(&T) -> Vec<O>,
    {
        self.try_flat_map(move |t| Ok(f(t)))
    }

    pub fn try_flat_map<O, F>(&self, f: F) -> Dataset<O>
    where
        O: Element,
        F: 'static + Send + Sync + Fn(&T) -> Result<Vec<O>>,
    {
        let op: Arc<dyn DynOp> = Arc::new(FlatMapOp::<T, O, F>(f, PhantomData));
        self.derive(Node::FlatMap(op))
    }
}
