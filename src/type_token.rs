//! Type tags and type-erased partition helpers.
//!
//! Nodes in a dataset graph are stored without their element type, so the
//! runner moves data between stages as opaque [`Partition`] boxes. This module
//! provides:
//! - [`TypeTag`]: a readable runtime tag attached to sources, used when
//!   describing a plan.
//! - [`SourceOps`]: a type-erased way to split a source payload into
//!   partitions without knowing `T`. Concrete implementations come from
//!   [`flat_source_ops`] (a `Vec<T>` cut into contiguous chunks) and
//!   [`preset_source_ops`] (partitions dictated by the loader).
//! - [`downcast_partition`]: the checked unboxing every stage goes through.

use crate::error::{Error, Result};
use std::any::{Any, TypeId, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

/// A partition buffer carried between stages at runtime.
pub type Partition = Box<dyn Any + Send + Sync>;

/// A lightweight runtime type tag for plan descriptions and assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Type-erased access to a source payload.
///
/// Implementations return `None` when `data` is not the payload type they were
/// built for.
pub trait SourceOps: Send + Sync {
    /// Number of elements in the payload.
    fn len(&self, data: &dyn Any) -> Option<usize>;

    /// Materialize the payload as partitions. `n` is the runner's requested
    /// partition count; sources with a fixed layout may ignore it. Element
    /// order within each returned partition follows the payload.
    fn partitions(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>>;
}

/// Payload is a flat `Vec<T>`, cut into `n` contiguous chunks on demand.
struct FlatSourceOps<T>(PhantomData<fn() -> T>);

impl<T: Clone + Send + Sync + 'static> SourceOps for FlatSourceOps<T> {
    fn len(&self, data: &dyn Any) -> Option<usize> {
        data.downcast_ref::<Vec<T>>().map(Vec::len)
    }

    fn partitions(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>> {
        let v = data.downcast_ref::<Vec<T>>()?;
        Some(
            split_even(v, n)
                .into_iter()
                .map(|c| Box::new(c) as Partition)
                .collect(),
        )
    }
}

/// Payload is a `Vec<Vec<T>>` whose layout is kept as-is.
struct PresetSourceOps<T>(PhantomData<fn() -> T>);

impl<T: Clone + Send + Sync + 'static> SourceOps for PresetSourceOps<T> {
    fn len(&self, data: &dyn Any) -> Option<usize> {
        data.downcast_ref::<Vec<Vec<T>>>()
            .map(|parts| parts.iter().map(Vec::len).sum())
    }

    fn partitions(&self, data: &dyn Any, _n: usize) -> Option<Vec<Partition>> {
        let parts = data.downcast_ref::<Vec<Vec<T>>>()?;
        Some(
            parts
                .iter()
                .map(|p| Box::new(p.clone()) as Partition)
                .collect(),
        )
    }
}

pub fn flat_source_ops<T: Clone + Send + Sync + 'static>() -> Arc<dyn SourceOps> {
    Arc::new(FlatSourceOps::<T>(PhantomData))
}

pub fn preset_source_ops<T: Clone + Send + Sync + 'static>() -> Arc<dyn SourceOps> {
    Arc::new(PresetSourceOps::<T>(PhantomData))
}

/// Split into exactly `n.max(1)` contiguous chunks whose sizes differ by at
/// most one. Trailing chunks are empty when `v.len() < n`.
pub(crate) fn split_even<T: Clone>(v: &[T], n: usize) -> Vec<Vec<T>> {
    let n = n.max(1);
    let len = v.len();
    (0..n)
        .map(|i| v[i * len / n..(i + 1) * len / n].to_vec())
        .collect()
}

/// Unbox a partition as `T`, reporting the stage on mismatch.
pub(crate) fn downcast_partition<T: 'static>(p: Partition, stage: &'static str) -> Result<T> {
    p.downcast::<T>()
        .map(|b| *b)
        .map_err(|_| Error::TypeMismatch {
            stage,
            expected: type_name::<T>(),
        })
}
