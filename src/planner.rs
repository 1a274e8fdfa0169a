//! Turns a dataset graph into a linear execution plan.
//!
//! The planner walks back from the terminal node to its source and groups the
//! chain into stages:
//!
//! 1. **Fuse element-wise ops** -- consecutive `Map`, `Filter` and `FlatMap`
//!    nodes become one [`Stage::ElementWise`] applied in a single pass over each
//!    partition.
//! 2. **Barriers stay separate** -- `ReduceByKey` becomes its own stage, since
//!    it needs every partition of its input. A full `Reduce` is never a graph
//!    node: the `reduce` action appends it to its own plan.
//!
//! No other rewrite is performed; operators run in the order they were declared.

use crate::error::{Error, Result};
use crate::node::{DynOp, GatherFn, LocalFn, Node, ScatterFn};
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::type_token::{Partition, SourceOps, TypeTag};
use std::any::Any;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;

/// The root of a plan.
pub struct SourceStage {
    payload: Arc<dyn Any + Send + Sync>,
    ops: Arc<dyn SourceOps>,
    pub elem_tag: TypeTag,
}

impl SourceStage {
    pub fn len(&self) -> Option<usize> {
        self.ops.len(self.payload.as_ref())
    }

    pub(crate) fn partitions(&self, n: usize) -> Result<Vec<Partition>> {
        self.ops
            .partitions(self.payload.as_ref(), n)
            .ok_or(Error::TypeMismatch {
                stage: "source",
                expected: self.elem_tag.name,
            })
    }
}

#[derive(Clone)]
pub enum Stage {
    ElementWise(Vec<Arc<dyn DynOp>>),
    ReduceByKey {
        local: LocalFn,
        scatter: ScatterFn,
        gather: GatherFn,
    },
    Reduce {
        local: LocalFn,
        merge: GatherFn,
    },
}

impl Stage {
    pub fn is_barrier(&self) -> bool {
        !matches!(self, Stage::ElementWise(_))
    }
}

pub struct Plan {
    pub source: SourceStage,
    pub stages: Vec<Stage>,
}

impl Plan {
    pub fn has_barrier(&self) -> bool {
        self.stages.iter().any(Stage::is_barrier)
    }

    /// Append a full reduction. The stage lives only in this plan; the
    /// pipeline graph is left untouched.
    pub(crate) fn with_reduce(mut self, local: LocalFn, merge: GatherFn) -> Self {
        self.stages.push(Stage::Reduce { local, merge });
        self
    }

    /// One line per stage, e.g. `source(hnstats::record::Record, 12 elements) | map -> filter | reduce_by_key`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self.source.len() {
            Some(n) => write!(f, "source({}, {n} elements)", self.source.elem_tag.name)?,
            None => write!(f, "source({})", self.source.elem_tag.name)?,
        }
        for stage in &self.stages {
            match stage {
                Stage::ElementWise(ops) => {
                    let names = ops.iter().map(|op| op.name()).collect::<Vec<_>>();
                    write!(f, " | {}", names.join(" -> "))?;
                }
                Stage::ReduceByKey { .. } => write!(f, " | reduce_by_key")?,
                Stage::Reduce { .. } => write!(f, " | reduce")?,
            }
        }
        Ok(())
    }
}

/// Linearize the chain ending at `terminal` and fuse it into stages.
pub fn build_plan(p: &Pipeline, terminal: NodeId) -> Result<Plan> {
    let mut iter = p.chain(terminal)?.into_iter();
    let source = match iter.next() {
        Some(Node::Source {
            payload,
            ops,
            elem_tag,
        }) => SourceStage {
            payload,
            ops,
            elem_tag,
        },
        Some(other) => {
            return Err(Error::invalid_plan(format!(
                "chain starts at a {} node, not a source",
                other.kind()
            )));
        }
        None => return Err(Error::invalid_plan("empty chain")),
    };

    let mut stages: Vec<Stage> = Vec::new();
    for node in iter {
        match node {
            Node::Map(op) | Node::Filter(op) | Node::FlatMap(op) => {
                if let Some(Stage::ElementWise(ops)) = stages.last_mut() {
                    ops.push(op);
                } else {
                    stages.push(Stage::ElementWise(vec![op]));
                }
            }
            Node::ReduceByKey {
                local,
                scatter,
                gather,
            } => stages.push(Stage::ReduceByKey {
                local,
                scatter,
                gather,
            }),
            Node::Source { .. } => {
                return Err(Error::invalid_plan("unexpected additional source in chain"));
            }
        }
    }

    Ok(Plan { source, stages })
}
