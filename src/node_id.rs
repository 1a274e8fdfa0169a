//! Identifier for nodes within a [`Pipeline`](crate::pipeline::Pipeline) graph.
//!
//! Ids are handed out sequentially as transforms are declared, so a node's id is
//! always greater than the id of its source.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}
