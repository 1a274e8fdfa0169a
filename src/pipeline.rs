//! The shared dataset graph and the execution settings its actions use.
//!
//! A [`Pipeline`] plays the role of a cluster context: sources are registered
//! against it, every transform adds a node to its graph, and every action on a
//! dataset built from it runs through its [`Runner`]. Cloning a pipeline is
//! cheap and shares the graph.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::node_id::NodeId;
use crate::runner::Runner;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
    runner: Runner,
}

pub struct PipelineInner {
    pub next_id: u64,
    pub nodes: HashMap<NodeId, Node>,
    /// Derived node -> its source. Sources have no entry.
    pub parents: HashMap<NodeId, NodeId>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_runner(Runner::default())
    }
}

impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Pipeline {
            inner: Arc::clone(&self.inner),
            runner: self.runner,
        }
    }
}

impl Pipeline {
    pub fn with_runner(runner: Runner) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                nodes: HashMap::new(),
                parents: HashMap::new(),
            })),
            runner,
        }
    }

    /// Execution settings used by actions on datasets of this pipeline.
    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Nodes are only ever inserted, never mutated in place, so a guard
    /// recovered from a poisoned lock still sees a consistent graph.
    fn lock(&self) -> MutexGuard<'_, PipelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.lock();
        let id = NodeId::new(g.next_id);
        g.next_id += 1;
        g.nodes.insert(id, node);
        id
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        self.lock().parents.insert(to, from);
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Nodes from the source down to `terminal`, in declaration order.
    ///
    /// Only the chain is copied; `Node` clones just bump reference counts.
    pub(crate) fn chain(&self, terminal: NodeId) -> Result<Vec<Node>> {
        let g = self.lock();
        let mut chain = Vec::new();
        let mut cur = terminal;
        loop {
            let node = g
                .nodes
                .get(&cur)
                .ok_or_else(|| Error::invalid_plan(format!("missing node {cur:?}")))?;
            chain.push(node.clone());
            match g.parents.get(&cur) {
                Some(&from) => cur = from,
                None => break,
            }
        }
        chain.reverse();
        Ok(chain)
    }
}
