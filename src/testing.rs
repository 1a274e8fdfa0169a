//! Test support for code built on the engine.
//!
//! - [`TestPipeline`]: a pipeline with a fixed, sequential partitioning so that
//!   tests are deterministic and still exercise the partition-then-merge path
//! - assertions for keyed results whose order is unspecified
//! - fixtures: record builders and a small sample of submissions
//!
//! ```no_run
//! use hnstats::testing::*;
//! use hnstats::analysis::get_number_of_posts_per_hour;
//! use hnstats::from_vec;
//!
//! let p = TestPipeline::new();
//! let posts = from_vec(&p, vec![story(0, 300, Some("a b")), story(60, 10, None)]);
//! let per_hour = get_number_of_posts_per_hour(&posts).collect().unwrap();
//! assert_kv_collections_equal(per_hour, vec![(0, 2)]);
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;

use crate::{Pipeline, Runner};

/// Partition count used by [`TestPipeline::new`].
pub const TEST_PARTITIONS: usize = 3;

/// A pipeline running sequentially over a fixed number of partitions.
#[derive(Clone)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::with_partitions(TEST_PARTITIONS)
    }

    #[must_use]
    pub fn with_partitions(partitions: usize) -> Self {
        Self {
            pipeline: Pipeline::with_runner(Runner::sequential(partitions)),
        }
    }

    /// Nodes declared so far. Transforms add one node each and run nothing.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pipeline.node_count()
    }
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// Allow TestPipeline to be used wherever Pipeline is expected
impl std::ops::Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}
