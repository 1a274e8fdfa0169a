//! # hnstats
//!
//! A lazy, partitioned aggregation engine and a fixed library of descriptive
//! statistics over Hacker News submissions.
//!
//! ## Core Concepts
//!
//! ### Pipeline
//!
//! A [`Pipeline`] holds the graph of declared computations and the [`Runner`]
//! settings used to evaluate them. Create one with `Pipeline::default()` (rayon,
//! `2 * num_cpus` partitions) or `Pipeline::with_runner(..)`.
//!
//! ### Dataset
//!
//! A [`Dataset<T>`] is a lazily-evaluated, partitioned sequence of `T`:
//! - **Immutable** - transforms return a new dataset and leave the source usable
//! - **Lazy** - nothing runs until an action is called
//! - **Uncached** - every action re-evaluates the chain from its source
//!
//! ### Transforms
//!
//! - [`map`](Dataset::map), [`filter`](Dataset::filter),
//!   [`flat_map`](Dataset::flat_map) and their fallible `try_` forms
//! - [`reduce_by_key`](Dataset::reduce_by_key) on `Dataset<(K, V)>`: combine
//!   values per key, first inside each partition, then across partitions
//! - helpers: [`key_by`](Dataset::key_by), [`map_values`](Dataset::map_values),
//!   [`count_by_key`](Dataset::count_by_key), [`distinct`](Dataset::distinct)
//!
//! ### Actions
//!
//! [`count`](Dataset::count), [`first`](Dataset::first),
//! [`collect`](Dataset::collect), [`reduce`](Dataset::reduce), plus sorted and
//! map-shaped collects.
//!
//! Combiners passed to `reduce` and `reduce_by_key` must be commutative and
//! associative: the runner folds partitions and merges partial results in
//! whatever order and grouping it likes.
//!
//! ## Example
//!
//! ```no_run
//! use hnstats::*;
//! use hnstats::analysis::*;
//!
//! # fn main() -> hnstats::Result<()> {
//! let p = Pipeline::default();
//! let posts = read_jsonl(&p, "data/HNStories.json")?;
//! let posts = get_elements_with_same_attributes(&posts)?;
//!
//! let (min, max) = get_min_max_timestamps(&posts)?;
//! let per_bucket = get_number_of_posts_per_bucket(&posts, min, max).collect_sorted()?;
//! let avg_score = get_score_per_hour(&posts).collect_sorted_by_key()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dataset`] - `Dataset` type, sources and element-wise transforms
//! - [`keyed`] - grouped reduction and keyed helpers
//! - [`actions`] - evaluation entry points
//! - [`planner`] / [`runner`] - plan construction and partitioned execution
//! - [`record`] - the submission record model
//! - [`analysis`] - the statistics library
//! - [`io`] - JSONL loading
//! - [`testing`] - test pipeline, assertions and fixtures

pub mod actions;
pub mod analysis;
pub mod dataset;
pub mod error;
pub mod io;
pub mod keyed;
pub mod node;
pub mod node_id;
pub mod pipeline;
pub mod planner;
pub mod record;
pub mod runner;
pub mod testing;
pub mod type_token;

// General re-exports
pub use dataset::{Dataset, Element, from_iter, from_partitions, from_vec};
pub use error::{Error, Result};
pub use node_id::NodeId;
pub use pipeline::Pipeline;
pub use record::{AttributeSet, Record, Value};
pub use runner::{ExecMode, Runner};
pub use type_token::Partition;

// Gated re-exports
#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{read_jsonl, read_jsonl_shards, read_jsonl_vec, read_records_jsonl, write_jsonl_vec};
