//! Error type shared by the engine, the record model and the analyses.
//!
//! Every failure is deterministic: a malformed record or an empty input fails
//! the same way on every run, so nothing here is retried. Errors raised inside a
//! transform closure abort the action that forced evaluation and are returned to
//! its caller unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An action that needs at least one element ran over an empty dataset.
    #[error("{action} requires a non-empty dataset")]
    EmptyDataset { action: &'static str },

    /// A record lacks an attribute the routine depends on (or holds null there).
    #[error("record {record} has no attribute `{attribute}`")]
    MissingAttribute { attribute: String, record: String },

    /// An attribute is present but its value has the wrong semantic type.
    #[error("attribute `{attribute}` of record {record}: expected {expected}, found {found}")]
    InvalidRecord {
        attribute: String,
        record: String,
        expected: &'static str,
        found: String,
    },

    /// A Unix timestamp outside the range representable as a calendar time.
    #[error("timestamp {seconds} is out of range")]
    InvalidTimestamp { seconds: i64 },

    /// An erased partition did not hold the element type its stage expected.
    #[error("{stage}: partition does not hold {expected}")]
    TypeMismatch {
        stage: &'static str,
        expected: &'static str,
    },

    /// The dataset graph could not be linearized into an executable chain.
    #[error("invalid plan: {reason}")]
    InvalidPlan { reason: String },

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse line {line} in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn invalid_plan(reason: impl Into<String>) -> Self {
        Self::InvalidPlan {
            reason: reason.into(),
        }
    }
}
