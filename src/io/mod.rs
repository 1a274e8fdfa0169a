//! Loading records from disk.
//!
//! The engine itself only needs a [`Dataset<Record>`](crate::Dataset); these
//! helpers cover the common case of a newline-delimited JSON dump, optionally
//! gzip-compressed.

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

pub mod compression;
