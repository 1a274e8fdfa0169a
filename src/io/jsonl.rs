//! JSON Lines input and output.
//!
//! One JSON document per line; blank lines are skipped. Parse failures report
//! the 1-based line number.

use crate::dataset::{Dataset, from_partitions, from_vec};
use crate::error::{Error, Result};
use crate::io::compression::open_reader;
use crate::pipeline::Pipeline;
use crate::record::Record;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Read a JSONL file into a typed `Vec<T>`.
pub fn read_jsonl_vec<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let reader = BufReader::new(open_reader(path)?);
    let mut out = Vec::<T>::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let v: T = serde_json::from_str(&line).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        out.push(v);
    }
    debug!(path = %path.display(), rows = out.len(), "read jsonl");
    Ok(out)
}

/// Read submission records from a JSONL dump.
pub fn read_records_jsonl(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    read_jsonl_vec(path)
}

/// Load a JSONL dump as a dataset; the runner picks the partition layout.
pub fn read_jsonl(p: &Pipeline, path: impl AsRef<Path>) -> Result<Dataset<Record>> {
    Ok(from_vec(p, read_records_jsonl(path)?))
}

/// Load several JSONL shards, one partition per file, in the given order.
///
/// With the `parallel-io` feature the shards are read concurrently; partition
/// order still follows `paths`.
pub fn read_jsonl_shards<I, P>(p: &Pipeline, paths: I) -> Result<Dataset<Record>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path> + Send + Sync,
{
    let paths: Vec<P> = paths.into_iter().collect();

    #[cfg(feature = "parallel-io")]
    let partitions = {
        use rayon::prelude::*;
        paths
            .par_iter()
            .map(read_records_jsonl)
            .collect::<Result<Vec<_>>>()?
    };
    #[cfg(not(feature = "parallel-io"))]
    let partitions = paths
        .iter()
        .map(read_records_jsonl)
        .collect::<Result<Vec<_>>>()?;

    debug!(shards = partitions.len(), "read jsonl shards");
    Ok(from_partitions(p, partitions))
}

/// Write one JSON document per line, creating parent directories as needed.
/// Returns the number of lines written.
pub fn write_jsonl_vec<T: Serialize>(path: impl AsRef<Path>, data: &[T]) -> Result<usize> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).map_err(io_err)?;
    }
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    for item in data {
        serde_json::to_writer(&mut w, item).map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        w.write_all(b"\n").map_err(io_err)?;
    }
    w.flush().map_err(io_err)?;
    Ok(data.len())
}
