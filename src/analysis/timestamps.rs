//! Creation-time extremes and the fixed-width time histogram.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::record::{CREATED_AT, Record};
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

/// Number of buckets the time histogram spreads `[min, max]` over.
pub const BUCKETS: u32 = 200;

/// Calendar time (UTC) for a Unix timestamp in seconds.
pub fn extract_time(seconds: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or(Error::InvalidTimestamp { seconds })
}

/// Earliest and latest `created_at_i`, as UTC calendar times.
///
/// Runs two independent reductions (one with `min`, one with `max`) over the
/// same lazy chain.
///
/// # Errors
/// - [`Error::EmptyDataset`] if `dataset` is empty
/// - [`Error::MissingAttribute`] if any record lacks `created_at_i`
pub fn get_min_max_timestamps(dataset: &Dataset<Record>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let created = dataset.try_map(|r: &Record| r.int(CREATED_AT));
    let min = created.reduce(|a, b| a.min(b))?;
    let max = created.reduce(|a, b| a.max(b))?;
    debug!(min, max, "creation time range");
    Ok((extract_time(min)?, extract_time(max)?))
}

/// Bucket index of `rec` in a [`BUCKETS`]-wide histogram over
/// `[min_ts, max_ts]` (Unix seconds).
///
/// The interval is `(max_ts - min_ts + 1) / 200`, so `max_ts` lands in bucket
/// 199 rather than 200. The quotient is truncated toward zero. Records outside
/// the range get indices outside `0..200`. For ranges shorter than 200 seconds
/// several buckets collapse and some indices are never produced.
///
/// # Errors
/// - [`Error::InvalidRecord`] if `created_at_i` is so far from `min_ts` that
///   the offset overflows
/// - [`Error::InvalidTimestamp`] if the range itself overflows
pub fn get_bucket(rec: &Record, min_ts: i64, max_ts: i64) -> Result<i64> {
    let ts = rec.int(CREATED_AT)?;
    let span = max_ts
        .checked_sub(min_ts)
        .and_then(|d| d.checked_add(1))
        .ok_or(Error::InvalidTimestamp { seconds: max_ts })?;
    let offset = ts
        .checked_sub(min_ts)
        .ok_or_else(|| rec.invalid(CREATED_AT, "timestamp near the histogram range", ts.to_string()))?;
    let interval = span as f64 / f64::from(BUCKETS);
    Ok((offset as f64 / interval) as i64)
}

/// Number of records per time bucket between `min_time` and `max_time`.
pub fn get_number_of_posts_per_bucket(
    dataset: &Dataset<Record>,
    min_time: DateTime<Utc>,
    max_time: DateTime<Utc>,
) -> Dataset<(i64, u64)> {
    let (min_ts, max_ts) = (min_time.timestamp(), max_time.timestamp());
    dataset
        .try_map(move |r: &Record| Ok((get_bucket(r, min_ts, max_ts)?, 1u64)))
        .reduce_by_key(|a, b| a + b)
}
