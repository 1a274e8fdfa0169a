//! Aggregates keyed by UTC hour of day.

use super::{add_sums, add_tallies, ratio, success_tally};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::record::{CREATED_AT, POINTS, Record};
use chrono::Timelike;

use super::timestamps::extract_time;

/// UTC hour (0..=23) of the record's `created_at_i`.
pub fn get_hour(rec: &Record) -> Result<u32> {
    Ok(extract_time(rec.int(CREATED_AT)?)?.hour())
}

pub fn get_number_of_posts_per_hour(dataset: &Dataset<Record>) -> Dataset<(u32, u64)> {
    dataset
        .try_map(|r: &Record| Ok((get_hour(r)?, 1u64)))
        .reduce_by_key(|a, b| a + b)
}

/// Average `points` per hour.
pub fn get_score_per_hour(dataset: &Dataset<Record>) -> Dataset<(u32, f64)> {
    dataset
        .try_map(|r: &Record| Ok((get_hour(r)?, (r.number(POINTS)?, 1u64))))
        .reduce_by_key(add_sums)
        .map(|(hour, (sum, count))| (*hour, ratio(*sum, *count)))
}

/// Fraction of posts per hour scoring above
/// [`SUCCESS_THRESHOLD`](super::SUCCESS_THRESHOLD).
pub fn get_proportion_of_scores(dataset: &Dataset<Record>) -> Dataset<(u32, f64)> {
    dataset
        .try_map(|r: &Record| Ok((get_hour(r)?, success_tally(r)?)))
        .reduce_by_key(add_tallies)
        .map(|(hour, (hits, count))| (*hour, ratio(*hits as f64, *count)))
}
