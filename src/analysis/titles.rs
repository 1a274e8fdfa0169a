//! Aggregates keyed by title length in words.

use super::{add_tallies, ratio, success_tally};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::record::{Record, TITLE};
use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word pattern"));

/// Runs of word characters (Unicode letters, digits, underscore), in order.
pub fn get_words(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Word count of the title; a record without a title has length 0.
pub fn title_length(rec: &Record) -> Result<usize> {
    Ok(rec.text(TITLE)?.map_or(0, |t| get_words(t).len()))
}

/// Fraction of posts scoring above
/// [`SUCCESS_THRESHOLD`](super::SUCCESS_THRESHOLD) for each title length.
pub fn get_proportion_of_success(dataset: &Dataset<Record>) -> Dataset<(usize, f64)> {
    dataset
        .try_map(|r: &Record| Ok((title_length(r)?, success_tally(r)?)))
        .reduce_by_key(add_tallies)
        .map(|(len, (hits, count))| (*len, ratio(*hits as f64, *count)))
}

/// Number of posts for each title length.
pub fn get_title_length_distribution(dataset: &Dataset<Record>) -> Dataset<(usize, u64)> {
    dataset
        .try_map(|r: &Record| Ok((title_length(r)?, 1u64)))
        .reduce_by_key(|a, b| a + b)
}
