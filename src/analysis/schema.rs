//! Element counts and schema-consistency filtering.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::record::{AttributeSet, Record};
use tracing::debug;

pub fn count_elements_in_dataset(dataset: &Dataset<Record>) -> Result<usize> {
    dataset.count()
}

pub fn get_first_element(dataset: &Dataset<Record>) -> Result<Record> {
    dataset.first()
}

/// Every attribute name used by at least one record, sorted.
pub fn get_all_attributes(dataset: &Dataset<Record>) -> Result<Vec<String>> {
    dataset
        .flat_map(|r: &Record| r.attribute_names().map(str::to_string).collect::<Vec<_>>())
        .distinct()
        .collect_sorted()
}

/// `true` iff the attribute names of `record` are exactly `reference`.
/// A subset or superset does not match.
pub fn same_attributes(reference: &AttributeSet, record: &Record) -> bool {
    record.has_exact_attributes(reference)
}

/// Keep only records carrying exactly the attribute set of the first record.
///
/// The reference set is read eagerly (it needs `first()`); the filter itself
/// stays lazy.
///
/// # Errors
/// [`Error::EmptyDataset`](crate::Error::EmptyDataset) if `dataset` is empty.
pub fn get_elements_with_same_attributes(dataset: &Dataset<Record>) -> Result<Dataset<Record>> {
    let reference = dataset.first()?.attribute_set();
    debug!(attributes = ?reference, "reference attribute set");
    Ok(dataset.filter(move |r: &Record| same_attributes(&reference, r)))
}
