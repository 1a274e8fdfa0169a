//! Descriptive statistics over submission records.
//!
//! Every routine here is composed from the engine's transforms and reductions
//! only. Routines that return a [`Dataset`](crate::Dataset) are lazy: record
//! errors (a missing `created_at_i`, a non-numeric `points`) surface from the
//! action that finally evaluates them, not from the call that builds them.
//!
//! - [`schema`]: element counts, attribute sets, schema-consistency filtering
//! - [`timestamps`]: min/max creation time and the 200-bucket time histogram
//! - [`hourly`]: per UTC hour counts, average score, high-score ratio
//! - [`titles`]: title word counts and per-length success ratio

pub mod hourly;
pub mod schema;
pub mod timestamps;
pub mod titles;

pub use hourly::*;
pub use schema::*;
pub use timestamps::*;
pub use titles::*;

use crate::record::{POINTS, Record};
use crate::error::Result;

/// A post "succeeds" when its score is strictly above this.
pub const SUCCESS_THRESHOLD: f64 = 200.0;

/// Per-key `(successes, total)` accumulator. Counts are integers, so tallies
/// merge exactly in any order.
pub(crate) type Tally = (u64, u64);

/// Pairwise sum; commutative and associative.
pub(crate) fn add_tallies(a: Tally, b: Tally) -> Tally {
    (a.0 + b.0, a.1 + b.1)
}

/// Same as [`add_tallies`] for a score sum paired with a count.
pub(crate) fn add_sums(a: (f64, u64), b: (f64, u64)) -> (f64, u64) {
    (a.0 + b.0, a.1 + b.1)
}

/// `1` if the record's score is above [`SUCCESS_THRESHOLD`], `0` otherwise,
/// paired with a count of one.
pub(crate) fn success_tally(rec: &Record) -> Result<Tally> {
    let hit = u64::from(rec.number(POINTS)? > SUCCESS_THRESHOLD);
    Ok((hit, 1))
}

/// Count is at least one for every key a reduction emits.
pub(crate) fn ratio(numerator: f64, count: u64) -> f64 {
    numerator / count as f64
}
