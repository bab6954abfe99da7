use chrono::{DateTime, Utc};

use crate::common::tracker_error::TrackerError;
use crate::sample::sample::Sample;

/// A remote key-value table with one item per sample, keyed by the sample's
/// timestamp. Implementations decode items themselves.
pub trait KvTable {
    /// Every item in the table, in whatever order the table returns them.
    fn scan(&self) -> Result<Vec<Sample>, TrackerError>;

    /// Insert the sample, replacing any item with the same timestamp.
    fn put(&self, sample: &Sample) -> Result<(), TrackerError>;

    fn delete(&self, timestamp: DateTime<Utc>) -> Result<(), TrackerError>;
}
