use std::collections::{HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::common::tracker_error::TrackerError;
use crate::sample::{history_window::HistoryWindow, sample::Sample};
use crate::traits::{kv_table::KvTable, store::Store};

/// Key string of the item holding the sample taken at `timestamp`.
pub fn table_key(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Keeps the window in a key-value table.
///
/// Saving touches only the items that changed: samples no longer in the
/// window are deleted first, then new samples are put. A normal cycle at
/// capacity is therefore one delete of the oldest item and one put.
#[derive(Debug, Clone)]
pub struct TableStore<T> {
    table: T,
}

impl<T: KvTable> TableStore<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }
}

impl<T: KvTable> Store for TableStore<T> {
    fn load(&self, capacity: usize) -> Result<HistoryWindow, TrackerError> {
        let samples = self.table.scan()?;
        info!("read {} gas price records from table", samples.len());
        Ok(HistoryWindow::from_samples(samples, capacity))
    }

    fn save(&self, window: &HistoryWindow) -> Result<(), TrackerError> {
        let stored: HashMap<DateTime<Utc>, Sample> = self
            .table
            .scan()?
            .into_iter()
            .map(|s| (s.timestamp(), s))
            .collect();
        let kept: HashSet<DateTime<Utc>> = window.iter().map(|s| s.timestamp()).collect();

        let mut stale: Vec<DateTime<Utc>> = stored
            .keys()
            .filter(|ts| !kept.contains(*ts))
            .copied()
            .collect();
        stale.sort();
        for ts in stale {
            self.table.delete(ts)?;
            info!("deleted gas price with timestamp {}", table_key(ts));
        }

        for sample in window.iter() {
            if stored.get(&sample.timestamp()) != Some(sample) {
                self.table.put(sample)?;
                info!("wrote gas price {} to table", sample);
            }
        }
        Ok(())
    }
}
