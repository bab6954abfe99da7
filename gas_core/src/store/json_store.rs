use std::io::ErrorKind;
use std::path::PathBuf;

use crate::common::tracker_error::TrackerError;
use crate::sample::{history_window::HistoryWindow, sample::Sample};
use crate::traits::store::Store;

use super::write_atomically;

/// Keeps the window in one JSON file as an array of sample records.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for JsonStore {
    fn load(&self, capacity: usize) -> Result<HistoryWindow, TrackerError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(HistoryWindow::new(capacity));
            }
            Err(e) => {
                return Err(TrackerError::store(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let samples: Vec<Sample> = serde_json::from_slice(&data).map_err(|e| {
            TrackerError::format(format!("{} is not a sample list: {}", self.path.display(), e))
        })?;
        Ok(HistoryWindow::from_samples(samples, capacity))
    }

    fn save(&self, window: &HistoryWindow) -> Result<(), TrackerError> {
        let samples: Vec<&Sample> = window.iter().collect();
        let data = serde_json::to_vec_pretty(&samples)
            .map_err(|e| TrackerError::store(format!("failed to encode history: {}", e)))?;
        write_atomically(&self.path, &data)
    }
}
