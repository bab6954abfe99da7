use std::io::ErrorKind;
use std::path::PathBuf;

use crate::common::tracker_error::TrackerError;
use crate::sample::{history_window::HistoryWindow, sample::Sample};
use crate::traits::store::Store;

use super::write_atomically;

/// Keeps the window as `price,timestamp,category` rows with a header line.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for CsvStore {
    fn load(&self, capacity: usize) -> Result<HistoryWindow, TrackerError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(HistoryWindow::new(capacity));
            }
            Err(e) => {
                return Err(TrackerError::store(format!(
                    "failed to open {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut rdr = csv::Reader::from_reader(file);
        let mut samples = Vec::new();
        for (row, result) in rdr.deserialize::<Sample>().enumerate() {
            let sample = result.map_err(|e| {
                TrackerError::format(format!(
                    "{} row {}: {}",
                    self.path.display(),
                    row + 1,
                    e
                ))
            })?;
            samples.push(sample);
        }
        Ok(HistoryWindow::from_samples(samples, capacity))
    }

    fn save(&self, window: &HistoryWindow) -> Result<(), TrackerError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for sample in window.iter() {
            wtr.serialize(sample)
                .map_err(|e| TrackerError::store(format!("failed to encode {}: {}", sample, e)))?;
        }
        let data = wtr
            .into_inner()
            .map_err(|e| TrackerError::store(format!("failed to flush history: {}", e)))?;
        write_atomically(&self.path, &data)
    }
}
