pub mod csv_store;
pub mod json_store;
pub mod legacy;
pub mod table_store;

use std::path::Path;

use crate::common::tracker_error::TrackerError;
use crate::traits::store::Store;

pub use csv_store::CsvStore;
pub use json_store::JsonStore;
pub use table_store::TableStore;

/// Picks a file backend from the path's extension: `.csv` is tabular,
/// anything else is the JSON array layout.
pub fn open_file_store(path: impl AsRef<Path>) -> Box<dyn Store> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Box::new(CsvStore::new(path)),
        _ => Box::new(JsonStore::new(path)),
    }
}

/// Writes to a sibling temp file, then renames it over `path`.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), TrackerError> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents).map_err(|e| {
        TrackerError::store(format!("failed to write {}: {}", tmp.display(), e))
    })?;
    std::fs::rename(&tmp, path).map_err(|e| {
        TrackerError::store(format!(
            "failed to move {} to {}: {}",
            tmp.display(),
            path.display(),
            e
        ))
    })
}
