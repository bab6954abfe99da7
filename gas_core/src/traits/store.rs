use crate::common::tracker_error::TrackerError;
use crate::sample::history_window::HistoryWindow;

/// Persistence for the history window. Every cycle reads the whole window and
/// writes back a complete replacement.
pub trait Store {
    /// An absent history is the bootstrap case and yields an empty window.
    /// Anything else that goes wrong is an error.
    fn load(&self, capacity: usize) -> Result<HistoryWindow, TrackerError>;

    fn save(&self, window: &HistoryWindow) -> Result<(), TrackerError>;
}
