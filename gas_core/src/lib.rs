pub mod common;
pub mod config;
pub mod math;
pub mod sample;
pub mod store;
pub mod tracker;
pub mod traits;

pub use common::enums::PriceCategory;
pub use common::tracker_error::{ErrCode, TrackerError};
pub use config::tracker_config::TrackerConfig;
pub use math::price_stats::PriceStatistics;
pub use sample::{history_window::HistoryWindow, sample::Sample};
pub use tracker::gas_tracker::{CycleReport, GasTracker};
