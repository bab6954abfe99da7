pub mod gas_tracker;
pub mod transition;
