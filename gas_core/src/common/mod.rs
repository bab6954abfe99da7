pub mod enums;
pub mod tracker_error;
