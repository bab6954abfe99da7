pub mod history_window;
pub mod sample;
