use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for a tracking cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrCode {
    /// Required setting absent or invalid; raised before any I/O
    Configuration,
    /// Price source unreachable, non-success response or malformed payload
    Fetch,
    /// History could not be loaded or saved
    Store,
    /// Persisted data present but unreadable
    Format,
    /// Statistics requested over an empty window
    InsufficientData,
    /// Notification could not be delivered
    Notify,
}

impl ErrCode {
    /// Everything except a failed notification aborts the cycle on the spot.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Notify)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{errcode}: {msg}")]
pub struct TrackerError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl TrackerError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::Configuration)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::Fetch)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::Store)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::Format)
    }

    pub fn notify(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::Notify)
    }

    pub fn is_fatal(&self) -> bool {
        self.errcode.is_fatal()
    }
}
