use crate::common::tracker_error::TrackerError;

/// Where the current gas price comes from.
pub trait PriceSource {
    /// Any network, status or payload problem is an `ErrCode::Fetch` error.
    /// There is no stale or partial fallback.
    fn fetch_current_price(&self) -> Result<u64, TrackerError>;
}

/// A source that always reports the same price. Handy for replaying a value
/// by hand from the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrice(pub u64);

impl PriceSource for FixedPrice {
    fn fetch_current_price(&self) -> Result<u64, TrackerError> {
        Ok(self.0)
    }
}
