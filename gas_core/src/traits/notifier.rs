use tracing::info;

use crate::common::enums::PriceCategory;
use crate::common::tracker_error::TrackerError;
use crate::tracker::transition::CategoryChange;

pub trait Notifier {
    fn send(
        &self,
        new: PriceCategory,
        previous: PriceCategory,
        price: u64,
    ) -> Result<(), TrackerError>;
}

/// Writes the notification to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(
        &self,
        new: PriceCategory,
        previous: PriceCategory,
        price: u64,
    ) -> Result<(), TrackerError> {
        let change = CategoryChange::new(new, previous, price);
        info!("[dry run] {}: {}", change.subject(), change.body().trim_end());
        Ok(())
    }
}
