use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::common::enums::PriceCategory;
use crate::common::tracker_error::TrackerError;
use crate::math::categorize::categorize;
use crate::math::price_stats::{compute_statistics, PriceStatistics};
use crate::sample::{history_window::HistoryWindow, sample::Sample};
use crate::traits::{notifier::Notifier, price_source::PriceSource, store::Store};

use super::transition::{detect_transition, Transition};

/// Outcome of one successful cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub price: u64,
    pub category: PriceCategory,
    /// Category of the most recent stored sample before this cycle
    pub previous: Option<PriceCategory>,
    /// `None` on bootstrap, when there was nothing to compare against
    pub statistics: Option<PriceStatistics>,
    pub notified: Option<Transition>,
    pub evicted: Option<Sample>,
    pub window_len: usize,
}

/// Runs the load, classify, notify, append, save pipeline against injected
/// collaborators. One cycle at a time; the window is owned by the cycle.
pub struct GasTracker {
    source: Box<dyn PriceSource>,
    store: Box<dyn Store>,
    notifier: Box<dyn Notifier>,
    capacity: usize,
}

impl GasTracker {
    pub fn new(
        source: Box<dyn PriceSource>,
        store: Box<dyn Store>,
        notifier: Box<dyn Notifier>,
        capacity: usize,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            capacity,
        }
    }

    pub fn run_cycle(&self) -> Result<CycleReport, TrackerError> {
        self.run_cycle_at(Utc::now())
    }

    /// Run one cycle, stamping the new sample with `now`.
    ///
    /// A failed notification does not stop the sample from being stored; the
    /// error is returned once the window has been saved.
    pub fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleReport, TrackerError> {
        let window = self.store.load(self.capacity)?;
        info!("loaded {} gas price records", window.len());

        let price = self.source.fetch_current_price()?;
        info!("medium gas is {}", price);

        let (category, statistics) = classify(&window, price)?;
        let previous = window.most_recent().map(|s| s.category());
        info!("the price now is {}", category);

        let (notified, notify_err) = match detect_transition(category, previous) {
            Some(transition) => {
                match self
                    .notifier
                    .send(transition.new, transition.previous, price)
                {
                    Ok(()) => {
                        info!("sent notification of price category change {}", transition);
                        (Some(transition), None)
                    }
                    Err(e) => {
                        warn!("failed to notify of price category change {}: {}", transition, e);
                        (None, Some(e))
                    }
                }
            }
            None => (None, None),
        };

        let (window, evicted) = record(window, Sample::new(price, now, category));
        if let Some(old) = &evicted {
            info!("evicted oldest gas price {}", old);
        }

        self.store.save(&window)?;
        info!("wrote {} gas price records", window.len());

        if let Some(e) = notify_err {
            return Err(e);
        }

        Ok(CycleReport {
            price,
            category,
            previous,
            statistics,
            notified,
            evicted,
            window_len: window.len(),
        })
    }

    /// Current stored window and its statistics, without fetching or writing.
    pub fn snapshot(&self) -> Result<(HistoryWindow, Option<PriceStatistics>), TrackerError> {
        snapshot(self.store.as_ref(), self.capacity)
    }
}

pub fn snapshot(
    store: &dyn Store,
    capacity: usize,
) -> Result<(HistoryWindow, Option<PriceStatistics>), TrackerError> {
    let window = store.load(capacity)?;
    let statistics = if window.is_empty() {
        None
    } else {
        Some(compute_statistics(&window)?)
    };
    Ok((window, statistics))
}

/// Classify `price` against the window as it stood before this cycle.
///
/// On bootstrap there is no baseline, so the first sample is recorded as
/// Average. A single stored sample gives a zero-width band and is classified
/// as is.
fn classify(
    window: &HistoryWindow,
    price: u64,
) -> Result<(PriceCategory, Option<PriceStatistics>), TrackerError> {
    if window.is_empty() {
        debug!("no history yet, skipping statistics");
        return Ok((PriceCategory::Average, None));
    }

    let stats = compute_statistics(window)?;
    debug!(
        "mean price = {}, stddev = {} over {} samples",
        stats.mean, stats.stddev, stats.count
    );
    Ok((categorize(price, &stats), Some(stats)))
}

fn record(mut window: HistoryWindow, sample: Sample) -> (HistoryWindow, Option<Sample>) {
    let evicted = window.append(sample);
    (window, evicted)
}
