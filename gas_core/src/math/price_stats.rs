use std::fmt;

use crate::common::tracker_error::{ErrCode, TrackerError};
use crate::sample::history_window::HistoryWindow;

/// Rolling statistics of the stored prices. Recomputed every cycle, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStatistics {
    pub mean: f64,
    pub stddev: f64,
    pub count: usize,
}

impl PriceStatistics {
    /// Lower edge of the Average band; prices strictly below it are Low.
    pub fn lower(&self) -> f64 {
        self.mean - self.stddev
    }

    /// Upper edge of the Average band; prices strictly above it are High.
    pub fn upper(&self) -> f64 {
        self.mean + self.stddev
    }
}

impl fmt::Display for PriceStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.3} stddev={:.3} n={}",
            self.mean, self.stddev, self.count
        )
    }
}

/// Mean and Bessel-corrected standard deviation of the window's prices.
///
/// Two passes over the data: the mean first, then the squared deviations
/// from it. Fails on an empty window.
pub fn compute_statistics(window: &HistoryWindow) -> Result<PriceStatistics, TrackerError> {
    price_statistics(window.prices())
}

pub fn price_statistics<I>(prices: I) -> Result<PriceStatistics, TrackerError>
where
    I: Iterator<Item = u64> + Clone,
{
    let count = prices.clone().count();
    if count == 0 {
        return Err(TrackerError::new(
            "no gas prices to compute statistics from",
            ErrCode::InsufficientData,
        ));
    }

    let mean = prices.clone().map(|p| p as f64).sum::<f64>() / count as f64;
    let stddev = if count == 1 {
        0.0
    } else {
        let sum_squares = prices
            .map(|p| {
                let diff = p as f64 - mean;
                diff * diff
            })
            .sum::<f64>();
        (sum_squares / (count - 1) as f64).sqrt()
    };

    Ok(PriceStatistics {
        mean,
        stddev,
        count,
    })
}
