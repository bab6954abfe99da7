use crate::common::enums::PriceCategory;

use super::price_stats::PriceStatistics;

/// Place `price` in the one-sigma band around the rolling mean.
///
/// Both edges are exclusive: a price exactly on `mean ± stddev` is Average.
pub fn categorize(price: u64, stats: &PriceStatistics) -> PriceCategory {
    let price = price as f64;

    if price < stats.lower() {
        PriceCategory::Low
    } else if price > stats.upper() {
        PriceCategory::High
    } else {
        PriceCategory::Average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, stddev: f64) -> PriceStatistics {
        PriceStatistics {
            mean,
            stddev,
            count: 3,
        }
    }

    #[test]
    fn test_bands() {
        let s = stats(11.0, 1.0);
        assert_eq!(categorize(9, &s), PriceCategory::Low);
        assert_eq!(categorize(11, &s), PriceCategory::Average);
        assert_eq!(categorize(13, &s), PriceCategory::High);
    }

    #[test]
    fn test_edges_are_average() {
        let s = stats(11.0, 1.0);
        assert_eq!(categorize(10, &s), PriceCategory::Average);
        assert_eq!(categorize(12, &s), PriceCategory::Average);
    }

    #[test]
    fn test_fractional_band() {
        let s = stats(20.5, 2.25);
        assert_eq!(categorize(18, &s), PriceCategory::Low);
        assert_eq!(categorize(19, &s), PriceCategory::Average);
        assert_eq!(categorize(22, &s), PriceCategory::Average);
        assert_eq!(categorize(23, &s), PriceCategory::High);
    }

    #[test]
    fn test_zero_stddev_collapses_band() {
        // A single stored sample leaves no room: anything but the mean is extreme
        let s = stats(50.0, 0.0);
        assert_eq!(categorize(50, &s), PriceCategory::Average);
        assert_eq!(categorize(49, &s), PriceCategory::Low);
        assert_eq!(categorize(51, &s), PriceCategory::High);
    }

    #[test]
    fn test_repeatable() {
        let s = stats(33.3, 4.1);
        for price in 0..80 {
            let first = categorize(price, &s);
            for _ in 0..3 {
                assert_eq!(categorize(price, &s), first);
            }
        }
    }

    #[test]
    fn test_zero_price() {
        assert_eq!(categorize(0, &stats(1.0, 0.5)), PriceCategory::Low);
        assert_eq!(categorize(0, &stats(0.0, 0.0)), PriceCategory::Average);
    }
}
