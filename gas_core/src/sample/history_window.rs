use std::ops::Index;
use tracing::warn;

use super::sample::Sample;

/// Seven days of history at one sample per hour.
pub const DEFAULT_CAPACITY: usize = 7 * 24;

/// Bounded rolling history of samples.
///
/// Storage order carries no meaning: every query scans by timestamp. When two
/// samples share a timestamp, the one met first in storage order wins for
/// both `oldest` and `most_recent`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    capacity: usize,
    lst: Vec<Sample>,
}

impl HistoryWindow {
    /// Empty window, the bootstrap state. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lst: Vec::new(),
        }
    }

    /// Rebuild a window from persisted samples, dropping the oldest ones if
    /// there are more than `capacity`.
    pub fn from_samples(samples: Vec<Sample>, capacity: usize) -> Self {
        let mut window = Self {
            capacity: capacity.max(1),
            lst: samples,
        };

        let excess = window.lst.len().saturating_sub(window.capacity);
        if excess > 0 {
            warn!(
                "loaded {} samples into a window of capacity {}, dropping the {} oldest",
                window.lst.len(),
                window.capacity,
                excess
            );
            for _ in 0..excess {
                window.remove_oldest();
            }
        }
        window
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lst.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.lst.iter()
    }

    pub fn prices(&self) -> impl Iterator<Item = u64> + Clone + '_ {
        self.lst.iter().map(|s| s.price())
    }

    /// Sample with the greatest timestamp.
    pub fn most_recent(&self) -> Option<&Sample> {
        self.position_by(|candidate, best| candidate.timestamp() > best.timestamp())
            .map(|idx| &self.lst[idx])
    }

    /// Sample with the smallest timestamp.
    pub fn oldest(&self) -> Option<&Sample> {
        self.position_by(|candidate, best| candidate.timestamp() < best.timestamp())
            .map(|idx| &self.lst[idx])
    }

    /// Add a sample, evicting the oldest one if that takes the window over
    /// capacity. Returns the evicted sample.
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        self.lst.push(sample);
        if self.lst.len() > self.capacity {
            self.remove_oldest()
        } else {
            None
        }
    }

    /// Copy of the samples ordered oldest to newest. Stable, so ties keep
    /// storage order.
    pub fn samples_by_time(&self) -> Vec<Sample> {
        let mut sorted = self.lst.clone();
        sorted.sort_by_key(|s| s.timestamp());
        sorted
    }

    fn remove_oldest(&mut self) -> Option<Sample> {
        self.position_by(|candidate, best| candidate.timestamp() < best.timestamp())
            .map(|idx| self.lst.remove(idx))
    }

    /// Linear scan keeping the first element that no later element beats.
    fn position_by<F>(&self, beats: F) -> Option<usize>
    where
        F: Fn(&Sample, &Sample) -> bool,
    {
        let mut best: Option<usize> = None;
        for (idx, sample) in self.lst.iter().enumerate() {
            match best {
                Some(b) if !beats(sample, &self.lst[b]) => {}
                _ => best = Some(idx),
            }
        }
        best
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Index<usize> for HistoryWindow {
    type Output = Sample;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lst[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::enums::PriceCategory;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    fn sample(price: u64, hour: i64) -> Sample {
        Sample::new(price, at(hour), PriceCategory::Average)
    }

    #[test]
    fn test_empty_window() {
        let window = HistoryWindow::new(3);
        assert!(window.is_empty());
        assert!(window.most_recent().is_none());
        assert!(window.oldest().is_none());
    }

    #[test]
    fn test_most_recent_ignores_storage_order() {
        let window =
            HistoryWindow::from_samples(vec![sample(1, 5), sample(2, 9), sample(3, 2)], 10);
        assert_eq!(window.most_recent().unwrap().price(), 2);
        assert_eq!(window.oldest().unwrap().price(), 3);
    }

    #[test]
    fn test_ties_pick_first_encountered() {
        let window = HistoryWindow::from_samples(
            vec![sample(1, 3), sample(2, 3), sample(3, 1), sample(4, 1)],
            10,
        );
        assert_eq!(window.most_recent().unwrap().price(), 1);
        assert_eq!(window.oldest().unwrap().price(), 3);
    }

    #[test]
    fn test_append_below_capacity_keeps_everything() {
        let mut window = HistoryWindow::new(3);
        assert!(window.append(sample(1, 0)).is_none());
        assert!(window.append(sample(2, 1)).is_none());
        assert!(window.append(sample(3, 2)).is_none());
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_append_at_capacity_evicts_oldest() {
        // Oldest sits in the middle of storage
        let mut window =
            HistoryWindow::from_samples(vec![sample(1, 4), sample(2, 0), sample(3, 7)], 3);
        let evicted = window.append(sample(4, 8)).unwrap();

        assert_eq!(evicted.price(), 2);
        assert_eq!(window.len(), 3);
        let prices: Vec<u64> = window.prices().collect();
        assert_eq!(prices, vec![1, 3, 4]);
    }

    #[test]
    fn test_append_older_than_everything_evicts_itself() {
        let mut window = HistoryWindow::from_samples(vec![sample(1, 4), sample(2, 5)], 2);
        let evicted = window.append(sample(9, 0)).unwrap();
        assert_eq!(evicted.price(), 9);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_bound_holds_over_many_appends() {
        let capacity = 5;
        let mut window = HistoryWindow::new(capacity);
        for hour in 0..50 {
            let before_min = window.oldest().map(|s| s.timestamp());
            let evicted = window.append(sample(hour as u64, hour));
            assert!(window.len() <= capacity);
            if let Some(evicted) = evicted {
                assert_eq!(Some(evicted.timestamp()), before_min);
            }
        }
        assert_eq!(window.len(), capacity);
        assert_eq!(window.oldest().unwrap().price(), 45);
    }

    #[test]
    fn test_oversized_load_is_trimmed() {
        let samples = (0..10).rev().map(|h| sample(h as u64, h)).collect();
        let window = HistoryWindow::from_samples(samples, 4);
        assert_eq!(window.len(), 4);
        let mut prices: Vec<u64> = window.prices().collect();
        prices.sort();
        assert_eq!(prices, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_samples_by_time_sorted() {
        let window =
            HistoryWindow::from_samples(vec![sample(1, 5), sample(2, 9), sample(3, 2)], 10);
        let prices: Vec<u64> = window.samples_by_time().iter().map(|s| s.price()).collect();
        assert_eq!(prices, vec![3, 1, 2]);
    }

    #[test]
    fn test_zero_capacity_bumped() {
        let mut window = HistoryWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.append(sample(1, 0));
        window.append(sample(2, 1));
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].price(), 2);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(HistoryWindow::default().capacity(), 168);
    }
}
