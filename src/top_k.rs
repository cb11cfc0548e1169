use crate::error::{Result, TabulaError};
use crate::types::EpisodeRecord;
use serde::{Serialize, Deserialize};

/// Keeps the `k` highest-return episodes seen so far, best first
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopKTracker {
    k: usize,
    records: Vec<EpisodeRecord>,
}

impl TopKTracker {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(TabulaError::invalid_configuration("top_k", "must be at least 1"));
        }
        Ok(TopKTracker {
            k,
            records: Vec::with_capacity(k + 1),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Offer a finished episode; returns whether it was kept
    pub fn offer(&mut self, episode: usize, total_return: f32) -> bool {
        let admitted = self.records.len() < self.k
            || self.min_return().map_or(true, |min| total_return > min);
        if !admitted {
            return false;
        }

        self.records.push(EpisodeRecord::new(episode, total_return));
        self.records
            .sort_by(|a, b| b.total_return.total_cmp(&a.total_return));
        self.records.truncate(self.k);
        true
    }

    /// Lowest held return, `None` while empty
    pub fn min_return(&self) -> Option<f32> {
        self.records.last().map(|r| r.total_return)
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn returns(tracker: &TopKTracker) -> Vec<f32> {
        tracker.records().iter().map(|r| r.total_return).collect()
    }

    #[test]
    fn test_keeps_best_three() {
        let mut tracker = TopKTracker::new(3).unwrap();
        for (episode, value) in [5.0, 3.0, 9.0, 1.0, 7.0].into_iter().enumerate() {
            tracker.offer(episode, value);
        }
        assert_eq!(returns(&tracker), vec![9.0, 7.0, 5.0]);
        assert_eq!(
            tracker.records().iter().map(|r| r.episode).collect::<Vec<_>>(),
            vec![2, 4, 0]
        );

        let before = tracker.clone();
        assert!(!tracker.offer(5, 1.0));
        assert_eq!(tracker, before);
    }

    #[test]
    fn test_equal_to_minimum_is_rejected_when_full() {
        let mut tracker = TopKTracker::new(2).unwrap();
        tracker.offer(0, 4.0);
        tracker.offer(1, 2.0);
        assert!(!tracker.offer(2, 2.0));
        assert!(tracker.offer(3, 2.5));
        assert_eq!(returns(&tracker), vec![4.0, 2.5]);
    }

    #[test]
    fn test_fewer_than_k() {
        let mut tracker = TopKTracker::new(10).unwrap();
        tracker.offer(0, -3.0);
        tracker.offer(1, -8.0);
        assert_eq!(tracker.len(), 2);
        assert_eq!(returns(&tracker), vec![-3.0, -8.0]);
        assert_eq!(tracker.min_return(), Some(-8.0));
    }

    #[test]
    fn test_rejects_zero_k() {
        assert!(TopKTracker::new(0).is_err());
    }
}
