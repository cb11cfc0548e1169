use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

/// Fixed-capacity window over the most recent episode returns
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnWindow {
    values: VecDeque<f32>,
    capacity: usize,
}

impl ReturnWindow {
    pub fn new(capacity: usize) -> Self {
        ReturnWindow {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    /// Mean of the held values, `None` while empty
    pub fn mean(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        let sum: f32 = self.values.iter().sum();
        Some(sum / self.values.len() as f32)
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut window = ReturnWindow::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push(v);
        }
        assert!(window.is_full());
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.mean(), Some(3.0));
    }

    #[test]
    fn test_mean_before_full() {
        let mut window = ReturnWindow::new(20);
        assert_eq!(window.mean(), None);
        window.push(4.0);
        window.push(6.0);
        assert!(!window.is_full());
        assert_eq!(window.mean(), Some(5.0));
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut window = ReturnWindow::new(0);
        window.push(1.0);
        assert!(window.is_empty());
        assert!(!window.is_full());
    }
}
