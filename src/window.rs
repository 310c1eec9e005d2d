use std::collections::VecDeque;
use std::sync::Arc;

use crate::types::Sample;

/// Default number of samples retained for display.
pub const WINDOW_CAPACITY: usize = 50;

/// Fixed-capacity FIFO of the most recent samples, oldest first.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    samples: VecDeque<Arc<Sample>>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn append(&mut self, sample: Arc<Sample>) {
        self.samples.push_back(sample);

        // evict from the front, O(1)
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Ordered copy for readers. Samples are shared, never mutable.
    pub fn snapshot(&self) -> Vec<Arc<Sample>> {
        self.samples.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Arc<Sample>> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Acceleration, Orientation};

    fn sample(i: usize) -> Arc<Sample> {
        Arc::new(Sample::new(
            Orientation::new(i as f64, 0.0, 0.0),
            Acceleration::default(),
            format!("2024-01-01 00:00:00.{:04}", i),
        ))
    }

    fn rolls(window: &SlidingWindow) -> Vec<f64> {
        window.snapshot().iter().map(|s| s.orientation().roll).collect()
    }

    #[test]
    fn keeps_everything_up_to_capacity() {
        for n in [0, 1, 49, 50] {
            let mut window = SlidingWindow::default();
            for i in 0..n {
                window.append(sample(i));
            }
            let expected: Vec<f64> = (0..n).map(|i| i as f64).collect();
            assert_eq!(rolls(&window), expected);
        }
    }

    #[test]
    fn keeps_last_capacity_in_arrival_order() {
        for n in [51, 75, 200] {
            let mut window = SlidingWindow::default();
            for i in 0..n {
                window.append(sample(i));
            }
            let expected: Vec<f64> = (n - WINDOW_CAPACITY..n).map(|i| i as f64).collect();
            assert_eq!(window.len(), WINDOW_CAPACITY);
            assert_eq!(rolls(&window), expected);
        }
    }

    #[test]
    fn latest_tracks_last_append() {
        let mut window = SlidingWindow::new(3);
        assert!(window.latest().is_none());
        for i in 0..5 {
            window.append(sample(i));
        }
        assert_eq!(window.latest().map(|s| s.orientation().roll), Some(4.0));
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut window = SlidingWindow::new(2);
        window.append(sample(0));
        let before = window.snapshot();
        window.append(sample(1));
        window.append(sample(2));
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].orientation().roll, 0.0);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut window = SlidingWindow::new(0);
        window.append(sample(7));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.len(), 1);
    }
}
