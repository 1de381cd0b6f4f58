use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Default number of samples the visualization window retains.
pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

/// Fixed-capacity, FIFO-truncated buffer of recent (time, value) pairs.
///
/// This is the visualization-facing window only. It is deliberately a
/// separate structure from the per-core history: the history is an
/// unbounded append-only log, the window always holds at most `capacity`
/// entries, discarding the oldest first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    entries: VecDeque<(DateTime<Local>, f64)>,
}

impl RollingWindow {
    /// Creates a window holding at most `capacity` entries.
    ///
    /// A capacity of zero is clamped to one, so every constructible window
    /// retains at least the most recent entry and `push` always terminates.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, entries: VecDeque::with_capacity(capacity) }
    }

    /// Appends a sample, evicting the oldest entry when full.
    pub fn push(&mut self, timestamp: DateTime<Local>, value: f64) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((timestamp, value));
    }

    /// Point-in-time copy of the window contents, oldest first.
    pub fn snapshot(&self) -> Vec<(DateTime<Local>, f64)> {
        self.entries.iter().copied().collect()
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_oldest_first() {
        let mut window = RollingWindow::new(DEFAULT_WINDOW_CAPACITY);
        for cycle in 1..=25 {
            window.push(Local::now(), cycle as f64);
        }

        // After 25 cycles with K=20 the window holds cycles 6..=25 in
        // order, oldest first.
        let values: Vec<f64> = window.snapshot().iter().map(|(_, v)| *v).collect();
        let expected: Vec<f64> = (6..=25).map(|c| c as f64).collect();
        assert_eq!(values, expected);
        assert_eq!(window.len(), window.capacity());
    }

    #[test]
    fn fills_up_to_capacity_without_eviction() {
        let mut window = RollingWindow::new(5);
        for cycle in 1..=5 {
            window.push(Local::now(), cycle as f64);
        }
        let values: Vec<f64> = window.snapshot().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut window = RollingWindow::new(0);
        assert_eq!(window.capacity(), 1);

        // Pushes must terminate and keep exactly the most recent entry.
        window.push(Local::now(), 1.0);
        window.push(Local::now(), 2.0);
        let values: Vec<f64> = window.snapshot().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2.0]);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut window = RollingWindow::new(3);
        window.push(Local::now(), 1.0);
        let snapshot = window.snapshot();
        window.push(Local::now(), 2.0);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(window.len(), 2);
    }
}
