//! Rolling window of recent telemetry samples
//!
//! Bounded FIFO buffer: once capacity is reached, every append evicts the
//! oldest sample. Only the engine mutates it.

use crate::models::Sample;
use std::collections::VecDeque;

/// Default maximum number of retained samples
pub const DEFAULT_WINDOW_CAPACITY: usize = 1000;

/// Bounded FIFO buffer of samples in arrival order
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl RollingWindow {
    /// Create a window holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(10_000)),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest entries if at capacity
    pub fn append(&mut self, sample: Sample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The last `n` samples (or fewer), oldest first
    pub fn snapshot(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    /// Iterate over the last `n` samples without copying
    pub fn iter_recent(&self, n: usize) -> impl Iterator<Item = &Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip)
    }

    pub fn latest(&self) -> Option<&Sample> {
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

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
