use crate::sample::Sample;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of samples, oldest first.
///
/// Callers push in chronological order, so timestamps are non-decreasing and
/// any time-bounded tail can be located by binary search.
#[derive(Clone, Debug)]
pub struct SampleHistory {
    capacity: usize,
    inner: VecDeque<Sample>,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a sample, returning the evicted one if the history was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.inner.len() >= self.capacity {
            // Trim oldest to make room.
            self.inner.pop_front()
        } else {
            None
        };
        self.inner.push_back(sample);
        evicted
    }

    pub fn latest(&self) -> Option<Sample> {
        self.inner.back().copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The contiguous tail whose timestamps are `>= min_ts`.
    pub fn since(&self, min_ts: f64) -> impl Iterator<Item = &Sample> {
        let start = self.inner.partition_point(|s| s.timestamp < min_ts);
        self.inner.range(start..)
    }

    /// All samples, oldest first.
    pub fn history(&self) -> Vec<Sample> {
        self.inner.iter().copied().collect()
    }
}
