//! Fixed-capacity sample window for rolling metrics

use std::collections::VecDeque;

/// Fixed-capacity FIFO over the most recent samples of one metric.
///
/// Starts unprimed (empty). Once `prime` fills it, the length stays at
/// capacity forever: each `rotate` evicts exactly one sample and inserts
/// exactly one.
pub struct CircularWindow<T> {
    slots: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularWindow<T> {
    /// Create an unprimed window that holds `capacity` samples once primed
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Whether the window has been filled to capacity
    pub fn is_primed(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Evict the oldest sample and insert the newest
    ///
    /// Returns the evicted sample, or None when the window is not yet
    /// primed (the new sample is still inserted).
    pub fn rotate(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_primed() {
            self.slots.pop_front()
        } else {
            None
        };
        self.slots.push_back(value);
        evicted
    }

    /// Peek at the oldest sample without evicting it
    pub fn oldest(&self) -> Option<&T> {
        self.slots.front()
    }

    /// Current sample count
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the window holds no samples yet
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> CircularWindow<T> {
    /// Fill every slot with `value`, discarding any partial contents
    pub fn prime(&mut self, value: T) {
        self.slots.clear();
        self.slots
            .extend(std::iter::repeat(value).take(self.capacity));
    }
}

impl CircularWindow<f64> {
    /// Maximum over the current contents
    pub fn max(&self) -> Option<f64> {
        if self.slots.is_empty() {
            return None;
        }
        Some(
            self.slots
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
        )
    }
}
