//! Bucketed priority queue driving the best-first search.
//!
//! Priorities are discretized to a fixed number of decimal digits. Buckets
//! are served in ascending order and each bucket is FIFO, so nodes of equal
//! priority leave in the order they arrived.

use crate::{GoapError, Result};
use std::collections::{BTreeMap, VecDeque};

/// Default number of decimal digits kept from a priority.
pub const DEFAULT_PRECISION: u32 = 3;

/// Min-priority queue with deterministic tie-breaking.
///
/// # Examples
///
/// ```
/// use regressive_goap::PriorityQueue;
///
/// let mut queue = PriorityQueue::new();
/// queue.enqueue(2.0, "late");
/// queue.enqueue(1.0, "first");
/// queue.enqueue(1.0, "second");
///
/// assert_eq!(queue.dequeue().unwrap(), "first");
/// assert_eq!(queue.dequeue().unwrap(), "second");
/// assert_eq!(queue.dequeue().unwrap(), "late");
/// assert!(queue.dequeue().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    buckets: BTreeMap<i64, VecDeque<T>>,
    factor: f64,
    len: usize,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }

    /// Queue keeping `precision` decimal digits of each priority.
    pub fn with_precision(precision: u32) -> Self {
        Self {
            buckets: BTreeMap::new(),
            factor: 10f64.powi(precision as i32),
            len: 0,
        }
    }

    fn key(&self, priority: f32) -> i64 {
        // `as` truncates toward zero and saturates, NaN maps to 0
        (f64::from(priority) * self.factor) as i64
    }

    pub fn enqueue(&mut self, priority: f32, item: T) {
        let key = self.key(priority);
        self.buckets.entry(key).or_default().push_back(item);
        self.len += 1;
    }

    /// Removes the oldest item of the lowest bucket, if any.
    pub fn pop(&mut self) -> Option<T> {
        let mut bucket = self.buckets.first_entry()?;
        let item = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            bucket.remove();
        }
        if item.is_some() {
            self.len -= 1;
        }
        item
    }

    /// Like [`PriorityQueue::pop`], failing with `GoapError::EmptyQueue`.
    pub fn dequeue(&mut self) -> Result<T> {
        self.pop().ok_or(GoapError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
