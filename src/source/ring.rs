//! src/source/ring.rs
//!
//! Bounded append-only series: once full, each push drops the oldest sample.

use std::collections::VecDeque;

use crate::engine::{Sample, Series};

#[derive(Clone, Debug)]
pub struct RingSeries<T = f64> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> RingSeries<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample.
    ///
    /// Maintains invariant: len() <= capacity().
    pub fn push(&mut self, value: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<T> Extend<T> for RingSeries<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Sample> Series for RingSeries<T> {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn extend_tail(&self, n: usize, out: &mut Vec<f64>) {
        self.samples.extend_tail(n, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_drops_oldest_at_capacity() {
        let mut ring = RingSeries::new(3);
        ring.extend([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<f64>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(ring.last(), Some(&4.0));
    }

    #[test]
    fn tail_reads_only_requested_suffix() {
        let mut ring: RingSeries<i64> = RingSeries::new(10);
        ring.extend(0..10);
        let mut out = Vec::new();
        ring.extend_tail(2, &mut out);
        assert_eq!(out, vec![8.0, 9.0]);
    }
}
