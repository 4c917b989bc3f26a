//! Min-priority queue used while building the Huffman tree.
//!
//! Entries are ordered by `(weight, insertion sequence)`, so equal weights
//! come out in the order they went in.

use crate::error::{CompressError, Result};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    weight: u64,
    seq: u64,
    item: T,
}

impl<T> Eq for Entry<T> {}
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Binary-heap min queue keyed by a `u64` weight.
#[derive(Debug)]
pub struct MinQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> MinQueue<T> {
    /// Empty queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Empty queue with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Add `item` under `weight`.
    pub fn insert(&mut self, weight: u64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { weight, seq, item }));
    }

    /// Remove the lightest item, returning it with its weight.
    pub fn extract_min(&mut self) -> Result<(u64, T)> {
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.weight, entry.item))
            .ok_or(CompressError::EmptyQueue)
    }

    /// Weight of the item `extract_min` would return next.
    pub fn peek_weight(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.weight)
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
