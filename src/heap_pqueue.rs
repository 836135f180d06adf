//! Binary min-heap priority queue
//!
//! [`HeapPQueue`] stores its elements in a single contiguous buffer laid out as
//! a complete binary tree in level order. Slot `0` is the root and the parent of
//! slot `i` is `(i + 1) / 2 - 1`.
//!
//! The buffer starts with [`INITIAL_CAPACITY`] slots and doubles whenever an
//! insertion finds it full. It never shrinks while the queue is alive.
//!
//! # Time Complexity
//!
//! | Operation | Complexity                         |
//! |-----------|------------------------------------|
//! | `push`    | O(log n), O(1) amortized growth    |
//! | `pop`     | O(log n)                           |
//! | `peek`    | O(1)                               |
//! | `len`     | O(1)                               |
//!
//! # Example
//!
//! ```rust
//! use rust_heap_topk::{HeapPQueue, PriorityQueue, Record};
//!
//! let mut heap = HeapPQueue::new();
//! heap.push(Record::new("A", 4.0));
//! heap.push(Record::new("B", 5.0));
//! heap.push(Record::new("F", 2.0));
//!
//! assert_eq!(heap.pop().map(|r| r.weight()), Ok(2.0));
//! assert_eq!(heap.pop().map(|r| r.weight()), Ok(4.0));
//! assert_eq!(heap.pop().map(|r| r.weight()), Ok(5.0));
//! assert!(heap.pop().is_err());
//! ```

use std::fmt;
use std::iter::FusedIterator;

use log::trace;

use crate::config::HeapConfig;
use crate::traits::{HeapError, PriorityQueue, Weighted};

/// Number of slots allocated by a freshly created queue
pub const INITIAL_CAPACITY: usize = 4;

/// An array-backed binary min-heap
///
/// Elements are ordered by [`Weighted::weight`]. Elements of equal weight come
/// out in an unspecified (but deterministic) relative order.
pub struct HeapPQueue<T> {
    /// Live elements in level order; `elems.capacity()` is the allocated size
    elems: Vec<T>,
}

impl<T: Weighted> PriorityQueue<T> for HeapPQueue<T> {
    fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    fn len(&self) -> usize {
        self.elems.len()
    }

    fn push(&mut self, item: T) {
        if self.elems.len() == self.elems.capacity() {
            self.grow();
        }
        self.elems.push(item);
        self.sift_up(self.elems.len() - 1);
    }

    fn peek(&self) -> Result<&T, HeapError> {
        self.elems
            .first()
            .ok_or(HeapError::Empty { operation: "peek" })
    }

    fn pop(&mut self) -> Result<T, HeapError> {
        if self.elems.is_empty() {
            return Err(HeapError::Empty { operation: "pop" });
        }

        // The last leaf takes the root's place and sinks back down.
        let result = self.elems.swap_remove(0);
        if !self.elems.is_empty() {
            self.sift_down(0);
        }

        Ok(result)
    }
}

impl<T> HeapPQueue<T> {
    /// Creates an empty queue with room for `capacity` elements
    ///
    /// A requested capacity of zero is rounded up to one so that doubling
    /// always makes progress.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elems: Vec::with_capacity(capacity.max(1)),
        }
    }

    /// Creates an empty queue sized from configuration
    pub fn from_config(config: &HeapConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Number of allocated slots
    ///
    /// Always at least [`len`](PriorityQueue::len), and never decreases.
    pub fn capacity(&self) -> usize {
        self.elems.capacity()
    }

    /// The live elements in level order (root first)
    pub fn as_slice(&self) -> &[T] {
        &self.elems
    }

    /// Double the allocated size, keeping every live element
    fn grow(&mut self) {
        let old = self.elems.capacity();
        let new = old.max(1) * 2;
        self.elems.reserve_exact(new - self.elems.len());
        trace!("growing heap buffer from {} to {} slots", old, self.elems.capacity());
    }
}

impl<T: Weighted> HeapPQueue<T> {
    /// Consumes the queue, returning its elements in ascending weight order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.elems.len());
        while let Ok(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Removes every element, yielding them in ascending weight order
    ///
    /// Elements not consumed from the iterator stay in the queue.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, T> {
        DrainSorted { heap: self }
    }

    /// Returns true if every live slot is no lighter than its parent
    pub fn verify_heap_property(&self) -> bool {
        (1..self.elems.len())
            .all(|i| self.elems[parent(i)].weight() <= self.elems[i].weight())
    }

    /// Move element at index up while it is strictly lighter than its parent
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent(index);
            if self.elems[index].weight() < self.elems[parent].weight() {
                self.elems.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down until it is no heavier than its children
    ///
    /// Between two children of equal weight the right one is chosen.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.elems.len();
        loop {
            let left = 2 * (index + 1) - 1;
            let right = left + 1;

            if right < len {
                let child = if self.elems[left].weight() < self.elems[right].weight() {
                    left
                } else {
                    right
                };
                if self.elems[index].weight() > self.elems[child].weight() {
                    self.elems.swap(index, child);
                    index = child;
                } else {
                    break;
                }
            } else {
                // A lone left child is always a leaf.
                if left < len && self.elems[index].weight() > self.elems[left].weight() {
                    self.elems.swap(index, left);
                }
                break;
            }
        }
    }
}

/// Parent slot of a non-root slot
#[inline]
fn parent(index: usize) -> usize {
    (index + 1) / 2 - 1
}

impl<T: Weighted> Default for HeapPQueue<T> {
    fn default() -> Self {
        <Self as PriorityQueue<T>>::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for HeapPQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapPQueue")
            .field("len", &self.elems.len())
            .field("capacity", &self.elems.capacity())
            .field("elems", &self.elems)
            .finish()
    }
}

impl<T: Weighted> Extend<T> for HeapPQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Weighted> FromIterator<T> for HeapPQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::default();
        heap.extend(iter);
        heap
    }
}

/// Iterator returned by [`HeapPQueue::drain_sorted`]
pub struct DrainSorted<'a, T: Weighted> {
    heap: &'a mut HeapPQueue<T>,
}

impl<T: Weighted> Iterator for DrainSorted<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.heap.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<T: Weighted> ExactSizeIterator for DrainSorted<'_, T> {}

impl<T: Weighted> FusedIterator for DrainSorted<'_, T> {}
