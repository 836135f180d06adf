//! Common traits for the priority queue and its consumers
//!
//! This module provides the two seams the rest of the crate is written against:
//!
//! - [`Weighted`]: exposes the ordering key of an element. Elements are only
//!   ever compared through their weight, never through the whole value.
//! - [`PriorityQueue`]: a min-priority queue over [`Weighted`] elements.
//!
//! Accessing the minimum of an empty queue is a contract violation and is
//! reported as a [`HeapError`] rather than a placeholder value.

use thiserror::Error;

/// Error type for priority queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `peek` or `pop` was called while the queue held no elements
    #[error("{operation} called on an empty priority queue")]
    Empty {
        /// The operation that was attempted
        operation: &'static str,
    },
}

/// An element with a totally ordered weight
///
/// Two elements with equal weight are interchangeable as far as a
/// [`PriorityQueue`] is concerned; the relative order in which they come out
/// is not specified.
///
/// Tuples `(priority, item)` are weighted by their first field, which gives
/// the `(P, T)` pair style used by most heap APIs:
///
/// ```rust
/// use rust_heap_topk::{HeapPQueue, PriorityQueue};
///
/// let mut heap = HeapPQueue::new();
/// heap.push((3, "three"));
/// heap.push((1, "one"));
/// assert_eq!(heap.peek(), Ok(&(1, "one")));
/// ```
pub trait Weighted {
    /// The ordering key
    type Weight: Ord;

    /// Returns the weight used to order this element
    fn weight(&self) -> &Self::Weight;
}

impl<P: Ord, T> Weighted for (P, T) {
    type Weight = P;

    fn weight(&self) -> &P {
        &self.0
    }
}

/// Base trait for min-priority queues
///
/// - `push` inserts an element
/// - `pop` removes and returns the element of minimum weight
/// - `peek` returns the element of minimum weight without removing it
///
/// # Example
///
/// ```rust
/// use rust_heap_topk::{HeapPQueue, PriorityQueue, Record};
///
/// let mut heap = HeapPQueue::new();
/// heap.push(Record::new("b", 2.0));
/// heap.push(Record::new("a", 1.0));
///
/// assert_eq!(heap.peek().map(Record::name), Ok("a"));
/// assert_eq!(heap.pop().map(|r| r.weight()), Ok(1.0));
/// assert_eq!(heap.len(), 1);
/// ```
pub trait PriorityQueue<T: Weighted> {
    /// Creates a new empty queue
    fn new() -> Self;

    /// Returns true if the queue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements in the queue
    fn len(&self) -> usize;

    /// Inserts an element
    ///
    /// # Time Complexity
    /// O(log n) worst case, plus an occasional O(n) buffer growth for
    /// array-backed queues.
    fn push(&mut self, item: T);

    /// Returns the element of minimum weight without removing it
    ///
    /// # Errors
    /// Returns [`HeapError::Empty`] if the queue is empty.
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Result<&T, HeapError>;

    /// Removes and returns the element of minimum weight
    ///
    /// # Errors
    /// Returns [`HeapError::Empty`] if the queue is empty. The queue is left
    /// unchanged in that case.
    ///
    /// # Time Complexity
    /// O(log n)
    fn pop(&mut self) -> Result<T, HeapError>;
}
