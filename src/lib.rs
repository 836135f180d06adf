//! Binary Heap Priority Queue and Streaming Top-K Selection
//!
//! This crate provides an array-backed binary min-heap and a top-K selector
//! built on top of it.
//!
//! # Features
//!
//! - **HeapPQueue**: O(log n) push and pop, O(1) peek; the buffer doubles when
//!   full and never shrinks
//! - **TopK**: reduces a stream of any length to its `k` heaviest elements in
//!   O(n log k) time and O(k) space, heaviest first
//! - **Record streams**: lazy text / JSON-lines decoding of `(name, weight)`
//!   records, fed straight into the selector
//!
//! Accessing the minimum of an empty queue and asking for a negative number of
//! elements are both reported as errors, never as placeholder values.
//!
//! # Example
//!
//! ```rust
//! use rust_heap_topk::{top_k, HeapPQueue, PriorityQueue, Record};
//!
//! let mut heap = HeapPQueue::new();
//! heap.push(Record::new("A", 4.0));
//! heap.push(Record::new("F", 2.0));
//! assert_eq!(heap.peek().map(Record::name), Ok("F"));
//!
//! let records = vec![Record::new("x", 1.0), Record::new("y", 3.0), Record::new("z", 2.0)];
//! let best = top_k(records, 2).unwrap();
//! assert_eq!(best[0].name(), "y");
//! assert_eq!(best[1].name(), "z");
//! ```

pub mod codec;
pub mod config;
pub mod heap_pqueue;
pub mod record;
pub mod top_k;
pub mod traits;

// Re-export the main types for convenience
pub use heap_pqueue::HeapPQueue;
pub use record::Record;
pub use top_k::{top_k, try_top_k, TopK, TopKError};
pub use traits::{HeapError, PriorityQueue, Weighted};
