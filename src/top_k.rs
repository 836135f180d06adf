//! Streaming top-K selection
//!
//! Reduces a stream of any length to its `k` heaviest elements using a min-heap
//! of at most `k + 1` elements. Each element is pushed, and whenever the heap
//! holds more than `k` the lightest is evicted. At the end of the stream the
//! heap is drained lightest-first and reversed, so results come out heaviest
//! first.
//!
//! # Time Complexity
//!
//! O(n log k) for a stream of `n` elements, with O(k) retained storage.
//!
//! # Example
//!
//! ```rust
//! use rust_heap_topk::{top_k, Record};
//!
//! let stream = [1.0, 1.0, 2.0, 5.0].into_iter().map(Record::unnamed);
//! let best = top_k(stream, 2).unwrap();
//! assert_eq!(best, [Record::unnamed(5.0), Record::unnamed(2.0)]);
//!
//! assert!(top_k(std::iter::empty::<Record>(), -2).is_err());
//! ```

use std::error::Error as StdError;
use std::io::BufRead;
use std::marker::PhantomData;

use log::debug;
use thiserror::Error;

use crate::codec::{CodecError, RecordReader};
use crate::config::{Config, StreamConfig};
use crate::heap_pqueue::HeapPQueue;
use crate::record::Record;
use crate::traits::{PriorityQueue, Weighted};

/// Upper bound on slots reserved up front; larger `k` grows on demand
const MAX_PREALLOCATED: usize = 4096;

/// Errors returned by the top-K entry points
#[derive(Debug, Error)]
pub enum TopKError {
    /// The requested count was negative
    #[error("invalid argument: k must be non-negative, got {0}")]
    NegativeCount(i64),
    /// The record stream could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A fallible source yielded an error
    #[error("record source failed: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// Accumulates the `k` heaviest elements pushed into it
///
/// The backing queue defaults to [`HeapPQueue`], but any [`PriorityQueue`]
/// works.
#[derive(Debug)]
pub struct TopK<T: Weighted, H: PriorityQueue<T> = HeapPQueue<T>> {
    heap: H,
    k: usize,
    seen: usize,
    _phantom: PhantomData<T>,
}

impl<T: Weighted> TopK<T> {
    /// Creates an accumulator keeping at most `k` elements
    pub fn new(k: usize) -> Self {
        Self::with_heap(
            HeapPQueue::with_capacity(k.saturating_add(1).min(MAX_PREALLOCATED)),
            k,
        )
    }

    /// Creates an accumulator whose heap is sized from configuration
    pub fn from_config(k: usize, config: &Config) -> Self {
        Self::with_heap(HeapPQueue::from_config(&config.heap), k)
    }
}

impl<T: Weighted, H: PriorityQueue<T>> TopK<T, H> {
    /// Creates an accumulator over an existing (normally empty) queue
    ///
    /// Elements already in `heap` count as candidates.
    pub fn with_heap(heap: H, k: usize) -> Self {
        let mut top = Self {
            heap,
            k,
            seen: 0,
            _phantom: PhantomData,
        };
        top.evict_excess();
        top
    }

    /// Offer an element
    ///
    /// If more than `k` elements are now held, the lightest is dropped.
    pub fn push(&mut self, item: T) {
        self.seen += 1;
        self.heap.push(item);
        self.evict_excess();
    }

    fn evict_excess(&mut self) {
        while self.heap.len() > self.k {
            if self.heap.pop().is_err() {
                break;
            }
        }
    }

    /// The requested count
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of elements currently retained, at most `k`
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is retained
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total number of elements offered so far
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// The lightest retained element, if any
    ///
    /// Once `k` elements are held, anything lighter than this is evicted
    /// immediately.
    pub fn threshold(&self) -> Option<&T> {
        self.heap.peek().ok()
    }

    /// Consumes the accumulator, returning the retained elements heaviest first
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Ok(item) = self.heap.pop() {
            out.push(item);
        }
        out.reverse();
        debug!(
            "selected {} of {} elements (k = {})",
            out.len(),
            self.seen,
            self.k
        );
        out
    }
}

impl<T: Weighted, H: PriorityQueue<T>> Extend<T> for TopK<T, H> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Validate a signed count before any work is done
fn checked_count(k: i64) -> Result<usize, TopKError> {
    if k < 0 {
        return Err(TopKError::NegativeCount(k));
    }
    Ok(usize::try_from(k).unwrap_or(usize::MAX))
}

/// Returns the `k` heaviest elements of `items`, heaviest first
///
/// `items` is consumed one element at a time and never collected.
///
/// # Errors
/// Returns [`TopKError::NegativeCount`] if `k < 0`, without touching `items`.
pub fn top_k<T, I>(items: I, k: i64) -> Result<Vec<T>, TopKError>
where
    T: Weighted,
    I: IntoIterator<Item = T>,
{
    let mut top = TopK::new(checked_count(k)?);
    top.extend(items);
    Ok(top.into_sorted_vec())
}

/// Like [`top_k`], for a source whose elements may fail
///
/// Stops at the first `Err` and returns it.
pub fn try_top_k<T, E, I>(items: I, k: i64) -> Result<Vec<T>, TopKError>
where
    T: Weighted,
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut top = TopK::new(checked_count(k)?);
    for item in items {
        top.push(item.map_err(|e| TopKError::Source(e.into()))?);
    }
    Ok(top.into_sorted_vec())
}

/// Decodes records from `reader` and returns the `k` heaviest, heaviest first
///
/// # Errors
/// Returns [`TopKError::NegativeCount`] before reading anything if `k < 0`,
/// and [`TopKError::Codec`] for the first line that cannot be decoded.
pub fn top_k_from_reader<R: BufRead>(
    reader: R,
    k: i64,
    config: &StreamConfig,
) -> Result<Vec<Record>, TopKError> {
    let mut top = TopK::new(checked_count(k)?);
    for record in RecordReader::new(reader, config.format) {
        top.push(record?);
    }
    Ok(top.into_sorted_vec())
}
