use crate::invariants::debug_assert_nonempty_read;
use crate::Ring;
use std::cell::Cell;
use std::error::Error;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Error returned by [`Producer::push`] when the ring is full.
///
/// The rejected value is handed back inside the error, so a failed push has
/// no side effects even for move-only payloads: nothing is copied, nothing is
/// dropped, the caller still owns the value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PushError<T> {
    /// The ring was full; the value could not be enqueued.
    Full(T),
}

// Debug is hand-written so the error carries no `T: Debug` bound.
impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.pad("Full(_)"),
        }
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("ring buffer is full")
    }
}

impl<T> Error for PushError<T> {}

/// Error returned by [`Consumer::pop`] when the ring is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopError {
    /// The ring held no value to take.
    Empty,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("ring buffer is empty")
    }
}

impl Error for PopError {}

/// Producer handle: the write half of a ring.
///
/// Exactly one exists per ring. Moving it to another thread moves the
/// producer role with it; the hot methods take `&mut self`, so two threads
/// can never push concurrently.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
    /// Producer's cached view of head (avoids cross-core reads).
    ///
    /// Only ever a stale, smaller-or-equal snapshot of the real head, so the
    /// fast path may report "full" spuriously (fixed by a refresh) but never
    /// "free" spuriously.
    cached_head: Cell<usize>,
}

// Note: Producer intentionally does NOT implement Clone. A second handle
// would allow two threads to write the same tail cursor, breaking the
// single-writer rule the whole protocol rests on.

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self {
            ring,
            cached_head: Cell::new(0),
        }
    }

    /// Attempts to enqueue `value` without blocking.
    ///
    /// Returns `Err(PushError::Full(value))` if the ring is full, handing the
    /// value back untouched. Never waits, sleeps, or spins; retry and backoff
    /// policy belongs entirely to the caller (a deadline loop,
    /// `crossbeam_utils::Backoff`, `thread::yield_now`, ...).
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        let tail = self.ring.load_tail(Ordering::Relaxed);
        let next_tail = self.ring.next_index(tail);

        // Fast path: the cached head already proves the slot is free.
        if next_tail == self.cached_head.get() {
            // Slow path: refresh the cache. The Acquire load pairs with the
            // consumer's Release store of head, so a freed slot is really
            // free before we overwrite it.
            let head = self.ring.load_head(Ordering::Acquire);
            self.cached_head.set(head);
            if next_tail == head {
                return Err(PushError::Full(value));
            }
        }

        // SAFETY: The ring is not full, `tail` is this producer's own
        // cursor, and nothing else touches the slot until the Release store
        // in publish_tail makes it visible.
        unsafe { self.ring.write_slot(tail, value) };
        self.ring.publish_tail(next_tail);
        Ok(())
    }

    /// Returns the logical capacity of the ring.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns the number of slots currently free for pushing (snapshot).
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.ring.capacity() - self.ring.len()
    }

    /// Returns true if the ring is full (snapshot).
    ///
    /// From the producer thread a `true` answer is authoritative until the
    /// consumer pops; from anywhere else it is only a hint.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns a reference to the shared ring, for its observers.
    #[inline]
    pub fn ring(&self) -> &Ring<T> {
        &self.ring
    }
}

/// Consumer handle: the read half of a ring.
///
/// Exactly one exists per ring; see [`Producer`] for the ownership rules.
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
    /// Consumer's cached view of tail (avoids cross-core reads).
    ///
    /// Only ever a stale, smaller-or-equal snapshot of the real tail, so the
    /// fast path may report "empty" spuriously (fixed by a refresh) but never
    /// claims a value that has not been published.
    cached_tail: Cell<usize>,
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self {
            ring,
            cached_tail: Cell::new(0),
        }
    }

    /// Attempts to dequeue the oldest value without blocking.
    ///
    /// Returns `Err(PopError::Empty)` if the ring is empty, with no side
    /// effects. On success the value is moved out of its slot, never copied;
    /// the slot is logically vacant again once the advanced head is
    /// published.
    #[inline]
    pub fn pop(&mut self) -> Result<T, PopError> {
        let head = self.ring.load_head(Ordering::Relaxed);

        // Fast path: the cached tail already proves a value is waiting.
        if head == self.cached_tail.get() {
            // Slow path: refresh the cache. The Acquire load pairs with the
            // producer's Release store of tail, so the slot's contents are
            // fully constructed before we read them.
            let tail = self.ring.load_tail(Ordering::Acquire);
            self.cached_tail.set(tail);
            if head == tail {
                return Err(PopError::Empty);
            }
        }
        debug_assert_nonempty_read!(head, self.cached_tail.get());

        // SAFETY: The ring is not empty, `head` is this consumer's own
        // cursor, and the value at head was published by the producer's
        // Release store of tail observed above.
        let value = unsafe { self.ring.read_slot(head) };
        self.ring.publish_head(self.ring.next_index(head));
        Ok(value)
    }

    /// Returns the logical capacity of the ring.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns the number of items currently in the ring (snapshot,
    /// wrap-aware).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns true if the ring is empty (snapshot).
    ///
    /// From the consumer thread a `true` answer is authoritative until the
    /// producer pushes; from anywhere else it is only a hint.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns a reference to the shared ring, for its observers.
    #[inline]
    pub fn ring(&self) -> &Ring<T> {
        &self.ring
    }
}
