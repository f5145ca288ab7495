use crate::channel::{Consumer, Producer};
use crate::invariants::{debug_assert_bounded_len, debug_assert_cursor_in_bounds};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// This SPSC ring buffer uses a classic producer-consumer protocol with the
// following synchronization guarantees:
//
// ## Wrapped Indices + Sentinel Slot (full/empty disambiguation)
//
// `head` and `tail` are indices into the slot array, always in `[0, N)` where
// N = logical capacity + 1. One slot is kept permanently unusable:
// - `head == tail`              => empty
// - `(tail + 1) mod N == head`  => full
// No auxiliary element counter is needed, so full/empty detection costs the
// same two cursor reads as every other operation.
//
// ## Memory Ordering Protocol
//
// **Producer (write path, `Producer::push`):**
// 1. Load `tail` with Relaxed (only the producer writes tail)
// 2. Check the producer-local cached head (Cell, single-writer)
// 3. If the cache says full: reload `head` with Acquire (synchronizes with
//    the consumer's Release store, so the slot it freed is really free)
// 4. Write the value into `slots[tail]` (plain non-atomic access)
// 5. Store `tail` with Release (publishes the write to the consumer)
//
// **Consumer (read path, `Consumer::pop`):**
// 1. Load `head` with Relaxed (only the consumer writes head)
// 2. Check the consumer-local cached tail (Cell, single-writer)
// 3. If the cache says empty: reload `tail` with Acquire (synchronizes with
//    the producer's Release store, so the slot it filled is fully written)
// 4. Move the value out of `slots[head]` (plain non-atomic access)
// 5. Store `head` with Release (publishes consumption to the producer)
//
// The producer's Release store of `tail` happens-after its slot write, and
// the consumer's Acquire load of `tail` happens-before its slot read, so the
// consumer never observes a partially constructed value. Symmetrically the
// consumer's Release store of `head` happens-after the move-out, so the
// producer never reuses a slot mid-read. SeqCst everywhere would also be
// correct but is strictly stronger than this protocol needs; acquire/release
// on the two cursors is the minimal correct ordering.
//
// ## Single-Writer Invariants
//
// - `tail`: written only by the producer, read by the consumer
// - `head`: written only by the consumer, read by the producer
// - `slots[i]`: touched by at most one thread at any instant (the owner of
//   whichever cursor currently covers the slot)
//
// These invariants are enforced at the type level: `Ring::new` hands out
// exactly one `Producer` and one `Consumer`, neither is `Clone`, and the hot
// methods take `&mut self`.
//
// =============================================================================

/// One storage cell of the ring.
///
/// Holds at most one live `T` at a time. The producer constructs the value in
/// place; the consumer moves it out, after which the cell is logically empty
/// again. No default-initialization ever happens, so `T` needs neither
/// `Default` nor `Clone`.
pub(crate) struct Slot<T> {
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn vacant() -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Bounded lock-free SPSC ring buffer - the core building block.
///
/// Owns the slot storage and the two cursors for its entire lifetime. The two
/// role handles share it behind an `Arc`, which fixes its address for as long
/// as either thread may touch it. Optimized with:
/// - cache-line padded cursors to prevent false sharing
/// - handle-local cursor caches to minimize cross-core traffic
/// - a sentinel slot so full/empty detection needs no extra counter
pub struct Ring<T> {
    /// Tail index (written by producer, read by consumer)
    tail: CachePadded<AtomicUsize>,
    /// Head index (written by consumer, read by producer)
    head: CachePadded<AtomicUsize>,
    /// The slot storage: logical capacity + 1 cells, one permanently unused.
    ///
    /// Uses `Box<[Slot<T>]>` instead of `Vec<Slot<T>>` because:
    /// - the slot count is fixed at construction (never grows/shrinks)
    /// - each cell is individually `UnsafeCell`-wrapped, so producer and
    ///   consumer can touch disjoint slots without aliasing a whole-buffer
    ///   mutable reference
    slots: Box<[Slot<T>]>,
}

// Safety: Ring is Send + Sync as long as T is Send. Slot access is guarded by
// the cursor publish/observe protocol documented above, and each value is
// handed from producer to consumer exactly once.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T> Ring<T> {
    /// Creates a ring with room for `capacity` elements and splits it into
    /// its two role handles.
    ///
    /// The backing store holds `capacity + 1` slots; the extra slot is the
    /// price of exact full/empty detection without an element counter.
    ///
    /// `capacity == 0` is a valid degenerate configuration: the ring is
    /// simultaneously empty and full forever, every push and every pop fails.
    ///
    /// # Panics
    ///
    /// Panics if `capacity + 1` overflows `usize` or the allocation fails.
    pub fn new(capacity: usize) -> (Producer<T>, Consumer<T>) {
        let ring = Arc::new(Self::with_capacity(capacity));
        let producer = Producer::new(Arc::clone(&ring));
        let consumer = Consumer::new(ring);
        (producer, consumer)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity < usize::MAX, "capacity overflows the slot count");
        let n_slots = capacity + 1;

        // Fixed-size slot array as a boxed slice; each cell starts vacant.
        let mut slots = Vec::with_capacity(n_slots);
        slots.resize_with(n_slots, Slot::vacant);
        let slots = slots.into_boxed_slice();

        Self {
            tail: CachePadded::new(AtomicUsize::new(0)),
            head: CachePadded::new(AtomicUsize::new(0)),
            slots,
        }
    }

    // ---------------------------------------------------------------------
    // CURSOR ARITHMETIC
    // ---------------------------------------------------------------------

    /// Number of slots in the backing store (logical capacity + 1).
    #[inline]
    pub(crate) fn n_slots(&self) -> usize {
        self.slots.len()
    }

    /// Advances an index by one, wrapping at the slot count.
    ///
    /// The slot count is not a power of two, so this is a compare instead of
    /// a mask; the branch is perfectly predictable on the hot path.
    #[inline]
    pub(crate) fn next_index(&self, idx: usize) -> usize {
        let next = idx + 1;
        if next == self.n_slots() {
            0
        } else {
            next
        }
    }

    // ---------------------------------------------------------------------
    // OBSERVERS
    // ---------------------------------------------------------------------
    //
    // Observers read both cursors with Relaxed loads: they are racy snapshots
    // by contract. Called from the owning producer or consumer thread they
    // are conservative in the safe direction; a third thread gets no
    // freshness guarantee at all.

    /// Returns the logical capacity (the constructor argument), never the
    /// raw slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.n_slots() - 1
    }

    /// Returns the current number of items in the ring.
    ///
    /// Wrap-aware: `(tail - head + n_slots) mod n_slots`. The naive
    /// `tail - head` is wrong as soon as the cursors have wrapped.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        (tail + self.n_slots() - head) % self.n_slots()
    }

    /// Returns true if the ring is empty (`head == tail`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Relaxed) == self.tail.load(Ordering::Relaxed)
    }

    /// Returns true if the ring is full (`(tail + 1) mod n_slots == head`).
    #[inline]
    pub fn is_full(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        self.next_index(tail) == head
    }

    // ---------------------------------------------------------------------
    // CURSOR ACCESS (crate-internal, used by the role handles)
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn load_tail(&self, order: Ordering) -> usize {
        self.tail.load(order)
    }

    #[inline]
    pub(crate) fn load_head(&self, order: Ordering) -> usize {
        self.head.load(order)
    }

    /// Publishes an advanced tail. Producer only.
    #[inline]
    pub(crate) fn publish_tail(&self, new_tail: usize) {
        debug_assert_cursor_in_bounds!("tail", new_tail, self.n_slots());
        self.tail.store(new_tail, Ordering::Release);
        debug_assert_bounded_len!(self.len(), self.capacity());
    }

    /// Publishes an advanced head. Consumer only.
    #[inline]
    pub(crate) fn publish_head(&self, new_head: usize) {
        debug_assert_cursor_in_bounds!("head", new_head, self.n_slots());
        self.head.store(new_head, Ordering::Release);
        debug_assert_bounded_len!(self.len(), self.capacity());
    }

    // ---------------------------------------------------------------------
    // SLOT ACCESS (crate-internal, used by the role handles)
    // ---------------------------------------------------------------------

    /// Constructs `value` in place in the slot at `idx`.
    ///
    /// # Safety
    ///
    /// Caller must be the producer, `idx` must be the current tail, and the
    /// ring must not be full: the slot is then outside the live range
    /// `[head, tail)` and no other thread touches it until the matching
    /// `publish_tail`.
    #[inline]
    pub(crate) unsafe fn write_slot(&self, idx: usize, value: T) {
        (*self.slots[idx].value.get()).write(value);
    }

    /// Moves the value out of the slot at `idx`, leaving the cell vacant.
    ///
    /// # Safety
    ///
    /// Caller must be the consumer, `idx` must be the current head, and the
    /// ring must not be empty: the slot then holds a fully constructed value
    /// published by the producer's Release store of `tail`, and no other
    /// thread touches it until the matching `publish_head`.
    #[inline]
    pub(crate) unsafe fn read_slot(&self, idx: usize) -> T {
        (*self.slots[idx].value.get()).assume_init_read()
    }
}

impl<T> Drop for Ring<T> {
    fn drop(&mut self) {
        // Both handles are gone, so no concurrent access: destroy exactly the
        // values still in the live range [head, tail).
        let mut head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);

        while head != tail {
            unsafe {
                ptr::drop_in_place((*self.slots[head].value.get()).as_mut_ptr());
            }
            head = self.next_index(head);
        }
    }
}
