//! Debug assertion macros for ring buffer invariants.
//!
//! These macros provide runtime checks for the cursor protocol. They are only
//! active in debug builds (`#[cfg(debug_assertions)]` via `debug_assert!`),
//! so there is zero overhead in release builds.

// =============================================================================
// Cursor Bounds
// =============================================================================

/// Assert that a cursor stays inside the slot array.
///
/// **Invariant**: `0 <= cursor < n_slots`
///
/// Used in: `publish_tail()` / `publish_head()` before the store
macro_rules! debug_assert_cursor_in_bounds {
    ($name:literal, $idx:expr, $n_slots:expr) => {
        debug_assert!(
            $idx < $n_slots,
            "cursor out of bounds: {} = {} with {} slots",
            $name,
            $idx,
            $n_slots
        )
    };
}

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that the element count never exceeds the logical capacity.
///
/// **Invariant**: `(tail - head + n_slots) mod n_slots <= capacity`
///
/// The sentinel slot makes a count of `n_slots` unreachable; seeing one means
/// a cursor was published past the other.
///
/// Used in: `publish_tail()` / `publish_head()` after the store
macro_rules! debug_assert_bounded_len {
    ($len:expr, $capacity:expr) => {
        debug_assert!(
            $len <= $capacity,
            "element count {} exceeds capacity {}",
            $len,
            $capacity
        )
    };
}

// =============================================================================
// Non-Empty Read
// =============================================================================

/// Assert that the consumer only moves a value out when the ring is
/// observably non-empty.
///
/// **Invariant**: a slot is read only while `head != tail`
///
/// Used in: `Consumer::pop()` before `read_slot()`
macro_rules! debug_assert_nonempty_read {
    ($head:expr, $tail:expr) => {
        debug_assert!(
            $head != $tail,
            "reading slot {} from an empty ring",
            $head
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_bounded_len;
pub(crate) use debug_assert_cursor_in_bounds;
pub(crate) use debug_assert_nonempty_read;
