//! RingSPSC - Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A fixed-capacity ring buffer that hands typed values between exactly two
//! threads without locks or blocking syscalls. One slot of the backing store
//! is kept permanently unusable, so `head == tail` means empty and
//! `(tail + 1) mod slots == head` means full with no auxiliary counter.
//!
//! # Key Features
//!
//! - Cache-line padded cursors (false sharing elimination)
//! - Handle-local cursor caches (cross-core reads only on the slow path)
//! - Minimal acquire/release ordering on the two cursors
//! - In-place construction and destructive move-out, so move-only payload
//!   types work and a failed push hands the value back
//!
//! `push` and `pop` never wait, sleep, or spin; retry and backoff policy
//! belongs to the caller (`crossbeam_utils::Backoff` works well).
//!
//! # Example
//!
//! ```
//! use ringspsc_rs::{PopError, PushError, Ring};
//!
//! let (mut producer, mut consumer) = Ring::new(2);
//!
//! assert_eq!(producer.push(10), Ok(()));
//! assert_eq!(producer.push(20), Ok(()));
//! assert_eq!(producer.push(30), Err(PushError::Full(30)));
//!
//! std::thread::spawn(move || {
//!     assert_eq!(consumer.pop(), Ok(10));
//!     assert_eq!(consumer.pop(), Ok(20));
//!     assert_eq!(consumer.pop(), Err(PopError::Empty));
//! })
//! .join()
//! .unwrap();
//! ```

mod channel;
mod invariants;
mod ring;

pub use channel::{Consumer, PopError, Producer, PushError};
pub use ring::Ring;
