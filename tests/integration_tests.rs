use ringspsc_rs::{PopError, PushError, Ring};
use std::thread;

#[test]
fn test_basic_push_pop() {
    let (mut tx, mut rx) = Ring::new(4);

    assert!(rx.is_empty());
    assert!(!tx.is_full());

    assert!(tx.push(1).is_ok());
    assert!(tx.push(2).is_ok());
    assert!(tx.push(3).is_ok());

    assert_eq!(rx.pop(), Ok(1));

    assert!(tx.push(4).is_ok());

    assert_eq!(rx.pop(), Ok(2));
    assert_eq!(rx.pop(), Ok(3));
    assert_eq!(rx.pop(), Ok(4));

    assert!(rx.is_empty());
}

#[test]
fn test_capacity_is_exact() {
    // N pushes succeed, the N+1th fails, pop-then-push reclaims the slot.
    for capacity in [1usize, 2, 3, 7, 64] {
        let (mut tx, mut rx) = Ring::new(capacity);

        for i in 0..capacity {
            assert!(
                tx.push(i).is_ok(),
                "push {} of {} failed below capacity",
                i,
                capacity
            );
        }
        assert_eq!(tx.push(capacity), Err(PushError::Full(capacity)));
        assert!(tx.is_full());

        assert_eq!(rx.pop(), Ok(0));
        assert!(tx.push(capacity).is_ok(), "slot was not reclaimed");
        assert!(tx.is_full());
    }
}

#[test]
fn test_fifo_ordering_across_wraparound() {
    // Capacity far below the item count forces the cursors to wrap many
    // times; order must survive every wrap.
    let (mut tx, mut rx) = Ring::new(7);

    const N: u64 = 10_000;
    let mut expected = 0;
    let mut sent = 0;

    while expected < N {
        while sent < N {
            if tx.push(sent).is_err() {
                break;
            }
            sent += 1;
        }
        while let Ok(v) = rx.pop() {
            assert_eq!(v, expected, "FIFO violation after wraparound");
            expected += 1;
        }
    }

    assert_eq!(rx.pop(), Err(PopError::Empty));
}

#[test]
fn test_len_is_wrap_aware() {
    // Capacity 3: push 3, pop 2, push 2. The tail has wrapped past the head;
    // a naive tail - head would be wrong here.
    let (mut tx, mut rx) = Ring::new(3);

    for i in 0..3 {
        tx.push(i).unwrap();
    }
    assert_eq!(rx.len(), 3);

    assert_eq!(rx.pop(), Ok(0));
    assert_eq!(rx.pop(), Ok(1));
    assert_eq!(rx.len(), 1);

    tx.push(3).unwrap();
    tx.push(4).unwrap();
    assert_eq!(rx.len(), 3);
    assert!(tx.is_full());

    assert_eq!(rx.pop(), Ok(2));
    assert_eq!(rx.pop(), Ok(3));
    assert_eq!(rx.pop(), Ok(4));
    assert_eq!(rx.len(), 0);
}

#[test]
fn test_zero_capacity_ring() {
    // A valid degenerate configuration, not an error: the ring is empty and
    // full at the same time, forever.
    let (mut tx, mut rx) = Ring::<u32>::new(0);

    assert!(rx.is_empty());
    assert!(tx.is_full());
    assert_eq!(tx.capacity(), 0);

    assert_eq!(tx.push(1), Err(PushError::Full(1)));
    assert_eq!(rx.pop(), Err(PopError::Empty));

    // Still a stable state after failed operations.
    assert!(rx.is_empty());
    assert!(tx.is_full());
}

#[test]
fn test_move_only_round_trip() {
    let (mut tx, mut rx) = Ring::new(4);

    let value = Box::new(99u64);
    assert!(tx.push(value).is_ok());

    let out = rx.pop().expect("value was pushed");
    assert_eq!(*out, 99);

    // A failed push must hand the move-only value back untouched.
    for i in 0..4 {
        tx.push(Box::new(i)).unwrap();
    }
    match tx.push(Box::new(42u64)) {
        Err(PushError::Full(rejected)) => assert_eq!(*rejected, 42),
        Ok(()) => panic!("push into a full ring succeeded"),
    }
}

#[test]
fn test_every_value_dropped_exactly_once() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Tracked {
        counter: Arc<AtomicUsize>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    let drops = Arc::new(AtomicUsize::new(0));
    const CONSTRUCTED: usize = 10;

    {
        let (mut tx, mut rx) = Ring::new(8);

        for _ in 0..CONSTRUCTED {
            assert!(tx
                .push(Tracked {
                    counter: Arc::clone(&drops),
                })
                .is_ok());
        }

        // Consume four; six stay in the ring until it drops.
        for _ in 0..4 {
            drop(rx.pop().unwrap());
        }
        assert_eq!(drops.load(Ordering::SeqCst), 4);
    }

    assert_eq!(
        drops.load(Ordering::SeqCst),
        CONSTRUCTED,
        "destruction count must equal construction count"
    );
}

#[test]
fn test_concurrent_stress_exact_order() {
    // One producer pushes 0..1_000_000 in order, one consumer drains into a
    // Vec; the release/acquire handoff must deliver every value exactly once
    // and in order under real cross-core contention.
    const N: u64 = 1_000_000;

    let (mut tx, mut rx) = Ring::new(1024);

    let producer = thread::spawn(move || {
        for i in 0..N {
            let mut value = i;
            loop {
                match tx.push(value) {
                    Ok(()) => break,
                    Err(PushError::Full(rejected)) => {
                        value = rejected;
                        thread::yield_now();
                    }
                }
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut consumed = Vec::with_capacity(N as usize);
        while consumed.len() < N as usize {
            match rx.pop() {
                Ok(v) => consumed.push(v),
                Err(PopError::Empty) => thread::yield_now(),
            }
        }
        consumed
    });

    producer.join().unwrap();
    let consumed = consumer.join().unwrap();

    assert_eq!(consumed.len(), N as usize);
    for (i, &v) in consumed.iter().enumerate() {
        assert_eq!(v, i as u64, "mismatch at index {}", i);
    }
}

#[test]
fn test_concurrent_stress_move_only() {
    // Same handoff with a heap payload: ownership transfers exactly once per
    // item and nothing is leaked or double-freed.
    const N: u64 = 100_000;

    let (mut tx, mut rx) = Ring::new(256);

    let producer = thread::spawn(move || {
        for i in 0..N {
            let mut value = Box::new(i);
            loop {
                match tx.push(value) {
                    Ok(()) => break,
                    Err(PushError::Full(rejected)) => {
                        value = rejected;
                        thread::yield_now();
                    }
                }
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut next = 0u64;
        while next < N {
            match rx.pop() {
                Ok(v) => {
                    assert_eq!(*v, next);
                    next += 1;
                }
                Err(PopError::Empty) => thread::yield_now(),
            }
        }
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

#[test]
fn test_backoff_retry_loop() {
    // The ring itself never waits; callers bring their own retry policy.
    // This exercises the crossbeam Backoff pattern the docs recommend.
    use crossbeam_utils::Backoff;

    const N: u64 = 10_000;
    let (mut tx, mut rx) = Ring::new(16);

    let producer = thread::spawn(move || {
        for i in 0..N {
            let mut value = i;
            let backoff = Backoff::new();
            loop {
                match tx.push(value) {
                    Ok(()) => break,
                    Err(PushError::Full(rejected)) => {
                        value = rejected;
                        backoff.snooze();
                    }
                }
            }
        }
    });

    let mut sum = 0u64;
    let mut received = 0u64;
    let backoff = Backoff::new();
    while received < N {
        match rx.pop() {
            Ok(v) => {
                sum += v;
                received += 1;
                backoff.reset();
            }
            Err(PopError::Empty) => backoff.snooze(),
        }
    }

    producer.join().unwrap();
    assert_eq!(sum, (0..N).sum::<u64>());
}
