use crossbeam_utils::Backoff;
use ringspsc_rs::{PopError, PushError, Ring};
use std::thread;
use std::time::Instant;

fn main() {
    println!("RingSPSC Demo");
    println!("=============\n");

    const CAPACITY: usize = 1024;
    const ITEMS: u64 = 10_000_000;

    println!("Configuration:");
    println!("  Ring capacity: {}", CAPACITY);
    println!("  Items: {}\n", ITEMS);

    let (mut tx, mut rx) = Ring::new(CAPACITY);

    let start = Instant::now();

    // Producer thread: push in order, back off while the ring is full.
    let producer = thread::spawn(move || {
        for i in 0..ITEMS {
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
        println!("Producer finished");
    });

    // Consumer thread: drain in order, back off while the ring is empty.
    let consumer = thread::spawn(move || {
        let mut sum = 0u64;
        let mut received = 0u64;
        let backoff = Backoff::new();

        while received < ITEMS {
            match rx.pop() {
                Ok(v) => {
                    sum += v;
                    received += 1;
                    backoff.reset();
                }
                Err(PopError::Empty) => backoff.snooze(),
            }
        }

        (received, sum)
    });

    producer.join().unwrap();
    let (received, sum) = consumer.join().unwrap();
    let duration = start.elapsed();

    println!("\nResults:");
    println!("  Items consumed: {}", received);
    println!("  Sum: {}", sum);
    println!("  Duration: {:.2?}", duration);
    println!(
        "  Throughput: {:.2} million items/sec",
        received as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}
