// tests/run_gate.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use storyboard::pipeline::RunGate;

#[test]
fn only_one_permit_at_a_time() {
    let gate = RunGate::new();
    assert!(!gate.is_busy());

    let permit = gate.try_acquire().expect("first acquire succeeds");
    assert!(gate.is_busy());
    assert!(gate.try_acquire().is_none());

    drop(permit);
    assert!(!gate.is_busy());
    assert!(gate.try_acquire().is_some());
}

#[test]
fn clones_share_the_slot() {
    let gate = RunGate::new();
    let other = gate.clone();

    let _permit = gate.try_acquire().unwrap();
    assert!(other.is_busy());
    assert!(other.try_acquire().is_none());
}

#[test]
fn permit_released_when_holder_panics() {
    let gate = RunGate::new();
    let g = gate.clone();

    let joined = std::thread::spawn(move || {
        let _permit = g.try_acquire().unwrap();
        panic!("run blew up");
    })
    .join();

    assert!(joined.is_err());
    assert!(!gate.is_busy());
}

#[test]
fn racing_threads_admit_exactly_one() {
    let gate = RunGate::new();
    let winners = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(std::sync::Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = gate.clone();
            let winners = winners.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                if let Some(permit) = gate.try_acquire() {
                    winners.fetch_add(1, Ordering::SeqCst);
                    // Hold until every contender has tried.
                    std::thread::sleep(std::time::Duration::from_millis(50));
                    drop(permit);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(winners.load(Ordering::SeqCst), 1);
}
