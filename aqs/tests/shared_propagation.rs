//! Coverage for shared-mode acquisition and its propagation loop (spec §8
//! scenario: releasing one shared holder wakes a whole run of queued shared
//! waiters, not just the first).

use aqs::{CountDownLatch, Semaphore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn releasing_permits_propagates_through_a_run_of_shared_waiters() {
    let sem = Arc::new(Semaphore::new(0, false));
    let admitted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let sem = Arc::clone(&sem);
            let admitted = Arc::clone(&admitted);
            thread::spawn(move || {
                sem.acquire();
                admitted.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(30));
    assert_eq!(admitted.load(Ordering::SeqCst), 0);

    sem.release_permits(10);

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(admitted.load(Ordering::SeqCst), 10);
}

#[test]
fn latch_releases_every_awaiter_on_the_final_count_down() {
    let latch = Arc::new(CountDownLatch::new(5));
    let passed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let latch = Arc::clone(&latch);
            let passed = Arc::clone(&passed);
            thread::spawn(move || {
                latch.await_zero();
                passed.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for _ in 0..5 {
        thread::sleep(Duration::from_millis(10));
        latch.count_down();
    }

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(passed.load(Ordering::SeqCst), 12);
    assert_eq!(latch.count(), 0);
}

#[test]
fn semaphore_try_acquire_for_reports_timeout_under_exhaustion() {
    let sem = Semaphore::new(0, false);
    assert!(!sem.try_acquire_for(Duration::from_millis(30)).unwrap());
}
