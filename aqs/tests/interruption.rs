//! Coverage for interruption (spec §8 scenario 5, "interrupted condition
//! wait", plus the equivalent for a plain blocked exclusive acquire):
//! `aqs::interrupt` delivered to a thread parked inside `lock_interruptibly`
//! or `Condition::wait` must surface as `Err(AqsError::Interrupted)`, leave
//! no trace on the sync queue, and — for the condition case — leave the
//! interrupted thread still holding the lock it re-acquired on the way out.

use aqs::{AqsError, Condition, Lock, ReentrantLock};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn lock_interruptibly_surfaces_interrupted_and_clears_the_queue() {
    let lock = Arc::new(ReentrantLock::new());
    lock.lock();

    let (tx, rx) = mpsc::channel();
    let waiter = Arc::clone(&lock);
    let handle = thread::spawn(move || {
        tx.send(aqs::current_thread_id()).unwrap();
        waiter.lock_interruptibly()
    });

    let waiter_id = rx.recv().unwrap();
    // Give the waiter time to actually enqueue and park before interrupting.
    thread::sleep(Duration::from_millis(30));
    aqs::interrupt(waiter_id);

    let result = handle.join().unwrap();
    assert_eq!(result, Err(AqsError::Interrupted));

    lock.unlock();
    // A third thread must be able to acquire cleanly — nothing was left
    // behind on the queue by the cancelled waiter.
    let third = Arc::clone(&lock);
    thread::spawn(move || {
        third.lock();
        third.unlock();
    })
    .join()
    .unwrap();
}

#[test]
fn interrupting_a_condition_wait_reacquires_the_lock_before_reporting_interrupted() {
    let lock = ReentrantLock::new();
    let cond = lock.new_condition();
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        scope.spawn(|| {
            lock.lock();
            tx.send(aqs::current_thread_id()).unwrap();
            let result = cond.wait();
            assert_eq!(result, Err(AqsError::Interrupted));
            // Spec §8 scenario 5: the thread holds the lock on exit.
            assert!(lock.is_locked());
            lock.unlock();
        });

        let waiter_id = rx.recv().unwrap();
        thread::sleep(Duration::from_millis(30));
        aqs::interrupt(waiter_id);
    });

    // No node left on either queue behind the interrupted waiter.
    lock.lock();
    assert_eq!(cond.has_waiters(), Ok(false));
    lock.unlock();
}

/// A thread interrupted *before* it ever calls into `aqs` must still see
/// `Interrupted` at its next interruptible call (spec §8's "interruption
/// idempotence"), even though it never parked.
#[test]
fn pre_existing_interrupt_is_observed_at_the_next_interruptible_call() {
    let lock = ReentrantLock::new();
    lock.lock();
    let (tx, rx) = mpsc::channel::<()>();

    thread::scope(|scope| {
        scope.spawn(|| {
            let id = aqs::current_thread_id();
            aqs::interrupt(id);
            // Hand back control only after the self-interrupt is set, so
            // the assertion below doesn't race the flag being set.
            tx.send(()).unwrap();
            let result = lock.lock_interruptibly();
            assert_eq!(result, Err(AqsError::Interrupted));
        });
        rx.recv().unwrap();
    });

    lock.unlock();
}
