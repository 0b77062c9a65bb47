// Copyright (c) 2025 vivo Mobile Communication Co., Ltd.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! The worked `ReentrantLock` example (spec §4.3), ported from
//! `decaf::util::concurrent::locks::ReentrantLock`'s nested `Sync`/
//! `FairSync`/`NonfairSync` and from the hold-count/owner bookkeeping in
//! `kernel/src/sync/mutex.rs`'s `Mutex` (nesting count, `UnsafeCell<Option<..>>`
//! owner slot guarded by the same atomic state that protects the lock).

use crate::condition::ConditionQueue;
use crate::sync_state::AbstractQueuedSynchronizer;
use crate::traits::{Lock, Synchronizer};
use crate::AqsError;
use std::cell::Cell;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// `None` is encoded as `-1`; real thread ids never take negative values.
struct OwnerSlot(AtomicI64);

impl OwnerSlot {
    const EMPTY: i64 = -1;

    fn new() -> Self {
        Self(AtomicI64::new(Self::EMPTY))
    }

    fn get(&self) -> Option<i64> {
        let v = self.0.load(Ordering::Acquire);
        (v != Self::EMPTY).then_some(v)
    }

    fn set(&self, id: Option<i64>) {
        self.0.store(id.unwrap_or(Self::EMPTY), Ordering::Release);
    }
}

thread_local! {
    static THREAD_SLOT_ID: Cell<i64> = const { Cell::new(-1) };
}
static NEXT_SLOT_ID: AtomicI64 = AtomicI64::new(0);

/// A dense integer standing in for `park::ThreadId` for the owner slot's
/// atomic storage (`park::ThreadId` wraps `std::thread::ThreadId`, which
/// has no total order or niche to store atomically).
fn slot_id() -> i64 {
    THREAD_SLOT_ID.with(|c| {
        let v = c.get();
        if v >= 0 {
            return v;
        }
        let fresh = NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed);
        c.set(fresh);
        fresh
    })
}

/// A reentrant mutual-exclusion lock. Like `java.util.concurrent.locks.
/// ReentrantLock`, `fair` picks between barging (a just-unblocked thread may
/// race a freshly arriving one for the lock) and strict FIFO ordering.
pub struct ReentrantLock {
    aqs: AbstractQueuedSynchronizer,
    fair: bool,
    owner: OwnerSlot,
    hold_count: Cell<i32>,
}

// SAFETY: `hold_count`/`owner` are only ever mutated by the thread that
// currently holds the lock exclusively, mirroring `is_held_exclusively`'s
// own guarantee; `Cell` is not `Sync` by default so this must be asserted.
unsafe impl Sync for ReentrantLock {}

impl ReentrantLock {
    pub fn new() -> Self {
        Self::with_fairness(false)
    }

    pub fn with_fairness(fair: bool) -> Self {
        Self {
            aqs: AbstractQueuedSynchronizer::new(),
            fair,
            owner: OwnerSlot::new(),
            hold_count: Cell::new(0),
        }
    }

    pub fn is_fair(&self) -> bool {
        self.fair
    }

    pub fn hold_count(&self) -> i32 {
        if self.is_held_exclusively() {
            self.hold_count.get()
        } else {
            0
        }
    }

    pub fn is_locked(&self) -> bool {
        self.aqs.state() != 0
    }

    fn try_acquire_nonfair(&self, arg: i32) -> bool {
        let current = slot_id();
        let state = self.aqs.state();
        if state == 0 {
            if self.aqs.compare_and_set_state(0, arg) {
                self.owner.set(Some(current));
                self.hold_count.set(arg);
                return true;
            }
        } else if self.owner.get() == Some(current) {
            let next = state + arg;
            self.hold_count.set(next);
            self.aqs.set_state(next);
            return true;
        }
        false
    }
}

impl Default for ReentrantLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Synchronizer for ReentrantLock {
    fn aqs(&self) -> &AbstractQueuedSynchronizer {
        &self.aqs
    }

    fn try_acquire(&self, arg: i32) -> bool {
        if self.fair && self.owner.get() != Some(slot_id()) && self.aqs.has_queued_predecessors() {
            return false;
        }
        self.try_acquire_nonfair(arg)
    }

    fn try_release(&self, arg: i32) -> bool {
        let remaining = self.aqs.state() - arg;
        if self.owner.get() != Some(slot_id()) {
            panic!("attempted to unlock a ReentrantLock from a thread that does not hold it");
        }
        let free = remaining == 0;
        if free {
            self.owner.set(None);
        }
        self.hold_count.set(remaining);
        self.aqs.set_state(remaining);
        free
    }

    fn is_held_exclusively(&self) -> bool {
        self.owner.get() == Some(slot_id())
    }
}

impl Lock for ReentrantLock {
    fn lock(&self) {
        self.acquire(1);
    }

    fn lock_interruptibly(&self) -> Result<(), AqsError> {
        self.acquire_interruptibly(1)
    }

    fn try_lock(&self) -> bool {
        self.try_acquire_nonfair(1)
    }

    fn try_lock_for(&self, dur: Duration) -> bool {
        self.try_acquire_nanos(1, dur).unwrap_or(false)
    }

    fn unlock(&self) {
        self.release(1);
    }

    fn new_condition(&self) -> ConditionQueue<'_, Self> {
        ConditionQueue::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn uncontended_lock_unlock_roundtrips() {
        let lock = ReentrantLock::new();
        lock.lock();
        assert!(lock.is_locked());
        assert_eq!(lock.hold_count(), 1);
        lock.unlock();
        assert!(!lock.is_locked());
    }

    #[test]
    fn reentrant_acquire_nests_hold_count() {
        let lock = ReentrantLock::new();
        lock.lock();
        lock.lock();
        assert_eq!(lock.hold_count(), 2);
        lock.unlock();
        assert!(lock.is_locked());
        lock.unlock();
        assert!(!lock.is_locked());
    }

    #[test]
    fn try_lock_fails_while_held_by_another_thread() {
        let lock = Arc::new(ReentrantLock::new());
        lock.lock();
        let other = Arc::clone(&lock);
        let failed = thread::spawn(move || !other.try_lock()).join().unwrap();
        assert!(failed);
        lock.unlock();
    }

    #[test]
    fn contended_threads_serialize_and_see_every_increment() {
        let lock = Arc::new(ReentrantLock::new());
        let counter = Arc::new(AtomicU32::new(0));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        lock.lock();
                        counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        lock.unlock();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counter.load(std::sync::atomic::Ordering::Relaxed), 16_000);
    }

    #[test]
    fn fair_lock_admits_queued_predecessors_first() {
        let lock = Arc::new(ReentrantLock::with_fairness(true));
        lock.lock();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut handles = Vec::new();
        for i in 0..4 {
            let lock = Arc::clone(&lock);
            let order = Arc::clone(&order);
            handles.push(thread::spawn(move || {
                lock.lock();
                order.lock().unwrap().push(i);
                lock.unlock();
            }));
            thread::sleep(Duration::from_millis(10));
        }
        lock.unlock();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
