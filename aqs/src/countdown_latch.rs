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
//! A shared-mode reference synchronizer (spec §4.4), ported from
//! `java.util.concurrent.CountDownLatch`'s inner `Sync`: the state word is
//! the remaining count, `try_acquire_shared` blocks until it reaches zero,
//! and `try_release_shared` is the only path that ever decrements it.

use crate::sync_state::AbstractQueuedSynchronizer;
use crate::traits::Synchronizer;
use crate::AqsError;
use std::time::Duration;

/// A one-shot barrier that blocks acquirers until a fixed number of
/// `count_down` calls have brought the count to zero. Unlike `ReentrantLock`,
/// once it reaches zero it never locks again.
pub struct CountDownLatch {
    aqs: AbstractQueuedSynchronizer,
}

impl CountDownLatch {
    pub fn new(count: i32) -> Self {
        assert!(count >= 0, "count must not be negative");
        Self {
            aqs: AbstractQueuedSynchronizer::with_state(count),
        }
    }

    pub fn count(&self) -> i32 {
        self.aqs.state()
    }

    pub fn await_zero(&self) {
        self.acquire_shared(1);
    }

    pub fn await_zero_interruptibly(&self) -> Result<(), AqsError> {
        self.acquire_shared_interruptibly(1)
    }

    pub fn await_zero_for(&self, timeout: Duration) -> Result<bool, AqsError> {
        self.try_acquire_shared_nanos(1, timeout)
    }

    pub fn count_down(&self) {
        self.release_shared(1);
    }
}

impl Synchronizer for CountDownLatch {
    fn aqs(&self) -> &AbstractQueuedSynchronizer {
        &self.aqs
    }

    fn try_acquire_shared(&self, _arg: i32) -> i32 {
        if self.aqs.state() == 0 {
            1
        } else {
            -1
        }
    }

    fn try_release_shared(&self, _arg: i32) -> bool {
        loop {
            let current = self.aqs.state();
            if current == 0 {
                return false;
            }
            let next = current - 1;
            if self.aqs.compare_and_set_state(current, next) {
                return next == 0;
            }
            std::hint::spin_loop();
        }
    }
}

impl std::fmt::Debug for CountDownLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountDownLatch").field("count", &self.count()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn zero_count_never_blocks() {
        let latch = CountDownLatch::new(0);
        latch.await_zero();
    }

    #[test]
    fn waiters_release_only_after_every_count_down() {
        let latch = Arc::new(CountDownLatch::new(3));
        let released = Arc::new(AtomicU32::new(0));
        let mut handles = Vec::new();
        for _ in 0..5 {
            let latch = Arc::clone(&latch);
            let released = Arc::clone(&released);
            handles.push(thread::spawn(move || {
                latch.await_zero();
                released.fetch_add(1, AtomicOrdering::SeqCst);
            }));
        }
        thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(released.load(AtomicOrdering::SeqCst), 0);
        latch.count_down();
        latch.count_down();
        thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(released.load(AtomicOrdering::SeqCst), 0);
        latch.count_down();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(released.load(AtomicOrdering::SeqCst), 5);
    }
}
