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
//! Condition queues (spec §4.2), ported from `DefaultConditionObject` in
//! `examples/original_source/activemq-cpp/.../AbstractQueuedSynchronizer.cpp`.
//!
//! A condition's wait list is singly linked through `node.next_waiter` and,
//! per spec, only ever mutated by the thread currently holding the parent
//! synchronizer exclusively — `await`/`signal`/`signal_all` all require
//! that invariant and return `IllegalMonitorState` if it doesn't hold.

use crate::node::{Mode, Node, CONDITION};
use crate::sync_state::{self, AbstractQueuedSynchronizer};
use crate::traits::{Condition, Synchronizer};
use crate::{park, AqsError};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A condition variable bound to the `Lock` it was created from. Borrowing
/// the concrete synchronizer type (rather than a `dyn Synchronizer`) is
/// what lets `fully_release`/`acquire_queued` below call back into its
/// `try_acquire`/`try_release` hooks without dynamic dispatch.
pub struct ConditionQueue<'a, S: Synchronizer> {
    sync: &'a S,
    first: Mutex<Option<Arc<Node>>>,
    last: Mutex<Option<Arc<Node>>>,
}

impl<'a, S: Synchronizer> ConditionQueue<'a, S> {
    pub(crate) fn new(sync: &'a S) -> Self {
        Self {
            sync,
            first: Mutex::new(None),
            last: Mutex::new(None),
        }
    }

    fn aqs(&self) -> &AbstractQueuedSynchronizer {
        self.sync.aqs()
    }

    fn require_held(&self) -> Result<(), AqsError> {
        if self.sync.is_held_exclusively() {
            Ok(())
        } else {
            Err(AqsError::IllegalMonitorState)
        }
    }

    fn add_waiter(&self) -> Arc<Node> {
        self.unlink_cancelled_waiters();
        let node = Node::new(Mode::Exclusive, CONDITION, Some(park::current_token()));
        let mut last = self.last.lock().unwrap();
        match last.clone() {
            None => *self.first.lock().unwrap() = Some(node.clone()),
            Some(t) => *t.next_waiter.lock().unwrap() = Some(node.clone()),
        }
        *last = Some(node.clone());
        node
    }

    /// Walks the wait list dropping nodes whose status is no longer
    /// `CONDITION` (they were cancelled or already transferred), the way
    /// the original's `unlinkCancelledWaiters` amortises cleanup across
    /// every `await`/`signal` instead of scanning eagerly.
    fn unlink_cancelled_waiters(&self) {
        let mut first = self.first.lock().unwrap();
        let mut trail: Option<Arc<Node>> = None;
        let mut cursor = first.clone();
        while let Some(node) = cursor {
            let next = node.next_waiter.lock().unwrap().clone();
            if node.status.load(Ordering::Acquire) != CONDITION {
                *node.next_waiter.lock().unwrap() = None;
                match &trail {
                    None => *first = next.clone(),
                    Some(t) => *t.next_waiter.lock().unwrap() = next.clone(),
                }
                if next.is_none() {
                    *self.last.lock().unwrap() = trail.clone();
                }
            } else {
                trail = Some(node);
            }
            cursor = next;
        }
    }

    /// Best-effort diagnostic: whether any thread is currently waiting on
    /// this condition (spec §6 `hasWaiters`). Requires holding the parent
    /// synchronizer exclusively, matching
    /// `java.util.concurrent.locks.AbstractQueuedSynchronizer::hasWaiters`.
    pub fn has_waiters(&self) -> Result<bool, AqsError> {
        self.require_held()?;
        self.unlink_cancelled_waiters();
        Ok(self.first.lock().unwrap().is_some())
    }

    /// An estimate of the number of threads waiting on this condition
    /// (spec §6 `getWaitQueueLength`).
    pub fn wait_queue_length(&self) -> Result<usize, AqsError> {
        self.require_held()?;
        self.unlink_cancelled_waiters();
        let mut count = 0;
        let mut cursor = self.first.lock().unwrap().clone();
        while let Some(node) = cursor {
            if node.status.load(Ordering::Acquire) == CONDITION {
                count += 1;
            }
            cursor = node.next_waiter.lock().unwrap().clone();
        }
        Ok(count)
    }

    /// The thread ids currently waiting on this condition (spec §6
    /// `getWaitingThreads`), skipping nodes whose thread reference was
    /// already cleared (matching spec §6's "must skip nodes with cleared
    /// thread references").
    pub fn waiting_thread_ids(&self) -> Result<Vec<park::ThreadId>, AqsError> {
        self.require_held()?;
        self.unlink_cancelled_waiters();
        let mut out = Vec::new();
        let mut cursor = self.first.lock().unwrap().clone();
        while let Some(node) = cursor {
            if node.status.load(Ordering::Acquire) == CONDITION {
                if let Some(id) = node.thread_id() {
                    out.push(id);
                }
            }
            cursor = node.next_waiter.lock().unwrap().clone();
        }
        Ok(out)
    }

    /// Whether this condition belongs to `sync` (spec §6 `owns`), used by
    /// diagnostic callers that hold a condition and want to confirm which
    /// synchronizer it was created from before querying it further.
    pub fn owns(&self, sync: &S) -> bool {
        std::ptr::eq(self.sync, sync)
    }

    fn do_signal(&self) {
        let mut cursor = self.first.lock().unwrap().clone();
        while let Some(node) = cursor {
            let next = node.next_waiter.lock().unwrap().clone();
            *self.first.lock().unwrap() = next.clone();
            if next.is_none() {
                *self.last.lock().unwrap() = None;
            }
            *node.next_waiter.lock().unwrap() = None;
            if sync_state::transfer_for_signal(self.aqs(), &node) {
                break;
            }
            cursor = self.first.lock().unwrap().clone();
        }
    }

    fn do_signal_all(&self) {
        let mut cursor = self.first.lock().unwrap().take();
        *self.last.lock().unwrap() = None;
        while let Some(node) = cursor {
            let next = node.next_waiter.lock().unwrap().take();
            sync_state::transfer_for_signal(self.aqs(), &node);
            cursor = next;
        }
    }

    /// Shared park/requeue/reacquire machinery for `wait`/`wait_timeout`.
    /// `block` parks (possibly with a deadline) and returns `None` to keep
    /// waiting, `Some(true)` if it observed an interrupt, or `Some(false)`
    /// if its deadline passed. Returns whether the wait timed out.
    fn await_common<F>(&self, mut block: F) -> Result<bool, AqsError>
    where
        F: FnMut() -> Option<bool>,
    {
        self.require_held()?;
        let node = self.add_waiter();
        let saved = sync_state::fully_release(self.sync, &node)?;

        // 0 = clean wakeup, 1 = throw Interrupted, 2 = reinterrupt after reacquire.
        let mut interrupt_mode = 0u8;
        let mut timed_out = false;
        while !sync_state::is_on_sync_queue(self.aqs(), &node) {
            match block() {
                None => continue,
                Some(false) => {
                    sync_state::transfer_after_cancelled_wait(self.aqs(), &node);
                    timed_out = true;
                    break;
                }
                Some(true) => {
                    interrupt_mode = if sync_state::transfer_after_cancelled_wait(self.aqs(), &node) {
                        1
                    } else {
                        2
                    };
                    break;
                }
            }
        }
        let reacquire_interrupted = sync_state::acquire_queued(self.aqs(), self.sync, &node, saved);
        if reacquire_interrupted && interrupt_mode != 1 {
            interrupt_mode = 2;
        }
        if node.next_waiter.lock().unwrap().is_some() {
            self.unlink_cancelled_waiters();
        }
        match interrupt_mode {
            1 => Err(AqsError::Interrupted),
            2 => {
                park::self_interrupt();
                Ok(timed_out)
            }
            _ => Ok(timed_out),
        }
    }
}

const SPIN_THRESHOLD_NANOS: u64 = 1_000;

impl<'a, S: Synchronizer> Condition for ConditionQueue<'a, S> {
    fn wait(&self) -> Result<(), AqsError> {
        self.await_common(|| {
            park::park();
            if park::interrupted() {
                Some(true)
            } else {
                None
            }
        })
        .map(|_| ())
    }

    fn wait_timeout(&self, dur: Duration) -> Result<bool, AqsError> {
        let deadline = park::monotonic_nanos().saturating_add(dur.as_nanos() as u64);
        let timed_out = self.await_common(|| {
            let now = park::monotonic_nanos();
            if now >= deadline {
                return Some(false);
            }
            let remaining = deadline - now;
            if remaining >= SPIN_THRESHOLD_NANOS {
                park::park_timeout(Duration::from_nanos(remaining));
            }
            if park::interrupted() {
                Some(true)
            } else {
                None
            }
        })?;
        Ok(!timed_out)
    }

    fn wait_until(&self, deadline: Instant) -> Result<bool, AqsError> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        self.wait_timeout(timeout)
    }

    fn wait_uninterruptibly(&self) {
        if self.require_held().is_err() {
            return;
        }
        let node = self.add_waiter();
        let saved = match sync_state::fully_release(self.sync, &node) {
            Ok(s) => s,
            Err(_) => return,
        };
        let mut interrupted = false;
        while !sync_state::is_on_sync_queue(self.aqs(), &node) {
            park::park();
            if park::interrupted() {
                interrupted = true;
            }
        }
        if sync_state::acquire_queued(self.aqs(), self.sync, &node, saved) {
            interrupted = true;
        }
        if node.next_waiter.lock().unwrap().is_some() {
            self.unlink_cancelled_waiters();
        }
        if interrupted {
            park::self_interrupt();
        }
    }

    fn signal(&self) -> Result<(), AqsError> {
        self.require_held()?;
        if self.first.lock().unwrap().is_some() {
            self.do_signal();
        }
        Ok(())
    }

    fn signal_all(&self) -> Result<(), AqsError> {
        self.require_held()?;
        if self.first.lock().unwrap().is_some() {
            self.do_signal_all();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Lock;
    use crate::ReentrantLock;
    use std::sync::mpsc;
    use std::thread;

    /// Spec §8 scenario 5: a thread blocked in `await()` is interrupted;
    /// `await` raises `Interrupted`, the thread still holds the lock on
    /// exit, and no node remains on either the sync queue or the
    /// condition's own wait list.
    #[test]
    fn interrupted_wait_raises_interrupted_and_reacquires_the_lock() {
        let lock = ReentrantLock::new();
        let cond = lock.new_condition();
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            scope.spawn(|| {
                lock.lock();
                tx.send(park::current_thread_id()).unwrap();
                let result = cond.wait();
                assert_eq!(result, Err(AqsError::Interrupted));
                assert!(lock.is_held_exclusively());
                lock.unlock();
            });

            let waiter_id = rx.recv().unwrap();
            // Give the waiter time to actually park inside `await` before
            // interrupting it.
            thread::sleep(std::time::Duration::from_millis(30));
            park::interrupt(waiter_id);
        });

        assert!(cond.first.lock().unwrap().is_none());
        assert!(!lock.aqs().has_queued_threads());
    }
}
