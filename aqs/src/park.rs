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
//! The runtime collaborators spec.md §6 assumes exist (`park`/`unpark`,
//! a monotonic clock, `current_thread`/`interrupted`/`interrupt`) are
//! implemented here rather than assumed, the way
//! `kernel/src/sync/atomic_wait.rs` wraps the scheduler's suspend path for
//! the rest of that crate's sync primitives. `std::thread` has no native
//! interrupt flag, so each thread registers one lazily in a process-wide
//! table keyed by `std::thread::ThreadId`, torn down when the thread exits.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, Thread};
use std::time::{Duration, Instant};

/// A diagnostic-friendly, `Copy` handle to a thread, used wherever spec.md's
/// diagnostic interface (§6) reports which threads are queued or waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(thread::ThreadId);

#[derive(Clone)]
pub(crate) struct ParkToken {
    pub(crate) id: ThreadId,
    thread: Thread,
    flag: Arc<AtomicBool>,
}

impl ParkToken {
    pub(crate) fn unpark(&self) {
        self.thread.unpark();
    }
}

struct Registration {
    thread: Thread,
    flag: Arc<AtomicBool>,
}

static REGISTRY: OnceLock<Mutex<HashMap<thread::ThreadId, Registration>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<thread::ThreadId, Registration>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Deregisters the thread's interrupt flag when the thread exits, so the
/// registry doesn't grow unbounded across a long-lived process.
struct LocalHandle {
    flag: Arc<AtomicBool>,
    registered: Cell<bool>,
}

impl Drop for LocalHandle {
    fn drop(&mut self) {
        if self.registered.get() {
            registry().lock().unwrap().remove(&thread::current().id());
        }
    }
}

thread_local! {
    static LOCAL: LocalHandle = {
        let flag = Arc::new(AtomicBool::new(false));
        let current = thread::current();
        registry().lock().unwrap().insert(
            current.id(),
            Registration { thread: current, flag: flag.clone() },
        );
        LocalHandle { flag, registered: Cell::new(true) }
    };
}

/// Returns a handle identifying the calling thread, forcing this thread's
/// registry entry into existence first. Without this, a thread that calls
/// `current_thread_id()` and hands the result to another thread before
/// making any other `aqs` call would have no registry entry yet, so a
/// concurrent `interrupt()` of that id would silently find nothing and the
/// interrupt would be lost.
pub fn current_thread_id() -> ThreadId {
    LOCAL.with(|_| ());
    ThreadId(thread::current().id())
}

pub(crate) fn current_token() -> ParkToken {
    LOCAL.with(|local| ParkToken {
        id: ThreadId(thread::current().id()),
        thread: thread::current(),
        flag: local.flag.clone(),
    })
}

/// Tests and clears the calling thread's interrupt flag, mirroring
/// `Thread.interrupted()`'s clear-on-read semantics.
pub fn interrupted() -> bool {
    LOCAL.with(|local| local.flag.swap(false, Ordering::AcqRel))
}

/// Sets `id`'s interrupt flag and unparks it, so a thread blocked inside
/// `park()` observes the interruption immediately rather than only on its
/// next call into the framework.
pub fn interrupt(id: ThreadId) {
    if let Some(reg) = registry().lock().unwrap().get(&id.0) {
        reg.flag.store(true, Ordering::Release);
        reg.thread.unpark();
    }
}

pub(crate) fn self_interrupt() {
    interrupt(current_thread_id());
}

pub(crate) fn park() {
    thread::park();
}

pub(crate) fn park_timeout(dur: Duration) {
    thread::park_timeout(dur);
}

static CLOCK_START: OnceLock<Instant> = OnceLock::new();

/// Non-decreasing nanosecond counter for timed acquires/awaits, anchored at
/// first use rather than the Unix epoch (spec.md only requires
/// non-decreasing, not wall-clock-comparable, values).
pub fn monotonic_nanos() -> u64 {
    let start = CLOCK_START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn interrupted_is_clear_on_read() {
        let id = current_thread_id();
        interrupt(id);
        assert!(interrupted());
        assert!(!interrupted());
    }

    #[test]
    fn monotonic_nanos_never_goes_backwards() {
        let a = monotonic_nanos();
        let b = monotonic_nanos();
        assert!(b >= a);
    }

    /// Exercises the registration-gap fix: a thread that only ever calls
    /// `current_thread_id()` (never `current_token()`, which is the only
    /// other path that forces `LOCAL` to register) must still be reachable
    /// by `interrupt()` from another thread.
    #[test]
    fn current_thread_id_registers_without_a_park_token() {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let id = current_thread_id();
            tx.send(id).unwrap();
            while !interrupted() {
                thread::park_timeout(Duration::from_millis(10));
            }
        });
        let id = rx.recv().unwrap();
        interrupt(id);
        handle.join().unwrap();
    }
}
