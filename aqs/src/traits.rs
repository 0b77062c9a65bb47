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
//! Public interfaces (spec §6): the `Synchronizer` capability trait that
//! parameterises the engine in `sync_state`, and the `Lock`/`Condition`
//! traits a reference synchronizer implements on top of it.
//!
//! Java's `AbstractQueuedSynchronizer` is a base class with final methods
//! (`acquire`, `release`, ...) and protected hooks subclasses override
//! (`tryAcquire`, `tryRelease`, ...). Rust has no inheritance, so the final
//! methods become default trait methods here, generic over `Self`, and the
//! hooks become the trait's required/overridable methods — the same
//! composition spec.md §9 calls for: "a capability trait... parameterised
//! by the concrete synchronizer type [so it] can inline the hooks," which
//! is exactly what a monomorphized default method does.

use crate::condition::ConditionQueue;
use crate::sync_state::{self, AbstractQueuedSynchronizer};
use crate::AqsError;
use std::time::Duration;

/// Interprets the shared state word for one synchronizer. `try_*` hooks are
/// never allowed to block; they inspect or mutate `aqs().state()` and
/// return immediately (spec §4.1's "hook contract").
pub trait Synchronizer {
    fn aqs(&self) -> &AbstractQueuedSynchronizer;

    /// Attempts an exclusive acquire. Default: unsupported by this mode.
    fn try_acquire(&self, arg: i32) -> bool {
        let _ = arg;
        false
    }

    /// Attempts an exclusive release, returning whether the synchronizer is
    /// now fully free (so a successor should be signalled).
    fn try_release(&self, arg: i32) -> bool {
        let _ = arg;
        false
    }

    /// Attempts a shared acquire. Returns the remaining shared permits that
    /// can still be granted to a further acquirer (`> 0` propagates a wake
    /// to the successor), `0` if this acquire succeeded but nothing more
    /// can be granted, or negative if it failed.
    fn try_acquire_shared(&self, arg: i32) -> i32 {
        let _ = arg;
        -1
    }

    /// Attempts a shared release, returning whether waiters may now be able
    /// to proceed.
    fn try_release_shared(&self, arg: i32) -> bool {
        let _ = arg;
        false
    }

    /// Whether the calling thread currently holds this synchronizer
    /// exclusively; conditions use this to reject misuse.
    fn is_held_exclusively(&self) -> bool {
        false
    }

    fn acquire(&self, arg: i32)
    where
        Self: Sized,
    {
        sync_state::acquire(self, arg)
    }

    fn acquire_interruptibly(&self, arg: i32) -> Result<(), AqsError>
    where
        Self: Sized,
    {
        sync_state::acquire_interruptibly(self, arg)
    }

    fn try_acquire_nanos(&self, arg: i32, timeout: Duration) -> Result<bool, AqsError>
    where
        Self: Sized,
    {
        sync_state::try_acquire_nanos(self, arg, timeout)
    }

    fn release(&self, arg: i32) -> bool
    where
        Self: Sized,
    {
        sync_state::release(self, arg)
    }

    fn acquire_shared(&self, arg: i32)
    where
        Self: Sized,
    {
        sync_state::acquire_shared(self, arg)
    }

    fn acquire_shared_interruptibly(&self, arg: i32) -> Result<(), AqsError>
    where
        Self: Sized,
    {
        sync_state::acquire_shared_interruptibly(self, arg)
    }

    fn try_acquire_shared_nanos(&self, arg: i32, timeout: Duration) -> Result<bool, AqsError>
    where
        Self: Sized,
    {
        sync_state::try_acquire_shared_nanos(self, arg, timeout)
    }

    fn release_shared(&self, arg: i32) -> bool
    where
        Self: Sized,
    {
        sync_state::release_shared(self, arg)
    }
}

/// A mutual-exclusion lock built on a `Synchronizer`, mirroring
/// `java.util.concurrent.locks.Lock`.
pub trait Lock: Synchronizer + Sized {
    fn lock(&self);
    fn lock_interruptibly(&self) -> Result<(), AqsError>;
    fn try_lock(&self) -> bool;
    fn try_lock_for(&self, dur: Duration) -> bool;
    fn unlock(&self);
    fn new_condition(&self) -> ConditionQueue<'_, Self>;
}

/// A condition variable tied to a `Lock`'s sync queue, mirroring
/// `java.util.concurrent.locks.Condition`.
pub trait Condition {
    fn wait(&self) -> Result<(), AqsError>;
    fn wait_timeout(&self, dur: Duration) -> Result<bool, AqsError>;
    fn wait_until(&self, deadline: std::time::Instant) -> Result<bool, AqsError>;
    fn wait_uninterruptibly(&self);
    fn signal(&self) -> Result<(), AqsError>;
    fn signal_all(&self) -> Result<(), AqsError>;
}
