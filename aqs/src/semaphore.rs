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
//! `java.util.concurrent.Semaphore`'s inner `Sync`/`FairSync`/`NonfairSync`:
//! the state word is the permit count, `try_acquire_shared` subtracts a
//! requested number of permits with a CAS retry loop, and fairness again
//! means consulting `has_queued_predecessors` before barging.

use crate::sync_state::AbstractQueuedSynchronizer;
use crate::traits::Synchronizer;
use crate::AqsError;
use std::time::Duration;

/// A counting semaphore. `acquire`/`release` work in units of permits
/// rather than the fixed `1` a lock uses, so callers pass how many they
/// want directly.
pub struct Semaphore {
    aqs: AbstractQueuedSynchronizer,
    fair: bool,
}

impl Semaphore {
    pub fn new(permits: i32, fair: bool) -> Self {
        Self {
            aqs: AbstractQueuedSynchronizer::with_state(permits),
            fair,
        }
    }

    pub fn available_permits(&self) -> i32 {
        self.aqs.state()
    }

    pub fn acquire(&self) {
        self.acquire_permits(1);
    }

    pub fn acquire_permits(&self, permits: i32) {
        self.acquire_shared(permits);
    }

    pub fn acquire_interruptibly(&self) -> Result<(), AqsError> {
        self.acquire_permits_interruptibly(1)
    }

    pub fn acquire_permits_interruptibly(&self, permits: i32) -> Result<(), AqsError> {
        self.acquire_shared_interruptibly(permits)
    }

    pub fn try_acquire(&self) -> bool {
        self.try_acquire_permits(1)
    }

    pub fn try_acquire_permits(&self, permits: i32) -> bool {
        self.nonfair_try_acquire_shared(permits) >= 0
    }

    pub fn try_acquire_for(&self, timeout: Duration) -> Result<bool, AqsError> {
        self.try_acquire_permits_for(1, timeout)
    }

    pub fn try_acquire_permits_for(&self, permits: i32, timeout: Duration) -> Result<bool, AqsError> {
        self.try_acquire_shared_nanos(permits, timeout)
    }

    pub fn release(&self) {
        self.release_permits(1);
    }

    pub fn release_permits(&self, permits: i32) {
        self.release_shared(permits);
    }

    fn nonfair_try_acquire_shared(&self, acquires: i32) -> i32 {
        loop {
            let available = self.aqs.state();
            let remaining = available - acquires;
            if remaining < 0 || self.aqs.compare_and_set_state(available, remaining) {
                return remaining;
            }
        }
    }
}

impl Synchronizer for Semaphore {
    fn aqs(&self) -> &AbstractQueuedSynchronizer {
        &self.aqs
    }

    fn try_acquire_shared(&self, arg: i32) -> i32 {
        if self.fair && self.aqs.has_queued_predecessors() {
            return -1;
        }
        self.nonfair_try_acquire_shared(arg)
    }

    fn try_release_shared(&self, arg: i32) -> bool {
        loop {
            let current = self.aqs.state();
            let next = current + arg;
            if self.aqs.compare_and_set_state(current, next) {
                return true;
            }
        }
    }
}
