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
//! A reusable framework for building locks, semaphores, latches, and
//! condition variables on top of a single shared `i32` state word guarded
//! by a FIFO wait queue — a Rust port of `java.util.concurrent.locks`'s
//! `AbstractQueuedSynchronizer`, by way of the C++ port in
//! `decaf::util::concurrent::locks`.
//!
//! The framework itself ([`sync_state::AbstractQueuedSynchronizer`]) knows
//! nothing about what the state word means; that's supplied by
//! implementing [`Synchronizer`] for a concrete type. This crate ships
//! three such types as reference synchronizers: [`ReentrantLock`],
//! [`CountDownLatch`], and [`Semaphore`].

mod condition;
mod error;
mod node;
#[cfg(feature = "node_pool")]
mod node_pool;
mod park;
mod sync_state;
mod traits;

mod countdown_latch;
mod reentrant_lock;
mod semaphore;

pub use condition::ConditionQueue;
pub use error::AqsError;
pub use park::{current_thread_id, interrupt, interrupted, monotonic_nanos, ThreadId};
pub use sync_state::AbstractQueuedSynchronizer;
pub use traits::{Condition, Lock, Synchronizer};

pub use countdown_latch::CountDownLatch;
pub use reentrant_lock::ReentrantLock;
pub use semaphore::Semaphore;
