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
//! The CLH wait-queue node (spec §2: `status`/`prev`/`next`/`nextWaiter`/
//! `thread`). `prev`/`next`/`nextWaiter` are `Mutex`-guarded `Arc` links
//! rather than raw CAS'd pointers — see `sync_state`'s module docs for why —
//! so a node is reclaimed by ordinary `Arc` drop the moment nothing in the
//! queue or a condition list still points to it, with no manual free-list
//! bookkeeping required for the default build.

use crate::park::{self, ParkToken};
use std::sync::atomic::AtomicI32;
use std::sync::{Arc, Mutex};

pub(crate) const CANCELLED: i32 = 1;
pub(crate) const SIGNAL: i32 = -1;
pub(crate) const CONDITION: i32 = -2;
pub(crate) const PROPAGATE: i32 = -3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Exclusive,
    Shared,
}

/// A deviation from the original: rather than the C++/Java source's
/// space-saving trick of stashing the mode in `nextWaiter` (set to the
/// sentinel `&SHARED` for shared-mode nodes), mode is its own field. It
/// costs a byte; it reads a lot better.
pub(crate) struct Node {
    pub(crate) status: AtomicI32,
    pub(crate) mode: Mode,
    pub(crate) prev: Mutex<Option<Arc<Node>>>,
    pub(crate) next: Mutex<Option<Arc<Node>>>,
    pub(crate) next_waiter: Mutex<Option<Arc<Node>>>,
    waiter: Mutex<Option<ParkToken>>,
}

impl Node {
    pub(crate) fn new(mode: Mode, status: i32, token: Option<ParkToken>) -> Arc<Node> {
        Arc::new(Node {
            status: AtomicI32::new(status),
            mode,
            prev: Mutex::new(None),
            next: Mutex::new(None),
            next_waiter: Mutex::new(None),
            waiter: Mutex::new(token),
        })
    }

    /// The head of an otherwise-empty queue is a dummy node owned by no
    /// thread; its `status` only ever means "does my successor need a
    /// signal", never a thread's own wait state.
    pub(crate) fn dummy() -> Arc<Node> {
        Self::new(Mode::Exclusive, 0, None)
    }

    pub(crate) fn thread_id(&self) -> Option<park::ThreadId> {
        self.waiter.lock().unwrap().as_ref().map(|t| t.id)
    }

    pub(crate) fn has_thread(&self) -> bool {
        self.waiter.lock().unwrap().is_some()
    }

    pub(crate) fn clear_thread(&self) {
        *self.waiter.lock().unwrap() = None;
    }

    pub(crate) fn unpark(&self) {
        if let Some(t) = self.waiter.lock().unwrap().as_ref() {
            t.unpark();
        }
    }

    /// Rewinds a retired node back to a fresh state for reuse by
    /// `node_pool`. Only reachable through `Arc::get_mut`, which itself
    /// only succeeds with no other strong/weak reference outstanding, so
    /// this can never run concurrently with a reader of the old contents.
    #[cfg(feature = "node_pool")]
    pub(crate) fn reinit(&mut self, mode: Mode, status: i32) {
        self.mode = mode;
        *self.status.get_mut() = status;
        *self.prev.get_mut().unwrap() = None;
        *self.next.get_mut().unwrap() = None;
        *self.next_waiter.get_mut().unwrap() = None;
        *self.waiter.get_mut().unwrap() = Some(park::current_token());
    }
}
