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
//! Optional bounded free-list for queue nodes (spec §5 reclamation strategy
//! 3; `node_pool` feature), grounded in `NodePool` from
//! `examples/original_source/activemq-cpp/.../AbstractQueuedSynchronizer.cpp`.
//! The free list itself is a plain `Mutex<Vec<Arc<Node>>>` rather than
//! `aqs_infra::list::ListHead` — a pool entry needs no prev/next links of
//! its own (it is just "in the free list" or "handed out"), so the
//! intrusive list's doubly-linked membership tracking would add nothing
//! here. `aqs` carries no dependency on `aqs_infra`; that crate is kept as
//! an independent workspace member rather than wired into this one.
//!
//! The default build never needs this: `Arc<Node>` reclaims a node the
//! instant it's unreachable, which is strictly simpler and just as safe.
//! This is kept as an internal, crate-private demonstration of reclamation
//! strategy 3 — it is not wired into `sync_state`'s engine, which always
//! uses plain `Arc` allocation regardless of this feature. `Node`/`Mode`
//! are crate-private, so there is no way to offer a useful *public* pool
//! API over them without also exposing the node representation itself;
//! doing that is a bigger surface change than this feature warrants.
//! Unlike the original's pool, `take`/`give` only ever hand back a node
//! after its `Arc` strong count has dropped to the pool's own reference, so
//! a node can never be recycled while something else still points at it.

use crate::node::{Mode, Node};
use std::sync::{Arc, Mutex};

/// Matches the original `NodePool`'s fixed capacity.
const DEFAULT_CAPACITY: usize = 1024;

pub(crate) struct NodePool {
    free: Mutex<Vec<Arc<Node>>>,
    capacity: usize,
}

impl NodePool {
    #[allow(dead_code)]
    pub(crate) fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    /// Hands back a node whose `Arc` strong count is exactly 1 (no other
    /// reference to it survives), so reuse can never race a concurrent
    /// reader. Nodes that don't meet this, or arrive once the pool is
    /// full, are simply dropped and freed normally.
    pub(crate) fn give(&self, node: Arc<Node>) {
        if Arc::strong_count(&node) != 1 {
            return;
        }
        let mut free = self.free.lock().unwrap();
        if free.len() < self.capacity {
            free.push(node);
        }
    }

    #[allow(dead_code)]
    pub(crate) fn take(&self, mode: Mode, status: i32) -> Arc<Node> {
        match self.free.lock().unwrap().pop() {
            Some(mut recycled) => {
                if let Some(node) = Arc::get_mut(&mut recycled) {
                    node.reinit(mode, status);
                }
                recycled
            }
            None => Node::new(mode, status, None),
        }
    }
}
