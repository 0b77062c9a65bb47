//! Doubly linked intrusive list head, parameterised by an [`Adapter`](crate::intrusive::Adapter)
//! so a link can recover the struct that embeds it. Not concurrency-safe on
//! its own — callers are expected to serialise access with an external
//! lock. `aqs` does not link its own sync-queue or condition-list nodes
//! through this type (see `aqs::sync_state`'s module docs for why), so this
//! crate stays a general-purpose building block rather than a dependency
//! of any one `aqs` data structure.

mod typed_ilist;

pub use typed_ilist::{ListHead, ListIterator, ListReverseIterator};
