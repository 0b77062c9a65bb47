//! Allocation-free intrusive list plumbing shared by the `aqs` crate.
//!
//! This is the general-purpose half of the split: the `Adapter` trait and
//! the doubly linked `ListHead` it parameterises know nothing about
//! synchronizers, CLH queues, or wait statuses. `aqs`'s sync queue links
//! nodes through `Mutex<Option<Arc<Node>>>` rather than this crate's raw
//! `NonNull` links (see `aqs::sync_state`'s module docs for why), so this
//! crate is not on that hot path; it remains the general-purpose doubly
//! linked list building block the optional node free-list's doc comments
//! point back to.

pub mod intrusive;
pub mod list;
