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
use thiserror::Error;

/// Error kinds raised by the synchronizer framework and its reference
/// synchronizers (spec §7). Timeouts are never represented here — timed
/// operations return `bool`/remaining-time values instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AqsError {
    /// A condition operation was invoked without holding the parent
    /// synchronizer exclusively, or a diagnostic query named a condition
    /// that does not belong to the synchronizer it was asked about.
    #[error("current thread does not hold the synchronizer exclusively")]
    IllegalMonitorState,

    /// The calling thread was interrupted during an interruptible wait.
    /// The waiter's node is fully cancelled before this is raised.
    #[error("thread was interrupted while waiting")]
    Interrupted,

    /// A query was passed a condition that does not belong to this
    /// synchronizer.
    #[error("condition does not belong to this synchronizer")]
    IllegalArgument,

    /// A subclass did not override the `try*` hook this operation needs.
    #[error("operation not supported by this synchronizer")]
    Unsupported,
}
