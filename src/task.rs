// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Task identity.
//!
//! An 8-bit id, chosen so it fits in byte 0 of a [`crate::chunk::Chunk`]
//! (see `Log.h`'s comment: "We stick to 8-bit task IDs to let them fit in
//! the first byte of a chunk").

/// Identifies the task that produced a chunk.
pub type TaskId = u8;

/// Marks an empty or invalidated chunk slot. Never a valid registered task
/// id: [`crate::platform::Platform::MAX_TASK_COUNT`] must be less than
/// this value.
pub const INVALID_TASK_ID: TaskId = 0xFF;

/// Sentinel meaning "resolve to the calling task at call time", passed as
/// the default `task_id` argument to the public API. Numerically equal to
/// the platform's `MAX_TASK_COUNT`, matching the source's
/// `static_assert(tInterface::cMaxTaskCount == cLocalTaskId)`.
pub fn local_task_id<P: crate::platform::Platform>() -> TaskId {
    P::MAX_TASK_COUNT
}
