// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The wire unit of the pipeline (data model §3).

use crate::task::{TaskId, INVALID_TASK_ID};

/// Marks the terminal chunk of a message; may appear anywhere in the
/// payload, with any bytes after it in the same chunk ignored. Never
/// reaches the sink -- the transmit buffer rewrites it to [`END_OF_LINE`].
pub const END_OF_MESSAGE: u8 = b'\r';

/// What [`END_OF_MESSAGE`] becomes once it reaches the transmit buffer.
pub const END_OF_LINE: u8 = b'\n';

/// A fixed-size transport unit: byte 0 is the originating [`TaskId`] (or
/// [`INVALID_TASK_ID`] for an empty/invalidated slot), bytes `1..N` are
/// message payload.
///
/// `N` is the compile-time chunk size (`ChunkSize` in the source, typically
/// 8). `Chunk` is `Copy` so the ring and transmit buffers can pass it
/// around by value instead of juggling borrows of a shared backing array,
/// which is the one place this rewrite diverges from the source's raw
/// pointer-and-memcpy `Chunk` class (see DESIGN.md).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Chunk<N> {
    /// An invalidated chunk (byte 0 = [`INVALID_TASK_ID`]).
    pub const fn invalid() -> Self {
        let mut bytes = [0u8; N];
        bytes[0] = INVALID_TASK_ID;
        Self { bytes }
    }

    /// Starts a fresh chunk tagged with `task_id`; payload bytes are
    /// unspecified until written.
    pub fn start(task_id: TaskId) -> Self {
        let mut c = Self { bytes: [0u8; N] };
        c.bytes[0] = task_id;
        c
    }

    /// Wraps a raw, already-populated chunk (as filled by
    /// [`crate::platform::Platform::fetch_chunk`]).
    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    pub fn task_id(&self) -> TaskId {
        self.bytes[0]
    }

    pub fn is_valid(&self) -> bool {
        self.bytes[0] != INVALID_TASK_ID
    }

    pub fn invalidate(&mut self) {
        self.bytes[0] = INVALID_TASK_ID;
    }

    /// Payload bytes, i.e. everything but the task id byte.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[1..]
    }
}

impl<const N: usize> Default for Chunk<N> {
    fn default() -> Self {
        Self::invalid()
    }
}
