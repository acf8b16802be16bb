// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Double transmit buffer (C7, §4.5): accumulates chunk payloads into a
//! flat byte buffer for one "active" task at a time, and swaps buffers
//! with the platform sink once a refresh is due and the previous transmit
//! has completed.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::chunk::{Chunk, END_OF_MESSAGE, END_OF_LINE};
use crate::config::ConfigError;
use crate::platform::Platform;
use crate::task::{TaskId, INVALID_TASK_ID};

/// `BUF_BYTES` must equal `BUF_CHUNKS * (N - 1)` (payload bytes per chunk,
/// times chunks per buffer) -- checked with a `debug_assert!` in `new`
/// since `generic_const_exprs` isn't stable enough to enforce it at the
/// type level.
pub struct TransmitBuffers<const N: usize, const BUF_CHUNKS: usize, const BUF_BYTES: usize> {
    buffers: [[u8; BUF_BYTES]; 2],
    chunk_count: [usize; 2],
    index: [usize; 2],
    writing: usize,
    active_task_id: TaskId,
    got_terminal_chunk: bool,
    /// Set by [`TransmitBuffers::mark_refresh_needed`] (in turn driven by
    /// [`crate::transmitter::run_once`] polling
    /// [`Platform::is_refresh_due`]), and by a write-buffer-full
    /// [`TransmitBuffers::transmit_if_needed`] forcing an immediate flush.
    /// An `AtomicBool` because the source's `mRefreshNeeded` is one too
    /// (§5 "Shared mutable state"): a refresh timer callback can set it from
    /// outside the transmitter's own exclusive-ownership world.
    refresh_needed: AtomicBool,
}

impl<const N: usize, const BUF_CHUNKS: usize, const BUF_BYTES: usize>
    TransmitBuffers<N, BUF_CHUNKS, BUF_BYTES>
{
    pub fn new() -> Self {
        debug_assert_eq!(
            BUF_BYTES,
            BUF_CHUNKS * (N - 1),
            "BUF_BYTES must equal BUF_CHUNKS * (ChunkSize - 1)"
        );
        Self {
            buffers: [[0u8; BUF_BYTES]; 2],
            chunk_count: [0, 0],
            index: [0, 0],
            writing: 0,
            active_task_id: INVALID_TASK_ID,
            got_terminal_chunk: false,
            refresh_needed: AtomicBool::new(false),
        }
    }

    /// Fallible form of [`TransmitBuffers::new`]: checks the three const
    /// generics agree (`BUF_BYTES == BUF_CHUNKS * (N - 1)`) instead of
    /// deferring to the `debug_assert!` in `new`, so a release-mode
    /// embedder doing init-time validation still catches a bad
    /// instantiation (§7 ambient `ConfigError`).
    pub fn try_new() -> Result<Self, ConfigError> {
        if N < 2 {
            return Err(ConfigError::ChunkSizeTooSmall);
        }
        if BUF_CHUNKS == 0 {
            return Err(ConfigError::ZeroCapacity("transmit buffer"));
        }
        if BUF_BYTES != BUF_CHUNKS * (N - 1) {
            return Err(ConfigError::TransmitBufferLengthMismatch);
        }
        Ok(Self::new())
    }

    pub fn has_active_task(&self) -> bool {
        self.active_task_id != INVALID_TASK_ID
    }

    pub fn active_task_id(&self) -> TaskId {
        self.active_task_id
    }

    pub fn got_terminal_chunk(&self) -> bool {
        self.got_terminal_chunk
    }

    /// Marks a refresh as due. Called by [`crate::transmitter::run_once`]
    /// when [`Platform::is_refresh_due`] reports the refresh timer fired,
    /// and directly by tests that want to force an immediate flush.
    pub fn mark_refresh_needed(&self) {
        self.refresh_needed.store(true, Ordering::Relaxed);
    }

    /// Copies `chunk`'s payload into the buffer currently being filled,
    /// stopping at (and rewriting) the first `END_OF_MESSAGE` byte, and
    /// silently dropping payload bytes once the buffer is full (I3/B4
    /// overflow-drop semantics). A no-op for an invalidated chunk.
    pub fn append(&mut self, chunk: Chunk<N>) {
        if !chunk.is_valid() {
            return;
        }
        self.got_terminal_chunk = false;
        let buffer = &mut self.buffers[self.writing];
        let mut index = self.index[self.writing];
        for &byte in chunk.payload() {
            if self.got_terminal_chunk {
                break;
            }
            if index < BUF_BYTES {
                buffer[index] = if byte == END_OF_MESSAGE {
                    END_OF_LINE
                } else {
                    byte
                };
                index += 1;
            }
            self.got_terminal_chunk = byte == END_OF_MESSAGE;
        }
        self.index[self.writing] = index;
        self.chunk_count[self.writing] += 1;
        self.active_task_id = if self.got_terminal_chunk {
            INVALID_TASK_ID
        } else {
            chunk.task_id()
        };
    }

    /// Hands the filled buffer to `platform.transmit` and swaps to the
    /// other one, if a refresh is due, the current buffer isn't empty,
    /// and the platform has finished transmitting the previous swap. A
    /// buffer that fills completely forces a refresh even if the refresh
    /// timer hasn't fired yet.
    pub fn transmit_if_needed<P: Platform>(&mut self, platform: &P) {
        let writing = self.writing;
        if self.chunk_count[writing] == 0 {
            return;
        }
        if self.chunk_count[writing] == BUF_CHUNKS {
            platform.wait_while_transmit_in_progress();
            self.refresh_needed.store(true, Ordering::Relaxed);
        }
        if platform.is_transmit_done() && self.refresh_needed.load(Ordering::Relaxed) {
            platform.transmit(&self.buffers[writing][..self.index[writing]]);
            self.writing = 1 - writing;
            self.index[self.writing] = 0;
            self.chunk_count[self.writing] = 0;
            self.refresh_needed.store(false, Ordering::Relaxed);
            platform.start_refresh_timer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;

    #[test]
    fn try_new_rejects_mismatched_byte_length() {
        assert_eq!(
            TransmitBuffers::<4, 2, 5>::try_new().unwrap_err(),
            ConfigError::TransmitBufferLengthMismatch
        );
        assert!(TransmitBuffers::<4, 2, 6>::try_new().is_ok());
    }

    #[test]
    fn append_copies_payload_and_rewrites_terminator() {
        // N=4: 3 payload bytes per chunk.
        let mut buffers = TransmitBuffers::<4, 2, 6>::new();
        let mut chunk = Chunk::<4>::start(1);
        chunk.as_bytes_mut()[1] = b'h';
        chunk.as_bytes_mut()[2] = b'i';
        chunk.as_bytes_mut()[3] = END_OF_MESSAGE;
        buffers.append(chunk);
        assert!(buffers.got_terminal_chunk());
        assert!(!buffers.has_active_task());
        assert_eq!(&buffers.buffers[0][..3], b"hi\n");
    }

    #[test]
    fn non_terminal_chunk_sets_active_task() {
        let mut buffers = TransmitBuffers::<4, 2, 6>::new();
        let mut chunk = Chunk::<4>::start(7);
        chunk.as_bytes_mut()[1] = b'a';
        chunk.as_bytes_mut()[2] = b'b';
        chunk.as_bytes_mut()[3] = b'c';
        buffers.append(chunk);
        assert!(buffers.has_active_task());
        assert_eq!(buffers.active_task_id(), 7);
        assert!(!buffers.got_terminal_chunk());
    }

    #[test]
    fn transmit_if_needed_waits_for_refresh_flag() {
        let platform = MockPlatform::<4>::new(4, 16);
        let mut buffers = TransmitBuffers::<4, 2, 6>::new();
        let mut chunk = Chunk::<4>::start(1);
        chunk.as_bytes_mut()[1] = b'x';
        chunk.as_bytes_mut()[2] = b'y';
        chunk.as_bytes_mut()[3] = END_OF_MESSAGE;
        buffers.append(chunk);
        buffers.transmit_if_needed(&platform);
        assert!(platform.sink_bytes().is_empty());
        buffers.mark_refresh_needed();
        buffers.transmit_if_needed(&platform);
        assert_eq!(platform.sink_bytes(), b"xy\n");
    }

    #[test]
    fn full_buffer_forces_refresh() {
        let platform = MockPlatform::<4>::new(4, 16);
        let mut buffers = TransmitBuffers::<4, 2, 6>::new();
        for task_id in [1u8, 2u8] {
            let mut chunk = Chunk::<4>::start(task_id);
            chunk.as_bytes_mut()[1] = b'a';
            chunk.as_bytes_mut()[2] = b'b';
            chunk.as_bytes_mut()[3] = b'c';
            buffers.append(chunk);
        }
        buffers.transmit_if_needed(&platform);
        assert_eq!(platform.sink_bytes(), b"abcabc");
    }
}
