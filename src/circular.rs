// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded "sorting" ring buffer sitting between the platform queue and the
//! transmit buffers (C6, §4.4).
//!
//! Holds chunks that arrived out of order with respect to the
//! transmitter's currently active task, so that task's next chunk can be
//! located by [`CircularBuffer::inspect`] without losing anything already
//! read off the queue.

use crate::chunk::Chunk;
use crate::config::ConfigError;
use crate::platform::Platform;
use crate::task::TaskId;

pub struct CircularBuffer<const N: usize, const RING: usize> {
    storage: [Chunk<N>; RING],
    /// Oldest committed slot.
    start: usize,
    /// Next free slot (`fetch`/`keep_fetched` write here).
    end: usize,
    count: usize,
    /// Scan cursor used by `inspect`.
    found: usize,
    inspected_count: usize,
    inspected: bool,
}

impl<const N: usize, const RING: usize> CircularBuffer<N, RING> {
    pub fn new() -> Self {
        Self {
            storage: [Chunk::invalid(); RING],
            start: 0,
            end: 0,
            count: 0,
            found: 0,
            inspected_count: 0,
            inspected: true,
        }
    }

    /// Fallible form of [`CircularBuffer::new`]: rejects a zero-length ring
    /// up front rather than letting `is_full()` be vacuously true forever
    /// (§7 ambient `ConfigError`).
    pub fn try_new() -> Result<Self, ConfigError> {
        if RING == 0 {
            return Err(ConfigError::ZeroCapacity("circular buffer"));
        }
        if N < 2 {
            return Err(ConfigError::ChunkSizeTooSmall);
        }
        Ok(Self::new())
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == RING
    }

    pub fn is_inspected(&self) -> bool {
        self.inspected
    }

    /// Restarts the scan for a (newly) active task from the current
    /// `start`.
    pub fn clear_inspected(&mut self) {
        self.inspected = false;
        self.inspected_count = 0;
        self.found = self.start;
    }

    /// Stages the next chunk from the platform queue into the free slot at
    /// `end`, without committing it -- call [`CircularBuffer::keep_fetched`]
    /// to commit, or just read the returned value straight away and
    /// discard it. Returns an invalid chunk if the queue had nothing.
    pub fn fetch<P: Platform>(&mut self, platform: &P) -> Chunk<N> {
        let mut bytes = [0u8; N];
        self.storage[self.end] = if platform.fetch_chunk(&mut bytes) {
            Chunk::from_bytes(bytes)
        } else {
            Chunk::invalid()
        };
        self.storage[self.end]
    }

    /// The oldest committed chunk, without removing it.
    pub fn peek(&self) -> Chunk<N> {
        self.storage[self.start]
    }

    /// Drops the oldest committed chunk.
    pub fn pop(&mut self) {
        self.count -= 1;
        self.start = (self.start + 1) % RING;
        self.found = self.start;
    }

    /// Commits whatever the last `fetch` staged at `end`.
    pub fn keep_fetched(&mut self) {
        self.count += 1;
        self.end = (self.end + 1) % RING;
    }

    /// Scans forward from the cursor for a chunk belonging to `task_id`.
    ///
    /// Returns the match if one is found before the whole ring has been
    /// scanned (`is_inspected()` stays `false`; caller must follow up with
    /// [`CircularBuffer::remove_found`]). Otherwise compacts out every
    /// invalidated slot, sets `is_inspected()` to `true`, and the returned
    /// chunk should be ignored.
    pub fn inspect(&mut self, task_id: TaskId) -> Chunk<N> {
        while self.inspected_count < self.count && self.storage[self.found].task_id() != task_id {
            self.inspected_count += 1;
            self.found = (self.found + 1) % RING;
        }
        if self.inspected_count == self.count {
            self.compact();
            self.inspected = true;
        }
        self.storage[self.found]
    }

    /// Marks the slot last returned by a matching `inspect` as free.
    pub fn remove_found(&mut self) {
        self.storage[self.found].invalidate();
    }

    /// Two-pointer compaction: preserves the relative order of valid
    /// chunks between `start` and `end`, drops invalidated ones, and
    /// shrinks `end`/`count` to match. The source's own compaction swaps
    /// `source`/`destination` in a way that doesn't survive scrutiny near
    /// the invalidated-slot boundary (see DESIGN.md); this is the
    /// straightforward correct reading of "drop invalid, keep the rest in
    /// order".
    fn compact(&mut self) {
        let mut source = self.start;
        let mut destination = self.start;
        while source != self.end {
            if self.storage[destination].is_valid() {
                if source == destination {
                    source = (source + 1) % RING;
                }
                destination = (destination + 1) % RING;
            } else if !self.storage[source].is_valid() {
                source = (source + 1) % RING;
            } else {
                self.storage[destination] = self.storage[source];
                self.storage[source].invalidate();
            }
        }
        let removed = (self.end + RING - destination) % RING;
        self.count -= removed;
        self.end = destination;
    }
}
