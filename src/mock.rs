// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single-threaded, `std`-backed [`Platform`] for tests (§10 ambient
//! stack). Mirrors the real-syscall-vs-host-stub split the source's
//! embedders use, except here the "host stub" is rich enough to drive
//! full appender/ring/transmitter/logger integration tests rather than
//! just unit-testing one module in isolation (see [`crate::testutil`] for
//! the lighter-weight stand-in used there).
//!
//! Not reachable from a `no_std` build: only compiled under `cfg(test)` or
//! the `std` feature.

#![cfg(any(test, feature = "std"))]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use crate::chunk::Chunk;
use crate::platform::{FatalKind, Platform};
use crate::task::TaskId;

/// Bookkeeping for one fake task registration.
#[derive(Clone)]
struct TaskSlot {
    name: &'static str,
}

pub struct MockPlatform<const N: usize> {
    queue: RefCell<VecDeque<Chunk<N>>>,
    queue_capacity: usize,
    sink: RefCell<Vec<u8>>,
    sink_capacity: usize,
    clock: Cell<u64>,
    interrupt: Cell<bool>,
    transmit_in_progress: Cell<bool>,
    refresh_timer_started: Cell<bool>,
    refresh_due: Cell<bool>,
    finished_transmitter: Cell<bool>,
    next_task_id: Cell<TaskId>,
    tasks: RefCell<Vec<Option<TaskSlot>>>,
}

impl<const N: usize> MockPlatform<N> {
    /// `queue_capacity` bounds the producer->transmitter chunk queue;
    /// `sink_capacity` is reserved up front for the captured sink bytes
    /// (a hint only, the `Vec` still grows past it if needed).
    pub fn new(queue_capacity: usize, sink_capacity: usize) -> Self {
        Self {
            queue: RefCell::new(VecDeque::with_capacity(queue_capacity)),
            queue_capacity,
            sink: RefCell::new(Vec::with_capacity(sink_capacity)),
            sink_capacity,
            clock: Cell::new(0),
            interrupt: Cell::new(false),
            transmit_in_progress: Cell::new(false),
            refresh_timer_started: Cell::new(false),
            refresh_due: Cell::new(false),
            finished_transmitter: Cell::new(false),
            next_task_id: Cell::new(0),
            tasks: RefCell::new(Vec::new()),
        }
    }

    /// Pops the next chunk pushed by an `Appender`, oldest first.
    pub fn pop_pushed(&self) -> Option<Chunk<N>> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Snapshot of everything handed to [`Platform::transmit`] so far.
    pub fn sink_bytes(&self) -> Vec<u8> {
        self.sink.borrow().clone()
    }

    pub fn sink_capacity(&self) -> usize {
        self.sink_capacity
    }

    pub fn set_time(&self, time: u64) {
        self.clock.set(time);
    }

    pub fn set_interrupt(&self, in_interrupt: bool) {
        self.interrupt.set(in_interrupt);
    }

    /// Lets a test drive the C8 state machine across a simulated "DMA
    /// finished" event.
    pub fn complete_transmit(&self) {
        self.transmit_in_progress.set(false);
    }

    pub fn refresh_timer_was_started(&self) -> bool {
        self.refresh_timer_started.get()
    }

    /// Simulates the refresh timer firing; the next
    /// [`Platform::is_refresh_due`] poll observes it (and clears it, same
    /// as a real one-shot timer armed again by
    /// [`Platform::start_refresh_timer`]).
    pub fn fire_refresh_timer(&self) {
        self.refresh_due.set(true);
    }

    pub fn finished_transmitter_task_was_called(&self) -> bool {
        self.finished_transmitter.get()
    }
}

impl<const N: usize> Platform for MockPlatform<N> {
    type LogTime = u64;
    const MAX_TASK_COUNT: u8 = 32;

    fn register_current_task(&self, name: Option<&str>) -> Option<TaskId> {
        let id = self.next_task_id.get();
        if id >= Self::MAX_TASK_COUNT {
            return None;
        }
        self.next_task_id.set(id + 1);
        let mut tasks = self.tasks.borrow_mut();
        let slot_index = id as usize;
        if tasks.len() <= slot_index {
            tasks.resize(slot_index + 1, None);
        }
        tasks[slot_index] = Some(TaskSlot {
            name: name.unwrap_or("UNKNOWN"),
        });
        Some(id)
    }

    fn unregister_current_task(&self) -> Option<TaskId> {
        let mut tasks = self.tasks.borrow_mut();
        for (index, slot) in tasks.iter_mut().enumerate() {
            if slot.is_some() {
                *slot = None;
                return Some(index as TaskId);
            }
        }
        None
    }

    fn current_task_id(&self, requested: TaskId) -> TaskId {
        requested
    }

    fn current_task_name(&self) -> &str {
        let tasks = self.tasks.borrow();
        tasks
            .iter()
            .flatten()
            .next()
            .map(|slot| slot.name)
            .unwrap_or("UNKNOWN")
    }

    fn log_time(&self) -> Self::LogTime {
        self.clock.get()
    }

    fn is_interrupt(&self) -> bool {
        self.interrupt.get()
    }

    fn push_chunk(&self, chunk: &[u8], _blocking: bool) -> bool {
        let mut queue = self.queue.borrow_mut();
        if queue.len() >= self.queue_capacity {
            return false;
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(chunk);
        queue.push_back(Chunk::from_bytes(bytes));
        true
    }

    fn fetch_chunk(&self, out: &mut [u8]) -> bool {
        match self.queue.borrow_mut().pop_front() {
            Some(chunk) => {
                out.copy_from_slice(chunk.as_bytes());
                true
            }
            None => false,
        }
    }

    fn wait_for_data(&self) {}

    fn is_transmit_done(&self) -> bool {
        !self.transmit_in_progress.get()
    }

    fn wait_while_transmit_in_progress(&self) {}

    fn transmit(&self, bytes: &[u8]) {
        self.transmit_in_progress.set(true);
        self.sink.borrow_mut().extend_from_slice(bytes);
    }

    fn start_refresh_timer(&self) {
        self.refresh_timer_started.set(true);
    }

    fn is_refresh_due(&self) -> bool {
        self.refresh_due.replace(false)
    }

    fn finished_transmitter_task(&self) {
        self.finished_transmitter.set(true);
    }

    fn fatal(&self, kind: FatalKind) -> ! {
        panic!("fatal: {kind:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drops_once_full() {
        let platform = MockPlatform::<4>::new(1, 0);
        assert!(platform.push_chunk(&[0u8; 4], true));
        assert!(!platform.push_chunk(&[1u8; 4], true));
        assert_eq!(platform.queue_len(), 1);
    }

    #[test]
    fn registration_hands_out_increasing_ids() {
        let platform = MockPlatform::<4>::new(4, 0);
        assert_eq!(platform.register_current_task(Some("a")), Some(0));
        assert_eq!(platform.register_current_task(Some("b")), Some(1));
    }

    #[test]
    fn transmit_appends_to_sink() {
        let platform = MockPlatform::<4>::new(4, 0);
        platform.transmit(b"hi");
        platform.transmit(b"!");
        assert_eq!(platform.sink_bytes(), b"hi!");
    }
}
