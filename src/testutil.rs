// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal `Platform` stand-ins for unit tests that only exercise one
//! module in isolation (the topic registry, the circular buffer, the
//! transmit buffers) and don't need a working queue or sink.
//!
//! For end-to-end scenarios see [`crate::mock::MockPlatform`].

#![cfg(test)]

use crate::platform::{FatalKind, Platform};
use crate::task::TaskId;

/// A `Platform` whose only working method is `fatal`, which panics. Good
/// enough for tests that never touch the queue, clock, or sink.
#[derive(Default)]
pub struct NullPlatform;

impl Platform for NullPlatform {
    type LogTime = u64;
    const MAX_TASK_COUNT: u8 = 8;

    fn register_current_task(&self, _name: Option<&str>) -> Option<TaskId> {
        unimplemented!()
    }

    fn unregister_current_task(&self) -> Option<TaskId> {
        unimplemented!()
    }

    fn current_task_id(&self, requested: TaskId) -> TaskId {
        requested
    }

    fn current_task_name(&self) -> &str {
        "UNKNOWN"
    }

    fn log_time(&self) -> Self::LogTime {
        0
    }

    fn is_interrupt(&self) -> bool {
        false
    }

    fn push_chunk(&self, _chunk: &[u8], _blocking: bool) -> bool {
        unimplemented!()
    }

    fn fetch_chunk(&self, _out: &mut [u8]) -> bool {
        false
    }

    fn wait_for_data(&self) {}

    fn is_transmit_done(&self) -> bool {
        true
    }

    fn wait_while_transmit_in_progress(&self) {}

    fn transmit(&self, _bytes: &[u8]) {}

    fn start_refresh_timer(&self) {}

    fn is_refresh_due(&self) -> bool {
        false
    }

    fn finished_transmitter_task(&self) {}

    fn fatal(&self, kind: FatalKind) -> ! {
        panic!("fatal: {kind:?}")
    }
}
