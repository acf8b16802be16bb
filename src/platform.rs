// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The boundary between this crate and everything it does not own:
//! task identity, the scheduler, the chunk queue, and the sink.
//!
//! Grounded on the `tInterface`/`tAppInterface` template parameters of
//! `original_source/src/Log.h` and on the trait-boundary style used by
//! `multitimer` (real syscalls behind `#[cfg(target_os = "none")]`, a host
//! stub otherwise) and `circq` (borrowed backing storage, no allocation).
//! The core (`Logger` and friends) is generic over `Platform` and never
//! spawns threads, touches a mutex, or allocates; all of that is the
//! embedder's problem.

use crate::task::TaskId;

/// Reasons the core gives up entirely. Surfaced through
/// [`Platform::fatal`], which never returns -- matching `fatalError` in the
/// source, which aborts rather than propagating an error through the hot
/// logging path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// `registerCurrentTask` was called with no free task ids left, or for
    /// a task that is already registered.
    OutOfTaskIdsOrDoubleRegistration,
    /// `registerTopic` was called after `MaxTopicCount` topics were already
    /// registered.
    OutOfTopics,
}

/// Everything the chunk pipeline needs from its environment.
///
/// Implementations are expected to be cheap to call from any task
/// (including, where `is_interrupt` reports true, an interrupt handler) --
/// none of the hot-path methods may block except where documented.
pub trait Platform {
    /// Representation of a monotonic tick count, as returned by
    /// [`Platform::log_time`]. Must be cheaply convertible to `u64` for
    /// formatting into the message header.
    type LogTime: Copy + Into<u64>;

    /// Largest number of tasks this platform will ever register, i.e.
    /// `cMaxTaskCount` from the source. Must be strictly less than 254 so
    /// that `MAX_TASK_COUNT` itself can serve as `cLocalTaskId` and `0xFF`
    /// remains free for [`crate::task::INVALID_TASK_ID`].
    const MAX_TASK_COUNT: u8;

    /// Registers the calling task, returning its freshly assigned id, or
    /// `None` on exhaustion or double registration (the caller turns that
    /// into a call to [`Platform::fatal`]).
    fn register_current_task(&self, name: Option<&str>) -> Option<TaskId>;

    /// Releases the calling task's id for reuse.
    fn unregister_current_task(&self) -> Option<TaskId>;

    /// Resolves [`crate::task::LOCAL_TASK_ID`] (or any other value of
    /// `requested`) to a concrete task id for the calling context.
    fn current_task_id(&self, requested: TaskId) -> TaskId;

    /// Name of the calling task, for header rendering when
    /// `taskRepresentation == Name`. Implementations without task names
    /// should return a fixed placeholder (e.g. `"UNKNOWN"`).
    fn current_task_name(&self) -> &str;

    /// Current value of the monotonic tick source.
    fn log_time(&self) -> Self::LogTime;

    /// True if called from interrupt context. Must not block or allocate.
    fn is_interrupt(&self) -> bool;

    /// Enqueues one chunk. `chunk.len()` is always the configured chunk
    /// size. If `blocking` is true the call may block until space is
    /// available; otherwise it must return immediately, reporting success
    /// as `true`/`false` and dropping the chunk silently on `false`.
    fn push_chunk(&self, chunk: &[u8], blocking: bool) -> bool;

    /// Dequeues one chunk into `out` (`out.len()` is the chunk size),
    /// returning `false` if none was available. Called only from the
    /// transmitter.
    fn fetch_chunk(&self, out: &mut [u8]) -> bool;

    /// Blocks the transmitter until a chunk is available, a refresh fires,
    /// or an implementation-defined timeout elapses.
    fn wait_for_data(&self);

    /// Non-blocking probe: has the in-flight `transmit` completed?
    fn is_transmit_done(&self) -> bool;

    /// Blocks until the in-flight `transmit` completes.
    fn wait_while_transmit_in_progress(&self);

    /// Hands a completed buffer to the sink. May be synchronous or start an
    /// async transfer; completion is observed via [`Platform::is_transmit_done`].
    fn transmit(&self, bytes: &[u8]);

    /// (Re)arms the refresh timer that eventually sets the transmit
    /// buffers' `refresh_needed` flag, flushing a partially filled buffer.
    fn start_refresh_timer(&self);

    /// Non-blocking probe, polled once per transmitter iteration: has the
    /// refresh timer armed by [`Platform::start_refresh_timer`] fired since
    /// the last call? Implementations that fire an interrupt or callback
    /// should latch that event in an `AtomicBool` and have this method take
    /// it (read-and-clear), mirroring the source's timer callback poking
    /// `mRefreshNeeded` directly -- here the transmitter does the poking,
    /// driven by this poll, instead of the platform reaching into
    /// [`crate::transmit::TransmitBuffers`] itself.
    fn is_refresh_due(&self) -> bool;

    /// Called once after the transmitter's run loop exits.
    fn finished_transmitter_task(&self);

    /// Reports an unrecoverable condition. Does not return.
    fn fatal(&self, kind: FatalKind) -> !;
}
