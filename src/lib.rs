// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chunked, per-task log pipeline for mixed embedded/hosted environments.
//!
//! Per-task log calls are packed into fixed-size tagged chunks ([C1-C2],
//! [`chunk`]/[`appender`]), pushed into a bounded queue owned by the
//! embedder (the [`platform`] boundary), and drained by a transmitter
//! ([`transmitter`]) that re-sorts interleaved chunks through a bounded
//! ring ([`circular`]) and a double transmit buffer ([`transmit`]) so a
//! single task's message always lands contiguous on the sink, even when
//! other tasks' chunks arrive in between.
//!
//! Grounded on `original_source/src/Log.h`, rewritten from its template
//! parameters and runtime-allocated buffers to const generics and
//! `no_std`-friendly fixed arrays; see DESIGN.md for where and why this
//! differs from a literal translation.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod appender;
pub mod chunk;
pub mod circular;
pub mod config;
pub mod format;
pub mod logger;
pub mod platform;
pub mod task;
pub mod topic;
pub mod transmit;
pub mod transmitter;

#[cfg(any(test, feature = "std"))]
pub mod mock;

#[cfg(test)]
mod testutil;

pub use appender::Appender;
pub use chunk::Chunk;
pub use config::{Config, ConfigError, DefaultFormats, LogFormat, TaskRepresentation};
pub use format::LogValue;
pub use logger::{Logger, ShiftChain};
pub use platform::{FatalKind, Platform};
pub use task::{TaskId, INVALID_TASK_ID};
pub use topic::{TopicHandle, TopicRegistry, INVALID_TOPIC};
