// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The public logging API (C9, §4.7): per-call entry points (`send`,
//! `send_no_header`) and the chained builder (`i`/`n` ... `.end()`).

use crate::appender::Appender;
use crate::config::{Config, ConfigError, LogFormat, TaskRepresentation};
use crate::format::{write_unsigned, LogValue};
use crate::platform::{FatalKind, Platform};
use crate::task::{self, TaskId};
use crate::topic::{TopicHandle, TopicRegistry};

const REGISTERED_TASK: &str = "-=- Registered task: ";
const UNREGISTERED_TASK: &str = "-=- Unregistered task: ";

fn push_str<const N: usize, P: Platform>(appender: &mut Appender<'_, N, P>, s: &str) {
    for &b in s.as_bytes() {
        appender.push(b);
    }
}

/// Bundles a [`Config`], a [`TopicRegistry`] and a [`Platform`] reference
/// into the entry points call sites use. `N` is the chunk size shared by
/// every [`Appender`] this logger creates; `MAX_TOPICS` bounds the topic
/// table.
pub struct Logger<'a, const N: usize, const MAX_TOPICS: usize, P: Platform> {
    platform: &'a P,
    config: Config,
    topics: TopicRegistry<MAX_TOPICS>,
}

impl<'a, const N: usize, const MAX_TOPICS: usize, P: Platform> Logger<'a, N, MAX_TOPICS, P> {
    pub fn new(platform: &'a P, config: Config) -> Self {
        Self {
            platform,
            config,
            topics: TopicRegistry::new(),
        }
    }

    /// Fallible form of [`Logger::new`]: rejects a chunk size under 2 bytes
    /// or a zero-capacity topic table up front, before the first call to
    /// `send`/`i`/`n` ever runs (§7 ambient `ConfigError`). `Logger::new`
    /// is the infallible convenience for call sites (tests, mainly) that
    /// already know their dimensions are sound.
    pub fn try_new(platform: &'a P, config: Config) -> Result<Self, ConfigError> {
        if N < 2 {
            return Err(ConfigError::ChunkSizeTooSmall);
        }
        if MAX_TOPICS == 0 {
            return Err(ConfigError::ZeroCapacity("topic table"));
        }
        Ok(Self::new(platform, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Must be called before any task starts logging through it (§6 /
    /// the source's "must come before registering topics" ordering note
    /// carries over: register every topic up front, during single-
    /// threaded init, before other tasks start registering themselves).
    pub fn register_topic(&mut self, prefix: &'static str) -> TopicHandle {
        self.topics.register(self.platform, prefix)
    }

    /// Registers the calling task, logging a `-=- Registered task: ...`
    /// line if `Config::allow_registration_log` is set. Fatal (does not
    /// return) if the platform is out of task ids or this task already
    /// registered.
    pub fn register_current_task(&self, name: Option<&str>) {
        match self.platform.register_current_task(name) {
            Some(task_id) => {
                if self.config.allow_registration_log {
                    let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
                    push_str(&mut appender, REGISTERED_TASK);
                    if let Some(name) = name {
                        push_str(&mut appender, name);
                    }
                    appender.push(b' ');
                    write_unsigned(&mut appender, &self.config, LogFormat::D3, task_id as u64);
                    appender.flush();
                }
            }
            None => self.platform.fatal(FatalKind::OutOfTaskIdsOrDoubleRegistration),
        }
    }

    pub fn unregister_current_task(&self) {
        if let Some(task_id) = self.platform.unregister_current_task() {
            if self.config.allow_registration_log {
                let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
                push_str(&mut appender, UNREGISTERED_TASK);
                write_unsigned(&mut appender, &self.config, LogFormat::D3, task_id as u64);
                appender.flush();
            }
        }
    }

    fn resolve_task_id(&self, task_id: TaskId) -> TaskId {
        self.platform.current_task_id(task_id)
    }

    fn start_send_no_header(&self, appender: &mut Appender<'_, N, P>) {
        if self.platform.is_interrupt() && !self.config.log_from_isr {
            appender.invalidate();
        }
    }

    fn start_send_no_header_topic(&self, appender: &mut Appender<'_, N, P>, topic: TopicHandle) {
        match self.topics.find(topic) {
            Some(prefix) => {
                self.start_send_no_header(appender);
                push_str(appender, prefix);
                appender.push(b' ');
            }
            None => appender.invalidate(),
        }
    }

    fn start_send(&self, appender: &mut Appender<'_, N, P>) {
        self.start_send_no_header(appender);
        if appender.is_valid() {
            match self.config.task_representation {
                TaskRepresentation::Id => {
                    write_unsigned(
                        appender,
                        &self.config,
                        self.config.task_id_format,
                        appender.task_id() as u64,
                    );
                    appender.push(b' ');
                }
                TaskRepresentation::Name => {
                    push_str(appender, self.platform.current_task_name());
                    appender.push(b' ');
                }
                TaskRepresentation::None => {}
            }
            if self.config.tick_format.is_valid() {
                write_unsigned(
                    appender,
                    &self.config,
                    self.config.tick_format,
                    self.platform.log_time().into(),
                );
                appender.push(b' ');
            }
        }
    }

    fn start_send_topic(&self, appender: &mut Appender<'_, N, P>, topic: TopicHandle) {
        match self.topics.find(topic) {
            Some(prefix) => {
                self.start_send(appender);
                push_str(appender, prefix);
                appender.push(b' ');
            }
            None => appender.invalidate(),
        }
    }

    /// One-shot send with the full header (task/name + tick), no topic.
    pub fn send<V: LogValue>(&self, format: LogFormat, value: V) {
        self.send_as(task::local_task_id::<P>(), format, value);
    }

    pub fn send_as<V: LogValue>(&self, task_id: TaskId, format: LogFormat, value: V) {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send(&mut appender);
        value.write(&mut appender, &self.config, format);
        appender.flush();
    }

    /// One-shot send with the full header plus a registered topic prefix.
    pub fn send_topic<V: LogValue>(&self, topic: TopicHandle, format: LogFormat, value: V) {
        self.send_topic_as(topic, task::local_task_id::<P>(), format, value);
    }

    pub fn send_topic_as<V: LogValue>(
        &self,
        topic: TopicHandle,
        task_id: TaskId,
        format: LogFormat,
        value: V,
    ) {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send_topic(&mut appender, topic);
        value.write(&mut appender, &self.config, format);
        appender.flush();
    }

    /// One-shot send with only the ISR gate applied -- no task/tick
    /// header, no topic.
    pub fn send_no_header<V: LogValue>(&self, format: LogFormat, value: V) {
        self.send_no_header_as(task::local_task_id::<P>(), format, value);
    }

    pub fn send_no_header_as<V: LogValue>(&self, task_id: TaskId, format: LogFormat, value: V) {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send_no_header(&mut appender);
        value.write(&mut appender, &self.config, format);
        appender.flush();
    }

    pub fn send_no_header_topic<V: LogValue>(&self, topic: TopicHandle, format: LogFormat, value: V) {
        self.send_no_header_topic_as(topic, task::local_task_id::<P>(), format, value);
    }

    pub fn send_no_header_topic_as<V: LogValue>(
        &self,
        topic: TopicHandle,
        task_id: TaskId,
        format: LogFormat,
        value: V,
    ) {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send_no_header_topic(&mut appender, topic);
        value.write(&mut appender, &self.config, format);
        appender.flush();
    }

    /// Starts a chained message with the full header, for the calling
    /// task.
    pub fn i(&self) -> ShiftChain<'_, N, P> {
        self.i_as(task::local_task_id::<P>())
    }

    pub fn i_as(&self, task_id: TaskId) -> ShiftChain<'_, N, P> {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send(&mut appender);
        ShiftChain::new(appender, &self.config)
    }

    pub fn i_topic(&self, topic: TopicHandle) -> ShiftChain<'_, N, P> {
        self.i_topic_as(topic, task::local_task_id::<P>())
    }

    pub fn i_topic_as(&self, topic: TopicHandle, task_id: TaskId) -> ShiftChain<'_, N, P> {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send_topic(&mut appender, topic);
        ShiftChain::new(appender, &self.config)
    }

    /// Starts a chained message with only the ISR gate applied.
    pub fn n(&self) -> ShiftChain<'_, N, P> {
        self.n_as(task::local_task_id::<P>())
    }

    pub fn n_as(&self, task_id: TaskId) -> ShiftChain<'_, N, P> {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send_no_header(&mut appender);
        ShiftChain::new(appender, &self.config)
    }

    pub fn n_topic(&self, topic: TopicHandle) -> ShiftChain<'_, N, P> {
        self.n_topic_as(topic, task::local_task_id::<P>())
    }

    pub fn n_topic_as(&self, topic: TopicHandle, task_id: TaskId) -> ShiftChain<'_, N, P> {
        let task_id = self.resolve_task_id(task_id);
        let mut appender = Appender::<N, P>::new(self.platform, task_id, self.config.blocks);
        self.start_send_no_header_topic(&mut appender, topic);
        ShiftChain::new(appender, &self.config)
    }
}

/// The chained-call builder returned by [`Logger::i`]/[`Logger::n`].
///
/// The source returns this from a persistent per-task `Appender` array so
/// a whole `Log::i() << a << b << Log::end;` statement can live across
/// several calls without a dangling reference. Rust's ownership makes
/// that unnecessary: the [`Appender`] is simply moved through the chain
/// by value, so `ShiftChain` owns it outright rather than borrowing into
/// static storage (see DESIGN.md).
pub struct ShiftChain<'a, const N: usize, P: Platform> {
    appender: Appender<'a, N, P>,
    config: &'a Config,
    next_format: LogFormat,
}

impl<'a, const N: usize, P: Platform> ShiftChain<'a, N, P> {
    fn new(appender: Appender<'a, N, P>, config: &'a Config) -> Self {
        Self {
            appender,
            config,
            next_format: LogFormat::INVALID,
        }
    }

    /// Sets the format to use for the *next* value only, then resets to
    /// [`LogFormat::INVALID`] (the type's default).
    pub fn format(mut self, format: LogFormat) -> Self {
        self.next_format = format;
        self
    }

    pub fn value<V: LogValue>(mut self, value: V) -> Self {
        if self.appender.is_valid() {
            value.write(&mut self.appender, self.config, self.next_format);
            self.next_format = LogFormat::INVALID;
        }
        self
    }

    /// Terminates the message (the source's `Log::end` marker).
    pub fn end(mut self) {
        if self.appender.is_valid() {
            self.appender.flush();
        }
    }
}
