// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Behavioral configuration (§6 "Configuration surface", §10 ambient
//! stack). Buffer *sizes* (queue length, ring length, transmit buffer
//! length) are const generics on [`crate::Logger`], not config fields --
//! see DESIGN.md OQ-4 for why this rewrite departs from the source's
//! runtime-allocated buffers.

/// Reasons a set of compile-time buffer dimensions can't back a working
/// pipeline. Distinct from [`crate::platform::FatalKind`]: those are raised
/// by the platform mid-run (out of task ids, out of topics); this is caught
/// once, at construction time, before any task has sent a single message.
/// Hand-rolled `Display`, no `std::error::Error` impl -- matching the
/// corpus's `circq::QueueFull`/`QueueNotFullEnough` (a `no_std` crate has no
/// use for the `std::error::Error` trait object machinery).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `ChunkSize` (the `N` const generic shared by [`crate::Appender`],
    /// [`crate::circular::CircularBuffer`] and
    /// [`crate::transmit::TransmitBuffers`]) must be at least 2: one byte
    /// for the task id, at least one for payload.
    ChunkSizeTooSmall,
    /// A zero-length ring, transmit buffer, or topic table can never hold a
    /// chunk or a topic; naming the dimension in the error rather than
    /// returning a bare unit variant makes the resulting message useful at
    /// an embedder's init-time `unwrap`/log site.
    ZeroCapacity(&'static str),
    /// `TransmitBuffers`'s flat byte buffer length must equal
    /// `transmit_buffer_chunks * (ChunkSize - 1)` (payload bytes per chunk,
    /// times chunks per buffer); see [`crate::transmit::TransmitBuffers`].
    TransmitBufferLengthMismatch,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ChunkSizeTooSmall => {
                write!(f, "chunk size must be at least 2 bytes")
            }
            ConfigError::ZeroCapacity(what) => write!(f, "{what} capacity must be nonzero"),
            ConfigError::TransmitBufferLengthMismatch => write!(
                f,
                "transmit buffer byte length must equal chunk count * (chunk size - 1)"
            ),
        }
    }
}

/// Numeric base for integer formatting. Anything else is invalid and
/// triggers the `'#'` fallback (§4.2 step 1).
pub mod radix {
    pub const BINARY: u8 = 2;
    pub const DECIMAL: u8 = 10;
    pub const HEXADECIMAL: u8 = 16;
}

/// Base and zero-fill width for rendering a single value.
///
/// `fill == 0` means "natural width, no padding". An invalid `base` (not
/// 2, 10 or 16) instructs the formatter to fall back to the per-type
/// default from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFormat {
    pub base: u8,
    pub fill: u8,
}

impl LogFormat {
    pub const fn new(base: u8, fill: u8) -> Self {
        Self { base, fill }
    }

    pub fn is_valid(&self) -> bool {
        matches!(
            self.base,
            radix::BINARY | radix::DECIMAL | radix::HEXADECIMAL
        )
    }
}

impl LogFormat {
    pub const INVALID: LogFormat = LogFormat::new(0, 0);
    pub const DEFAULT: LogFormat = LogFormat::new(radix::DECIMAL, 0);

    pub const B4: LogFormat = LogFormat::new(radix::BINARY, 4);
    pub const B8: LogFormat = LogFormat::new(radix::BINARY, 8);
    pub const B12: LogFormat = LogFormat::new(radix::BINARY, 12);
    pub const B16: LogFormat = LogFormat::new(radix::BINARY, 16);
    pub const B24: LogFormat = LogFormat::new(radix::BINARY, 24);
    pub const B32: LogFormat = LogFormat::new(radix::BINARY, 32);

    pub const D1: LogFormat = LogFormat::new(radix::DECIMAL, 1);
    pub const D2: LogFormat = LogFormat::new(radix::DECIMAL, 2);
    pub const D3: LogFormat = LogFormat::new(radix::DECIMAL, 3);
    pub const D4: LogFormat = LogFormat::new(radix::DECIMAL, 4);
    pub const D5: LogFormat = LogFormat::new(radix::DECIMAL, 5);
    pub const D6: LogFormat = LogFormat::new(radix::DECIMAL, 6);
    pub const D7: LogFormat = LogFormat::new(radix::DECIMAL, 7);
    pub const D8: LogFormat = LogFormat::new(radix::DECIMAL, 8);
    pub const D16: LogFormat = LogFormat::new(radix::DECIMAL, 16);

    pub const X1: LogFormat = LogFormat::new(radix::HEXADECIMAL, 1);
    pub const X2: LogFormat = LogFormat::new(radix::HEXADECIMAL, 2);
    pub const X3: LogFormat = LogFormat::new(radix::HEXADECIMAL, 3);
    pub const X4: LogFormat = LogFormat::new(radix::HEXADECIMAL, 4);
    pub const X6: LogFormat = LogFormat::new(radix::HEXADECIMAL, 6);
    pub const X8: LogFormat = LogFormat::new(radix::HEXADECIMAL, 8);
    pub const X16: LogFormat = LogFormat::new(radix::HEXADECIMAL, 16);
}

/// How (or whether) to identify the sending task in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRepresentation {
    None,
    Id,
    Name,
}

/// Per-type default `LogFormat`s, used whenever a call site passes
/// [`LogFormat::INVALID`] (or any other format that fails
/// [`LogFormat::is_valid`]). The source keeps eleven of these
/// (`int8Format` .. `longDoubleFormat`); `f64` stands in for the source's
/// distinct `long double` default since Rust has no three-tier float type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFormats {
    pub i8: LogFormat,
    pub i16: LogFormat,
    pub i32: LogFormat,
    pub i64: LogFormat,
    pub u8: LogFormat,
    pub u16: LogFormat,
    pub u32: LogFormat,
    pub u64: LogFormat,
    pub f32: LogFormat,
    pub f64: LogFormat,
}

impl Default for DefaultFormats {
    fn default() -> Self {
        Self {
            i8: LogFormat::DEFAULT,
            i16: LogFormat::DEFAULT,
            i32: LogFormat::DEFAULT,
            i64: LogFormat::DEFAULT,
            u8: LogFormat::DEFAULT,
            u16: LogFormat::DEFAULT,
            u32: LogFormat::DEFAULT,
            u64: LogFormat::DEFAULT,
            f32: LogFormat::D5,
            f64: LogFormat::D8,
        }
    }
}

/// Behavioral configuration for a [`crate::Logger`] instance. Buffer
/// *sizes* live in the const generics of `Logger` itself; this struct
/// holds everything that doesn't change the memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Emit a `-=- Registered task: NAME (ID) -=-` / `-=- Unregistered
    /// task: ID -=-` line on task (un)registration.
    pub allow_registration_log: bool,

    /// Allow logging calls made from interrupt context. When false, a call
    /// with `is_interrupt() == true` is silently dropped at entry.
    pub log_from_isr: bool,

    /// Whether a non-blocking producer queue push may block instead of
    /// dropping the chunk on overflow.
    pub blocks: bool,

    /// How to represent the sending task in the header.
    pub task_representation: TaskRepresentation,

    /// Emit `0b`/`0x` before non-decimal integers.
    pub append_base_prefix: bool,

    /// Format used to render the task id in the header (when
    /// `task_representation == Id`).
    pub task_id_format: LogFormat,

    /// Format used to render the tick in the header. Use
    /// [`LogFormat::INVALID`] to omit the tick entirely.
    pub tick_format: LogFormat,

    /// Per-type fallback formats.
    pub defaults: DefaultFormats,

    /// Prepend a space to positive numbers so they align with negatives
    /// under a fixed-width font.
    pub align_signed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_registration_log: true,
            log_from_isr: false,
            blocks: true,
            task_representation: TaskRepresentation::Id,
            append_base_prefix: false,
            task_id_format: LogFormat::X2,
            tick_format: LogFormat::D5,
            defaults: DefaultFormats::default(),
            align_signed: false,
        }
    }
}
