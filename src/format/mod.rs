// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Allocation-free formatting primitives (C1).
//!
//! Every primitive writes through an [`Appender`] one byte at a time, using
//! only a fixed stack scratch buffer (`DEFAULT_SCRATCH_LEN` bytes) for
//! digit extraction -- no heap, no `alloc`, matching §1's "must run
//! without dynamic allocation on a fixed stack scratch area".

mod float;
mod int;

pub use float::write_float;
pub use int::{write_signed, write_unsigned, DEFAULT_SCRATCH_LEN};

use crate::appender::Appender;
use crate::config::{Config, LogFormat};
use crate::platform::Platform;

pub(crate) const DIGIT_CHARS: [u8; 16] = *b"0123456789abcdef";

/// A value that knows how to render itself through an [`Appender`].
///
/// This is the idiomatic-Rust replacement for the source's overload set of
/// `append(Appender&, LogFormat, T)` free functions: one `impl` per type
/// instead of one overload per type, dispatched at the call site the same
/// way `i() << value` selected an overload in C++.
pub trait LogValue {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        config: &Config,
        format: LogFormat,
    );
}

fn write_str<const N: usize, P: Platform>(appender: &mut Appender<'_, N, P>, s: &str) {
    for &b in s.as_bytes() {
        appender.push(b);
    }
}

impl LogValue for bool {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        _config: &Config,
        _format: LogFormat,
    ) {
        write_str(appender, if *self { "true" } else { "false" });
    }
}

impl LogValue for char {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        _config: &Config,
        _format: LogFormat,
    ) {
        let mut buf = [0u8; 4];
        write_str(appender, self.encode_utf8(&mut buf));
    }
}

impl LogValue for str {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        _config: &Config,
        _format: LogFormat,
    ) {
        write_str(appender, self);
    }
}

impl LogValue for &str {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        config: &Config,
        format: LogFormat,
    ) {
        (**self).write(appender, config, format);
    }
}

/// Mirrors the source's "null string pointer prints nothing" behavior for
/// an optional string argument.
impl LogValue for Option<&str> {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        config: &Config,
        format: LogFormat,
    ) {
        if let Some(s) = self {
            s.write(appender, config, format);
        }
    }
}

macro_rules! impl_log_value_signed {
    ($t:ty, $default:ident) => {
        impl LogValue for $t {
            fn write<const N: usize, P: Platform>(
                &self,
                appender: &mut Appender<'_, N, P>,
                config: &Config,
                format: LogFormat,
            ) {
                let format = if format.is_valid() {
                    format
                } else {
                    config.defaults.$default
                };
                write_signed(appender, config, format, *self as i64);
            }
        }
    };
}

macro_rules! impl_log_value_unsigned {
    ($t:ty, $default:ident) => {
        impl LogValue for $t {
            fn write<const N: usize, P: Platform>(
                &self,
                appender: &mut Appender<'_, N, P>,
                config: &Config,
                format: LogFormat,
            ) {
                let format = if format.is_valid() {
                    format
                } else {
                    config.defaults.$default
                };
                write_unsigned(appender, config, format, *self as u64);
            }
        }
    };
}

impl_log_value_signed!(i8, i8);
impl_log_value_signed!(i16, i16);
impl_log_value_signed!(i32, i32);
impl_log_value_signed!(i64, i64);
impl_log_value_unsigned!(u8, u8);
impl_log_value_unsigned!(u16, u16);
impl_log_value_unsigned!(u32, u32);
impl_log_value_unsigned!(u64, u64);

impl LogValue for f32 {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        config: &Config,
        format: LogFormat,
    ) {
        let fill = if format.is_valid() {
            format.fill
        } else {
            config.defaults.f32.fill
        };
        write_float(appender, config, *self as f64, fill.max(1));
    }
}

impl LogValue for f64 {
    fn write<const N: usize, P: Platform>(
        &self,
        appender: &mut Appender<'_, N, P>,
        config: &Config,
        format: LogFormat,
    ) {
        let fill = if format.is_valid() {
            format.fill
        } else {
            config.defaults.f64.fill
        };
        write_float(appender, config, *self, fill.max(1));
    }
}
