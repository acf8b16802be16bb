// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::DIGIT_CHARS;
use crate::appender::Appender;
use crate::config::{radix, Config, LogFormat};
use crate::platform::Platform;

/// Digit scratch buffer length. The source defaults
/// `tSizeofIntegerConversion` to 70, large enough for a 64-bit value
/// rendered in binary (64 digits) plus headroom; it's never reachable in
/// practice for base 10/16, only base 2.
pub const DEFAULT_SCRATCH_LEN: usize = 70;

/// Renders `magnitude` in `format.base`, left-padded with `'0'` to at least
/// `format.fill` digits, with `sign` emitted first (a `-`, a aligning
/// space, or nothing). An invalid `format` or a magnitude too wide for the
/// scratch buffer falls back to a bare `'#'` (§4.2 step 1 / overflow case).
fn write_magnitude<const N: usize, P: Platform>(
    appender: &mut Appender<'_, N, P>,
    config: &Config,
    format: LogFormat,
    magnitude: u64,
    negative: bool,
) {
    if !format.is_valid() {
        appender.push(b'#');
        return;
    }

    if config.append_base_prefix {
        match format.base {
            radix::BINARY => {
                appender.push(b'0');
                appender.push(b'b');
            }
            radix::HEXADECIMAL => {
                appender.push(b'0');
                appender.push(b'x');
            }
            _ => {}
        }
    }

    let base = format.base as u64;
    let mut scratch = [0u8; DEFAULT_SCRATCH_LEN];
    let mut where_ = 0usize;
    let mut value = magnitude;
    loop {
        scratch[where_] = DIGIT_CHARS[(value % base) as usize];
        where_ += 1;
        value /= base;
        if value == 0 || where_ == DEFAULT_SCRATCH_LEN {
            break;
        }
    }

    if where_ >= DEFAULT_SCRATCH_LEN && value != 0 {
        appender.push(b'#');
        return;
    }

    if negative {
        appender.push(b'-');
    } else if config.align_signed && format.fill > 0 {
        appender.push(b' ');
    }

    let fill = format.fill as usize;
    if fill > where_ {
        for _ in 0..(fill - where_) {
            appender.push(b'0');
        }
    }

    for i in (1..where_).rev() {
        appender.push(scratch[i]);
    }
    appender.push(scratch[0]);
}

/// Entry point for signed integer types. `format` is the call-site format
/// (already resolved to the type's default if the caller's was invalid).
pub fn write_signed<const N: usize, P: Platform>(
    appender: &mut Appender<'_, N, P>,
    config: &Config,
    format: LogFormat,
    value: i64,
) {
    write_magnitude(appender, config, format, value.unsigned_abs(), value < 0);
}

/// Entry point for unsigned integer types.
pub fn write_unsigned<const N: usize, P: Platform>(
    appender: &mut Appender<'_, N, P>,
    config: &Config,
    format: LogFormat,
    value: u64,
) {
    write_magnitude(appender, config, format, value, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;

    fn rendered<const N: usize>(
        platform: &MockPlatform<N>,
        f: impl FnOnce(&mut Appender<'_, N, MockPlatform<N>>),
    ) -> String {
        let mut appender = Appender::<N, _>::new(platform, 0, true);
        f(&mut appender);
        appender.flush();
        let mut out = String::new();
        while let Some(chunk) = platform.pop_pushed() {
            for &b in chunk.payload() {
                if b == crate::chunk::END_OF_MESSAGE {
                    break;
                }
                out.push(b as char);
            }
        }
        out
    }

    #[test]
    fn decimal_default() {
        let platform = MockPlatform::<16>::new(16, 16);
        let s = rendered(&platform, |a| {
            write_signed(a, &Config::default(), LogFormat::DEFAULT, -42)
        });
        assert_eq!(s, "-42");
    }

    #[test]
    fn hex_with_fill() {
        let platform = MockPlatform::<16>::new(16, 16);
        let s = rendered(&platform, |a| {
            write_unsigned(a, &Config::default(), LogFormat::X4, 0xAB)
        });
        assert_eq!(s, "00ab");
    }

    #[test]
    fn invalid_format_yields_hash() {
        let platform = MockPlatform::<16>::new(16, 16);
        let s = rendered(&platform, |a| {
            write_unsigned(a, &Config::default(), LogFormat::new(7, 0), 5)
        });
        assert_eq!(s, "#");
    }

    #[test]
    fn align_signed_pads_positive_with_space() {
        let mut config = Config::default();
        config.align_signed = true;
        let platform = MockPlatform::<16>::new(16, 16);
        let s = rendered(&platform, |a| {
            write_signed(a, &config, LogFormat::D3, 7)
        });
        assert_eq!(s, " 007");
    }

    #[test]
    fn base_prefix_is_emitted_when_configured() {
        let mut config = Config::default();
        config.append_base_prefix = true;
        let platform = MockPlatform::<16>::new(16, 16);
        let s = rendered(&platform, |a| write_unsigned(a, &config, LogFormat::X2, 15));
        assert_eq!(s, "0x0f");
    }
}
