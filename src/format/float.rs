// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::int::write_signed;
use super::DIGIT_CHARS;
use crate::appender::Appender;
use crate::config::{radix, Config, LogFormat};
use crate::platform::Platform;

/// Renders `value` as `[-][d].[ddd]e[+-]X` with `digits` total significant
/// digits (§4.2 "Float formatting"). `nan`/`inf`/`0` are special-cased; a
/// negative zero prints as `0` (sign is only ever attached to the
/// normalized mantissa, which is computed from `value.abs()`). The exponent
/// is rendered with fill 0, per step 5's "the exponent as a decimal integer
/// with fill 0" and `Log.h`'s own `append(..., exponent, 10, 0u)` -- it is
/// not zero-padded to a fixed width.
pub fn write_float<const N: usize, P: Platform>(
    appender: &mut Appender<'_, N, P>,
    config: &Config,
    value: f64,
    digits: u8,
) {
    if value.is_nan() {
        for &b in b"nan" {
            appender.push(b);
        }
        return;
    }
    if value.is_infinite() {
        if value < 0.0 {
            appender.push(b'-');
        }
        for &b in b"inf" {
            appender.push(b);
        }
        return;
    }
    if value == 0.0 {
        appender.push(b'0');
        return;
    }

    let mut v = value;
    if v < 0.0 {
        v = -v;
        appender.push(b'-');
    } else if config.align_signed {
        appender.push(b' ');
    }

    let exponent = v.log10().floor() as i32;
    let mut normalized = v / 10f64.powi(exponent);

    let digits = digits.max(1);
    for i in 1..digits {
        let mut first_digit = normalized as i64;
        if first_digit > 9 {
            first_digit = 9;
        }
        appender.push(DIGIT_CHARS[first_digit as usize]);
        normalized = 10.0 * (normalized - first_digit as f64);
        if i == 1 {
            appender.push(b'.');
        }
    }
    let mut last_digit = normalized.round() as i64;
    if last_digit > 9 {
        last_digit = 9;
    }
    appender.push(DIGIT_CHARS[last_digit as usize]);

    appender.push(b'e');
    if exponent >= 0 {
        appender.push(b'+');
    }
    write_signed(
        appender,
        config,
        LogFormat::new(radix::DECIMAL, 0),
        exponent as i64,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;

    fn rendered(value: f64, digits: u8) -> String {
        let platform = MockPlatform::<16>::new(16, 16);
        let mut appender = Appender::<16, _>::new(&platform, 0, true);
        write_float(&mut appender, &Config::default(), value, digits);
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
    fn zero_is_bare() {
        assert_eq!(rendered(0.0, 5), "0");
    }

    #[test]
    fn nan_and_inf() {
        assert_eq!(rendered(f64::NAN, 5), "nan");
        assert_eq!(rendered(f64::INFINITY, 5), "inf");
        assert_eq!(rendered(f64::NEG_INFINITY, 5), "-inf");
    }

    #[test]
    fn scientific_form_for_small_value() {
        let s = rendered(1.2345, 5);
        assert_eq!(s, "1.2345e+0");
    }

    #[test]
    fn exponent_is_not_zero_padded() {
        // digits total = 5, exponent -2; fill 0 means "-2", not "-02".
        let s = rendered(0.012345, 5);
        assert_eq!(s, "1.2345e-2");
    }

    #[test]
    fn negative_value_keeps_sign_outside_mantissa() {
        let s = rendered(-98.6, 3);
        assert!(s.starts_with('-'));
        assert!(s.contains('e'));
    }
}
