// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based realizations of the specification's round-trip
//! properties: rendered integers parse back to the same value (P5) and
//! rendered floats parse back within the documented tolerance (P6).

use proptest::prelude::*;

use chunklog::appender::Appender;
use chunklog::chunk::END_OF_MESSAGE;
use chunklog::config::{radix, Config, LogFormat};
use chunklog::format::{write_float, write_signed, write_unsigned};
use chunklog::mock::MockPlatform;

fn render(config: &Config, f: impl FnOnce(&mut Appender<'_, 32, MockPlatform<32>>)) -> String {
    let platform = MockPlatform::<32>::new(8, 64);
    let mut appender = Appender::<32, _>::new(&platform, 0, true);
    f(&mut appender);
    appender.flush();
    let mut out = Vec::new();
    'outer: while let Some(chunk) = platform.pop_pushed() {
        for &b in chunk.payload() {
            if b == END_OF_MESSAGE {
                break 'outer;
            }
            out.push(b);
        }
    }
    String::from_utf8(out).expect("rendered output is ASCII")
}

fn parse_rendered(rendered: &str, base: u8) -> (bool, u64) {
    // Rendering order is prefix, then sign (§4.2 steps 2 and 4), so the
    // prefix has to be stripped before we can see the sign.
    let mut s = rendered.trim_start();
    if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0x")) {
        s = rest;
    }
    let negative = s.starts_with('-');
    if negative || s.starts_with(' ') {
        s = &s[1..];
    }
    let magnitude = u64::from_str_radix(s, base as u32).expect("parseable digits");
    (negative, magnitude)
}

fn arb_base() -> impl Strategy<Value = u8> {
    prop_oneof![
        Just(radix::BINARY),
        Just(radix::DECIMAL),
        Just(radix::HEXADECIMAL),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn p5_signed_round_trip(value in any::<i64>(), base in arb_base(), fill in 0u8..20, prefix in any::<bool>()) {
        let format = LogFormat::new(base, fill);
        let mut config = Config::default();
        config.append_base_prefix = prefix;
        let rendered = render(&config, |a| write_signed(a, &config, format, value));
        let (negative, magnitude) = parse_rendered(&rendered, base);
        prop_assert_eq!(magnitude, value.unsigned_abs());
        prop_assert_eq!(negative, value < 0);
    }

    #[test]
    fn p5_unsigned_round_trip(value in any::<u64>(), base in arb_base(), fill in 0u8..20, prefix in any::<bool>()) {
        let format = LogFormat::new(base, fill);
        let mut config = Config::default();
        config.append_base_prefix = prefix;
        let rendered = render(&config, |a| write_unsigned(a, &config, format, value));
        let (negative, magnitude) = parse_rendered(&rendered, base);
        prop_assert!(!negative);
        prop_assert_eq!(magnitude, value);
    }

    #[test]
    fn p6_float_round_trip_within_tolerance(
        value in (-1e30f64..1e30f64).prop_filter("nonzero", |v| *v != 0.0),
        digits in 1u8..12,
    ) {
        let config = Config::default();
        let rendered = render(&config, |a| write_float(a, &config, value, digits));
        let parsed: f64 = rendered.parse().expect("scientific notation parses");
        let relative_error = ((parsed - value) / value).abs();
        let tolerance = 10f64.powi(1 - digits as i32) * 1.01;
        prop_assert!(
            relative_error <= tolerance,
            "relative error {relative_error} exceeds tolerance {tolerance} for {value} rendered {rendered:?}"
        );
    }
}
