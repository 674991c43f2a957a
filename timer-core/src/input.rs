//! Countdown input coercion. Malformed input is never rejected, it is
//! clamped into range and written back so the user sees the correction.

use std::ops::RangeInclusive;

use crate::boundary::Presenter;

pub const MINUTES_RANGE: RangeInclusive<i64> = 0..=999;
pub const SECONDS_RANGE: RangeInclusive<i64> = 0..=59;

/// Clamped countdown target as entered by the user.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CountdownTarget {
    pub minutes: u32,
    pub seconds: u32,
}

impl CountdownTarget {
    pub fn from_raw(minutes: &str, seconds: &str) -> Self {
        Self {
            minutes: clamp_field(minutes, MINUTES_RANGE),
            seconds: clamp_field(seconds, SECONDS_RANGE),
        }
    }

    pub fn as_ms(&self) -> u64 {
        self.minutes as u64 * 60_000 + self.seconds as u64 * 1000
    }
}

/// Parse the leading integer of `raw`: optional sign, then digits. Anything
/// after the digits (a fraction, units, junk) is ignored, so `"3.7"` is 3.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let magnitude = digits[..len]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));
    Some(if negative { -magnitude } else { magnitude })
}

/// Coerce one raw field into `range`. Unparseable input becomes the lower
/// bound.
pub fn clamp_field(raw: &str, range: RangeInclusive<i64>) -> u32 {
    let value = parse_leading_int(raw).unwrap_or(*range.start());
    value.clamp(*range.start(), *range.end()) as u32
}

/// Read both countdown fields, write the clamped values back and return the
/// target in milliseconds.
pub fn read_countdown_ms<P: Presenter>(ui: &mut P) -> u64 {
    let target = CountdownTarget::from_raw(&ui.read_minutes_input(), &ui.read_seconds_input());
    ui.write_minutes_input(target.minutes);
    ui.write_seconds_input(target.seconds);
    target.as_ms()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingPresenter;

    #[test]
    fn test_clamp_minutes() {
        assert_eq!(clamp_field("-5", MINUTES_RANGE), 0);
        assert_eq!(clamp_field("1500", MINUTES_RANGE), 999);
        assert_eq!(clamp_field("25", MINUTES_RANGE), 25);
    }

    #[test]
    fn test_clamp_seconds() {
        assert_eq!(clamp_field("75", SECONDS_RANGE), 59);
        assert_eq!(clamp_field("0", SECONDS_RANGE), 0);
        assert_eq!(clamp_field("59", SECONDS_RANGE), 59);
    }

    #[test]
    fn test_garbage_maps_to_minimum() {
        assert_eq!(clamp_field("", MINUTES_RANGE), 0);
        assert_eq!(clamp_field("abc", SECONDS_RANGE), 0);
        assert_eq!(clamp_field("-", SECONDS_RANGE), 0);
    }

    #[test]
    fn test_fraction_and_suffix_are_floored() {
        assert_eq!(clamp_field("3.7", MINUTES_RANGE), 3);
        assert_eq!(clamp_field("  12min", MINUTES_RANGE), 12);
        assert_eq!(clamp_field("+8", SECONDS_RANGE), 8);
    }

    #[test]
    fn test_huge_values_saturate() {
        assert_eq!(clamp_field("99999999999999999999999", MINUTES_RANGE), 999);
        assert_eq!(clamp_field("-99999999999999999999999", MINUTES_RANGE), 0);
    }

    #[test]
    fn test_target_ms() {
        let target = CountdownTarget::from_raw("2", "30");
        assert_eq!(target, CountdownTarget { minutes: 2, seconds: 30 });
        assert_eq!(target.as_ms(), 150_000);
    }

    #[test]
    fn test_read_countdown_ms_writes_back() {
        let mut ui = RecordingPresenter::with_inputs("1500", "75");
        assert_eq!(read_countdown_ms(&mut ui), 999 * 60_000 + 59_000);
        assert_eq!(ui.minutes_input, "999");
        assert_eq!(ui.seconds_input, "59");

        let mut ui = RecordingPresenter::with_inputs("-5", "abc");
        assert_eq!(read_countdown_ms(&mut ui), 0);
        assert_eq!(ui.minutes_input, "0");
        assert_eq!(ui.seconds_input, "0");
    }
}
