//! Text construction for display fields
//!
//! Every display field has a fixed capacity. Values that don't fit are cut
//! at the capacity instead of being rejected.

use core::fmt::{self, Write};

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::{BATTERY_LEN, RATE_LEN, TEMPERATURE_LEN};

/// Placeholder shown for weather and rate fields before the first reply
pub const PLACEHOLDER: &str = "..";

/// Writer that silently drops whatever exceeds the capacity
struct Clip<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Clip<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render formatted text into a fixed-capacity string, truncating
pub fn clipped<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    // Clip never reports an error
    let _ = Clip(&mut out).write_fmt(args);
    out
}

/// Copy a string into a fixed-capacity string, truncating
pub fn clip<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    let _ = Clip(&mut out).write_str(text);
    out
}

/// How the exchange rate is rendered from an integer in hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RateStyle {
    /// Two-digit fraction, sign in front: 5 -> `$=0.05`, -5 -> `$=-0.05`
    #[default]
    Padded,
    /// Whole and fractional parts printed as plain integers:
    /// 5 -> `$=0.5`, -5 -> `$=0.-5`
    Legacy,
}

/// `+21C`, `-3C`, `+0C`
pub fn format_temperature(celsius: i32) -> String<TEMPERATURE_LEN> {
    clipped(format_args!("{:+}C", celsius))
}

/// Exchange rate text for a value in hundredths
pub fn format_rate(cents: i32, style: RateStyle) -> String<RATE_LEN> {
    match style {
        RateStyle::Padded => {
            let sign = if cents < 0 { "-" } else { "" };
            let abs = cents.unsigned_abs();
            clipped(format_args!("$={}{}.{:02}", sign, abs / 100, abs % 100))
        }
        RateStyle::Legacy => clipped(format_args!("$={}.{}", cents / 100, cents % 100)),
    }
}

/// `87%`
pub fn format_battery(percent: u8) -> String<BATTERY_LEN> {
    clipped(format_args!("{}%", percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_temperature_sign() {
        assert_eq!(format_temperature(21), "+21C");
        assert_eq!(format_temperature(-3), "-3C");
        assert_eq!(format_temperature(0), "+0C");
    }

    #[test]
    fn test_temperature_truncated_to_capacity() {
        // "-2147483648C" is longer than the field
        let text = format_temperature(i32::MIN);
        assert_eq!(text.len(), TEMPERATURE_LEN);
        assert_eq!(text, "-2147483");
    }

    #[test]
    fn test_rate_padded() {
        assert_eq!(format_rate(12345, RateStyle::Padded), "$=123.45");
        assert_eq!(format_rate(5, RateStyle::Padded), "$=0.05");
        assert_eq!(format_rate(-5, RateStyle::Padded), "$=-0.05");
        assert_eq!(format_rate(-12345, RateStyle::Padded), "$=-123.45");
        assert_eq!(format_rate(0, RateStyle::Padded), "$=0.00");
    }

    #[test]
    fn test_rate_legacy() {
        assert_eq!(format_rate(12345, RateStyle::Legacy), "$=123.45");
        assert_eq!(format_rate(5, RateStyle::Legacy), "$=0.5");
        assert_eq!(format_rate(-5, RateStyle::Legacy), "$=0.-5");
        assert_eq!(format_rate(100, RateStyle::Legacy), "$=1.0");
    }

    #[test]
    fn test_rate_extremes_fit() {
        assert_eq!(format_rate(i32::MIN, RateStyle::Padded), "$=-21474836.48");
        assert_eq!(format_rate(i32::MIN, RateStyle::Legacy), "$=-21474836.-48");
    }

    #[test]
    fn test_battery() {
        assert_eq!(format_battery(87), "87%");
        assert_eq!(format_battery(100), "100%");
        assert_eq!(format_battery(0), "0%");
    }

    #[test]
    fn test_clip_stops_at_capacity() {
        let text: String<4> = clip("Thunderstorm");
        assert_eq!(text, "Thun");
    }

    proptest! {
        #[test]
        fn test_padded_rate_reads_back(cents in any::<i32>()) {
            let text = format_rate(cents, RateStyle::Padded);
            let digits: std::string::String = text[2..].chars().filter(|c| *c != '.').collect();
            prop_assert_eq!(digits.parse::<i64>().unwrap(), i64::from(cents));
        }

        #[test]
        fn test_temperature_always_signed(celsius in -999i32..=9999) {
            let text = format_temperature(celsius);
            prop_assert!(text.starts_with('+') || text.starts_with('-'));
            prop_assert!(text.ends_with('C'));
        }
    }
}
