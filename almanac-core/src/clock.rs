//! Wall-clock time and minute ticks
//!
//! The host provides local wall-clock readings; [`MinuteClock`] turns a
//! stream of readings into one [`Tick`] per minute boundary, the way a
//! minute-granularity tick service would.

use core::ops::BitOr;

use heapless::String;

use crate::format::clipped;
use crate::state::{DATE_LEN, TIME_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Weekday from a day count where 0 is Sunday
    fn from_sunday_offset(days: u32) -> Self {
        match days % 7 {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    /// Three-letter English abbreviation
    pub fn abbrev(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Local wall-clock time with second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    year: u16,
    month: u8,
    day: u8,
    weekday: Weekday,
    hour: u8,
    minute: u8,
    second: u8,
}

impl LocalTime {
    /// Build a local time, returning `None` if any field is out of range
    ///
    /// The weekday is derived from the date.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if !(1..=9999).contains(&year)
            || !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }

        // Sakamoto's method
        const OFFSETS: [u32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let y = u32::from(if month < 3 { year - 1 } else { year });
        let days = y + y / 4 - y / 100 + y / 400 + OFFSETS[month as usize - 1] + u32::from(day);

        Some(Self {
            year,
            month,
            day,
            weekday: Weekday::from_sunday_offset(days),
            hour,
            minute,
            second,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Three-letter English month abbreviation
    pub fn month_abbrev(&self) -> &'static str {
        MONTH_ABBREV[self.month as usize - 1]
    }

    /// Units that differ between `self` and `other`
    pub fn changed_units(&self, other: &LocalTime) -> TimeUnits {
        let mut units = TimeUnits::empty();
        if self.year != other.year {
            units.insert(TimeUnits::YEAR);
        }
        if self.month != other.month {
            units.insert(TimeUnits::MONTH);
        }
        if self.day != other.day {
            units.insert(TimeUnits::DAY);
        }
        if self.hour != other.hour {
            units.insert(TimeUnits::HOUR);
        }
        if self.minute != other.minute {
            units.insert(TimeUnits::MINUTE);
        }
        if self.second != other.second {
            units.insert(TimeUnits::SECOND);
        }
        units
    }
}

/// Set of calendar units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const SECOND: Self = Self(1 << 0);
    pub const MINUTE: Self = Self(1 << 1);
    pub const HOUR: Self = Self(1 << 2);
    pub const DAY: Self = Self(1 << 3);
    pub const MONTH: Self = Self(1 << 4);
    pub const YEAR: Self = Self(1 << 5);
    pub const ALL: Self = Self(0b11_1111);

    /// Units at minute granularity or coarser
    const MINUTE_OR_COARSER: Self = Self(0b11_1110);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for TimeUnits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A minute tick: the current time and the units that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    pub time: LocalTime,
    pub changed: TimeUnits,
}

impl Tick {
    /// A plain minute tick at `time`
    pub fn at(time: LocalTime) -> Self {
        Self {
            time,
            changed: TimeUnits::MINUTE,
        }
    }
}

/// Hour display convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockStyle {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "24h"))]
    TwentyFourHour,
    #[cfg_attr(feature = "serde", serde(rename = "12h"))]
    TwelveHour,
}

/// Minute boundary detector
///
/// Fed with wall-clock readings at any rate (typically once a second), it
/// yields a [`Tick`] on the first reading and whenever the minute or a
/// coarser unit changes. Backwards jumps count as changes too.
#[derive(Debug, Clone, Default)]
pub struct MinuteClock {
    last: Option<LocalTime>,
}

impl MinuteClock {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record a reading, returning a tick if a minute boundary was crossed
    pub fn observe(&mut self, now: LocalTime) -> Option<Tick> {
        let changed = match self.last.replace(now) {
            None => TimeUnits::ALL,
            Some(prev) => {
                let coarse = prev.changed_units(&now).intersection(TimeUnits::MINUTE_OR_COARSER);
                if coarse.is_empty() {
                    return None;
                }
                coarse | TimeUnits::MINUTE
            }
        };
        Some(Tick { time: now, changed })
    }

    /// Last reading seen, if any
    pub fn last(&self) -> Option<&LocalTime> {
        self.last.as_ref()
    }
}

/// Format the time as `HH:MM` (24h) or `hh:MM` (12h)
pub fn format_time(time: &LocalTime, style: ClockStyle) -> String<TIME_LEN> {
    let hour = match style {
        ClockStyle::TwentyFourHour => time.hour,
        ClockStyle::TwelveHour => match time.hour % 12 {
            0 => 12,
            h => h,
        },
    };
    clipped(format_args!("{:02}:{:02}", hour, time.minute))
}

/// Format the date as `Wkd DD Mon`
pub fn format_date(time: &LocalTime) -> String<DATE_LEN> {
    clipped(format_args!(
        "{} {:02} {}",
        time.weekday.abbrev(),
        time.day,
        time.month_abbrev()
    ))
}
