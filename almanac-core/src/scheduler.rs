//! Minute tick handling and refresh scheduling
//!
//! Every tick rewrites the time and date. On refresh boundaries (minutes
//! divisible by the configured interval) the scheduler asks for a companion
//! request. It never retries: a failed refresh waits for the next boundary.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::{format_date, format_time, ClockStyle, LocalTime, Tick};
use crate::state::{DisplayState, FieldSet};

/// What to do when a boundary arrives while a request is unanswered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RefreshPolicy {
    /// Send on every boundary
    #[default]
    Always,
    /// Skip one boundary while the previous request is unanswered
    ///
    /// The skip releases the guard, so a lost reply delays the next
    /// request by at most one interval.
    SkipWhilePending,
}

/// Refresh schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RefreshConfig {
    /// Minutes between requests, must divide 60
    pub interval_min: u8,
    pub policy: RefreshPolicy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_min: 30,
            policy: RefreshPolicy::Always,
        }
    }
}

/// Refresh decision for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Not a boundary
    None,
    /// Boundary, send a request now
    Send,
    /// Boundary, but a request is still in flight
    SkippedPending,
}

/// Result of handling a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    pub touched: FieldSet,
    pub refresh: Refresh,
}

/// Tick handler
#[derive(Debug, Clone)]
pub struct Scheduler {
    refresh: RefreshConfig,
    clock_style: ClockStyle,
    pending: bool,
}

impl Scheduler {
    pub fn new(refresh: RefreshConfig, clock_style: ClockStyle) -> Self {
        Self {
            refresh: RefreshConfig {
                interval_min: refresh.interval_min.max(1),
                ..refresh
            },
            clock_style,
            pending: false,
        }
    }

    pub fn refresh_config(&self) -> &RefreshConfig {
        &self.refresh
    }

    /// Whether `time` falls on a refresh boundary
    pub fn is_refresh_due(&self, time: &LocalTime) -> bool {
        time.minute() % self.refresh.interval_min == 0
    }

    /// Write the formatted time and date for `time` into the state
    pub fn update_clock(&self, time: &LocalTime, state: &mut DisplayState) -> FieldSet {
        let text = format_time(time, self.clock_style);
        let date = format_date(time);
        state.set_clock(&text, &date)
    }

    /// Handle one minute tick
    pub fn tick(&mut self, tick: &Tick, state: &mut DisplayState) -> TickOutcome {
        let touched = self.update_clock(&tick.time, state);

        let refresh = if !self.is_refresh_due(&tick.time) {
            Refresh::None
        } else if self.pending && self.refresh.policy == RefreshPolicy::SkipWhilePending {
            self.pending = false;
            Refresh::SkippedPending
        } else {
            Refresh::Send
        };

        TickOutcome { touched, refresh }
    }

    /// A request was handed to the link
    pub fn request_sent(&mut self) {
        self.pending = true;
    }

    /// The transport reported back on the last request
    pub fn request_settled(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Field;
    use proptest::prelude::*;

    fn tick_at(hour: u8, minute: u8) -> Tick {
        Tick::at(LocalTime::new(2024, 3, 6, hour, minute, 0).unwrap())
    }

    fn scheduler(policy: RefreshPolicy) -> Scheduler {
        Scheduler::new(
            RefreshConfig {
                interval_min: 30,
                policy,
            },
            ClockStyle::TwentyFourHour,
        )
    }

    #[test]
    fn test_tick_updates_clock() {
        let mut scheduler = scheduler(RefreshPolicy::Always);
        let mut state = DisplayState::default();

        let outcome = scheduler.tick(&tick_at(10, 17), &mut state);
        assert_eq!(state.time(), "10:17");
        assert_eq!(state.date(), "Wed 06 Mar");
        assert!(outcome.touched.contains(Field::Time));
        assert!(outcome.touched.contains(Field::Date));
        assert_eq!(outcome.refresh, Refresh::None);

        let outcome = scheduler.tick(&tick_at(10, 18), &mut state);
        assert_eq!(
            outcome.touched,
            FieldSet::only(Field::Time) | FieldSet::only(Field::Date)
        );
    }

    #[test]
    fn test_twelve_hour_style() {
        let mut scheduler = Scheduler::new(RefreshConfig::default(), ClockStyle::TwelveHour);
        let mut state = DisplayState::default();
        scheduler.tick(&tick_at(15, 4), &mut state);
        assert_eq!(state.time(), "03:04");
    }

    #[test]
    fn test_refresh_on_boundaries() {
        let mut scheduler = scheduler(RefreshPolicy::Always);
        let mut state = DisplayState::default();

        assert_eq!(scheduler.tick(&tick_at(10, 0), &mut state).refresh, Refresh::Send);
        assert_eq!(scheduler.tick(&tick_at(10, 29), &mut state).refresh, Refresh::None);
        assert_eq!(scheduler.tick(&tick_at(10, 30), &mut state).refresh, Refresh::Send);
        assert_eq!(scheduler.tick(&tick_at(10, 31), &mut state).refresh, Refresh::None);
    }

    #[test]
    fn test_always_policy_ignores_pending() {
        let mut scheduler = scheduler(RefreshPolicy::Always);
        let mut state = DisplayState::default();
        scheduler.request_sent();
        assert_eq!(scheduler.tick(&tick_at(11, 0), &mut state).refresh, Refresh::Send);
    }

    #[test]
    fn test_skip_while_pending() {
        let mut scheduler = scheduler(RefreshPolicy::SkipWhilePending);
        let mut state = DisplayState::default();

        scheduler.request_sent();
        assert_eq!(
            scheduler.tick(&tick_at(11, 0), &mut state).refresh,
            Refresh::SkippedPending
        );
        // One skipped boundary releases the guard
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.tick(&tick_at(11, 30), &mut state).refresh, Refresh::Send);
    }

    #[test]
    fn test_settled_request_allows_next_send() {
        let mut scheduler = scheduler(RefreshPolicy::SkipWhilePending);
        let mut state = DisplayState::default();

        scheduler.request_sent();
        scheduler.request_settled();
        assert_eq!(scheduler.tick(&tick_at(12, 0), &mut state).refresh, Refresh::Send);
    }

    #[test]
    fn test_zero_interval_treated_as_every_minute() {
        let scheduler = Scheduler::new(
            RefreshConfig {
                interval_min: 0,
                policy: RefreshPolicy::Always,
            },
            ClockStyle::TwentyFourHour,
        );
        assert!(scheduler.is_refresh_due(&tick_at(1, 7).time));
    }

    proptest! {
        #[test]
        fn test_one_request_per_interval(interval in prop::sample::select(vec![1u8, 2, 5, 10, 15, 30, 60])) {
            let mut scheduler = Scheduler::new(
                RefreshConfig { interval_min: interval, policy: RefreshPolicy::Always },
                ClockStyle::TwentyFourHour,
            );
            let mut state = DisplayState::default();

            let mut sends = 0usize;
            for hour in 0..24u8 {
                for minute in 0..60u8 {
                    if scheduler.tick(&tick_at(hour, minute), &mut state).refresh == Refresh::Send {
                        sends += 1;
                    }
                }
            }
            prop_assert_eq!(sends, 24 * 60 / interval as usize);
        }
    }
}
