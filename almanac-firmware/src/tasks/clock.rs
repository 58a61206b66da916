//! Clock task
//!
//! Polls the RTC once a second and turns minute boundaries into ticks.

use almanac_core::clock::{LocalTime, MinuteClock};
use defmt::*;
use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_time::{Duration, Ticker};

use crate::channels::{WatchEvent, WATCH_EVENTS};

/// RTC poll interval
const POLL_INTERVAL_MS: u64 = 1000;

/// Time the RTC starts from when it has never been set
const FALLBACK_TIME: DateTime = DateTime {
    year: 2024,
    month: 1,
    day: 1,
    day_of_week: DayOfWeek::Monday,
    hour: 0,
    minute: 0,
    second: 0,
};

/// Read the RTC as local time
pub fn read_time(rtc: &Rtc<'static, RTC>) -> Option<LocalTime> {
    let now = rtc.now().ok()?;
    LocalTime::new(now.year, now.month, now.day, now.hour, now.minute, now.second)
}

/// Start the RTC if it isn't running and return the current time
pub fn start_rtc(rtc: &mut Rtc<'static, RTC>) -> LocalTime {
    if let Some(now) = read_time(rtc) {
        return now;
    }

    warn!("RTC not set, starting from 2024-01-01 00:00");
    if rtc.set_datetime(FALLBACK_TIME).is_err() {
        error!("Failed to set RTC");
    }
    unwrap!(LocalTime::new(2024, 1, 1, 0, 0, 0))
}

/// Clock task - emits one tick per minute boundary
///
/// `boot` is the reading the face was first drawn with, so the boot
/// minute does not tick a second time.
#[embassy_executor::task]
pub async fn clock_task(rtc: Rtc<'static, RTC>, boot: LocalTime) {
    info!("Clock task started");

    let mut clock = MinuteClock::new();
    clock.observe(boot);

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        let Some(now) = read_time(&rtc) else {
            warn!("RTC read failed");
            continue;
        };

        if let Some(tick) = clock.observe(now) {
            trace!("Tick {}:{}", now.hour(), now.minute());
            WATCH_EVENTS.send(WatchEvent::Tick(tick)).await;
        }
    }
}
