//! Battery monitor task
//!
//! Samples VSYS through the ADC and VBUS presence through a GPIO, and
//! reports the charge state whenever it changes.

use almanac_core::battery::{charge_percent_from_millivolts, BatteryChargeState, BatteryConfig};
use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use crate::channels::{WatchEvent, WATCH_EVENTS};

/// Sample interval
const SAMPLE_INTERVAL_S: u64 = 30;

/// ADC reference voltage in millivolts
const ADC_REF_MV: u32 = 3300;

/// ADC full-scale count (12-bit)
const ADC_MAX: u32 = 4096;

/// VSYS is divided by 3 before the ADC pin
const VSYS_DIVIDER: u32 = 3;

/// Convert a raw ADC count on the VSYS pin to millivolts
fn vsys_millivolts(raw: u16) -> u16 {
    (u32::from(raw) * VSYS_DIVIDER * ADC_REF_MV / ADC_MAX) as u16
}

/// Battery sensing hardware
pub struct BatteryMonitor {
    adc: Adc<'static, Async>,
    vsys: Channel<'static>,
    vbus: Input<'static>,
    config: BatteryConfig,
}

impl BatteryMonitor {
    pub fn new(
        adc: Adc<'static, Async>,
        vsys: Channel<'static>,
        vbus: Input<'static>,
        config: BatteryConfig,
    ) -> Self {
        Self {
            adc,
            vsys,
            vbus,
            config,
        }
    }

    /// Take one reading
    pub async fn sample(&mut self) -> Option<BatteryChargeState> {
        let raw = match self.adc.read(&mut self.vsys).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("VSYS read failed: {:?}", e);
                return None;
            }
        };

        let mv = vsys_millivolts(raw);
        let charge_percent = charge_percent_from_millivolts(mv, &self.config);
        let is_plugged = self.vbus.is_high();
        trace!("VSYS {}mV -> {}%", mv, charge_percent);

        Some(BatteryChargeState {
            charge_percent,
            is_charging: is_plugged && charge_percent < 100,
            is_plugged,
        })
    }
}

/// Battery task - reports charge state changes to the watchface
#[embassy_executor::task]
pub async fn battery_task(mut monitor: BatteryMonitor, mut last: BatteryChargeState) {
    info!("Battery task started");

    let mut ticker = Ticker::every(Duration::from_secs(SAMPLE_INTERVAL_S));

    loop {
        ticker.next().await;

        let Some(state) = monitor.sample().await else {
            continue;
        };
        if state != last {
            debug!("Battery: {}%", state.charge_percent);
            last = state;
            WATCH_EVENTS.send(WatchEvent::Battery(state)).await;
        }
    }
}
