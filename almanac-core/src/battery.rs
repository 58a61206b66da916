//! Battery charge reporting

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of the battery as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryChargeState {
    /// 0..=100
    pub charge_percent: u8,
    pub is_charging: bool,
    pub is_plugged: bool,
}

/// Cell voltage range used to estimate the charge level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatteryConfig {
    /// Voltage at 0%
    pub empty_mv: u16,
    /// Voltage at 100%
    pub full_mv: u16,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            empty_mv: 3300,
            full_mv: 4150,
        }
    }
}

/// Estimate the charge level from the cell voltage
///
/// Linear between the configured bounds, reported in steps of 10% so the
/// battery field doesn't flicker with ADC noise.
pub fn charge_percent_from_millivolts(mv: u16, config: &BatteryConfig) -> u8 {
    if mv <= config.empty_mv {
        return 0;
    }
    if mv >= config.full_mv {
        return 100;
    }
    let span = u32::from(config.full_mv - config.empty_mv);
    let percent = u32::from(mv - config.empty_mv) * 100 / span;
    (percent / 10 * 10) as u8
}
