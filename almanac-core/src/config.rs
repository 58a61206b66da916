//! Configuration type definitions
//!
//! The firmware embeds a TOML file that maps onto [`WatchfaceConfig`].
//! Every section is optional and falls back to the defaults below.

use almanac_protocol::link::MAX_DICTIONARY_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::battery::BatteryConfig;
use crate::clock::ClockStyle;
use crate::codec::MessageKeys;
use crate::format::RateStyle;
use crate::scheduler::RefreshConfig;

/// Companion link buffer sizes in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    pub inbox_size: u16,
    pub outbox_size: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            inbox_size: 128,
            outbox_size: 128,
        }
    }
}

/// Complete watchface configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WatchfaceConfig {
    pub clock_style: ClockStyle,
    pub rate_style: RateStyle,
    pub refresh: RefreshConfig,
    pub link: LinkConfig,
    pub keys: MessageKeys,
    pub battery: BatteryConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Refresh interval is zero or does not divide an hour
    RefreshInterval(u8),
    /// Link buffer is zero or larger than a link frame can carry
    LinkCapacity(u16),
    /// Battery voltage range is empty
    BatteryRange,
    /// Two message keys share a value
    DuplicateKeys,
}

impl WatchfaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.refresh.interval_min;
        if interval == 0 || 60 % interval != 0 {
            return Err(ConfigError::RefreshInterval(interval));
        }

        for size in [self.link.inbox_size, self.link.outbox_size] {
            if size == 0 || usize::from(size) > MAX_DICTIONARY_SIZE {
                return Err(ConfigError::LinkCapacity(size));
            }
        }

        if self.battery.empty_mv >= self.battery.full_mv {
            return Err(ConfigError::BatteryRange);
        }

        if !self.keys.is_distinct() {
            return Err(ConfigError::DuplicateKeys);
        }

        Ok(())
    }
}
