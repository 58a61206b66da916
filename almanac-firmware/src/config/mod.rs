//! Configuration loading and parsing
//!
//! The watchface configuration is embedded at build time and parsed at
//! boot by a small no_std TOML reader.

pub mod toml;

use almanac_core::config::WatchfaceConfig;
use defmt::*;

pub use toml::{parse_config, ParseError};

/// Embedded configuration (compiled into firmware)
/// Edit watchface.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../watchface.toml");

/// Parse and validate the embedded configuration
///
/// Falls back to the built-in defaults if the file does not parse or
/// does not validate. build.rs rejects both cases, so this only matters
/// when the two parsers disagree.
pub fn load_config() -> WatchfaceConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            return WatchfaceConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Embedded config rejected: {:?}", e);
            WatchfaceConfig::default()
        }
    }
}
