//! Simple TOML parser for the watchface configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! watchface.toml. It does NOT support full TOML.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...)
//!
//! Unknown keys are ignored; unknown sections are errors.

use almanac_core::clock::ClockStyle;
use almanac_core::config::WatchfaceConfig;
use almanac_core::format::RateStyle;
use almanac_core::scheduler::RefreshPolicy;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Invalid value for a known key
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Refresh,
    Link,
    Keys,
    Battery,
}

/// Parse TOML configuration into WatchfaceConfig
pub fn parse_config(input: &str) -> Result<WatchfaceConfig, ParseError> {
    let mut config = WatchfaceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "refresh" => Ok(Section::Refresh),
        "link" => Ok(Section::Link),
        "keys" => Ok(Section::Keys),
        "battery" => Ok(Section::Battery),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split a `key = value` line, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        // Make sure # is not inside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_clock_style(value: &str) -> Result<ClockStyle, ParseError> {
    match parse_string(value) {
        "24h" => Ok(ClockStyle::TwentyFourHour),
        "12h" => Ok(ClockStyle::TwelveHour),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_rate_style(value: &str) -> Result<RateStyle, ParseError> {
    match parse_string(value) {
        "padded" => Ok(RateStyle::Padded),
        "legacy" => Ok(RateStyle::Legacy),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_policy(value: &str) -> Result<RefreshPolicy, ParseError> {
    match parse_string(value) {
        "always" => Ok(RefreshPolicy::Always),
        "skip_while_pending" => Ok(RefreshPolicy::SkipWhilePending),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut WatchfaceConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Root, "clock_style") => config.clock_style = parse_clock_style(value)?,
        (Section::Root, "rate_style") => config.rate_style = parse_rate_style(value)?,

        (Section::Refresh, "interval_min") => config.refresh.interval_min = parse_int(value)?,
        (Section::Refresh, "policy") => config.refresh.policy = parse_policy(value)?,

        (Section::Link, "inbox_size") => config.link.inbox_size = parse_int(value)?,
        (Section::Link, "outbox_size") => config.link.outbox_size = parse_int(value)?,

        (Section::Keys, "request") => config.keys.request = parse_int(value)?,
        (Section::Keys, "temperature") => config.keys.temperature = parse_int(value)?,
        (Section::Keys, "conditions") => config.keys.conditions = parse_int(value)?,
        (Section::Keys, "rate") => config.keys.rate = parse_int(value)?,

        (Section::Battery, "empty_mv") => config.battery.empty_mv = parse_int(value)?,
        (Section::Battery, "full_mv") => config.battery.full_mv = parse_int(value)?,

        _ => {} // Ignore unknown keys
    }
    Ok(())
}
