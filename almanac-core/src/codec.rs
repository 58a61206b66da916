//! Companion message codec
//!
//! Outbound, the watch only ever asks for a refresh. Inbound replies carry
//! any subset of temperature, conditions and rate. Unknown keys are ignored
//! so the companion can grow new fields without breaking older watches.

use almanac_protocol::{Dictionary, TupleValue};
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::format;
use crate::state::CONDITIONS_LEN;

/// Dictionary keys shared with the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MessageKeys {
    /// Refresh request (outbound)
    pub request: u32,
    /// Temperature in whole degrees Celsius (inbound, integer)
    pub temperature: u32,
    /// Conditions tag (inbound, string)
    pub conditions: u32,
    /// Exchange rate in hundredths (inbound, integer)
    pub rate: u32,
}

impl Default for MessageKeys {
    fn default() -> Self {
        Self {
            request: 0,
            temperature: 10000,
            conditions: 10001,
            rate: 10002,
        }
    }
}

impl MessageKeys {
    /// Whether all four keys are different
    pub fn is_distinct(&self) -> bool {
        let keys = [self.request, self.temperature, self.conditions, self.rate];
        keys.iter()
            .enumerate()
            .all(|(i, k)| !keys[i + 1..].contains(k))
    }
}

/// A refresh request ready for the companion link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutboundRequest {
    dict: Dictionary,
}

impl OutboundRequest {
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub fn into_dictionary(self) -> Dictionary {
        self.dict
    }
}

/// Fields recovered from an inbound message
///
/// Temperature and conditions are either both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherUpdate {
    pub temperature_celsius: Option<i32>,
    pub conditions: Option<String<CONDITIONS_LEN>>,
    pub rate_cents: Option<i32>,
}

impl WeatherUpdate {
    pub fn is_empty(&self) -> bool {
        self.temperature_celsius.is_none() && self.conditions.is_none() && self.rate_cents.is_none()
    }
}

/// Encodes requests and decodes replies with a fixed key set
#[derive(Debug, Clone)]
pub struct MessageCodec {
    keys: MessageKeys,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new(MessageKeys::default())
    }
}

impl MessageCodec {
    pub fn new(keys: MessageKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &MessageKeys {
        &self.keys
    }

    /// Build the `{request: 0u8}` message
    pub fn encode_refresh_request(&self) -> OutboundRequest {
        OutboundRequest {
            dict: Dictionary::single(self.keys.request, TupleValue::UInt8(0)),
        }
    }

    /// Extract known fields from an inbound dictionary
    ///
    /// A known key with the wrong value type rejects the whole message.
    pub fn decode(&self, dict: &Dictionary) -> Result<WeatherUpdate, DecodeError> {
        let temperature = Self::integer(dict, self.keys.temperature)?;
        let conditions = Self::text(dict, self.keys.conditions)?;
        let rate_cents = Self::integer(dict, self.keys.rate)?;

        let (temperature_celsius, conditions) = match (temperature, conditions) {
            (Some(celsius), Some(tag)) => (Some(celsius), Some(format::clip(tag))),
            _ => (None, None),
        };

        Ok(WeatherUpdate {
            temperature_celsius,
            conditions,
            rate_cents,
        })
    }

    fn integer(dict: &Dictionary, key: u32) -> Result<Option<i32>, DecodeError> {
        dict.get(key)
            .map(|value| value.as_i32().ok_or(DecodeError::TypeMismatch { key }))
            .transpose()
    }

    fn text(dict: &Dictionary, key: u32) -> Result<Option<&str>, DecodeError> {
        dict.get(key)
            .map(|value| value.as_str().ok_or(DecodeError::TypeMismatch { key }))
            .transpose()
    }
}
