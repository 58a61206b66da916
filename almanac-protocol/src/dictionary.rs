//! Key/value dictionaries exchanged with the companion device
//!
//! A dictionary is a small ordered list of tuples, each an application key
//! mapped to a typed value. On the wire:
//!
//! ```text
//! COUNT (u8)
//! repeated COUNT times:
//!   KEY (u32 LE) │ TYPE (u8) │ LENGTH (u16 LE) │ VALUE (LENGTH bytes)
//! ```
//!
//! TYPE is 0 for raw bytes, 1 for a NUL-terminated string, 2 for an unsigned
//! integer and 3 for a signed integer. Integers are little-endian and 1, 2 or
//! 4 bytes wide.

use heapless::{String, Vec};

/// Maximum number of tuples in one dictionary
pub const MAX_TUPLES: usize = 8;

/// Maximum value length in bytes (strings exclude the NUL terminator)
pub const MAX_VALUE_LEN: usize = 32;

/// Bytes of header per tuple (KEY + TYPE + LENGTH)
const TUPLE_HEADER_LEN: usize = 7;

const _: () = assert!(MAX_TUPLES >= 1);

/// Dictionary encoding and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictionaryError {
    /// Input ended in the middle of a tuple
    Truncated,
    /// More tuples than [`MAX_TUPLES`]
    TooManyTuples,
    /// Unknown TYPE byte
    InvalidType(u8),
    /// Integer width other than 1, 2 or 4 bytes
    InvalidLength,
    /// Value longer than [`MAX_VALUE_LEN`]
    ValueTooLong,
    /// String value is not UTF-8
    InvalidString,
    /// Bytes remain after the last tuple
    TrailingBytes,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// Wire type of a tuple value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TupleType {
    ByteArray,
    CString,
    UInt,
    Int,
}

impl TupleType {
    fn from_byte(byte: u8) -> Result<Self, DictionaryError> {
        match byte {
            0 => Ok(Self::ByteArray),
            1 => Ok(Self::CString),
            2 => Ok(Self::UInt),
            3 => Ok(Self::Int),
            other => Err(DictionaryError::InvalidType(other)),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Self::ByteArray => 0,
            Self::CString => 1,
            Self::UInt => 2,
            Self::Int => 3,
        }
    }
}

/// A typed tuple value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TupleValue {
    Bytes(Vec<u8, MAX_VALUE_LEN>),
    CString(String<MAX_VALUE_LEN>),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    Int8(i8),
    Int16(i16),
    Int32(i32),
}

impl TupleValue {
    /// Build a string value, failing if it does not fit
    pub fn string(text: &str) -> Result<Self, DictionaryError> {
        let mut value = String::new();
        value
            .push_str(text)
            .map_err(|_| DictionaryError::ValueTooLong)?;
        Ok(Self::CString(value))
    }

    /// Build a string value, cutting it at [`MAX_VALUE_LEN`] bytes on a
    /// char boundary
    pub fn string_clipped(text: &str) -> Self {
        let mut value = String::new();
        for ch in text.chars() {
            if value.push(ch).is_err() {
                break;
            }
        }
        Self::CString(value)
    }

    /// Wire type of this value
    pub fn tuple_type(&self) -> TupleType {
        match self {
            Self::Bytes(_) => TupleType::ByteArray,
            Self::CString(_) => TupleType::CString,
            Self::UInt8(_) | Self::UInt16(_) | Self::UInt32(_) => TupleType::UInt,
            Self::Int8(_) | Self::Int16(_) | Self::Int32(_) => TupleType::Int,
        }
    }

    /// Number of value bytes on the wire
    pub fn wire_len(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::CString(text) => text.len() + 1,
            Self::UInt8(_) | Self::Int8(_) => 1,
            Self::UInt16(_) | Self::Int16(_) => 2,
            Self::UInt32(_) | Self::Int32(_) => 4,
        }
    }

    /// Integer view of this value
    ///
    /// Any integer width is accepted as long as the value fits in an `i32`;
    /// byte arrays and strings return `None`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Self::UInt8(v) => Some(v.into()),
            Self::UInt16(v) => Some(v.into()),
            Self::UInt32(v) => i32::try_from(v).ok(),
            Self::Int8(v) => Some(v.into()),
            Self::Int16(v) => Some(v.into()),
            Self::Int32(v) => Some(v),
            Self::Bytes(_) | Self::CString(_) => None,
        }
    }

    /// String view of this value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::CString(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn write_value(&self, out: &mut [u8]) {
        match self {
            Self::Bytes(bytes) => out.copy_from_slice(bytes),
            Self::CString(text) => {
                let (body, nul) = out.split_at_mut(text.len());
                body.copy_from_slice(text.as_bytes());
                nul[0] = 0;
            }
            Self::UInt8(v) => out.copy_from_slice(&v.to_le_bytes()),
            Self::UInt16(v) => out.copy_from_slice(&v.to_le_bytes()),
            Self::UInt32(v) => out.copy_from_slice(&v.to_le_bytes()),
            Self::Int8(v) => out.copy_from_slice(&v.to_le_bytes()),
            Self::Int16(v) => out.copy_from_slice(&v.to_le_bytes()),
            Self::Int32(v) => out.copy_from_slice(&v.to_le_bytes()),
        }
    }

    fn read_value(tuple_type: TupleType, raw: &[u8]) -> Result<Self, DictionaryError> {
        match tuple_type {
            TupleType::ByteArray => Vec::from_slice(raw)
                .map(Self::Bytes)
                .map_err(|_| DictionaryError::ValueTooLong),
            TupleType::CString => {
                // Text ends at the first NUL; a missing terminator is tolerated
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                let text =
                    core::str::from_utf8(&raw[..end]).map_err(|_| DictionaryError::InvalidString)?;
                // Overlong text is cut rather than failing the other tuples
                Ok(Self::string_clipped(text))
            }
            TupleType::UInt => match *raw {
                [a] => Ok(Self::UInt8(a)),
                [a, b] => Ok(Self::UInt16(u16::from_le_bytes([a, b]))),
                [a, b, c, d] => Ok(Self::UInt32(u32::from_le_bytes([a, b, c, d]))),
                _ => Err(DictionaryError::InvalidLength),
            },
            TupleType::Int => match *raw {
                [a] => Ok(Self::Int8(i8::from_le_bytes([a]))),
                [a, b] => Ok(Self::Int16(i16::from_le_bytes([a, b]))),
                [a, b, c, d] => Ok(Self::Int32(i32::from_le_bytes([a, b, c, d]))),
                _ => Err(DictionaryError::InvalidLength),
            },
        }
    }
}

/// One key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuple {
    pub key: u32,
    pub value: TupleValue,
}

impl Tuple {
    fn wire_len(&self) -> usize {
        TUPLE_HEADER_LEN + self.value.wire_len()
    }
}

/// An ordered set of tuples keyed by application key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dictionary {
    tuples: Vec<Tuple, MAX_TUPLES>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub const fn new() -> Self {
        Self { tuples: Vec::new() }
    }

    /// Create a dictionary holding one tuple
    pub fn single(key: u32, value: TupleValue) -> Self {
        let mut tuples = Vec::new();
        tuples.extend(core::iter::once(Tuple { key, value }));
        Self { tuples }
    }

    /// Insert a value, replacing any existing value for the same key
    pub fn insert(&mut self, key: u32, value: TupleValue) -> Result<(), DictionaryError> {
        if let Some(existing) = self.tuples.iter_mut().find(|t| t.key == key) {
            existing.value = value;
            return Ok(());
        }
        self.tuples
            .push(Tuple { key, value })
            .map_err(|_| DictionaryError::TooManyTuples)
    }

    /// Look up the value stored for `key`
    pub fn get(&self, key: u32) -> Option<&TupleValue> {
        self.tuples.iter().find(|t| t.key == key).map(|t| &t.value)
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }

    /// Number of bytes [`Dictionary::encode`] will write
    pub fn encoded_len(&self) -> usize {
        1 + self.tuples.iter().map(Tuple::wire_len).sum::<usize>()
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, DictionaryError> {
        let total = self.encoded_len();
        let out = buffer
            .get_mut(..total)
            .ok_or(DictionaryError::BufferTooSmall)?;

        out[0] = self.tuples.len() as u8;
        let mut pos = 1;
        for tuple in &self.tuples {
            let value_len = tuple.value.wire_len();
            out[pos..pos + 4].copy_from_slice(&tuple.key.to_le_bytes());
            out[pos + 4] = tuple.value.tuple_type().to_byte();
            out[pos + 5..pos + 7].copy_from_slice(&(value_len as u16).to_le_bytes());
            pos += TUPLE_HEADER_LEN;
            tuple.value.write_value(&mut out[pos..pos + value_len]);
            pos += value_len;
        }

        Ok(total)
    }

    /// Decode a dictionary from its wire form
    ///
    /// The input must contain exactly one dictionary.
    pub fn decode(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let (&count, mut rest) = bytes.split_first().ok_or(DictionaryError::Truncated)?;
        if count as usize > MAX_TUPLES {
            return Err(DictionaryError::TooManyTuples);
        }

        let mut dict = Self::new();
        for _ in 0..count {
            if rest.len() < TUPLE_HEADER_LEN {
                return Err(DictionaryError::Truncated);
            }
            let key = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
            let tuple_type = TupleType::from_byte(rest[4])?;
            let len = u16::from_le_bytes([rest[5], rest[6]]) as usize;

            let raw = rest
                .get(TUPLE_HEADER_LEN..TUPLE_HEADER_LEN + len)
                .ok_or(DictionaryError::Truncated)?;
            let value = TupleValue::read_value(tuple_type, raw)?;

            // Keep the first occurrence of a duplicated key
            if !dict.contains_key(key) {
                dict.tuples
                    .push(Tuple { key, value })
                    .map_err(|_| DictionaryError::TooManyTuples)?;
            }
            rest = &rest[TUPLE_HEADER_LEN + len..];
        }

        if !rest.is_empty() {
            return Err(DictionaryError::TrailingBytes);
        }
        Ok(dict)
    }
}
