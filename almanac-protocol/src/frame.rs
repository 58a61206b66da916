//! Serial frame codec.
//!
//! Frame format:
//! - START (1 byte): 0xA5 synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - KIND (1 byte): message kind identifier
//! - PAYLOAD (0-250 bytes): kind-specific data
//! - CRC (1 byte): CRC-8 (poly 0x07) over LENGTH, KIND and PAYLOAD
//!
//! Both UART links (companion bridge and display module) use this framing.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes of framing around the payload (START + LENGTH + KIND + CRC)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// CRC mismatch
    InvalidCrc,
    /// Length byte out of range
    InvalidLength,
    /// Frame kind or payload not understood by the receiver
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Message kind identifier
    pub kind: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame from a kind and payload
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// Create a frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    /// Total number of bytes this frame occupies on the wire
    pub fn wire_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode this frame into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.wire_len();
        let out = buffer.get_mut(..len).ok_or(FrameError::BufferTooSmall)?;

        let length = self.payload.len() as u8;
        let (header, rest) = out.split_at_mut(3);
        header.copy_from_slice(&[FRAME_START, length, self.kind]);

        let (body, tail) = rest.split_at_mut(self.payload.len());
        body.copy_from_slice(&self.payload);
        tail[0] = Crc8::new().update(length).update(self.kind).update_all(&self.payload).finish();

        Ok(len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut out = Vec::new();
        out.resize(self.wire_len(), 0)
            .map_err(|_| FrameError::BufferTooSmall)?;
        self.encode(&mut out)?;
        Ok(out)
    }
}

/// Running CRC-8 (polynomial 0x07, init 0x00)
#[derive(Debug, Clone, Copy)]
struct Crc8(u8);

impl Crc8 {
    const POLY: u8 = 0x07;

    const fn new() -> Self {
        Self(0)
    }

    fn update(self, byte: u8) -> Self {
        let mut crc = self.0 ^ byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ Self::POLY
            } else {
                crc << 1
            };
        }
        Self(crc)
    }

    fn update_all(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |crc, &b| crc.update(b))
    }

    fn finish(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for the START byte
    Sync,
    /// Got START, next byte is LENGTH
    Length,
    /// Next byte is KIND
    Kind { len: u8 },
    /// Collecting payload bytes
    Payload { len: u8, kind: u8 },
    /// Next byte is the CRC
    Crc { kind: u8 },
}

/// Incremental frame parser
///
/// Bytes are fed one at a time as they arrive from the UART. Noise before a
/// START byte is skipped; a CRC or length error resets the parser so it can
/// resynchronize on the next START byte.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            state: ParseState::Sync,
            buffer: Vec::new(),
        }
    }

    /// Drop any partially received frame
    pub fn reset(&mut self) {
        self.state = ParseState::Sync;
        self.buffer.clear();
    }

    /// Whether the parser is in the middle of a frame
    pub fn in_frame(&self) -> bool {
        self.state != ParseState::Sync
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on a corrupt frame.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.state = match self.state {
            ParseState::Sync => {
                if byte == FRAME_START {
                    ParseState::Length
                } else {
                    ParseState::Sync
                }
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                ParseState::Kind { len: byte }
            }
            ParseState::Kind { len } => {
                self.buffer.clear();
                if len == 0 {
                    ParseState::Crc { kind: byte }
                } else {
                    ParseState::Payload { len, kind: byte }
                }
            }
            ParseState::Payload { len, kind } => {
                // Capacity is guaranteed by the length check above
                let _ = self.buffer.push(byte);
                if self.buffer.len() == len as usize {
                    ParseState::Crc { kind }
                } else {
                    ParseState::Payload { len, kind }
                }
            }
            ParseState::Crc { kind } => {
                let expected = Crc8::new()
                    .update(self.buffer.len() as u8)
                    .update(kind)
                    .update_all(&self.buffer)
                    .finish();

                let payload = core::mem::take(&mut self.buffer);
                self.reset();

                if byte != expected {
                    return Err(FrameError::InvalidCrc);
                }
                return Ok(Some(Frame { kind, payload }));
            }
        };
        Ok(None)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found and the number of bytes
    /// consumed. Bytes after a complete frame are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (other, i + 1),
            }
        }
        (Ok(None), bytes.len())
    }
}
