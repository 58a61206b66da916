//! Companion link messages
//!
//! The watch and the companion bridge exchange three kinds of frames:
//! - Push: a dictionary, tagged with a transaction id
//! - Ack: the push with that transaction id was accepted
//! - Nack: the push was refused, with an [`AppMessageResult`] reason
//!
//! Either side may push. Every push is answered by exactly one ack or nack,
//! unless the link loses it.

use crate::dictionary::{Dictionary, DictionaryError};
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::result::AppMessageResult;

// Frame kinds on the companion link
pub const MSG_PUSH: u8 = 0x01;
pub const MSG_ACK: u8 = 0x02;
pub const MSG_NACK: u8 = 0x03;

/// Largest encoded dictionary that fits in a push frame
pub const MAX_DICTIONARY_SIZE: usize = MAX_PAYLOAD_SIZE - 1;

/// Messages carried over the companion link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkMessage {
    Push { txn: u8, dict: Dictionary },
    Ack { txn: u8 },
    Nack { txn: u8, reason: AppMessageResult },
}

/// Errors turning a frame into a [`LinkMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Frame kind unknown or payload malformed
    Frame(FrameError),
    /// Push payload is not a valid dictionary
    Dictionary { txn: u8, error: DictionaryError },
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

impl LinkMessage {
    /// Transaction id this message belongs to
    pub fn txn(&self) -> u8 {
        match self {
            LinkMessage::Push { txn, .. }
            | LinkMessage::Ack { txn }
            | LinkMessage::Nack { txn, .. } => *txn,
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, LinkError> {
        match self {
            LinkMessage::Push { txn, dict } => {
                let mut payload = [0u8; MAX_PAYLOAD_SIZE];
                payload[0] = *txn;
                let len = dict
                    .encode(&mut payload[1..])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(Frame::new(MSG_PUSH, &payload[..1 + len])?)
            }
            LinkMessage::Ack { txn } => Ok(Frame::new(MSG_ACK, &[*txn])?),
            LinkMessage::Nack { txn, reason } => {
                let [lo, hi] = reason.code().to_le_bytes();
                Ok(Frame::new(MSG_NACK, &[*txn, lo, hi])?)
            }
        }
    }

    /// Parse a message from a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, LinkError> {
        match (frame.kind, frame.payload.as_slice()) {
            (MSG_PUSH, [txn, body @ ..]) => {
                let dict = Dictionary::decode(body)
                    .map_err(|error| LinkError::Dictionary { txn: *txn, error })?;
                Ok(LinkMessage::Push { txn: *txn, dict })
            }
            (MSG_ACK, [txn]) => Ok(LinkMessage::Ack { txn: *txn }),
            (MSG_NACK, [txn, lo, hi]) => Ok(LinkMessage::Nack {
                txn: *txn,
                reason: AppMessageResult::from_code(u16::from_le_bytes([*lo, *hi])),
            }),
            _ => Err(LinkError::Frame(FrameError::InvalidFrame)),
        }
    }
}
