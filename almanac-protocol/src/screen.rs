//! Messages for the external text display module
//!
//! The display module is a character terminal: the watch tells it what text
//! goes on which row and it takes care of pixels.

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Frame kinds on the display link
pub const MSG_CLEAR: u8 = 0x20;
pub const MSG_TEXT: u8 = 0x21;

/// Display dimensions
pub const DISPLAY_ROWS: u8 = 8;
pub const DISPLAY_COLS: u8 = 21;

/// Messages from the watch to the display module
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenMessage<'a> {
    /// Clear the entire screen
    Clear,
    /// Draw text at a position, clipped to the row width
    Text { row: u8, col: u8, text: &'a str },
}

impl ScreenMessage<'_> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ScreenMessage::Clear => Ok(Frame::empty(MSG_CLEAR)),
            ScreenMessage::Text { row, col, text } => {
                if *row >= DISPLAY_ROWS || *col >= DISPLAY_COLS {
                    return Err(FrameError::InvalidFrame);
                }
                // Payload: [row][col][len][chars...]
                let room = (DISPLAY_COLS - col) as usize;
                let bytes = &text.as_bytes()[..text.len().min(room)];

                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&[*row, *col, bytes.len() as u8])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(bytes)
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(MSG_TEXT, &payload)
            }
        }
    }
}
