//! Almanac wire protocol
//!
//! This crate defines everything that crosses a wire in the watchface:
//!
//! - The key/value [`Dictionary`] exchanged with the companion device,
//!   with its tuple-based binary encoding
//! - [`AppMessageResult`] reason codes reported by the companion transport
//! - The serial [`Frame`] format shared by the companion link and the
//!   external display module
//! - [`LinkMessage`]s (push / ack / nack) carried over the companion link
//! - [`ScreenMessage`]s sent to the text display module
//!
//! # Frame Overview
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ KIND │ PAYLOAD     │ CRC-8    │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! A companion push carries a transaction id followed by an encoded
//! dictionary:
//!
//! ```text
//! ┌─────┬───────┬─────────────────────────────────────────────┐
//! │ TXN │ COUNT │ KEY (u32 LE) │ TYPE │ LEN (u16 LE) │ VALUE │ …
//! └─────┴───────┴─────────────────────────────────────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod frame;
pub mod link;
pub mod result;
pub mod screen;

pub use dictionary::{Dictionary, DictionaryError, Tuple, TupleType, TupleValue, MAX_TUPLES};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use link::{LinkError, LinkMessage};
pub use result::AppMessageResult;
pub use screen::ScreenMessage;
