//! Board-agnostic core logic for the Almanac watchface
//!
//! This crate contains everything that decides what the watch shows and
//! when it talks to the companion, independent of any hardware:
//!
//! - Minute tick detection and time/date formatting
//! - Display state with partial-update semantics
//! - Message codec for companion requests and weather/rate replies
//! - Refresh scheduler
//! - The event pipeline tying ticks, battery and transport events together
//! - Collaborator traits for the renderer and the companion link
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod battery;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod scheduler;
pub mod state;
pub mod traits;
pub mod watchface;

#[cfg(test)]
mod testing;

pub use error::{DecodeError, WatchfaceError};
pub use watchface::{EventReport, TickReport, Watchface};
