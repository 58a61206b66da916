//! Character-screen renderer for Almanac
//!
//! This crate provides:
//! - `Screen`, a row buffer for text-mode displays
//! - `FaceScreen`, which lays the watchface layers out on a `Screen` and
//!   implements the core `Renderer` trait
//! - `encode_screen`, which turns a screen into frames for the external
//!   display module
//!
//! # Layout
//!
//! ```text
//!    0         1         2
//!    012345678901234567890
//! 0  Wed 06 Mar       87%
//! 2         10:30
//! 4   RAIN       +21C
//! 6  $=123.45
//! ```

#![cfg_attr(not(test), no_std)]

pub mod face;
pub mod protocol;
pub mod screen;

pub use face::{icon_label, FaceScreen};
pub use protocol::{encode_screen, screen_messages};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
