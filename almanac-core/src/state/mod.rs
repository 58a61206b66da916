//! What the watchface shows
//!
//! [`DisplayState`] is the single source of truth for every on-screen
//! field. Mutations report which [`Field`]s they touched so the renderer
//! only redraws what changed.

mod command;
mod conditions;
mod display;
mod fields;

pub use command::DisplayCommand;
pub use conditions::Conditions;
pub use display::DisplayState;
pub use fields::{Field, FieldSet};

/// Field capacities, in characters
pub const TIME_LEN: usize = 8;
pub const DATE_LEN: usize = 16;
pub const BATTERY_LEN: usize = 5;
pub const TEMPERATURE_LEN: usize = 8;
pub const CONDITIONS_LEN: usize = 32;
pub const RATE_LEN: usize = 32;
