//! Collaborator traits
//!
//! These traits define the interface between the watchface logic and
//! whatever draws the screen and carries companion messages.

pub mod link;
pub mod renderer;

pub use link::{CompanionLink, TransportEvent};
pub use renderer::Renderer;
