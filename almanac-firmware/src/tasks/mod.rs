//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod battery;
pub mod clock;
pub mod display_tx;
pub mod link_rx;
pub mod link_tx;
pub mod watchface;

pub use battery::{battery_task, BatteryMonitor};
pub use clock::clock_task;
pub use display_tx::display_tx_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use watchface::watchface_task;
