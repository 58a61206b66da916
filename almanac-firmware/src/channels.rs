//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use almanac_core::battery::BatteryChargeState;
use almanac_core::clock::Tick;
use almanac_core::traits::TransportEvent;
use almanac_protocol::LinkMessage;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

/// Channel capacity for watchface events
const EVENT_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outbound link messages
const LINK_TX_CHANNEL_SIZE: usize = 2;

/// Everything the watchface reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchEvent {
    Tick(Tick),
    Battery(BatteryChargeState),
    Transport(TransportEvent),
}

/// Events for the watchface task, handled one at a time in arrival order
pub static WATCH_EVENTS: Channel<CriticalSectionRawMutex, WatchEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Pushes, acks and nacks waiting to go out on the companion UART
///
/// A full channel is how the link reports a busy outbox.
pub static LINK_TX: Channel<CriticalSectionRawMutex, LinkMessage, LINK_TX_CHANNEL_SIZE> =
    Channel::new();

/// Signal that a screen update is ready to be sent
pub static SCREEN_UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
