//! Companion link trait

use almanac_protocol::{AppMessageResult, Dictionary};

use crate::codec::OutboundRequest;

/// Something the companion transport reports back
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportEvent {
    /// A message from the companion was delivered
    Received(Dictionary),
    /// A message from the companion was dropped before delivery
    Dropped(AppMessageResult),
    /// Our last request could not be delivered
    SendFailed(AppMessageResult),
    /// Our last request was acknowledged
    SendSucceeded,
}

/// Trait for the message channel to the companion device
///
/// Sending only enqueues. Delivery is reported later as a
/// [`TransportEvent`], which the host feeds back into the watchface.
pub trait CompanionLink {
    /// Open the link with the given buffer sizes in bytes
    fn open(&mut self, inbox_size: u16, outbox_size: u16) -> Result<(), AppMessageResult>;

    /// Enqueue a request
    ///
    /// Returns `Err` if the request cannot even be queued, for example
    /// because it exceeds the outbox or the link is not open.
    fn send(&mut self, request: &OutboundRequest) -> Result<(), AppMessageResult>;
}
