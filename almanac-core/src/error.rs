//! Error types for the watchface pipeline

use almanac_protocol::AppMessageResult;

/// Inbound message could not be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// A known key carried a value of the wrong type
    TypeMismatch { key: u32 },
}

/// Failures surfaced by the watchface pipeline
///
/// None of these stop the watchface. The display keeps its last good
/// values and the next scheduled refresh tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchfaceError {
    /// The companion link could not be opened with the configured buffers
    LinkOpen(AppMessageResult),
    /// An inbound message was dropped by the transport
    TransportDropped(AppMessageResult),
    /// An outbound request was not delivered
    TransportSendFailed(AppMessageResult),
    /// An inbound message was rejected by the codec
    Decode(DecodeError),
}

impl WatchfaceError {
    /// Transport reason code, if this error came from the transport
    pub fn reason(&self) -> Option<AppMessageResult> {
        match self {
            WatchfaceError::LinkOpen(r)
            | WatchfaceError::TransportDropped(r)
            | WatchfaceError::TransportSendFailed(r) => Some(*r),
            WatchfaceError::Decode(_) => None,
        }
    }
}

impl From<DecodeError> for WatchfaceError {
    fn from(e: DecodeError) -> Self {
        WatchfaceError::Decode(e)
    }
}
