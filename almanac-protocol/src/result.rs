//! Transport reason codes
//!
//! The companion transport reports why a message was dropped or could not be
//! sent using a fixed set of bit-valued codes. They travel as `u16` in nack
//! payloads.

/// Outcome codes reported by the companion transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppMessageResult {
    Ok,
    /// Companion did not acknowledge in time
    SendTimeout,
    /// Companion explicitly rejected the message
    SendRejected,
    /// No companion connected
    NotConnected,
    /// Companion-side application not running
    AppNotRunning,
    InvalidArgs,
    /// Outbox still busy with a previous message
    Busy,
    /// Message larger than the negotiated buffer
    BufferOverflow,
    AlreadyReleased,
    CallbackAlreadyRegistered,
    CallbackNotRegistered,
    OutOfMemory,
    /// Link has been closed
    Closed,
    InternalError,
    InvalidState,
    /// Code outside the known set
    Unknown(u16),
}

impl AppMessageResult {
    /// Parse a reason from its wire code
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Ok,
            2 => Self::SendTimeout,
            4 => Self::SendRejected,
            8 => Self::NotConnected,
            16 => Self::AppNotRunning,
            32 => Self::InvalidArgs,
            64 => Self::Busy,
            128 => Self::BufferOverflow,
            512 => Self::AlreadyReleased,
            1024 => Self::CallbackAlreadyRegistered,
            2048 => Self::CallbackNotRegistered,
            4096 => Self::OutOfMemory,
            8192 => Self::Closed,
            16384 => Self::InternalError,
            32768 => Self::InvalidState,
            other => Self::Unknown(other),
        }
    }

    /// Wire code for this reason
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 0,
            Self::SendTimeout => 2,
            Self::SendRejected => 4,
            Self::NotConnected => 8,
            Self::AppNotRunning => 16,
            Self::InvalidArgs => 32,
            Self::Busy => 64,
            Self::BufferOverflow => 128,
            Self::AlreadyReleased => 512,
            Self::CallbackAlreadyRegistered => 1024,
            Self::CallbackNotRegistered => 2048,
            Self::OutOfMemory => 4096,
            Self::Closed => 8192,
            Self::InternalError => 16384,
            Self::InvalidState => 32768,
            Self::Unknown(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}
