//! Error and reason codes

use thiserror::Error;

/// Rejected watchface configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The hour converter only wraps across a single day boundary.
    #[error("timezone offset {0} is outside -23..=23 hours")]
    OffsetOutOfRange(i32),
    /// A refresh interval of zero minutes would divide by zero.
    #[error("weather refresh interval must be at least one minute")]
    ZeroRefreshInterval,
    #[error("low battery threshold {0}% is above 100%")]
    BatteryThresholdOutOfRange(u8),
}

/// Malformed companion dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictionaryError {
    #[error("dictionary is empty")]
    MissingHeader,
    #[error("tuple header truncated at offset {0}")]
    TruncatedHeader(usize),
    #[error("tuple value truncated at offset {0}")]
    TruncatedValue(usize),
    #[error("unknown tuple type {0}")]
    UnknownType(u8),
    #[error("integer tuple of {0} bytes")]
    InvalidIntegerWidth(u16),
    #[error("dictionary does not fit the outbox buffer")]
    Overflow,
    #[error("more than 255 tuples")]
    TooManyTuples,
}

/// Result codes reported for companion messages, matching the inbox/outbox status values the
/// companion protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageResult {
    #[error("message sent but not acknowledged")]
    SendTimeout,
    #[error("message rejected by the companion")]
    SendRejected,
    #[error("companion is not connected")]
    NotConnected,
    #[error("companion app is not running")]
    AppNotRunning,
    #[error("invalid arguments")]
    InvalidArgs,
    #[error("outbox is busy")]
    Busy,
    #[error("buffer overflow")]
    BufferOverflow,
    #[error("message already released")]
    AlreadyReleased,
    #[error("callback already registered")]
    CallbackAlreadyRegistered,
    #[error("callback not registered")]
    CallbackNotRegistered,
    #[error("out of memory")]
    OutOfMemory,
    #[error("channel closed")]
    Closed,
    #[error("internal error")]
    InternalError,
    #[error("invalid state")]
    InvalidState,
}

impl MessageResult {
    /// Numeric reason code as carried over the wire.
    pub fn code(self) -> u16 {
        match self {
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
        }
    }
}
