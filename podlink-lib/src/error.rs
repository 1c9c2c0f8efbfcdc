use std::io;
use thiserror::Error;

/// Framing and integrity failures reported by [`Packet::decode`](crate::packet::Packet::decode).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Bad frame header: expected ff55, got {:02x}{:02x}", .found[0], .found[1])]
    BadHeader { found: [u8; 2] },

    #[error("Truncated frame: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Checksum mismatch: computed {expected:#04x}, frame carries {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

/// Reasons a packet cannot be put on the wire.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Command must contain at least one byte")]
    EmptyCommand,

    #[error("Packet length {length} exceeds the extended length field")]
    TooLong { length: usize },
}

/// The primary error type for the `podlink-lib` library.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    #[error("Unexpected payload shape: expected {expected} bytes, got {actual}")]
    UnexpectedPayloadShape { expected: usize, actual: usize },

    #[error("Invalid {field} value in response: {value:#04x}")]
    InvalidValue { field: &'static str, value: u8 },

    #[error("Device rejected command {command:#06x} with status {status:#04x}")]
    Rejected { command: u16, status: u8 },

    #[error("{original} (button release also failed: {release})")]
    ReleaseFailed {
        original: Box<RemoteError>,
        release: Box<RemoteError>,
    },
}

impl RemoteError {
    /// The error that started the failure, looking through a failed release.
    pub fn original(&self) -> &RemoteError {
        match self {
            RemoteError::ReleaseFailed { original, .. } => original.original(),
            other => other,
        }
    }

    /// The decode failure behind this error, if any.
    pub fn decode_error(&self) -> Option<DecodeError> {
        match self.original() {
            RemoteError::Decode(e) => Some(*e),
            _ => None,
        }
    }

    pub(crate) fn payload_shape(expected: usize, actual: usize) -> Self {
        RemoteError::UnexpectedPayloadShape { expected, actual }
    }
}
