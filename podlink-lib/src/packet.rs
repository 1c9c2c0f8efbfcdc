//! Frame encoding and decoding.
//!
//! Every message on the link, in either direction, uses the same layout:
//!
//! ```text
//! +------+------+--------+------+-------------+-------------+----------+
//! | 0xFF | 0x55 | length | mode | command ... | payload ... | checksum |
//! +------+------+--------+------+-------------+-------------+----------+
//! ```
//!
//! `length` counts mode, command and payload. It is a single byte below 255;
//! longer bodies use the escape `0x00 <hi> <lo>`. The checksum is additive
//! over length, mode, command and payload (see [`checksum`]) and never covers
//! the header.

use crate::constants::{
    CHECKSUM_SIZE, EXTENDED_LENGTH_MARKER, EXTENDED_LENGTH_SIZE, EXTENDED_LENGTH_THRESHOLD, HEADER, HEADER_SIZE,
    MAX_PACKET_LENGTH, MIN_FRAME_SIZE, MODE_SIZE, RESPONSE_COMMAND_SIZE, SHORT_LENGTH_SIZE,
};
use crate::error::{DecodeError, EncodeError};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// One protocol message.
///
/// The length and checksum are never stored; both are derived from the
/// fields whenever they are needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    mode: u8,
    command: Bytes,
    payload: Option<Bytes>,
}

impl Packet {
    /// Build a packet, rejecting an empty command or a body the length field cannot express.
    pub fn new(mode: u8, command: impl Into<Bytes>, payload: Option<Bytes>) -> Result<Self, EncodeError> {
        let command = command.into();
        if command.is_empty() {
            return Err(EncodeError::EmptyCommand);
        }
        let packet = Packet { mode, command, payload };
        let length = packet.length();
        if length > MAX_PACKET_LENGTH {
            return Err(EncodeError::TooLong { length });
        }
        Ok(packet)
    }

    pub fn mode(&self) -> u8 {
        self.mode
    }

    pub fn command(&self) -> &[u8] {
        &self.command
    }

    /// Payload bytes, `None` when the frame carried nothing after the command.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Payload bytes, empty when absent.
    pub fn payload_bytes(&self) -> Bytes {
        self.payload.clone().unwrap_or_default()
    }

    /// Derived length: mode + command + payload.
    pub fn length(&self) -> usize {
        MODE_SIZE + self.command.len() + self.payload.as_ref().map_or(0, Bytes::len)
    }

    pub fn checksum(&self) -> u8 {
        checksum(self.length(), self.mode, &self.command, self.payload())
    }

    /// Total number of bytes this packet occupies on the wire.
    pub fn frame_len(&self) -> usize {
        let length = self.length();
        HEADER_SIZE + length_field_size(length) + length + CHECKSUM_SIZE
    }

    /// Wire representation, checksum computed fresh.
    pub fn encode(&self) -> Bytes {
        let length = self.length();
        let mut buf = BytesMut::with_capacity(self.frame_len());
        buf.put_slice(&HEADER);
        put_length(&mut buf, length);
        buf.put_u8(self.mode);
        buf.put_slice(&self.command);
        if let Some(payload) = &self.payload {
            buf.put_slice(payload);
        }
        buf.put_u8(self.checksum());
        buf.freeze()
    }

    /// Decode a device response. Responses carry a two-byte command.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with_command_len(raw, RESPONSE_COMMAND_SIZE)
    }

    /// Decode a frame whose command field is `command_len` bytes wide.
    ///
    /// Bytes following the checksum are ignored.
    pub fn decode_with_command_len(raw: &[u8], command_len: usize) -> Result<Self, DecodeError> {
        if raw.len() < HEADER_SIZE {
            return Err(DecodeError::Truncated {
                expected: MIN_FRAME_SIZE,
                actual: raw.len(),
            });
        }
        if raw[..HEADER_SIZE] != HEADER {
            return Err(DecodeError::BadHeader {
                found: [raw[0], raw[1]],
            });
        }

        let (length, field_size) = read_length(raw)?;
        let body_start = HEADER_SIZE + field_size;
        let frame_end = body_start + length + CHECKSUM_SIZE;
        if length < MODE_SIZE || raw.len() < frame_end {
            return Err(DecodeError::Truncated {
                expected: frame_end.max(body_start + MODE_SIZE + CHECKSUM_SIZE),
                actual: raw.len(),
            });
        }

        let body = &raw[body_start..body_start + length];
        let actual = raw[frame_end - 1];

        let mode = body[0];
        let rest = &body[MODE_SIZE..];
        let split = command_len.min(rest.len());
        let (command, payload) = rest.split_at(split);
        let payload = (!payload.is_empty()).then(|| Bytes::copy_from_slice(payload));

        let expected = checksum(length, mode, command, payload.as_deref());
        if expected != actual {
            return Err(DecodeError::ChecksumMismatch { expected, actual });
        }

        Ok(Packet {
            mode,
            command: Bytes::copy_from_slice(command),
            payload,
        })
    }
}

impl From<Packet> for Bytes {
    fn from(packet: Packet) -> Self {
        packet.encode()
    }
}

impl TryFrom<Bytes> for Packet {
    type Error = DecodeError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        Packet::decode(&bytes)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mode {:#04x} command {}", self.mode, hex::encode(&self.command))?;
        if let Some(payload) = &self.payload {
            write!(f, " payload {}", hex::encode(payload))?;
        }
        Ok(())
    }
}

/// Additive checksum over length, mode, command and payload.
///
/// `(0x100 - (length + mode + Σcommand + Σpayload)) & 0xFF`. An absent
/// payload contributes zero, the same as an empty one.
pub fn checksum(length: usize, mode: u8, command: &[u8], payload: Option<&[u8]>) -> u8 {
    let sum_bytes = |bytes: &[u8]| bytes.iter().fold(0usize, |acc, &b| acc.wrapping_add(b as usize));
    let total = length
        .wrapping_add(mode as usize)
        .wrapping_add(sum_bytes(command))
        .wrapping_add(payload.map_or(0, sum_bytes));
    (0x100usize.wrapping_sub(total) & 0xFF) as u8
}

/// Encode a packet in one step.
pub fn encode(mode: u8, command: &[u8], payload: Option<&[u8]>) -> Result<Bytes, EncodeError> {
    let packet = Packet::new(mode, Bytes::copy_from_slice(command), payload.map(Bytes::copy_from_slice))?;
    Ok(packet.encode())
}

/// Number of bytes the length field takes for a body of `length` bytes.
pub fn length_field_size(length: usize) -> usize {
    if length < EXTENDED_LENGTH_THRESHOLD {
        SHORT_LENGTH_SIZE
    } else {
        EXTENDED_LENGTH_SIZE
    }
}

fn put_length(buf: &mut BytesMut, length: usize) {
    if length < EXTENDED_LENGTH_THRESHOLD {
        buf.put_u8(length as u8);
    } else {
        buf.put_u8(EXTENDED_LENGTH_MARKER);
        buf.put_u16(length as u16);
    }
}

/// Read the length field that follows the header, returning the declared
/// length and the width of the field.
pub(crate) fn read_length(raw: &[u8]) -> Result<(usize, usize), DecodeError> {
    let first = *raw.get(HEADER_SIZE).ok_or(DecodeError::Truncated {
        expected: MIN_FRAME_SIZE,
        actual: raw.len(),
    })?;
    if first != EXTENDED_LENGTH_MARKER {
        return Ok((first as usize, SHORT_LENGTH_SIZE));
    }
    let field_end = HEADER_SIZE + EXTENDED_LENGTH_SIZE;
    if raw.len() < field_end {
        return Err(DecodeError::Truncated {
            expected: field_end + MODE_SIZE + CHECKSUM_SIZE,
            actual: raw.len(),
        });
    }
    let length = u16::from_be_bytes([raw[HEADER_SIZE + 1], raw[HEADER_SIZE + 2]]) as usize;
    Ok((length, EXTENDED_LENGTH_SIZE))
}
