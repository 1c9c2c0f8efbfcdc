use crate::error::RemoteError;
use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};
use zerocopy::byteorder::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Library categories the Advanced personality can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum ItemType {
    Playlist = 0x01,
    Artist = 0x02,
    Album = 0x03,
    Genre = 0x04,
    Song = 0x05,
    Composer = 0x06,
}

/// Transport controls sent with `ExecutePlayback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum PlaybackCommand {
    PlayPause = 0x01,
    Stop = 0x02,
    SkipForward = 0x03,
    SkipBack = 0x04,
    FastForward = 0x05,
    FastRewind = 0x06,
    #[strum(to_string = "stop_fast_forward_rewind", serialize = "stop_ff_rw")]
    StopFastForwardRewind = 0x07,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum ShuffleMode {
    Off = 0x00,
    Songs = 0x01,
    Albums = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum RepeatMode {
    Off = 0x00,
    OneSong = 0x01,
    AllSongs = 0x02,
}

/// Elapsed-time notifications while polling is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum PollingMode {
    Off = 0x00,
    On = 0x01,
}

/// Player state byte of the time-and-status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum PlaybackStatus {
    Stopped = 0x00,
    Playing = 0x01,
    Paused = 0x02,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Stopped => write!(f, "stopped"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Unknown(value) => write!(f, "unknown ({value:#04x})"),
        }
    }
}

/// Wire layout of the time-and-status response (9 bytes, big-endian).
///
/// Longer replies keep the two times at the front and the status byte last.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct TimeAndStatusRaw {
    pub track_length_ms: U32,
    pub elapsed_ms: U32,
    pub status: u8,
}

/// Track length, position and player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeAndStatus {
    /// Track length in milliseconds
    pub track_length_ms: u32,
    /// Elapsed time in milliseconds
    pub elapsed_ms: u32,
    pub status: PlaybackStatus,
}

impl From<TimeAndStatusRaw> for TimeAndStatus {
    fn from(raw: TimeAndStatusRaw) -> Self {
        TimeAndStatus {
            track_length_ms: raw.track_length_ms.get(),
            elapsed_ms: raw.elapsed_ms.get(),
            status: PlaybackStatus::from_primitive(raw.status),
        }
    }
}

impl TimeAndStatus {
    /// Remaining time in milliseconds, zero once elapsed passes the length.
    pub fn remaining_ms(&self) -> u32 {
        self.track_length_ms.saturating_sub(self.elapsed_ms)
    }
}

impl fmt::Display for TimeAndStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({})",
            format_ms(self.elapsed_ms),
            format_ms(self.track_length_ms),
            self.status
        )
    }
}

/// Wire layout of the screen size response prefix (big-endian).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct ScreenSizeRaw {
    pub width: U16,
    pub height: U16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
    /// Trailing byte some devices append after the dimensions
    pub extra: Option<u8>,
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One `(index, name)` pair returned while listing library items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedItem {
    pub index: u32,
    pub name: String,
}

impl From<NamedItem> for (u32, String) {
    fn from(item: NamedItem) -> Self {
        (item.index, item.name)
    }
}

/// Decoded Advanced-mode acknowledgement: status plus the acknowledged command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    pub status: u8,
    pub command: u16,
}

impl Acknowledgement {
    pub fn is_success(&self) -> bool {
        self.status == crate::constants::ACK_SUCCESS
    }
}

/// Read a big-endian u32 from the start of a payload.
pub(crate) fn read_u32(payload: &[u8]) -> Result<u32, RemoteError> {
    let (value, _) = U32::read_from_prefix(payload).map_err(|_| RemoteError::payload_shape(4, payload.len()))?;
    Ok(value.get())
}

/// Decode a NUL-terminated string, tolerating a missing terminator.
pub(crate) fn read_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn format_ms(ms: u32) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
