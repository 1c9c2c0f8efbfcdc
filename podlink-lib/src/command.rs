//! Static command tables.
//!
//! Each personality owns an immutable table mapping an operation to its
//! `(mode, command)` template. A [`Packet`] is built fresh from a template
//! for every call; templates themselves are never modified.

use crate::error::EncodeError;
use crate::packet::Packet;
use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Device command namespace selected by the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Mode {
    /// Mode switching and identification
    General = 0x00,
    /// Button emulation
    Simple = 0x02,
    /// Structured query and control
    Advanced = 0x04,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Immutable `(mode, command)` pair for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate {
    pub mode: Mode,
    pub command: &'static [u8],
}

impl CommandTemplate {
    pub const fn new(mode: Mode, command: &'static [u8]) -> Self {
        Self { mode, command }
    }

    /// Combine the template with a call-specific payload.
    pub fn packet(&self, payload: Option<Bytes>) -> Result<Packet, EncodeError> {
        Packet::new(self.mode.into(), Bytes::from_static(self.command), payload)
    }

    /// Command bytes as a big-endian integer, for log and error messages.
    pub fn code(&self) -> u16 {
        self.command.iter().fold(0u16, |acc, &b| acc.wrapping_shl(8) | b as u16)
    }
}

/// Ask the device which mode it is in.
pub const REQUEST_MODE: CommandTemplate = CommandTemplate::new(Mode::General, &[0x00, 0x03]);

/// Switch the device into Simple mode.
pub const SWITCH_TO_SIMPLE: CommandTemplate = CommandTemplate::new(Mode::General, &[0x01, 0x02]);

/// Switch the device into Advanced mode.
pub const SWITCH_TO_ADVANCED: CommandTemplate = CommandTemplate::new(Mode::General, &[0x01, 0x04]);

/// Release every emulated button.
pub const BUTTON_RELEASE: CommandTemplate = CommandTemplate::new(Mode::Simple, &[0x00, 0x00]);

/// A static command table for one personality.
pub trait CommandSet: Copy + FromStr + IntoEnumIterator + Into<&'static str> {
    /// Mode byte shared by every command in the table.
    const MODE: Mode;

    fn bytes(self) -> &'static [u8];

    fn template(self) -> CommandTemplate {
        CommandTemplate::new(Self::MODE, self.bytes())
    }

    /// Find a command by its snake_case name.
    fn lookup(name: &str) -> Option<CommandTemplate> {
        Self::from_str(name).ok().map(Self::template)
    }

    /// Names of every command in the table.
    fn names() -> Vec<&'static str> {
        Self::iter().map(Into::into).collect()
    }
}

/// Button emulation commands. Each one is a button bitmask held until the
/// release packet follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SimpleCommand {
    PlayPause,
    VolumeUp,
    VolumeDown,
    SkipForward,
    SkipBack,
    NextAlbum,
    PreviousAlbum,
    Stop,
    Play,
    Pause,
    MuteUnmute,
    NextPlaylist,
    PreviousPlaylist,
    ToggleShuffle,
    ToggleRepeat,
    PowerOff,
    PowerOn,
    Menu,
    Ok,
    ScrollUp,
    ScrollDown,
}

impl CommandSet for SimpleCommand {
    const MODE: Mode = Mode::Simple;

    #[rustfmt::skip]
    fn bytes(self) -> &'static [u8] {
        match self {
            SimpleCommand::PlayPause        => &[0x00, 0x01],
            SimpleCommand::VolumeUp         => &[0x00, 0x02],
            SimpleCommand::VolumeDown       => &[0x00, 0x04],
            SimpleCommand::SkipForward      => &[0x00, 0x08],
            SimpleCommand::SkipBack         => &[0x00, 0x10],
            SimpleCommand::NextAlbum        => &[0x00, 0x20],
            SimpleCommand::PreviousAlbum    => &[0x00, 0x40],
            SimpleCommand::Stop             => &[0x00, 0x80],
            SimpleCommand::Play             => &[0x00, 0x00, 0x01],
            SimpleCommand::Pause            => &[0x00, 0x00, 0x02],
            SimpleCommand::MuteUnmute       => &[0x00, 0x00, 0x04],
            SimpleCommand::NextPlaylist     => &[0x00, 0x00, 0x20],
            SimpleCommand::PreviousPlaylist => &[0x00, 0x00, 0x40],
            SimpleCommand::ToggleShuffle    => &[0x00, 0x00, 0x80],
            SimpleCommand::ToggleRepeat     => &[0x00, 0x00, 0x00, 0x01],
            SimpleCommand::PowerOff         => &[0x00, 0x00, 0x00, 0x04],
            SimpleCommand::PowerOn          => &[0x00, 0x00, 0x00, 0x08],
            SimpleCommand::Menu             => &[0x00, 0x00, 0x00, 0x40],
            SimpleCommand::Ok               => &[0x00, 0x00, 0x00, 0x80],
            SimpleCommand::ScrollUp         => &[0x00, 0x00, 0x00, 0x00, 0x01],
            SimpleCommand::ScrollDown       => &[0x00, 0x00, 0x00, 0x00, 0x02],
        }
    }
}

/// Query and control commands of the Advanced personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AdvancedCommand {
    GetName,
    SwitchToMainLibraryPlaylist,
    SwitchToItem,
    GetAmountOfType,
    GetNamesForItems,
    GetTimeAndStatus,
    GetCurrentPosition,
    GetTitleForSong,
    GetArtistForSong,
    GetAlbumForSong,
    SetPollingMode,
    ExecutePlaylistSwitch,
    ExecutePlayback,
    GetShuffleMode,
    SetShuffleMode,
    GetRepeatMode,
    SetRepeatMode,
    GetScreenSize,
    GetSongCountInPlaylist,
    JumpToSong,
}

impl CommandSet for AdvancedCommand {
    const MODE: Mode = Mode::Advanced;

    #[rustfmt::skip]
    fn bytes(self) -> &'static [u8] {
        match self {
            AdvancedCommand::GetName                     => &[0x00, 0x14],
            AdvancedCommand::SwitchToMainLibraryPlaylist => &[0x00, 0x15],
            AdvancedCommand::SwitchToItem                => &[0x00, 0x17],
            AdvancedCommand::GetAmountOfType             => &[0x00, 0x18],
            AdvancedCommand::GetNamesForItems            => &[0x00, 0x1A],
            AdvancedCommand::GetTimeAndStatus            => &[0x00, 0x1C],
            AdvancedCommand::GetCurrentPosition          => &[0x00, 0x1E],
            AdvancedCommand::GetTitleForSong             => &[0x00, 0x20],
            AdvancedCommand::GetArtistForSong            => &[0x00, 0x22],
            AdvancedCommand::GetAlbumForSong             => &[0x00, 0x24],
            AdvancedCommand::SetPollingMode              => &[0x00, 0x26],
            AdvancedCommand::ExecutePlaylistSwitch       => &[0x00, 0x28],
            AdvancedCommand::ExecutePlayback             => &[0x00, 0x29],
            AdvancedCommand::GetShuffleMode              => &[0x00, 0x2C],
            AdvancedCommand::SetShuffleMode              => &[0x00, 0x2E],
            AdvancedCommand::GetRepeatMode               => &[0x00, 0x2F],
            AdvancedCommand::SetRepeatMode               => &[0x00, 0x31],
            AdvancedCommand::GetScreenSize               => &[0x00, 0x33],
            AdvancedCommand::GetSongCountInPlaylist      => &[0x00, 0x35],
            AdvancedCommand::JumpToSong                  => &[0x00, 0x37],
        }
    }
}
