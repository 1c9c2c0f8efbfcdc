//! Remote sessions for the two device personalities.
//!
//! Every call runs the same cycle from idle: write the mode switch packet,
//! write the command, read one response when one is expected and, for the
//! Simple personality only, write the button release packet. Nothing is
//! cached between calls, so each call switches mode again. Listing item
//! names is the one multi-request call: one switch, then a request per item.

use crate::command::{
    AdvancedCommand, BUTTON_RELEASE, CommandSet, CommandTemplate, Mode, REQUEST_MODE, SWITCH_TO_ADVANCED,
    SWITCH_TO_SIMPLE, SimpleCommand,
};
use crate::constants::{
    ACK_COMMAND, CHECKSUM_SIZE, EXTENDED_LENGTH_MARKER, EXTENDED_LENGTH_SIZE, HEADER, HEADER_SIZE, MAX_PACKET_LENGTH,
    PLAYLIST_START, SHORT_LENGTH_SIZE,
};
use crate::error::{DecodeError, RemoteError};
use crate::packet::{Packet, read_length};
use crate::transport::Transport;
use crate::types::{
    Acknowledgement, ItemType, NamedItem, PlaybackCommand, PlaybackStatus, PollingMode, RepeatMode, ScreenSize,
    ScreenSizeRaw, ShuffleMode, TimeAndStatus, TimeAndStatusRaw, read_text, read_u32,
};
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::{FromPrimitive, TryFromPrimitive};
use std::marker::PhantomData;
use tracing::{debug, info, warn};
use zerocopy::FromBytes;

/// Per-personality protocol details.
pub trait Personality {
    const NAME: &'static str;

    /// Packet that puts the device into this personality's mode.
    const MODE_SWITCH: CommandTemplate;

    /// Packet written after every command, if any.
    const RELEASE: Option<CommandTemplate>;

    type Command: CommandSet;
}

/// Button emulation personality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple;

/// Query and control personality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Advanced;

impl Personality for Simple {
    const NAME: &'static str = "simple";
    const MODE_SWITCH: CommandTemplate = SWITCH_TO_SIMPLE;
    const RELEASE: Option<CommandTemplate> = Some(BUTTON_RELEASE);
    type Command = SimpleCommand;
}

impl Personality for Advanced {
    const NAME: &'static str = "advanced";
    const MODE_SWITCH: CommandTemplate = SWITCH_TO_ADVANCED;
    const RELEASE: Option<CommandTemplate> = None;
    type Command = AdvancedCommand;
}

/// Capabilities shared by both personalities.
pub trait Session {
    /// Run a command from the active table by name.
    ///
    /// Returns the decoded response when `expect_response` is set.
    fn execute(
        &mut self,
        name: &str,
        payload: Option<&[u8]>,
        expect_response: bool,
    ) -> Result<Option<Packet>, RemoteError>;

    /// Ask the device which mode it is currently in.
    fn request_mode(&mut self) -> Result<Mode, RemoteError>;

    /// Names accepted by [`Session::execute`].
    fn command_names(&self) -> Vec<&'static str>;
}

/// A connection to one device, driving one personality.
pub struct RemoteSession<T, P> {
    transport: T,
    personality: PhantomData<P>,
}

pub type SimpleRemote<T> = RemoteSession<T, Simple>;
pub type AdvancedRemote<T> = RemoteSession<T, Advanced>;

impl<T: Transport, P: Personality> RemoteSession<T, P> {
    /// Take ownership of the transport and open it.
    pub fn new(mut transport: T) -> Result<Self, RemoteError> {
        transport.open()?;
        info!(personality = P::NAME, "Remote session ready");
        Ok(Self {
            transport,
            personality: PhantomData,
        })
    }

    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Mode switch, command, `then`, and the release step if the personality has one.
    fn cycle<R>(
        &mut self,
        template: CommandTemplate,
        payload: Option<Bytes>,
        then: impl FnOnce(&mut Self) -> Result<R, RemoteError>,
    ) -> Result<R, RemoteError> {
        let packet = template.packet(payload)?;
        let switch = P::MODE_SWITCH.packet(None)?;

        debug!(personality = P::NAME, "Switching mode");
        self.send(&switch)?;

        let outcome = self.send(&packet).and_then(|()| then(self));

        match P::RELEASE {
            Some(release) => self.release(release, outcome),
            None => outcome,
        }
    }

    fn release<R>(&mut self, release: CommandTemplate, outcome: Result<R, RemoteError>) -> Result<R, RemoteError> {
        let released = release
            .packet(None)
            .map_err(RemoteError::from)
            .and_then(|packet| self.send(&packet));

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release_err)) => Err(release_err),
            (Err(original), Ok(())) => {
                warn!(error = %original, "Command failed, buttons released");
                Err(original)
            }
            (Err(original), Err(release_err)) => {
                warn!(error = %original, release_error = %release_err, "Command failed and release failed");
                Err(RemoteError::ReleaseFailed {
                    original: Box::new(original),
                    release: Box::new(release_err),
                })
            }
        }
    }

    fn send(&mut self, packet: &Packet) -> Result<(), RemoteError> {
        let bytes = packet.encode();
        debug!(bytes = hex::encode(&bytes), "Serial write");
        self.transport.write(&bytes)?;
        Ok(())
    }

    /// Read one frame and decode it. Short reads surface as decode errors.
    fn receive(&mut self) -> Result<Packet, RemoteError> {
        let mut frame = BytesMut::new();
        let head = self.transport.read(HEADER_SIZE + SHORT_LENGTH_SIZE)?;
        frame.extend_from_slice(&head);

        if head.len() == HEADER_SIZE + SHORT_LENGTH_SIZE && head[..HEADER_SIZE] == HEADER {
            if head[HEADER_SIZE] == EXTENDED_LENGTH_MARKER {
                let rest = self.transport.read(EXTENDED_LENGTH_SIZE - SHORT_LENGTH_SIZE)?;
                frame.extend_from_slice(&rest);
            }
            if let Ok((length, _)) = read_length(&frame) {
                let body = self.transport.read(length + CHECKSUM_SIZE)?;
                frame.extend_from_slice(&body);
            }
        }

        debug!(bytes = hex::encode(&frame), "Serial read");
        let decoded = Packet::decode(&frame);
        if let Err(DecodeError::BadHeader { .. }) = decoded {
            self.drain()?;
        }
        Ok(decoded?)
    }

    /// Discard whatever the device is still sending, up to one maximum-size
    /// frame, so the next call starts on a frame boundary.
    fn drain(&mut self) -> Result<(), RemoteError> {
        let mut dropped = 0;
        while dropped <= MAX_PACKET_LENGTH {
            let chunk = self.transport.read(DRAIN_CHUNK)?;
            if chunk.is_empty() {
                break;
            }
            dropped += chunk.len();
        }
        warn!(dropped, "Dropped unsynchronised bytes after a bad header");
        Ok(())
    }

    fn command(&mut self, command: P::Command, payload: Option<Bytes>) -> Result<(), RemoteError> {
        self.cycle(command.template(), payload, |_| Ok(()))
    }

    fn request(&mut self, command: P::Command, payload: Option<Bytes>) -> Result<Packet, RemoteError> {
        self.cycle(command.template(), payload, Self::receive)
    }
}

impl<T: Transport, P: Personality> Session for RemoteSession<T, P> {
    fn execute(
        &mut self,
        name: &str,
        payload: Option<&[u8]>,
        expect_response: bool,
    ) -> Result<Option<Packet>, RemoteError> {
        let template = P::Command::lookup(name).ok_or_else(|| RemoteError::UnknownCommand(name.to_string()))?;
        info!(personality = P::NAME, command = name, "Executing");
        self.cycle(template, payload.map(Bytes::copy_from_slice), |session| {
            if expect_response {
                session.receive().map(Some)
            } else {
                Ok(None)
            }
        })
    }

    fn request_mode(&mut self) -> Result<Mode, RemoteError> {
        self.send(&REQUEST_MODE.packet(None)?)?;
        let response = self.receive()?;
        let payload = response.payload().unwrap_or_default();
        let mode = payload.first().copied().ok_or(RemoteError::payload_shape(1, 0))?;
        Ok(Mode::from_primitive(mode))
    }

    fn command_names(&self) -> Vec<&'static str> {
        P::Command::names()
    }
}

impl<T: Transport> RemoteSession<T, Simple> {
    /// Press and release a button `times` times.
    fn press(&mut self, command: SimpleCommand, times: u32) -> Result<(), RemoteError> {
        for _ in 0..times {
            self.command(command, None)?;
        }
        Ok(())
    }

    pub fn play_pause(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::PlayPause, 1)
    }

    pub fn volume_up(&mut self, points: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::VolumeUp, points)
    }

    pub fn volume_down(&mut self, points: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::VolumeDown, points)
    }

    pub fn skip_forward(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::SkipForward, times)
    }

    pub fn skip_back(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::SkipBack, times)
    }

    pub fn next_album(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::NextAlbum, times)
    }

    pub fn previous_album(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::PreviousAlbum, times)
    }

    pub fn stop(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::Stop, 1)
    }

    pub fn play(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::Play, 1)
    }

    pub fn pause(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::Pause, 1)
    }

    pub fn mute_unmute(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::MuteUnmute, 1)
    }

    pub fn next_playlist(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::NextPlaylist, times)
    }

    pub fn previous_playlist(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::PreviousPlaylist, times)
    }

    pub fn toggle_shuffle(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::ToggleShuffle, 1)
    }

    pub fn toggle_repeat(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::ToggleRepeat, 1)
    }

    pub fn power_off(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::PowerOff, 1)
    }

    pub fn power_on(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::PowerOn, 1)
    }

    pub fn menu(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::Menu, 1)
    }

    pub fn ok(&mut self) -> Result<(), RemoteError> {
        self.press(SimpleCommand::Ok, 1)
    }

    pub fn scroll_up(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::ScrollUp, times)
    }

    pub fn scroll_down(&mut self, times: u32) -> Result<(), RemoteError> {
        self.press(SimpleCommand::ScrollDown, times)
    }
}

fn item_payload(item_type: ItemType, values: &[u32]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + 4 * values.len());
    buf.put_u8(item_type.into());
    for value in values {
        buf.put_u32(*value);
    }
    buf.freeze()
}

// Read size used when resynchronising after a bad header
const DRAIN_CHUNK: usize = 64;

// Upper bound on the names list reserved up front
const NAMES_PREALLOC: u32 = 256;

fn u32_payload(value: u32) -> Bytes {
    Bytes::copy_from_slice(&value.to_be_bytes())
}

impl<T: Transport> RemoteSession<T, Advanced> {
    /// Run a control command and check the device's acknowledgement.
    fn control(&mut self, command: AdvancedCommand, payload: Option<Bytes>) -> Result<(), RemoteError> {
        let response = self.request(command, payload)?;
        if response.command() != ACK_COMMAND {
            warn!(command = %command, reply = hex::encode(response.command()), "Reply is not an acknowledgement");
        }
        let payload = response.payload().unwrap_or_default();
        let status = *payload.first().ok_or(RemoteError::payload_shape(1, 0))?;
        let acked = match payload.get(1..3) {
            Some(code) => u16::from_be_bytes([code[0], code[1]]),
            None => command.template().code(),
        };
        let ack = Acknowledgement { status, command: acked };
        if !ack.is_success() {
            warn!(command = %command, status, "Command rejected");
            return Err(RemoteError::Rejected {
                command: ack.command,
                status: ack.status,
            });
        }
        Ok(())
    }

    fn request_u32(&mut self, command: AdvancedCommand, payload: Option<Bytes>) -> Result<u32, RemoteError> {
        let response = self.request(command, payload)?;
        read_u32(response.payload().unwrap_or_default())
    }

    fn request_text(&mut self, command: AdvancedCommand, payload: Option<Bytes>) -> Result<String, RemoteError> {
        let response = self.request(command, payload)?;
        Ok(read_text(response.payload().unwrap_or_default()))
    }

    fn request_byte(&mut self, command: AdvancedCommand) -> Result<u8, RemoteError> {
        let response = self.request(command, None)?;
        response
            .payload()
            .and_then(|p| p.first().copied())
            .ok_or(RemoteError::payload_shape(1, 0))
    }

    /// The device's name.
    pub fn get_name(&mut self) -> Result<String, RemoteError> {
        self.request_text(AdvancedCommand::GetName, None)
    }

    pub fn switch_to_main_library_playlist(&mut self) -> Result<(), RemoteError> {
        self.control(AdvancedCommand::SwitchToMainLibraryPlaylist, None)
    }

    /// Select an item of the given type. Takes effect with [`Self::execute_playlist_switch`].
    pub fn switch_to_item(&mut self, item_type: ItemType, index: u32) -> Result<(), RemoteError> {
        info!(%item_type, index, "Switching to item");
        self.control(AdvancedCommand::SwitchToItem, Some(item_payload(item_type, &[index])))
    }

    pub fn switch_to_playlist(&mut self, index: u32) -> Result<(), RemoteError> {
        self.switch_to_item(ItemType::Playlist, index)
    }

    pub fn switch_to_artist(&mut self, index: u32) -> Result<(), RemoteError> {
        self.switch_to_item(ItemType::Artist, index)
    }

    pub fn switch_to_album(&mut self, index: u32) -> Result<(), RemoteError> {
        self.switch_to_item(ItemType::Album, index)
    }

    pub fn switch_to_genre(&mut self, index: u32) -> Result<(), RemoteError> {
        self.switch_to_item(ItemType::Genre, index)
    }

    pub fn switch_to_song(&mut self, index: u32) -> Result<(), RemoteError> {
        self.switch_to_item(ItemType::Song, index)
    }

    pub fn switch_to_composer(&mut self, index: u32) -> Result<(), RemoteError> {
        self.switch_to_item(ItemType::Composer, index)
    }

    /// Number of items of a type in the current selection.
    pub fn get_amount_of(&mut self, item_type: ItemType) -> Result<u32, RemoteError> {
        self.request_u32(AdvancedCommand::GetAmountOfType, Some(item_payload(item_type, &[])))
    }

    pub fn get_amount_of_playlists(&mut self) -> Result<u32, RemoteError> {
        self.get_amount_of(ItemType::Playlist)
    }

    pub fn get_amount_of_artists(&mut self) -> Result<u32, RemoteError> {
        self.get_amount_of(ItemType::Artist)
    }

    pub fn get_amount_of_albums(&mut self) -> Result<u32, RemoteError> {
        self.get_amount_of(ItemType::Album)
    }

    pub fn get_amount_of_genres(&mut self) -> Result<u32, RemoteError> {
        self.get_amount_of(ItemType::Genre)
    }

    pub fn get_amount_of_songs(&mut self) -> Result<u32, RemoteError> {
        self.get_amount_of(ItemType::Song)
    }

    pub fn get_amount_of_composers(&mut self) -> Result<u32, RemoteError> {
        self.get_amount_of(ItemType::Composer)
    }

    /// Names of `count` items starting at `offset`.
    ///
    /// The device answers one item per request. After a single mode switch the
    /// same request is sent `count` times and each reply contributes one
    /// `(index, name)` pair. Any failure discards the items collected so far.
    pub fn get_names_for(&mut self, item_type: ItemType, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        info!(%item_type, offset, count, "Listing item names");
        if count == 0 {
            return Ok(Vec::new());
        }
        let template = AdvancedCommand::GetNamesForItems.template();
        let packet = template.packet(Some(item_payload(item_type, &[offset, count])))?;

        // The cycle sends the first request; the rest reuse the same mode
        self.cycle(template, Some(packet.payload_bytes()), |session| {
            let mut items = Vec::with_capacity(count.min(NAMES_PREALLOC) as usize);
            for sent in 0..count {
                if sent > 0 {
                    session.send(&packet)?;
                }
                let response = session.receive()?;
                let body = response.payload().unwrap_or_default();
                let index = read_u32(body)?;
                items.push(NamedItem {
                    index,
                    name: read_text(&body[4..]),
                });
            }
            Ok(items)
        })
    }

    pub fn get_names_for_playlists(&mut self, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        self.get_names_for(ItemType::Playlist, offset, count)
    }

    pub fn get_names_for_artists(&mut self, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        self.get_names_for(ItemType::Artist, offset, count)
    }

    pub fn get_names_for_albums(&mut self, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        self.get_names_for(ItemType::Album, offset, count)
    }

    pub fn get_names_for_genres(&mut self, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        self.get_names_for(ItemType::Genre, offset, count)
    }

    pub fn get_names_for_songs(&mut self, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        self.get_names_for(ItemType::Song, offset, count)
    }

    pub fn get_names_for_composers(&mut self, offset: u32, count: u32) -> Result<Vec<NamedItem>, RemoteError> {
        self.get_names_for(ItemType::Composer, offset, count)
    }

    pub fn get_time_and_status(&mut self) -> Result<TimeAndStatus, RemoteError> {
        let response = self.request(AdvancedCommand::GetTimeAndStatus, None)?;
        let payload = response.payload().unwrap_or_default();
        let (raw, _) = TimeAndStatusRaw::read_from_prefix(payload)
            .map_err(|_| RemoteError::payload_shape(size_of::<TimeAndStatusRaw>(), payload.len()))?;
        let mut info = TimeAndStatus::from(raw);
        // Status is the last byte, also when a device appends extra fields
        if let Some(&status) = payload.last() {
            info.status = PlaybackStatus::from_primitive(status);
        }
        Ok(info)
    }

    /// Index of the current song in the playing playlist.
    pub fn get_current_position(&mut self) -> Result<u32, RemoteError> {
        self.request_u32(AdvancedCommand::GetCurrentPosition, None)
    }

    // These need the device to be playing a set of songs.

    pub fn get_title_for_song(&mut self, number: u32) -> Result<String, RemoteError> {
        self.request_text(AdvancedCommand::GetTitleForSong, Some(u32_payload(number)))
    }

    pub fn get_artist_for_song(&mut self, number: u32) -> Result<String, RemoteError> {
        self.request_text(AdvancedCommand::GetArtistForSong, Some(u32_payload(number)))
    }

    pub fn get_album_for_song(&mut self, number: u32) -> Result<String, RemoteError> {
        self.request_text(AdvancedCommand::GetAlbumForSong, Some(u32_payload(number)))
    }

    pub fn set_polling_mode(&mut self, mode: PollingMode) -> Result<(), RemoteError> {
        self.control(
            AdvancedCommand::SetPollingMode,
            Some(Bytes::copy_from_slice(&[u8::from(mode)])),
        )
    }

    /// Turn polling on and wait for the first elapsed-time update.
    pub fn start_polling(&mut self) -> Result<u32, RemoteError> {
        self.set_polling_mode(PollingMode::On)?;
        self.read_polling_update()
    }

    pub fn stop_polling(&mut self) -> Result<(), RemoteError> {
        self.set_polling_mode(PollingMode::Off)
    }

    /// Block for the next unsolicited elapsed-time update, in milliseconds.
    pub fn read_polling_update(&mut self) -> Result<u32, RemoteError> {
        let update = self.receive()?;
        read_u32(update.payload().unwrap_or_default())
    }

    /// Start playback of the selection made with `switch_to_*`.
    ///
    /// `None` starts from the beginning of the selection.
    pub fn execute_playlist_switch(&mut self, song_number: Option<u32>) -> Result<(), RemoteError> {
        let number = song_number.unwrap_or(PLAYLIST_START);
        self.control(AdvancedCommand::ExecutePlaylistSwitch, Some(u32_payload(number)))
    }

    pub fn execute_playback(&mut self, command: PlaybackCommand) -> Result<(), RemoteError> {
        info!(%command, "Playback");
        self.control(
            AdvancedCommand::ExecutePlayback,
            Some(Bytes::copy_from_slice(&[u8::from(command)])),
        )
    }

    pub fn play_pause(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::PlayPause)
    }

    pub fn stop(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::Stop)
    }

    pub fn skip_forward(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::SkipForward)
    }

    pub fn skip_back(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::SkipBack)
    }

    pub fn fast_forward(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::FastForward)
    }

    pub fn fast_rewind(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::FastRewind)
    }

    pub fn stop_fast_forward_rewind(&mut self) -> Result<(), RemoteError> {
        self.execute_playback(PlaybackCommand::StopFastForwardRewind)
    }

    pub fn get_shuffle_mode(&mut self) -> Result<ShuffleMode, RemoteError> {
        let value = self.request_byte(AdvancedCommand::GetShuffleMode)?;
        ShuffleMode::try_from_primitive(value).map_err(|_| RemoteError::InvalidValue {
            field: "shuffle mode",
            value,
        })
    }

    pub fn set_shuffle_mode(&mut self, mode: ShuffleMode) -> Result<(), RemoteError> {
        self.control(AdvancedCommand::SetShuffleMode, Some(Bytes::copy_from_slice(&[u8::from(mode)])))
    }

    pub fn get_repeat_mode(&mut self) -> Result<RepeatMode, RemoteError> {
        let value = self.request_byte(AdvancedCommand::GetRepeatMode)?;
        RepeatMode::try_from_primitive(value).map_err(|_| RemoteError::InvalidValue {
            field: "repeat mode",
            value,
        })
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) -> Result<(), RemoteError> {
        self.control(AdvancedCommand::SetRepeatMode, Some(Bytes::copy_from_slice(&[u8::from(mode)])))
    }

    pub fn get_number_of_songs_in_current_playlist(&mut self) -> Result<u32, RemoteError> {
        self.request_u32(AdvancedCommand::GetSongCountInPlaylist, None)
    }

    pub fn jump_to_song_number(&mut self, number: u32) -> Result<(), RemoteError> {
        self.control(AdvancedCommand::JumpToSong, Some(u32_payload(number)))
    }

    pub fn get_screen_size(&mut self) -> Result<ScreenSize, RemoteError> {
        let response = self.request(AdvancedCommand::GetScreenSize, None)?;
        let payload = response.payload().unwrap_or_default();
        let (raw, rest) = ScreenSizeRaw::read_from_prefix(payload)
            .map_err(|_| RemoteError::payload_shape(size_of::<ScreenSizeRaw>(), payload.len()))?;
        Ok(ScreenSize {
            width: raw.width.get(),
            height: raw.height.get(),
            extra: rest.last().copied(),
        })
    }
}
