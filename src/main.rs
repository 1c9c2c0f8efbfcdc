use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::net::TcpStream;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use podlink_lib::command::{AdvancedCommand, CommandSet, SimpleCommand};
use podlink_lib::constants::REFERENCE_BAUD_RATE;
use podlink_lib::types::{ItemType, PlaybackCommand, RepeatMode, ShuffleMode};
use podlink_lib::{AdvancedRemote, LinkConfig, Session, SimpleRemote, StreamTransport};

type Link = StreamTransport<TcpStream>;

/// Drive a media player over the Accessory Protocol through a serial-to-TCP bridge.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address of the serial bridge (host:port).
    #[arg(short, long, default_value = "127.0.0.1:4000")]
    addr: String,
    /// Read timeout in milliseconds.
    #[arg(long, default_value_t = 1000)]
    read_timeout_ms: u64,
    /// Write timeout in milliseconds.
    #[arg(long, default_value_t = 1000)]
    write_timeout_ms: u64,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the device which mode it is in.
    Mode,
    /// List the command names of both personalities.
    Commands,
    /// Press a button in Simple mode.
    Press {
        /// Button name, e.g. play_pause or volume_up.
        button: String,
        #[arg(short, long, default_value_t = 1)]
        times: u32,
    },
    /// Run any command by name and print the raw response.
    Raw {
        /// Use the Advanced command table instead of the Simple one.
        #[arg(long)]
        advanced: bool,
        name: String,
        /// Payload as a hex string.
        #[arg(long)]
        payload: Option<String>,
        /// Wait for a response frame.
        #[arg(long)]
        response: bool,
    },
    /// Device name.
    Name,
    /// Number of items of a type.
    Count { item_type: ItemType },
    /// Names of `count` items starting at `offset`.
    Names {
        item_type: ItemType,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Select an item, then start playback of the selection.
    Select {
        item_type: ItemType,
        index: u32,
        /// Song number within the selection to start at.
        #[arg(long)]
        start_at: Option<u32>,
    },
    /// Track length, elapsed time and player state.
    Status,
    /// Index of the current song and the playlist length.
    Position,
    /// Title, artist and album of a song in the playing playlist.
    Song { number: u32 },
    /// Send a playback control (play_pause, stop, skip_forward, ...).
    Playback { command: PlaybackCommand },
    /// Read or set the shuffle mode.
    Shuffle { mode: Option<ShuffleMode> },
    /// Read or set the repeat mode.
    Repeat { mode: Option<RepeatMode> },
    /// Jump to a song number in the playing playlist.
    Jump { number: u32 },
    /// Screen dimensions.
    Screen,
    /// Turn polling on and print elapsed-time updates.
    Poll {
        #[arg(short, long, default_value_t = 10)]
        updates: u32,
    },
}

#[derive(Serialize)]
struct SongInfo {
    number: u32,
    title: String,
    artist: String,
    album: String,
}

#[derive(Serialize)]
struct Position {
    index: u32,
    songs: u32,
}

fn setup_logging(log_file_path: Option<PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // -v gives DEBUG, which includes every frame on the wire
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    if let Err(e) = run(&cli) {
        error!("Command failed: {:?}", e);
        process::exit(1);
    }

    Ok(())
}

fn connect(cli: &Cli) -> Result<Link> {
    let config = LinkConfig::default()
        .with_read_timeout(Duration::from_millis(cli.read_timeout_ms))
        .with_write_timeout(Duration::from_millis(cli.write_timeout_ms));
    info!(addr = %cli.addr, baud = REFERENCE_BAUD_RATE, "Opening link");
    StreamTransport::connect_tcp(&cli.addr, config).with_context(|| format!("Failed to connect to {}", cli.addr))
}

fn advanced(cli: &Cli) -> Result<AdvancedRemote<Link>> {
    Ok(AdvancedRemote::new(connect(cli)?)?)
}

fn emit<T: Serialize + Display>(json: bool, value: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Mode => {
            let mut remote = SimpleRemote::new(connect(cli)?)?;
            let mode = remote.request_mode()?;
            if cli.json {
                println!("{}", serde_json::to_string(&mode)?);
            } else {
                println!("{:?}", mode);
            }
        }
        Command::Commands => {
            println!("simple:   {}", SimpleCommand::names().join(", "));
            println!("advanced: {}", AdvancedCommand::names().join(", "));
        }
        Command::Press { button, times } => {
            if SimpleCommand::lookup(button).is_none() {
                bail!("Unknown button '{}'. Known: {}", button, SimpleCommand::names().join(", "));
            }
            let mut remote = SimpleRemote::new(connect(cli)?)?;
            for _ in 0..*times {
                remote.execute(button, None, false)?;
            }
        }
        Command::Raw {
            advanced: use_advanced,
            name,
            payload,
            response,
        } => {
            let payload = payload
                .as_deref()
                .map(hex::decode)
                .transpose()
                .context("Payload is not valid hex")?;
            let mut session: Box<dyn Session> = if *use_advanced {
                Box::new(advanced(cli)?)
            } else {
                Box::new(SimpleRemote::new(connect(cli)?)?)
            };
            if let Some(packet) = session.execute(name, payload.as_deref(), *response)? {
                println!("{}", packet);
            }
        }
        Command::Name => {
            let name = advanced(cli)?.get_name()?;
            emit(cli.json, &name)?;
        }
        Command::Count { item_type } => {
            let count = advanced(cli)?.get_amount_of(*item_type)?;
            emit(cli.json, &count)?;
        }
        Command::Names {
            item_type,
            offset,
            count,
        } => {
            let items = advanced(cli)?.get_names_for(*item_type, *offset, *count)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in items {
                    println!("{:>6}  {}", item.index, item.name);
                }
            }
        }
        Command::Select {
            item_type,
            index,
            start_at,
        } => {
            let mut remote = advanced(cli)?;
            remote.switch_to_item(*item_type, *index)?;
            remote.execute_playlist_switch(*start_at)?;
        }
        Command::Status => {
            let status = advanced(cli)?.get_time_and_status()?;
            emit(cli.json, &status)?;
        }
        Command::Position => {
            let mut remote = advanced(cli)?;
            let position = Position {
                index: remote.get_current_position()?,
                songs: remote.get_number_of_songs_in_current_playlist()?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&position)?);
            } else {
                println!("{} / {}", position.index, position.songs);
            }
        }
        Command::Song { number } => {
            let mut remote = advanced(cli)?;
            let song = SongInfo {
                number: *number,
                title: remote.get_title_for_song(*number)?,
                artist: remote.get_artist_for_song(*number)?,
                album: remote.get_album_for_song(*number)?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&song)?);
            } else {
                println!("{} - {} ({})", song.artist, song.title, song.album);
            }
        }
        Command::Playback { command } => advanced(cli)?.execute_playback(*command)?,
        Command::Shuffle { mode } => {
            let mut remote = advanced(cli)?;
            match mode {
                Some(mode) => remote.set_shuffle_mode(*mode)?,
                None => emit(cli.json, &remote.get_shuffle_mode()?)?,
            }
        }
        Command::Repeat { mode } => {
            let mut remote = advanced(cli)?;
            match mode {
                Some(mode) => remote.set_repeat_mode(*mode)?,
                None => emit(cli.json, &remote.get_repeat_mode()?)?,
            }
        }
        Command::Jump { number } => advanced(cli)?.jump_to_song_number(*number)?,
        Command::Screen => {
            let size = advanced(cli)?.get_screen_size()?;
            emit(cli.json, &size)?;
        }
        Command::Poll { updates } => {
            let mut remote = advanced(cli)?;
            let first = remote.start_polling()?;
            println!("{}", first);
            for _ in 1..*updates {
                println!("{}", remote.read_polling_update()?);
            }
            remote.stop_polling()?;
        }
    }
    Ok(())
}
