//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use hex;
#[allow(unused_imports)]
pub use podlink_lib::command::{AdvancedCommand, CommandSet, Mode, SimpleCommand};
#[allow(unused_imports)]
pub use podlink_lib::error::{DecodeError, RemoteError};
#[allow(unused_imports)]
pub use podlink_lib::packet::{Packet, encode};
#[allow(unused_imports)]
pub use podlink_lib::transport::Transport;
#[allow(unused_imports)]
pub use podlink_lib::{AdvancedRemote, Session, SimpleRemote};

use std::collections::{HashSet, VecDeque};
use std::io;

/// Mode switch into Simple mode
#[allow(dead_code)]
pub const SWITCH_SIMPLE: &str = "ff5503000102fa";

/// Mode switch into Advanced mode
#[allow(dead_code)]
pub const SWITCH_ADVANCED: &str = "ff5503000104f8";

/// Simple-mode button release
#[allow(dead_code)]
pub const RELEASE: &str = "ff5503020000fb";

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// Encode a frame and return it as hex
#[allow(dead_code)]
pub fn frame_hex(mode: u8, command: &[u8], payload: Option<&[u8]>) -> String {
    hex::encode(encode(mode, command, payload).expect("Failed to encode frame"))
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory transport: records every write and serves queued reply bytes.
///
/// Reads return fewer bytes than requested once the queue runs dry, the
/// same way a serial read behaves when its timeout expires.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub writes: Vec<Bytes>,
    pub opens: usize,
    replies: VecDeque<u8>,
    failing_writes: HashSet<usize>,
    write_attempts: usize,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue reply frames given as hex strings.
    pub fn with_replies(replies: &[&str]) -> Self {
        let mut transport = Self::new();
        for reply in replies {
            transport.push_reply(reply);
        }
        transport
    }

    pub fn push_reply(&mut self, hex_data: &str) {
        self.replies.extend(hex_to_bytes(hex_data));
    }

    /// Make the write with this zero-based index fail.
    pub fn fail_write(mut self, index: usize) -> Self {
        self.failing_writes.insert(index);
        self
    }

    pub fn writes_hex(&self) -> Vec<String> {
        self.writes.iter().map(hex::encode).collect()
    }

    pub fn pending_reply_bytes(&self) -> usize {
        self.replies.len()
    }
}

impl Transport for ScriptedTransport {
    fn open(&mut self) -> io::Result<()> {
        self.opens += 1;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let index = self.write_attempts;
        self.write_attempts += 1;
        if self.failing_writes.contains(&index) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "link down"));
        }
        self.writes.push(Bytes::copy_from_slice(bytes));
        Ok(())
    }

    fn read(&mut self, max: usize) -> io::Result<Bytes> {
        let n = max.min(self.replies.len());
        Ok(self.replies.drain(..n).collect())
    }
}
