//! StreamTransport over in-memory streams and a local TCP bridge

mod common;

use common::*;
use podlink_lib::{LinkConfig, StreamTransport};
use std::io::{self, Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// Serves canned bytes on read and records everything written.
struct Loopback {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl Loopback {
    fn new(input: &str) -> Self {
        Self {
            input: Cursor::new(hex::decode(input).unwrap()),
            output: Vec::new(),
        }
    }
}

impl Read for Loopback {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Loopback {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hands out one byte per read, then reports a timeout.
struct Trickle {
    bytes: Vec<u8>,
    pos: usize,
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.bytes.len() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        }
        buf[0] = self.bytes[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

impl Write for Trickle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_short_read_at_end_of_stream() {
    let mut transport = StreamTransport::new(Loopback::new("ff5503"));
    transport.open().unwrap();

    let bytes = transport.read(8).unwrap();
    assert_eq!(bytes.as_ref(), &[0xFF, 0x55, 0x03]);
    assert!(transport.read(1).unwrap().is_empty());
}

#[test]
fn test_open_is_idempotent() {
    let mut transport = StreamTransport::new(Loopback::new(""));
    transport.open().unwrap();
    transport.open().unwrap();
    assert!(transport.get_ref().output.is_empty());
}

#[test]
fn test_timeout_returns_partial_read() {
    let mut transport = StreamTransport::new(Trickle {
        bytes: vec![0x01, 0x02, 0x03],
        pos: 0,
    });

    let bytes = transport.read(5).unwrap();
    assert_eq!(bytes.as_ref(), &[0x01, 0x02, 0x03]);
}

#[test]
fn test_session_over_stream() {
    init_tracing();
    let transport = StreamTransport::new(Loopback::new("ff55070400190000002ab2"));
    let mut remote = AdvancedRemote::new(transport).unwrap();

    assert_eq!(remote.get_amount_of_songs().unwrap(), 42);

    let written = remote.into_inner().into_inner().output;
    assert_eq!(hex::encode(written), format!("{}{}", SWITCH_ADVANCED, "ff550404001805db"));
}

#[test]
fn test_session_over_tcp_bridge() {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let bridge = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        // Mode switch (7 bytes) plus the request (8 bytes)
        let mut received = [0u8; 15];
        socket.read_exact(&mut received).unwrap();
        socket.write_all(&hex::decode("ff55070400190000002ab2").unwrap()).unwrap();
        received
    });

    let config = LinkConfig::default().with_read_timeout(Duration::from_secs(5));
    let transport = StreamTransport::connect_tcp(addr, config).unwrap();
    let mut remote = AdvancedRemote::new(transport).unwrap();
    assert_eq!(remote.get_amount_of_songs().unwrap(), 42);

    let received = bridge.join().unwrap();
    assert_eq!(hex::encode(received), format!("{}{}", SWITCH_ADVANCED, "ff550404001805db"));
}
