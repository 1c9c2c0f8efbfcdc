use bytes::{Bytes, BytesMut};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info};

// Reference link configuration: 19200 baud 8N1 with a one second timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// The byte channel a remote session drives.
///
/// Implementations block for at most their configured timeout. `read`
/// returns fewer bytes than asked for when the timeout expires.
pub trait Transport {
    /// Prepare the channel. Calling it again is a no-op.
    fn open(&mut self) -> io::Result<()>;

    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read up to `max` bytes.
    fn read(&mut self, max: usize) -> io::Result<Bytes>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, max: usize) -> io::Result<Bytes> {
        (**self).read(max)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, max: usize) -> io::Result<Bytes> {
        (**self).read(max)
    }
}

/// Timeouts applied to a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LinkConfig {
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

/// Transport over any blocking byte stream: a serial port handle, a TCP
/// connection to a serial bridge, or a test double.
///
/// Timeouts must already be configured on the stream; a read that hits
/// `WouldBlock`/`TimedOut` ends early with the bytes received so far.
pub struct StreamTransport<S> {
    stream: S,
    opened: bool,
}

impl<S: Read + Write> StreamTransport<S> {
    pub fn new(stream: S) -> Self {
        Self { stream, opened: false }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl StreamTransport<TcpStream> {
    /// Connect to a serial-to-TCP bridge and apply the link timeouts.
    pub fn connect_tcp(addr: impl ToSocketAddrs, config: LinkConfig) -> io::Result<Self> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "address resolved to nothing"))?;
        info!(%addr, "Connecting to serial bridge...");
        let stream = TcpStream::connect_timeout(&addr, config.write_timeout)?;
        stream.set_read_timeout(Some(config.read_timeout))?;
        stream.set_write_timeout(Some(config.write_timeout))?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn open(&mut self) -> io::Result<()> {
        if !self.opened {
            debug!("Link opened");
            self.opened = true;
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn read(&mut self, max: usize) -> io::Result<Bytes> {
        let mut buf = BytesMut::zeroed(max);
        let mut filled = 0;
        while filled < max {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    debug!(wanted = max, got = filled, "Read timed out");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf.freeze())
    }
}
