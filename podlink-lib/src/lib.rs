pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod remote;
pub mod transport;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export the session types for easy access
pub use error::{DecodeError, EncodeError, RemoteError};
pub use packet::Packet;
pub use remote::{Advanced, AdvancedRemote, RemoteSession, Session, Simple, SimpleRemote};
pub use transport::{LinkConfig, StreamTransport, Transport};
