//! A network abstraction layer for HTTP/1.1 clients
//!
//! This module provides the small set of traits every client in this crate is
//! written against, together with a concrete TCP/TLS transport for hosted
//! platforms. Protocol code only ever sees a [`Connection`], so the same
//! framing logic runs over a socket, a TLS session, or an in-memory mock.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for transport operations
pub mod error;

/// TCP and TLS transports built on `std::net` and `rustls`
pub mod transport;

/// Application layer protocol implementations
pub mod application;

pub use transport::Scheme;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection. `Ok(0)` means the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `host` (a `name[:port]` authority) using `scheme`
    fn connect(&mut self, scheme: Scheme, host: &str) -> Result<Self::Connection, Self::Error>;
}
