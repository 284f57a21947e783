//! Common error types for transport operations

use thiserror::Error;

/// A common error type for transport operations.
///
/// This enum covers the failures a [`Connection`](crate::network::Connection)
/// or [`Connect`](crate::network::Connect) implementation can report. Each
/// variant keeps the underlying reason as text so the value stays `Clone` and
/// comparable in tests.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// The host name could not be resolved or is not a valid address.
    #[error("invalid address `{0}`")]
    InvalidAddress(String),
    /// A connection attempt was refused or otherwise failed.
    #[error("connection failed: {0}")]
    ConnectionRefused(String),
    /// A timeout occurred.
    #[error("timed out: {0}")]
    Timeout(String),
    /// The TLS layer rejected the session (handshake, certificate, alert).
    #[error("tls error: {0}")]
    Tls(String),
    /// An error occurred during a write operation.
    #[error("write failed: {0}")]
    WriteError(String),
    /// An error occurred during a read operation.
    #[error("read failed: {0}")]
    ReadError(String),
    /// The connection was closed.
    #[error("connection closed")]
    ConnectionClosed,
}

impl Error {
    /// Classifies an I/O error raised while establishing a connection.
    pub(crate) fn from_connect(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Error::Timeout(err.to_string())
            }
            _ => Error::ConnectionRefused(err.to_string()),
        }
    }

    /// Classifies an I/O error raised while reading from an open connection.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Error::Timeout(err.to_string())
            }
            std::io::ErrorKind::InvalidData => Error::Tls(err.to_string()),
            _ => Error::ReadError(err.to_string()),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidAddress(a) => defmt::write!(f, "InvalidAddress({=str})", a.as_str()),
            Error::ConnectionRefused(r) => {
                defmt::write!(f, "ConnectionRefused({=str})", r.as_str())
            }
            Error::Timeout(r) => defmt::write!(f, "Timeout({=str})", r.as_str()),
            Error::Tls(r) => defmt::write!(f, "Tls({=str})", r.as_str()),
            Error::WriteError(r) => defmt::write!(f, "WriteError({=str})", r.as_str()),
            Error::ReadError(r) => defmt::write!(f, "ReadError({=str})", r.as_str()),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
        }
    }
}
