//! Errors raised while building, sending, or parsing an HTTP exchange.

use thiserror::Error;

/// Everything that can go wrong during one request/response exchange.
///
/// Every failure is terminal for the exchange: the client never retries and
/// never returns a partially parsed response. Variants carry the offending
/// line or field so the failure can be diagnosed from the error alone.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// The method or URL was empty, or a method/header contained characters
    /// that cannot appear on the wire.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The URL could not be decomposed into scheme, host and path.
    #[error("invalid url `{url}`: {reason}")]
    UrlParseError { url: String, reason: String },

    /// The transport could not be established.
    #[error("failed to establish connection: {0}")]
    DialError(String),

    /// Writing the request to an established transport failed.
    #[error("failed to send request: {0}")]
    SendError(String),

    /// Reading the response from the transport failed.
    #[error("failed to read response: {0}")]
    ReadError(String),

    /// The status line was missing its CRLF terminator or had fewer than
    /// three fields.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// The status code field was not an integer.
    #[error("invalid status code: {0:?}")]
    InvalidStatusCode(String),

    /// A header line was missing its CRLF terminator or its colon.
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// A chunk size line was not a hexadecimal number.
    #[error("invalid chunk size: {0:?}")]
    InvalidChunkSize(String),

    /// The `Content-Length` header was not a non-negative integer.
    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    /// The stream ended before the framing said the body was complete.
    #[error("truncated body: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },
}

/// A specialized `Result` for HTTP exchanges.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidRequest(r) => defmt::write!(f, "InvalidRequest({=str})", r.as_str()),
            Error::UrlParseError { url, reason } => defmt::write!(
                f,
                "UrlParseError({=str}: {=str})",
                url.as_str(),
                reason.as_str()
            ),
            Error::DialError(r) => defmt::write!(f, "DialError({=str})", r.as_str()),
            Error::SendError(r) => defmt::write!(f, "SendError({=str})", r.as_str()),
            Error::ReadError(r) => defmt::write!(f, "ReadError({=str})", r.as_str()),
            Error::MalformedStatusLine(l) => {
                defmt::write!(f, "MalformedStatusLine({=str})", l.as_str())
            }
            Error::InvalidStatusCode(c) => defmt::write!(f, "InvalidStatusCode({=str})", c.as_str()),
            Error::MalformedHeaderLine(l) => {
                defmt::write!(f, "MalformedHeaderLine({=str})", l.as_str())
            }
            Error::InvalidChunkSize(s) => defmt::write!(f, "InvalidChunkSize({=str})", s.as_str()),
            Error::InvalidContentLength(v) => {
                defmt::write!(f, "InvalidContentLength({=str})", v.as_str())
            }
            Error::TruncatedBody { expected, received } => defmt::write!(
                f,
                "TruncatedBody(expected {=usize}, received {=usize})",
                *expected,
                *received
            ),
        }
    }
}
