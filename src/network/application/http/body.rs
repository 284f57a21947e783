//! Response body framing.
//!
//! Once the headers are parsed, [`Framing::select`] decides where the body
//! ends and [`decode`] reads exactly that much from the stream:
//!
//! 1. no body at all for `HEAD` responses and for `1xx`, `204` and `304`;
//! 2. chunked transfer coding when `Transfer-Encoding` ends in `chunked`;
//! 3. exactly `Content-Length` bytes when that header is present;
//! 4. otherwise everything until the server closes the connection.
//!
//! The last mode never terminates on a connection the server keeps open, so
//! it is only sound because the client uses each connection once.

use log::{debug, trace};

use super::error::{Error, Result};
use super::headers::HeaderMap;
use super::reader::LineReader;
use crate::network::Read;

/// Upper bound for buffer space reserved from an untrusted length.
const MAX_PREALLOCATION: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// The response has no body.
    Empty,
    /// A sequence of length-prefixed chunks ending with a zero-size chunk.
    Chunked,
    /// Exactly this many bytes.
    Length(usize),
    /// All bytes until the peer closes the stream.
    UntilClose,
}

impl Framing {
    pub fn select(head_request: bool, status_code: u16, headers: &HeaderMap) -> Result<Self> {
        if head_request || (100..200).contains(&status_code) || matches!(status_code, 204 | 304) {
            return Ok(Framing::Empty);
        }

        if let Some(encoding) = headers.get("Transfer-Encoding") {
            // chunked must be the final coding to delimit the message.
            let last = encoding.rsplit(',').next().unwrap_or_default().trim();
            if last.eq_ignore_ascii_case("chunked") {
                return Ok(Framing::Chunked);
            }
        }

        if let Some(length) = headers.get("Content-Length") {
            return length
                .trim()
                .parse::<usize>()
                .map(Framing::Length)
                .map_err(|_| Error::InvalidContentLength(length.to_string()));
        }

        Ok(Framing::UntilClose)
    }
}

/// Reads a complete body from `reader` according to `framing`.
pub fn decode<C: Read>(reader: &mut LineReader<'_, C>, framing: Framing) -> Result<Vec<u8>> {
    debug!("reading body: {framing:?}");
    match framing {
        Framing::Empty => Ok(Vec::new()),
        Framing::Chunked => decode_chunked(reader),
        Framing::Length(expected) => {
            let mut body = Vec::with_capacity(expected.min(MAX_PREALLOCATION));
            let received = reader.read_up_to(expected, &mut body)?;
            if received < expected {
                return Err(Error::TruncatedBody { expected, received });
            }
            Ok(body)
        }
        Framing::UntilClose => {
            let mut body = Vec::new();
            reader.read_to_end(&mut body)?;
            Ok(body)
        }
    }
}

fn decode_chunked<C: Read>(reader: &mut LineReader<'_, C>) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        reader.read_line(&mut line)?;
        let size = parse_chunk_size(&line)?;
        if size == 0 {
            break;
        }

        let received = reader.read_up_to(size, &mut body)?;
        if received < size {
            return Err(Error::TruncatedBody {
                expected: size,
                received,
            });
        }
        trace!("chunk of {size} bytes, body now {} bytes", body.len());

        // Chunk data must be followed directly by CRLF.
        line.clear();
        reader.read_up_to(2, &mut line)?;
        if line != b"\r\n" {
            return Err(Error::InvalidChunkSize(
                String::from_utf8_lossy(&line).into_owned(),
            ));
        }
    }

    // Trailer section: read and dropped.
    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 || line == b"\r\n" {
            break;
        }
        if !line.ends_with(b"\r\n") {
            return Err(Error::MalformedHeaderLine(
                String::from_utf8_lossy(&line).into_owned(),
            ));
        }
        trace!("discarding trailer {:?}", String::from_utf8_lossy(&line).trim_end());
    }

    Ok(body)
}

/// Parses a `chunk-size [; extensions] CRLF` line.
fn parse_chunk_size(line: &[u8]) -> Result<usize> {
    let text = String::from_utf8_lossy(line);
    let invalid = || Error::InvalidChunkSize(text.trim_end().to_string());
    if !line.ends_with(b"\r\n") {
        return Err(invalid());
    }

    let size = text.split(';').next().unwrap_or_default().trim();
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    usize::from_str_radix(size, 16).map_err(|_| invalid())
}
