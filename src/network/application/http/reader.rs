//! Buffered reading on top of a [`Read`] connection.
//!
//! The response parser needs two primitives the raw trait does not offer:
//! "everything up to the next `\n`" and "exactly this many bytes". Reads from
//! the connection go through a fixed-size buffer so a status line and its
//! headers usually arrive in a single `read` call.

use heapless::Vec as FixedVec;

use super::error::{Error, Result};
use crate::network::Read;

const READ_BUFFER_SIZE: usize = 2048;

pub struct LineReader<'c, C: Read> {
    connection: &'c mut C,
    buffer: FixedVec<u8, READ_BUFFER_SIZE>,
    pos: usize,
    eof: bool,
}

impl<C: Read> core::fmt::Debug for LineReader<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineReader")
            .field("buffered", &(self.buffer.len() - self.pos.min(self.buffer.len())))
            .field("eof", &self.eof)
            .finish()
    }
}

impl<'c, C: Read> LineReader<'c, C> {
    pub fn new(connection: &'c mut C) -> Self {
        Self {
            connection,
            buffer: FixedVec::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Returns the buffered bytes, reading from the connection if none are
    /// left. An empty slice means end of stream.
    fn fill(&mut self) -> Result<&[u8]> {
        if self.pos >= self.buffer.len() && !self.eof {
            self.pos = 0;
            self.buffer.clear();
            // Cannot fail: the length equals the capacity.
            let _ = self.buffer.resize_default(READ_BUFFER_SIZE);
            match self.connection.read(&mut self.buffer) {
                Ok(n) => {
                    self.buffer.truncate(n);
                    self.eof = n == 0;
                }
                Err(e) => {
                    self.buffer.clear();
                    return Err(Error::ReadError(format!("{e:?}")));
                }
            }
        }
        Ok(&self.buffer[self.pos..])
    }

    /// Appends bytes up to and including the next `\n` to `line`.
    ///
    /// Returns the number of bytes appended. Fewer bytes without a trailing
    /// `\n` means the stream ended mid-line; `0` means it had already ended.
    pub fn read_line(&mut self, line: &mut Vec<u8>) -> Result<usize> {
        let mut total = 0;
        loop {
            let (used, done) = {
                let available = self.fill()?;
                if available.is_empty() {
                    return Ok(total);
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => {
                        line.extend_from_slice(&available[..=i]);
                        (i + 1, true)
                    }
                    None => {
                        line.extend_from_slice(available);
                        (available.len(), false)
                    }
                }
            };
            self.pos += used;
            total += used;
            if done {
                return Ok(total);
            }
        }
    }

    /// Appends up to `limit` bytes to `out`, stopping early only at end of
    /// stream. Returns the number of bytes appended.
    pub fn read_up_to(&mut self, limit: usize, out: &mut Vec<u8>) -> Result<usize> {
        let mut total = 0;
        while total < limit {
            let used = {
                let available = self.fill()?;
                if available.is_empty() {
                    break;
                }
                let take = available.len().min(limit - total);
                out.extend_from_slice(&available[..take]);
                take
            };
            self.pos += used;
            total += used;
        }
        Ok(total)
    }

    /// Appends everything until the stream closes.
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        self.read_up_to(usize::MAX, out)
    }
}
