//! Response parsing.
//!
//! [`ResponseParser`] is a small state machine driven one step at a time:
//!
//! * `StatusLine`: one CRLF-terminated `PROTOCOL CODE REASON` line;
//! * `Headers`: one `Name: Value` line per step until a blank line or the
//!   end of the stream;
//! * `Body`: hands the stream to [`body::decode`](super::body::decode);
//! * `Done`: the response is complete.
//!
//! Any failure moves the parser to `Errored`, which it never leaves. Nothing
//! parsed before the failure is returned.

use std::borrow::Cow;

use log::debug;
use serde::{Deserialize, Serialize};

use super::body::{self, Framing};
use super::error::{Error, Result};
use super::headers::HeaderMap;
use super::reader::LineReader;
use crate::network::Read;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Protocol token from the status line, e.g. `HTTP/1.1`.
    pub protocol: String,
    pub status_code: u16,
    /// Reason phrase, e.g. `Not Found`.
    pub status: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// `true` for `2xx` status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserializes a JSON body.
    pub fn json<'a, T: Deserialize<'a>>(&'a self) -> core::result::Result<T, serde_json_core::de::Error> {
        serde_json_core::from_slice(&self.body).map(|(value, _)| value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    StatusLine,
    Headers,
    Body,
    Done,
    Errored(Error),
}

pub struct ResponseParser<'c, C: Read> {
    reader: LineReader<'c, C>,
    state: State,
    head_request: bool,
    response: Response,
    line: Vec<u8>,
}

impl<C: Read> core::fmt::Debug for ResponseParser<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResponseParser")
            .field("state", &self.state)
            .field("head_request", &self.head_request)
            .finish_non_exhaustive()
    }
}

impl<'c, C: Read> ResponseParser<'c, C> {
    /// Creates a parser for the response to a request made with `method`.
    pub fn new(connection: &'c mut C, method: &str) -> Self {
        Self {
            reader: LineReader::new(connection),
            state: State::StatusLine,
            head_request: method.eq_ignore_ascii_case("HEAD"),
            response: Response::default(),
            line: Vec::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Advances the parser by one state and returns the new state.
    pub fn step(&mut self) -> Result<&State> {
        if let State::Errored(e) = &self.state {
            return Err(e.clone());
        }
        let next = match self.state {
            State::StatusLine => self.read_status_line(),
            State::Headers => self.read_header_line(),
            State::Body => self.read_body(),
            State::Done | State::Errored(_) => return Ok(&self.state),
        };
        match next {
            Ok(state) => {
                self.state = state;
                Ok(&self.state)
            }
            Err(e) => {
                self.state = State::Errored(e.clone());
                Err(e)
            }
        }
    }

    /// Runs the parser to completion.
    pub fn finish(mut self) -> Result<Response> {
        while *self.step()? != State::Done {}
        Ok(self.response)
    }

    fn read_status_line(&mut self) -> Result<State> {
        self.line.clear();
        self.reader.read_line(&mut self.line)?;

        let text = String::from_utf8_lossy(&self.line);
        if !text.ends_with("\r\n") {
            return Err(Error::MalformedStatusLine(text.into_owned()));
        }

        let mut parts = text.trim().splitn(3, ' ');
        let (Some(protocol), Some(code), Some(reason)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::MalformedStatusLine(text.trim_end().to_string()));
        };
        // Any integer that fits u16 is accepted; larger codes are invalid.
        let status_code = code
            .parse::<u16>()
            .map_err(|_| Error::InvalidStatusCode(code.to_string()))?;

        debug!("status line: {protocol} {status_code} {reason}");
        self.response.protocol = protocol.to_string();
        self.response.status_code = status_code;
        self.response.status = reason.to_string();
        Ok(State::Headers)
    }

    fn read_header_line(&mut self) -> Result<State> {
        self.line.clear();
        let n = self.reader.read_line(&mut self.line)?;
        if n == 0 || self.line == b"\r\n" {
            return Ok(State::Body);
        }

        let text = String::from_utf8_lossy(&self.line);
        let Some(content) = text.strip_suffix("\r\n") else {
            return Err(Error::MalformedHeaderLine(text.into_owned()));
        };
        let Some((name, value)) = content.split_once(':') else {
            return Err(Error::MalformedHeaderLine(content.to_string()));
        };

        self.response.headers.insert(name.trim(), value.trim());
        Ok(State::Headers)
    }

    fn read_body(&mut self) -> Result<State> {
        let framing = Framing::select(
            self.head_request,
            self.response.status_code,
            &self.response.headers,
        )?;
        self.response.body = body::decode(&mut self.reader, framing)?;
        Ok(State::Done)
    }
}

/// Reads one complete response to a request made with `method`.
pub fn parse_response<C: Read>(connection: &mut C, method: &str) -> Result<Response> {
    ResponseParser::new(connection, method).finish()
}
