//! HTTP/1.1 client protocol implementation.
//!
//! This module frames HTTP/1.1 requests and parses responses over any
//! connection implementing [`crate::network::Connection`]. It is deliberately
//! small: one connection per request, no pooling, no redirects, no retries,
//! and no content decoding.
//!
//! # Features
//!
//! - Deterministic request serialization with three-tier header merging
//! - Response parsing as an explicit state machine with precise errors
//! - All three body framings: chunked, `Content-Length`, read-until-close
//! - Connections closed on every exit path
//!
//! # Usage
//!
//! ```rust,no_run
//! use libhttp1::network::application::http::{Client, HeaderMap};
//!
//! let mut client = Client::new();
//! client.default_headers_mut().insert("X-Device-Id", "sensor-42");
//!
//! let response = client.get("http://example.com/", &HeaderMap::new())?;
//! println!("{} {}", response.status_code, response.status);
//! println!("{}", response.text());
//! # Ok::<(), libhttp1::network::application::http::Error>(())
//! ```
//!
//! The building blocks are usable on their own when the caller owns the
//! stream:
//!
//! ```rust
//! use libhttp1::network::Read;
//! use libhttp1::network::application::http::{ClientConfig, HeaderMap, build_request, parse_response};
//!
//! struct Canned(&'static [u8]);
//!
//! impl Read for Canned {
//!     type Error = ();
//!     fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
//!         let n = buf.len().min(self.0.len());
//!         buf[..n].copy_from_slice(&self.0[..n]);
//!         self.0 = &self.0[n..];
//!         Ok(n)
//!     }
//! }
//!
//! let request = build_request("GET", "http://example.com/", b"", &HeaderMap::new(), &ClientConfig::default())?;
//! assert!(request.starts_with(b"GET / HTTP/1.1\r\n"));
//!
//! let mut stream = Canned(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
//! let response = parse_response(&mut stream, "GET")?;
//! assert_eq!(response.body, b"hi");
//! # Ok::<(), libhttp1::network::application::http::Error>(())
//! ```

/// HTTP client and its configuration.
pub mod client;

/// Error type shared by every stage of an exchange.
pub mod error;

/// Ordered, case-insensitive header table.
pub mod headers;

/// Request serialization.
pub mod request;

/// Response status line and header parsing.
pub mod response;

/// Response body framing.
pub mod body;

mod reader;

pub use body::Framing;
pub use client::{Client, ClientConfig};
pub use error::{Error, Result};
pub use headers::{Header, HeaderMap};
pub use request::{Method, Target, build as build_request};
pub use response::{Response, ResponseParser, parse_response};
