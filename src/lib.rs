//! # libhttp1 - HTTP/1.1 client framing
//!
//! A small HTTP/1.1 client that builds request bytes, writes them to a byte
//! stream, and parses the response back out of it. The framing layer works
//! over any connection implementing the crate's [`network::Connection`]
//! traits; a TCP/TLS transport is included for hosted platforms.
//!
//! ## Features
//!
//! - **Request building**: deterministic output, computed defaults, client
//!   defaults and per-call headers merged last-write-wins
//! - **Response parsing**: status line, headers, and chunked,
//!   `Content-Length` or read-until-close bodies
//! - **Transport**: plain TCP or TLS via `rustls`, with connect/read/write
//!   timeouts
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! libhttp1 = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! use libhttp1::network::application::http::{Client, HeaderMap};
//!
//! let mut client = Client::new();
//! let mut headers = HeaderMap::new();
//! headers.insert("Content-Type", "application/json");
//!
//! let response = client.post("https://httpbin.org/post", br#"{"hello":"world"}"#, &headers)?;
//! assert!(response.is_success());
//! # Ok::<(), libhttp1::network::application::http::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! - `defmt`: Enable defmt formatting for error types

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Network abstraction layer: connection traits, TCP/TLS transport and the
/// HTTP/1.1 client.
pub mod network;
