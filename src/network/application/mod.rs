//! # Application Layer Network Protocols
//!
//! Application layer (OSI Layer 7) protocol clients written against the core
//! network traits.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 client with chunked, fixed-length and
//!   read-until-close body framing
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing [`Connection`](crate::network::Connection)
//! - **One exchange per connection**: connections are opened, used once, and closed
//! - **Error Handling**: every failure is reported with the offending input

/// HTTP client implementation.
///
/// Provides a small HTTP/1.1 client supporting any request method with
/// layered default headers.
pub mod http;
