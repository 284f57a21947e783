//! Request serialization.
//!
//! A request goes out as
//!
//! ```text
//! METHOD PATH HTTP/1.1\r\n
//! Name: Value\r\n        (one line per merged header)
//! \r\n
//! body
//! ```
//!
//! Headers come from three tiers, later tiers winning on a name collision:
//! the computed defaults ([`computed_headers`]), the client's configured
//! default headers, and the headers passed for this one call.
//! `Content-Length` is always appended last and always equals the body
//! length.

use url::Url;

use super::client::ClientConfig;
use super::error::{Error, Result};
use super::headers::HeaderMap;
use crate::network::Scheme;

/// `User-Agent` sent when the client configuration does not name one.
pub const DEFAULT_USER_AGENT: &str = concat!("libhttp1/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Head,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a URL the client needs: where to dial and what to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: Scheme,
    /// `host[:port]`, with the port only when the URL spelled out a
    /// non-default one. Used both for dialing and for the `Host` header.
    pub authority: String,
    /// Request target: the URL path (`/` when empty) plus `?query`.
    pub path: String,
}

impl Target {
    pub fn parse(url: &str) -> Result<Self> {
        let url_error = |reason: &str| Error::UrlParseError {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| url_error(&e.to_string()))?;
        let scheme = Scheme::parse(parsed.scheme())
            .ok_or_else(|| url_error(&format!("unsupported scheme `{}`", parsed.scheme())))?;
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| url_error("missing host"))?;

        let authority = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let mut path = match parsed.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            scheme,
            authority,
            path,
        })
    }
}

/// The lowest-precedence header tier, derived from the target.
pub fn computed_headers(target: &Target, user_agent: &str) -> HeaderMap {
    [
        ("Host", target.authority.as_str()),
        ("User-Agent", user_agent),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.8"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Connection", "keep-alive"),
    ]
    .into_iter()
    .collect()
}

/// Builds the wire bytes for one request.
///
/// `headers` are the per-call headers; client-level defaults come from
/// `config`. Never performs I/O.
pub fn build(
    method: &str,
    url: &str,
    body: &[u8],
    headers: &HeaderMap,
    config: &ClientConfig,
) -> Result<Vec<u8>> {
    prepare(method, url, body, headers, config).map(|(_, bytes)| bytes)
}

/// Like [`build`], also returning the parsed target so the caller knows
/// where to dial.
pub(crate) fn prepare(
    method: &str,
    url: &str,
    body: &[u8],
    headers: &HeaderMap,
    config: &ClientConfig,
) -> Result<(Target, Vec<u8>)> {
    if method.is_empty() || url.is_empty() {
        return Err(Error::InvalidRequest(
            "method and url cannot be empty".to_string(),
        ));
    }
    if !is_token(method) {
        return Err(Error::InvalidRequest(format!("invalid method {method:?}")));
    }

    let target = Target::parse(url)?;

    let mut merged = computed_headers(&target, &config.user_agent);
    merged.merge(&config.default_headers);
    merged.merge(headers);
    merged.remove("Content-Length");
    merged.insert("Content-Length", body.len().to_string());

    let bytes = serialize(method, &target.path, &merged, body)?;
    Ok((target, bytes))
}

fn serialize(method: &str, path: &str, headers: &HeaderMap, body: &[u8]) -> Result<Vec<u8>> {
    let mut request_buf = Vec::with_capacity(256 + body.len());

    // Request line
    request_buf.extend_from_slice(method.as_bytes());
    request_buf.push(b' ');
    request_buf.extend_from_slice(path.as_bytes());
    request_buf.extend_from_slice(b" HTTP/1.1\r\n");

    // Headers
    for header in headers {
        if !is_token(&header.name) {
            return Err(Error::InvalidRequest(format!(
                "invalid header name {:?}",
                header.name
            )));
        }
        if header.value.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0)) {
            return Err(Error::InvalidRequest(format!(
                "invalid value for header {}: {:?}",
                header.name, header.value
            )));
        }
        request_buf.extend_from_slice(header.name.as_bytes());
        request_buf.extend_from_slice(b": ");
        request_buf.extend_from_slice(header.value.as_bytes());
        request_buf.extend_from_slice(b"\r\n");
    }
    request_buf.extend_from_slice(b"\r\n");

    // Body
    request_buf.extend_from_slice(body);

    Ok(request_buf)
}

/// RFC 9110 `token`: one or more `tchar`.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}
