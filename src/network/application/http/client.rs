use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::headers::HeaderMap;
use super::request::{self, DEFAULT_USER_AGENT, Method};
use super::response::{Response, parse_response};
use crate::network::transport::{TcpConnector, TransportConfig};
use crate::network::{Connect, Connection, Write};

/// Client-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Value of the computed `User-Agent` header.
    pub user_agent: String,
    /// Headers sent with every request; they override the computed defaults
    /// and are overridden by per-call headers.
    pub default_headers: HeaderMap,
    /// Socket settings used by [`Client::with_config`].
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: HeaderMap::new(),
            transport: TransportConfig::default(),
        }
    }
}

/// HTTP/1.1 client.
///
/// Every call dials a fresh connection through the connector, writes the
/// request, reads the complete response, and closes the connection again,
/// whether the exchange succeeded or not.
#[derive(Debug)]
pub struct Client<N: Connect = TcpConnector> {
    connector: N,
    config: ClientConfig,
}

impl Client<TcpConnector> {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            connector: TcpConnector::new(config.transport.clone()),
            config,
        }
    }
}

impl Default for Client<TcpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Connect> Client<N> {
    /// Uses `connector` to open connections. `config.transport` is not
    /// consulted; the connector carries its own socket settings.
    pub fn with_connector(connector: N, config: ClientConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.config.default_headers
    }

    pub fn connector(&self) -> &N {
        &self.connector
    }

    /// Builds the bytes this client would send, without sending them.
    pub fn build_request(
        &self,
        method: &str,
        url: &str,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<Vec<u8>> {
        request::build(method, url, body, headers, &self.config)
    }

    pub fn get(&mut self, url: &str, headers: &HeaderMap) -> Result<Response> {
        self.request(Method::Get, url, b"", headers)
    }

    pub fn post(&mut self, url: &str, body: &[u8], headers: &HeaderMap) -> Result<Response> {
        self.request(Method::Post, url, body, headers)
    }

    pub fn options(&mut self, url: &str, headers: &HeaderMap) -> Result<Response> {
        self.request(Method::Options, url, b"", headers)
    }

    pub fn request(
        &mut self,
        method: Method,
        url: &str,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<Response> {
        self.send(method.as_str(), url, body, headers)
    }

    /// Like [`request`](Self::request) for methods outside [`Method`].
    pub fn send(
        &mut self,
        method: &str,
        url: &str,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<Response> {
        let (target, request_buf) = request::prepare(method, url, body, headers, &self.config)?;
        debug!(
            "{method} {}://{}{}",
            target.scheme.as_str(),
            target.authority,
            target.path
        );

        let connection = self
            .connector
            .connect(target.scheme, &target.authority)
            .map_err(|e| Error::DialError(format!("{e:?}")))?;
        let mut connection = ConnectionGuard::new(connection);

        // --- Send Request ---
        let written = connection
            .write(&request_buf)
            .map_err(|e| Error::SendError(format!("{e:?}")))?;
        if written != request_buf.len() {
            return Err(Error::SendError(format!(
                "wrote {written} of {} bytes",
                request_buf.len()
            )));
        }
        connection
            .flush()
            .map_err(|e| Error::SendError(format!("{e:?}")))?;

        // --- Receive Response ---
        let response = parse_response(&mut *connection, method)?;
        debug!(
            "{} {} with {} body bytes",
            response.status_code,
            response.status,
            response.body.len()
        );
        Ok(response)
    }
}

/// Closes the wrapped connection when dropped.
struct ConnectionGuard<C: Connection> {
    connection: Option<C>,
}

impl<C: Connection> ConnectionGuard<C> {
    fn new(connection: C) -> Self {
        Self {
            connection: Some(connection),
        }
    }
}

impl<C: Connection> core::ops::Deref for ConnectionGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.connection
            .as_ref()
            .unwrap_or_else(|| unreachable!("connection is only taken on drop"))
    }
}

impl<C: Connection> core::ops::DerefMut for ConnectionGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        self.connection
            .as_mut()
            .unwrap_or_else(|| unreachable!("connection is only taken on drop"))
    }
}

impl<C: Connection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close() {
                warn!("failed to close connection: {e:?}");
            }
        }
    }
}
