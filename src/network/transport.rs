//! TCP and TLS transports for hosted platforms.
//!
//! [`TcpConnector`] implements [`Connect`] by resolving the host, dialing each
//! resolved address with a bounded connect timeout, and, for
//! [`Scheme::Https`], completing a `rustls` handshake against the
//! `webpki-roots` trust store before handing the stream back. The result is a
//! [`NetConnection`], which implements the crate's [`Connection`] traits.

use std::io::{ErrorKind, Read as _, Write as _};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use serde::{Deserialize, Serialize};
use socket2::{SockRef, TcpKeepalive};

use crate::network::error::Error;
use crate::network::{Close, Connect, Connection, Read, Write};

/// Default connect timeout applied to every resolved address.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default idle time before, and interval between, TCP keep-alive probes.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// The URL schemes a transport can be dialed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain TCP, port 80 by default.
    Http,
    /// TLS over TCP, port 443 by default.
    Https,
}

impl Scheme {
    /// Parses a URL scheme, ignoring ASCII case.
    pub fn parse(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("http") {
            Some(Scheme::Http)
        } else if scheme.eq_ignore_ascii_case("https") {
            Some(Scheme::Https)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// The conventional port for this scheme.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Socket level settings applied by [`TcpConnector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Upper bound for establishing the TCP connection to one address.
    pub connect_timeout: Duration,
    /// Deadline for each individual read; `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Deadline for each individual write; `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
    /// TCP keep-alive probe interval; `None` leaves keep-alive off.
    pub keep_alive: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
            write_timeout: None,
            keep_alive: Some(DEFAULT_KEEP_ALIVE),
        }
    }
}

/// An established plain or TLS-wrapped TCP stream.
pub enum NetConnection {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl core::fmt::Debug for NetConnection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (kind, stream) = match self {
            NetConnection::Plain(stream) => ("Plain", stream),
            NetConnection::Tls(tls) => ("Tls", &tls.sock),
        };
        f.debug_struct("NetConnection")
            .field("kind", &kind)
            .field("peer", &stream.peer_addr().ok())
            .finish()
    }
}

impl Read for NetConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self {
            NetConnection::Plain(stream) => stream.read(buf).map_err(Error::from_read),
            NetConnection::Tls(stream) => match stream.read(buf) {
                Ok(n) => Ok(n),
                // Peers that drop the socket without close_notify end the stream.
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    debug!("tls peer closed without close_notify");
                    Ok(0)
                }
                Err(e) => Err(Error::from_read(e)),
            },
        }
    }
}

impl Write for NetConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let result = match self {
            NetConnection::Plain(stream) => stream.write_all(buf),
            NetConnection::Tls(stream) => stream.write_all(buf),
        };
        result
            .map(|_| buf.len())
            .map_err(|e| Error::WriteError(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let result = match self {
            NetConnection::Plain(stream) => stream.flush(),
            NetConnection::Tls(stream) => stream.flush(),
        };
        result.map_err(|e| Error::WriteError(e.to_string()))
    }
}

impl Close for NetConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        let stream = match self {
            NetConnection::Plain(stream) => stream,
            NetConnection::Tls(tls) => {
                let mut tls = *tls;
                tls.conn.send_close_notify();
                if let Err(e) = tls.flush() {
                    debug!("failed to deliver close_notify: {e}");
                }
                tls.sock
            }
        };
        match stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(Error::WriteError(e.to_string())),
        }
    }
}

impl Connection for NetConnection {}

/// Dials TCP and TLS connections.
///
/// The TLS client configuration is built once and shared by every
/// connection this connector opens.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    config: TransportConfig,
    tls: Arc<ClientConfig>,
}

impl TcpConnector {
    pub fn new(config: TransportConfig) -> Self {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        Self {
            config,
            tls: Arc::new(tls),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn dial_tcp(&self, name: &str, port: u16) -> Result<TcpStream, Error> {
        let addrs = (name, port)
            .to_socket_addrs()
            .map_err(|e| Error::InvalidAddress(format!("{name}:{port}: {e}")))?;

        let mut last_error = None;
        for addr in addrs {
            debug!("connecting to {addr} (timeout {:?})", self.config.connect_timeout);
            match TcpStream::connect_timeout(&addr, self.config.connect_timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(self.config.read_timeout)
                        .map_err(Error::from_connect)?;
                    stream
                        .set_write_timeout(self.config.write_timeout)
                        .map_err(Error::from_connect)?;
                    if let Some(interval) = self.config.keep_alive {
                        SockRef::from(&stream)
                            .set_tcp_keepalive(&keep_alive_probes(interval))
                            .map_err(Error::from_connect)?;
                    }
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("failed to set TCP_NODELAY on {addr}: {e}");
                    }
                    return Ok(stream);
                }
                Err(e) => {
                    debug!("connect to {addr} failed: {e}");
                    last_error = Some(Error::from_connect(e));
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            Error::InvalidAddress(format!("{name}:{port}: no addresses resolved"))
        }))
    }

    fn handshake(
        &self,
        name: &str,
        mut stream: TcpStream,
    ) -> Result<StreamOwned<ClientConnection, TcpStream>, Error> {
        let server_name = ServerName::try_from(name.to_string())
            .map_err(|e| Error::InvalidAddress(format!("{name}: {e}")))?;
        let mut conn = ClientConnection::new(Arc::clone(&self.tls), server_name)
            .map_err(|e| Error::Tls(e.to_string()))?;
        while conn.is_handshaking() {
            conn.complete_io(&mut stream)
                .map_err(|e| Error::Tls(e.to_string()))?;
        }
        debug!(
            "tls established with {name} ({:?})",
            conn.protocol_version()
        );
        Ok(StreamOwned::new(conn, stream))
    }
}

fn keep_alive_probes(interval: Duration) -> TcpKeepalive {
    let probes = TcpKeepalive::new().with_time(interval);
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "windows"
    ))]
    let probes = probes.with_interval(interval);
    probes
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Connect for TcpConnector {
    type Connection = NetConnection;
    type Error = Error;

    fn connect(&mut self, scheme: Scheme, host: &str) -> Result<Self::Connection, Self::Error> {
        let (name, port) = split_authority(host)?;
        let port = port.unwrap_or_else(|| scheme.default_port());
        let stream = self.dial_tcp(name, port)?;
        match scheme {
            Scheme::Http => Ok(NetConnection::Plain(stream)),
            Scheme::Https => Ok(NetConnection::Tls(Box::new(self.handshake(name, stream)?))),
        }
    }
}

/// Splits a `host[:port]` authority, accepting bracketed IPv6 literals.
pub(crate) fn split_authority(authority: &str) -> Result<(&str, Option<u16>), Error> {
    let invalid = || Error::InvalidAddress(authority.to_string());

    let (name, port) = if let Some(rest) = authority.strip_prefix('[') {
        let (name, rest) = rest.split_once(']').ok_or_else(invalid)?;
        match rest {
            "" => (name, None),
            _ => (name, Some(rest.strip_prefix(':').ok_or_else(invalid)?)),
        }
    } else {
        match authority.split_once(':') {
            Some((name, port)) => (name, Some(port)),
            None => (authority, None),
        }
    };

    if name.is_empty() {
        return Err(invalid());
    }
    let port = match port {
        Some(port) => Some(port.parse::<u16>().map_err(|_| invalid())?),
        None => None,
    };
    Ok((name, port))
}
