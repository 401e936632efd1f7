//! Transport selection for an engine endpoint.

use crate::environment::{ClientEnvironment, HOST_VAR, TLS_VERIFY_VAR, TlsMaterial};
use crate::error::{ConfigError, Result};

/// Classifies endpoint strings by scheme prefix.
enum SocketType {
    /// Unix socket or Windows named pipe with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint.
    Http,
    /// Some other `scheme://` the client cannot speak.
    Unsupported,
    /// Bare path without scheme prefix.
    BarePath,
    /// `host:port` without scheme prefix, dialled over TCP.
    HostPort,
}

impl SocketType {
    fn is_socket_scheme(host: &str) -> bool {
        host.starts_with("unix://") || host.starts_with("npipe://")
    }

    fn is_http_scheme(host: &str) -> bool {
        host.starts_with("tcp://") || host.starts_with("http://") || host.starts_with("https://")
    }

    fn is_bare_path(host: &str) -> bool {
        host.starts_with('/') || host.starts_with("\\\\")
    }

    fn classify(host: &str) -> Self {
        if Self::is_socket_scheme(host) {
            Self::Socket
        } else if Self::is_http_scheme(host) {
            Self::Http
        } else if host.contains("://") {
            Self::Unsupported
        } else if Self::is_bare_path(host) {
            Self::BarePath
        } else {
            Self::HostPort
        }
    }
}

/// How the client reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPlan {
    /// Unix socket or Windows named pipe, addressed by URI.
    Socket {
        /// `unix://` or `npipe://` URI.
        uri: String,
    },
    /// Plain HTTP over TCP.
    Http {
        /// `http://` or `https://` URL.
        url: String,
    },
    /// HTTPS with client certificate authentication.
    Tls {
        /// `https://` URL.
        url: String,
        /// PEM files presented to the engine.
        material: TlsMaterial,
    },
}

impl ConnectionPlan {
    /// Chooses the transport for a resolved environment.
    ///
    /// - `unix://` and `npipe://` hosts use the socket transport.
    /// - `tcp://` hosts are rewritten to `http://`.
    /// - Bare paths starting with `//` or `\\` are named pipes; any other
    ///   path starting with `/` is a Unix socket.
    /// - Anything else without a scheme, such as `localhost:2375`, is a TCP
    ///   address and is handled like `tcp://`.
    /// - With TLS verification enabled, TCP hosts are forced to `https://`
    ///   and carry the material from the certificate directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the host uses an unsupported
    /// scheme, or when TLS verification is requested for a socket endpoint.
    pub fn for_environment(environment: &ClientEnvironment) -> Result<Self> {
        let host = environment.host();
        match SocketType::classify(host) {
            SocketType::Socket => Self::socket(environment, host.to_owned()),
            SocketType::BarePath => Self::socket(environment, normalize_bare_path(host)),
            SocketType::Http | SocketType::HostPort if environment.tls_verify() => {
                Ok(Self::Tls {
                    url: with_scheme(host, "https://"),
                    material: environment.tls_material(),
                })
            }
            SocketType::Http => Ok(Self::Http {
                url: host.replacen("tcp://", "http://", 1),
            }),
            SocketType::HostPort => Ok(Self::Http {
                url: format!("http://{host}"),
            }),
            SocketType::Unsupported => Err(ConfigError::InvalidValue {
                field: HOST_VAR.to_owned(),
                reason: format!(
                    "unsupported scheme in '{host}'; expected unix://, npipe://, tcp://, http:// or https://"
                ),
            }
            .into()),
        }
    }

    fn socket(environment: &ClientEnvironment, uri: String) -> Result<Self> {
        if environment.tls_verify() {
            return Err(ConfigError::InvalidValue {
                field: TLS_VERIFY_VAR.to_owned(),
                reason: format!("TLS verification requires a TCP endpoint, got '{uri}'"),
            }
            .into());
        }
        Ok(Self::Socket { uri })
    }

    /// The URI or URL handed to the client library.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Socket { uri } => uri,
            Self::Http { url } | Self::Tls { url, .. } => url,
        }
    }

    /// Short transport name for logs and display.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Socket { .. } => "socket",
            Self::Http { .. } => "http",
            Self::Tls { .. } => "tls",
        }
    }
}

/// Prefixes a bare path with `npipe://` or `unix://`.
///
/// Detection is syntax-based: `//some/path` is treated as a named pipe even
/// on Unix.
fn normalize_bare_path(path: &str) -> String {
    if path.starts_with("\\\\") || path.starts_with("//") {
        format!("npipe://{path}")
    } else {
        format!("unix://{path}")
    }
}

/// Replaces whatever scheme `host` carries with `scheme`.
fn with_scheme(host: &str, scheme: &str) -> String {
    let address = host.split_once("://").map_or(host, |(_, rest)| rest);
    format!("{scheme}{address}")
}
