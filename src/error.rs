//! Semantic error types for dockenv.
//!
//! Conditions a caller might inspect or react to are modelled as `thiserror`
//! enums. Opaque `eyre::Report` values only appear at the binary boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while resolving client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No engine endpoint was supplied through `DOCKER_HOST` or an override.
    #[error(
        "DOCKER_HOST is not set; point it at the container engine endpoint \
         (for example unix:///var/run/docker.sock)"
    )]
    HostNotSet,

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field or environment variable.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

impl ConfigError {
    /// Human-readable message, mirroring the `Display` output.
    #[must_use]
    pub fn msg(&self) -> String {
        self.to_string()
    }
}

/// Errors raised while talking to the container engine.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to build a client for the container engine.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// The engine answered the ping with an error.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// The engine did not answer the ping in time.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },

    /// A tokio runtime for a synchronous wrapper could not be created.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },
}

/// Errors raised while inspecting local files such as TLS material.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: PathBuf,
        /// A description of the I/O error.
        message: String,
    },
}

/// Top-level error type for dockenv.
#[derive(Debug, Error)]
pub enum DockenvError {
    /// An error occurred while resolving configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while talking to the engine.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// An error occurred while inspecting local files.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for dockenv operations.
pub type Result<T> = std::result::Result<T, DockenvError>;
