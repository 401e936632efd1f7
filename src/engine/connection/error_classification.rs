//! Maps `bollard` construction failures onto `ContainerError` variants.

use std::io;
use std::path::Path;

use super::ConnectionPlan;
use crate::error::ContainerError;

/// Filesystem path behind a socket plan, without its scheme.
fn socket_path(plan: &ConnectionPlan) -> Option<&Path> {
    let ConnectionPlan::Socket { uri } = plan else {
        return None;
    };
    uri.strip_prefix("unix://")
        .or_else(|| uri.strip_prefix("npipe://"))
        .map(Path::new)
}

/// Turns an I/O error kind into the most specific variant the plan allows.
fn from_io_kind(kind: io::ErrorKind, path: Option<&Path>, message: String) -> ContainerError {
    match (kind, path) {
        (io::ErrorKind::PermissionDenied, Some(socket)) => ContainerError::PermissionDenied {
            path: socket.to_path_buf(),
        },
        (io::ErrorKind::NotFound, Some(socket)) => ContainerError::SocketNotFound {
            path: socket.to_path_buf(),
        },
        _ => ContainerError::ConnectionFailed { message },
    }
}

/// Classifies a client construction error for `plan`.
///
/// Socket plans can surface `SocketNotFound` or `PermissionDenied`; every
/// other failure becomes `ConnectionFailed` carrying the library message.
pub(super) fn classify_connection_error(
    error: &bollard::errors::Error,
    plan: &ConnectionPlan,
) -> ContainerError {
    let path = socket_path(plan);
    let message = error.to_string();

    match error {
        bollard::errors::Error::SocketNotFoundError(_) => path.map_or_else(
            || ContainerError::ConnectionFailed { message },
            |socket| ContainerError::SocketNotFound {
                path: socket.to_path_buf(),
            },
        ),
        bollard::errors::Error::IOError { err } => {
            let kind = io_error_kind_in_chain(err).unwrap_or_else(|| err.kind());
            from_io_kind(kind, path, message)
        }
        _ => match io_error_kind_in_chain(error) {
            Some(kind) => from_io_kind(kind, path, message),
            None => ContainerError::ConnectionFailed { message },
        },
    }
}

/// Walks the source chain looking for an `io::Error`.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<io::ErrorKind> {
    let mut current = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}
