//! Presence checks for TLS client material.
//!
//! `bollard` reads the PEM files while building the client and reports a
//! missing file as an opaque connection error. Checking them first lets the
//! caller see which path is absent.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::trace;

use crate::environment::TlsMaterial;
use crate::error::{FilesystemError, Result};

/// Confirms every file in `material` exists and is a regular file.
///
/// # Errors
///
/// Returns `FilesystemError::NotFound` for the first missing file (or a
/// missing certificate directory) and `FilesystemError::IoError` for any
/// other failure, including a path that is not a regular file.
pub(super) fn ensure_material_present(material: &TlsMaterial) -> Result<()> {
    for file in material.files() {
        trace!(path = %file, "checking TLS material");
        ensure_file_present(file)?;
    }
    Ok(())
}

fn ensure_file_present(path: &Utf8Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| map_io_error(parent, &error))?;
    let metadata = dir
        .metadata(file_name)
        .map_err(|error| map_io_error(path, &error))?;

    if metadata.is_file() {
        Ok(())
    } else {
        Err(FilesystemError::IoError {
            path: path.as_std_path().to_path_buf(),
            message: String::from("expected a regular file"),
        }
        .into())
    }
}

fn map_io_error(path: &Utf8Path, error: &io::Error) -> crate::error::DockenvError {
    let path_buf = path.as_std_path().to_path_buf();
    if error.kind() == io::ErrorKind::NotFound {
        FilesystemError::NotFound { path: path_buf }.into()
    } else {
        FilesystemError::IoError {
            path: path_buf,
            message: error.to_string(),
        }
        .into()
    }
}
