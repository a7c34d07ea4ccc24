//! Error types for extended filesystem operations

use std::io;
use thiserror::Error;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, ExtendedError>;

/// Errors produced by extended filesystem operations
///
/// Every variant that wraps a host failure keeps the original [`io::Error`],
/// so callers can still classify it by errno.
#[derive(Debug, Error)]
pub enum ExtendedError {
    /// Listing or removing a directory failed
    #[error("Directory operation failed: {0}")]
    Directory(#[source] io::Error),

    /// Renaming an entry failed
    #[error("Rename failed: {0}")]
    Rename(#[source] io::Error),

    /// Copying file data failed
    #[error("File copy failed: {0}")]
    Copy(#[source] io::Error),

    /// The blocking task running a syscall panicked or was cancelled
    #[error("Blocking task failed: {0}")]
    SpawnJoin(String),
}

impl ExtendedError {
    /// The underlying host error, if this failure came from the host
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Directory(e) | Self::Rename(e) | Self::Copy(e) => Some(e),
            Self::SpawnJoin(_) => None,
        }
    }

    /// Convert into an [`io::Error`], keeping the errno when there is one
    #[must_use]
    pub fn into_io_error(self) -> io::Error {
        match self {
            Self::Directory(e) | Self::Rename(e) | Self::Copy(e) => e,
            Self::SpawnJoin(msg) => io::Error::other(msg),
        }
    }
}

/// Wrap a join failure from `compio::runtime::spawn_blocking`
pub(crate) fn spawn_join_error(err: impl std::fmt::Debug) -> ExtendedError {
    ExtendedError::SpawnJoin(format!("{err:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_preserved() {
        let err = ExtendedError::Rename(io::Error::from_raw_os_error(libc::EXDEV));
        assert_eq!(err.io_error().and_then(io::Error::raw_os_error), Some(libc::EXDEV));
        assert_eq!(err.into_io_error().raw_os_error(), Some(libc::EXDEV));
    }

    #[test]
    fn test_spawn_join_has_no_errno() {
        let err = spawn_join_error("panicked");
        assert!(err.io_error().is_none());
        assert!(err.to_string().contains("panicked"));
        assert_eq!(err.into_io_error().kind(), io::ErrorKind::Other);
    }
}
