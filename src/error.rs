//! Error types with POSIX-style codes
//!
//! Every failure surfaced by the facade is an [`FsError`]: a short code such
//! as `ENOENT`, the syscall that failed, and the path involved. The message
//! always starts with the code, e.g.
//! `ENOENT: no such file or directory, open '/missing.txt'`.

use compio_fs_extended::ExtendedError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias for facade operations
pub type Result<T> = std::result::Result<T, FsError>;

/// POSIX-style classification of a filesystem failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Target path does not exist
    NotFound,
    /// A file-only operation was given a directory
    IsDirectory,
    /// A path component used as a directory is not one
    NotDirectory,
    /// Target already exists
    AlreadyExists,
    /// Directory is not empty
    DirectoryNotEmpty,
    /// Permission denied
    AccessDenied,
    /// Operation not permitted
    NotPermitted,
    /// Rename across filesystems
    CrossDevice,
    /// Invalid argument
    InvalidArgument,
    /// Anything the host reported that has no more specific code
    Io,
}

impl ErrorCode {
    /// Short code string, e.g. `"ENOENT"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "ENOENT",
            Self::IsDirectory => "EISDIR",
            Self::NotDirectory => "ENOTDIR",
            Self::AlreadyExists => "EEXIST",
            Self::DirectoryNotEmpty => "ENOTEMPTY",
            Self::AccessDenied => "EACCES",
            Self::NotPermitted => "EPERM",
            Self::CrossDevice => "EXDEV",
            Self::InvalidArgument => "EINVAL",
            Self::Io => "EIO",
        }
    }

    /// Human-readable description used in error messages
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NotFound => "no such file or directory",
            Self::IsDirectory => "illegal operation on a directory",
            Self::NotDirectory => "not a directory",
            Self::AlreadyExists => "file already exists",
            Self::DirectoryNotEmpty => "directory not empty",
            Self::AccessDenied => "permission denied",
            Self::NotPermitted => "operation not permitted",
            Self::CrossDevice => "cross-device link not permitted",
            Self::InvalidArgument => "invalid argument",
            Self::Io => "i/o error",
        }
    }

    /// The host errno value for this code
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::NotFound => libc::ENOENT,
            Self::IsDirectory => libc::EISDIR,
            Self::NotDirectory => libc::ENOTDIR,
            Self::AlreadyExists => libc::EEXIST,
            Self::DirectoryNotEmpty => libc::ENOTEMPTY,
            Self::AccessDenied => libc::EACCES,
            Self::NotPermitted => libc::EPERM,
            Self::CrossDevice => libc::EXDEV,
            Self::InvalidArgument => libc::EINVAL,
            Self::Io => libc::EIO,
        }
    }

    /// Classify a host error
    ///
    /// The raw errno wins when present; otherwise the [`io::ErrorKind`] is used.
    #[must_use]
    pub fn from_io_error(err: &io::Error) -> Self {
        if let Some(errno) = err.raw_os_error() {
            if let Some(code) = Self::from_errno(errno) {
                return code;
            }
        }

        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::IsADirectory => Self::IsDirectory,
            io::ErrorKind::NotADirectory => Self::NotDirectory,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty,
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            io::ErrorKind::CrossesDevices => Self::CrossDevice,
            io::ErrorKind::InvalidInput => Self::InvalidArgument,
            _ => Self::Io,
        }
    }

    fn from_errno(errno: i32) -> Option<Self> {
        let code = match errno {
            libc::ENOENT => Self::NotFound,
            libc::EISDIR => Self::IsDirectory,
            libc::ENOTDIR => Self::NotDirectory,
            libc::EEXIST => Self::AlreadyExists,
            libc::ENOTEMPTY => Self::DirectoryNotEmpty,
            libc::EACCES => Self::AccessDenied,
            libc::EPERM => Self::NotPermitted,
            libc::EXDEV => Self::CrossDevice,
            libc::EINVAL => Self::InvalidArgument,
            libc::EIO => Self::Io,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host call an error came from, as named in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syscall {
    /// Directory listing
    Scandir,
    /// Directory creation
    Mkdir,
    /// File or tree removal
    Rm,
    /// Opening a file
    Open,
    /// Reading file contents
    Read,
    /// Writing file contents
    Write,
    /// Metadata query
    Stat,
    /// File copy
    Copyfile,
    /// Rename or move
    Rename,
}

impl Syscall {
    /// Lowercase syscall name, e.g. `"open"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scandir => "scandir",
            Self::Mkdir => "mkdir",
            Self::Rm => "rm",
            Self::Open => "open",
            Self::Read => "read",
            Self::Write => "write",
            Self::Stat => "stat",
            Self::Copyfile => "copyfile",
            Self::Rename => "rename",
        }
    }
}

impl fmt::Display for Syscall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed filesystem operation
#[derive(Debug, Error)]
#[error(
    "{}: {}, {} '{}'{}",
    .code,
    .code.description(),
    .syscall,
    .path.display(),
    DestSuffix(.dest.as_deref())
)]
pub struct FsError {
    code: ErrorCode,
    syscall: Syscall,
    path: PathBuf,
    dest: Option<PathBuf>,
    #[source]
    source: Option<io::Error>,
}

impl FsError {
    /// Create an error that did not originate from a host call
    #[must_use]
    pub fn new(code: ErrorCode, syscall: Syscall, path: impl Into<PathBuf>) -> Self {
        Self {
            code,
            syscall,
            path: path.into(),
            dest: None,
            source: None,
        }
    }

    /// Wrap a host error, classifying it by errno
    #[must_use]
    pub fn from_io(err: io::Error, syscall: Syscall, path: &Path) -> Self {
        Self {
            code: ErrorCode::from_io_error(&err),
            syscall,
            path: path.to_path_buf(),
            dest: None,
            source: Some(err),
        }
    }

    /// Wrap a failure from `compio-fs-extended`
    #[must_use]
    pub fn from_extended(err: ExtendedError, syscall: Syscall, path: &Path) -> Self {
        Self::from_io(err.into_io_error(), syscall, path)
    }

    /// Name the destination of a two-path operation such as rename
    #[must_use]
    pub fn with_dest(mut self, dest: &Path) -> Self {
        self.dest = Some(dest.to_path_buf());
        self
    }

    /// Short POSIX-style code string, e.g. `"ENOENT"`
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code.as_str()
    }

    /// Structured code
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        self.code
    }

    /// Full message, beginning with the code
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The syscall that failed
    #[must_use]
    pub const fn syscall(&self) -> Syscall {
        self.syscall
    }

    /// The path the operation was given
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Destination path, for two-path operations
    #[must_use]
    pub fn dest(&self) -> Option<&Path> {
        self.dest.as_deref()
    }

    /// Host errno, taken from the source error when present
    #[must_use]
    pub fn errno(&self) -> i32 {
        self.source
            .as_ref()
            .and_then(io::Error::raw_os_error)
            .unwrap_or_else(|| self.code.errno())
    }

    /// Whether the target did not exist
    ///
    /// Callers that treat removal of an absent path as success check this.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

/// Renders ` -> 'dst'` after the source path when there is a destination
struct DestSuffix<'a>(Option<&'a Path>);

impl fmt::Display for DestSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dest) => write!(f, " -> '{}'", dest.display()),
            None => Ok(()),
        }
    }
}
