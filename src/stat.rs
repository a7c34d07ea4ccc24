//! Stat results returned by the facade

use crate::traits::AsyncMetadata;
use std::time::SystemTime;

/// Type of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (only seen when links are not followed)
    Symlink,
    /// Device, socket, fifo or anything else
    Other,
}

impl EntryKind {
    /// Lower-case name used in CLI output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        }
    }
}

/// Metadata snapshot for a path
///
/// `is_file()` and `is_directory()` never both hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatResult {
    /// Size in bytes
    pub size: u64,
    /// Entry type
    pub kind: EntryKind,
    /// Permission bits
    pub mode: u32,
    /// Last modification time
    pub modified: SystemTime,
    /// Last access time
    pub accessed: SystemTime,
}

impl StatResult {
    /// Snapshot any backend's metadata
    #[must_use]
    pub fn from_metadata<M: AsyncMetadata>(metadata: &M) -> Self {
        let kind = if metadata.is_symlink() {
            EntryKind::Symlink
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Self {
            size: metadata.size(),
            kind,
            mode: metadata.permissions(),
            modified: metadata.modified(),
            accessed: metadata.accessed(),
        }
    }

    /// Whether this is a regular file
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether this is a directory
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether this is a symbolic link
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}
