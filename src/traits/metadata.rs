//! AsyncMetadata trait for unified metadata operations

use std::time::SystemTime;

/// Metadata for a single filesystem entry
///
/// # Examples
///
/// ```rust,ignore
/// let metadata = filesystem.metadata(path).await?;
/// println!("Size: {} bytes", metadata.size());
/// println!("Is file: {}", metadata.is_file());
/// println!("Permissions: {:o}", metadata.permissions());
/// ```
pub trait AsyncMetadata: Send + Sync + 'static {
    /// Size in bytes. For directories this is whatever the host reports.
    fn size(&self) -> u64;

    /// Check if this is a regular file
    fn is_file(&self) -> bool;

    /// Check if this is a directory
    fn is_dir(&self) -> bool;

    /// Check if this is a symlink
    fn is_symlink(&self) -> bool;

    /// Permission bits (e.g. `0o644`)
    fn permissions(&self) -> u32;

    /// Last modification time
    fn modified(&self) -> SystemTime;

    /// Last access time
    fn accessed(&self) -> SystemTime;

    /// Check if the entry has no bytes
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Get file type as a string
    ///
    /// Returns "file", "directory", "symlink" or "unknown".
    fn file_type(&self) -> &'static str {
        if self.is_symlink() {
            "symlink"
        } else if self.is_dir() {
            "directory"
        } else if self.is_file() {
            "file"
        } else {
            "unknown"
        }
    }
}
