//! AsyncFileSystem trait for unified filesystem operations
//!
//! This trait is the seam between the facade and the storage underneath it.
//! The local backend implements it on compio; tests implement it in memory.

use crate::error::Result;
use std::path::Path;

use super::AsyncMetadata;

/// Byte-level filesystem interface the facade delegates to
///
/// Every method is a single host operation. Implementations report failures
/// as [`crate::error::FsError`] naming the syscall that failed, so the
/// facade can pass them through untouched.
///
/// # Examples
///
/// ```rust,ignore
/// let fs = LocalFileSystem::new();
/// fs.create_dir_all(Path::new("/tmp/a/b")).await?;
/// fs.write(Path::new("/tmp/a/b/c.txt"), b"hello".to_vec()).await?;
/// assert_eq!(fs.read(Path::new("/tmp/a/b/c.txt")).await?, b"hello");
/// ```
#[allow(async_fn_in_trait)]
pub trait AsyncFileSystem: Send + Sync + 'static {
    /// The metadata type for this filesystem
    type Metadata: AsyncMetadata;

    /// List the names of the entries directly under `path`
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if `path` doesn't exist and `ENOTDIR` if it is not a
    /// directory.
    async fn read_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Create `path` and any missing parents
    ///
    /// Succeeds when `path` already exists as a directory.
    ///
    /// # Errors
    ///
    /// Returns `EEXIST` if `path` exists and is not a directory, or the host
    /// error if creation fails.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file, or a directory together with everything below it
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if nothing exists at `path`.
    async fn remove(&self, path: &Path) -> Result<()>;

    /// Read the whole file
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if `path` doesn't exist and `EISDIR` if it is a
    /// directory.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or truncate `path` and write `data`
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if the parent directory doesn't exist and `EISDIR` if
    /// `path` is a directory.
    async fn write(&self, path: &Path, data: Vec<u8>) -> Result<()>;

    /// Write `data` after the existing contents, creating `path` if needed
    ///
    /// # Errors
    ///
    /// Same as [`AsyncFileSystem::write`].
    async fn append(&self, path: &Path, data: Vec<u8>) -> Result<()>;

    /// Get metadata for a path, following symlinks
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if `path` doesn't exist.
    async fn metadata(&self, path: &Path) -> Result<Self::Metadata>;

    /// Copy a file, returning the number of bytes copied
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if `src` doesn't exist and `EISDIR` if it is a
    /// directory.
    async fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64>;

    /// Rename `from` to `to`
    ///
    /// # Errors
    ///
    /// Returns `ENOENT` if `from` doesn't exist and `EXDEV` if the two paths
    /// are on different filesystems.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Check if a path exists
    ///
    /// Never fails: any error while querying counts as absent.
    async fn exists(&self, path: &Path) -> bool {
        self.metadata(path).await.is_ok()
    }

    /// Get the filesystem name for debugging/logging
    fn name(&self) -> &'static str {
        "unknown"
    }
}
