//! Filesystem facade
//!
//! The operation set an application runtime exposes to scripts: list, create,
//! remove, read, write, append, stat, exists, copy and move. Each call is a
//! pass-through to the backend; this layer only applies encodings and logs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hostfs::{Encoding, Filesystem};
//!
//! #[compio::main]
//! async fn main() -> hostfs::Result<()> {
//!     let fs = Filesystem::new();
//!     fs.mkdir("/tmp/demo").await?;
//!     fs.write_file("/tmp/demo/a.txt", "Some contents", Encoding::Utf8).await?;
//!     assert_eq!(fs.stat("/tmp/demo/a.txt").await?.size, 13);
//!     Ok(())
//! }
//! ```

use crate::backends::{FsOptions, LocalFileSystem};
use crate::encoding::{Contents, FileOptions};
use crate::error::{ErrorCode, Result};
use crate::stat::StatResult;
use crate::traits::AsyncFileSystem;
use std::path::Path;
use tracing::{debug, warn};

/// Asynchronous filesystem facade over a backend
///
/// Defaults to the host filesystem. There is no caching and no retry; two
/// calls on the same path are ordered only by the caller awaiting them.
#[derive(Debug, Clone, Default)]
pub struct Filesystem<FS = LocalFileSystem> {
    backend: FS,
}

impl Filesystem<LocalFileSystem> {
    /// Facade over the host filesystem with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Facade over the host filesystem with the given options
    #[must_use]
    pub const fn with_options(options: FsOptions) -> Self {
        Self::with_backend(LocalFileSystem::with_options(options))
    }
}

impl<FS: AsyncFileSystem> Filesystem<FS> {
    /// Facade over an arbitrary backend
    #[must_use]
    pub const fn with_backend(backend: FS) -> Self {
        Self { backend }
    }

    /// The backend this facade delegates to
    #[must_use]
    pub const fn backend(&self) -> &FS {
        &self.backend
    }

    /// List the names of the entries directly under `path`
    ///
    /// Order is whatever the host returns.
    ///
    /// # Errors
    ///
    /// `ENOENT` if `path` doesn't exist, `ENOTDIR` if it is a file.
    pub async fn readdir(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let names = self.backend.read_dir(path).await?;
        debug!("readdir {}: {} entries", path.display(), names.len());
        Ok(names)
    }

    /// Create `path` and any missing parent directories
    ///
    /// Creating a directory that already exists succeeds.
    ///
    /// # Errors
    ///
    /// `EEXIST` if `path` exists as a file, or the host error.
    pub async fn mkdir(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.backend.create_dir_all(path).await?;
        debug!("mkdir {}", path.display());
        Ok(())
    }

    /// Remove a file, or a directory and all of its contents
    ///
    /// # Errors
    ///
    /// `ENOENT` if nothing exists at `path`. Callers that don't care whether
    /// the path existed check [`crate::FsError::is_not_found`].
    pub async fn unlink(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.backend.remove(path).await?;
        debug!("unlink {}", path.display());
        Ok(())
    }

    /// Create or overwrite `path` with `contents`
    ///
    /// # Errors
    ///
    /// `ENOENT` if the parent directory is missing, `EISDIR` if `path` is a
    /// directory.
    pub async fn write_file(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Contents>,
        options: impl Into<FileOptions>,
    ) -> Result<()> {
        let path = path.as_ref();
        let options = options.into();
        let data = contents.into().encode(options.encoding);
        debug!("writeFile {} ({} bytes)", path.display(), data.len());
        self.backend.write(path, data).await
    }

    /// Append `contents` to `path`, creating it if absent
    ///
    /// # Errors
    ///
    /// Same as [`Filesystem::write_file`].
    pub async fn append_file(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Contents>,
        options: impl Into<FileOptions>,
    ) -> Result<()> {
        let path = path.as_ref();
        let options = options.into();
        let data = contents.into().encode(options.encoding);
        debug!("appendFile {} ({} bytes)", path.display(), data.len());
        self.backend.append(path, data).await
    }

    /// Read the whole of `path`
    ///
    /// Returns text when an encoding is given and bytes otherwise.
    ///
    /// # Errors
    ///
    /// `ENOENT` if `path` doesn't exist, `EISDIR` if it is a directory.
    pub async fn read_file(
        &self,
        path: impl AsRef<Path>,
        options: impl Into<FileOptions>,
    ) -> Result<Contents> {
        let path = path.as_ref();
        let options = options.into();
        let bytes = self.backend.read(path).await?;
        debug!("readFile {} ({} bytes)", path.display(), bytes.len());
        Ok(Contents::decode(bytes, options.encoding))
    }

    /// Metadata for `path`, following symlinks
    ///
    /// # Errors
    ///
    /// `ENOENT` if `path` doesn't exist.
    pub async fn stat(&self, path: impl AsRef<Path>) -> Result<StatResult> {
        let metadata = self.backend.metadata(path.as_ref()).await?;
        Ok(StatResult::from_metadata(&metadata))
    }

    /// Whether anything exists at `path`
    pub async fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.backend.exists(path.as_ref()).await
    }

    /// Copy the file at `src` to `dst`, leaving `src` untouched
    ///
    /// # Errors
    ///
    /// `ENOENT` if `src` doesn't exist, `EISDIR` if it is a directory.
    pub async fn copy_file(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        let copied = self.backend.copy_file(src, dst).await?;
        debug!(
            "copyFile {} -> {} ({} bytes)",
            src.display(),
            dst.display(),
            copied
        );
        Ok(())
    }

    /// Move the file at `src` to `dst`
    ///
    /// Afterwards `src` no longer exists and `dst` holds its contents. When
    /// the host cannot rename across filesystems the file is copied and the
    /// source removed.
    ///
    /// # Errors
    ///
    /// `ENOENT` if `src` doesn't exist, or any error from the copy fallback.
    pub async fn move_file(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        match self.backend.rename(src, dst).await {
            Ok(()) => {}
            Err(e) if e.error_code() == ErrorCode::CrossDevice => {
                warn!(
                    "{} and {} are on different filesystems, copying instead of renaming",
                    src.display(),
                    dst.display()
                );
                self.backend.copy_file(src, dst).await?;
                self.backend.remove(src).await?;
            }
            Err(e) => return Err(e),
        }
        debug!("moveFile {} -> {}", src.display(), dst.display());
        Ok(())
    }
}
