//! Local filesystem backend implementation
//!
//! This module provides the host filesystem backend, using compio for file
//! I/O and compio-fs-extended for the operations compio does not offer.

use crate::error::{ErrorCode, FsError, Result, Syscall};
use crate::traits::{AsyncFileSystem, AsyncMetadata};
use compio::fs::{File, OpenOptions};
use compio::io::AsyncReadAt;
use compio_fs_extended::copy::write_all_at;
use compio_fs_extended::{copy_file_range_with_fallback, directory, rename};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Default buffer size for reads and copies (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Tunables for the local backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsOptions {
    /// fsync files after write, append and copy
    pub sync_writes: bool,
    /// Chunk size for reads and read/write copies, in bytes
    pub buffer_size: usize,
}

impl FsOptions {
    /// Create options, clamping a zero buffer size to the default
    #[must_use]
    pub const fn new(sync_writes: bool, buffer_size: usize) -> Self {
        Self {
            sync_writes,
            buffer_size: if buffer_size == 0 {
                DEFAULT_BUFFER_SIZE
            } else {
                buffer_size
            },
        }
    }
}

impl Default for FsOptions {
    fn default() -> Self {
        Self::new(false, DEFAULT_BUFFER_SIZE)
    }
}

/// Host filesystem backend
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    options: FsOptions,
}

impl LocalFileSystem {
    /// Create a backend with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with the given options
    #[must_use]
    pub const fn with_options(options: FsOptions) -> Self {
        Self { options }
    }

    /// The options this backend was created with
    #[must_use]
    pub const fn options(&self) -> &FsOptions {
        &self.options
    }

    async fn finish_write(&self, file: &File, path: &Path) -> Result<()> {
        if self.options.sync_writes {
            file.sync_all()
                .await
                .map_err(|e| FsError::from_io(e, Syscall::Write, path))?;
        }
        Ok(())
    }

    /// Classify an open failure, reporting directories as `EISDIR`
    ///
    /// Some hosts refuse to open a directory with a generic permission error.
    async fn open_error(err: std::io::Error, syscall: Syscall, path: &Path) -> FsError {
        let is_dir = compio::fs::metadata(path)
            .await
            .is_ok_and(|m| m.is_dir());
        if is_dir {
            FsError::new(ErrorCode::IsDirectory, syscall, path)
        } else {
            FsError::from_io(err, Syscall::Open, path)
        }
    }
}

impl AsyncFileSystem for LocalFileSystem {
    type Metadata = LocalMetadata;

    async fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let names = directory::read_dir(path)
            .await
            .map_err(|e| FsError::from_extended(e, Syscall::Scandir, path))?;

        Ok(names
            .into_iter()
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        match compio::fs::create_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let is_dir = compio::fs::metadata(path)
                    .await
                    .is_ok_and(|m| m.is_dir());
                if is_dir {
                    Ok(())
                } else {
                    Err(FsError::from_io(e, Syscall::Mkdir, path))
                }
            }
            Err(e) => Err(FsError::from_io(e, Syscall::Mkdir, path)),
        }
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        let metadata = compio::fs::symlink_metadata(path)
            .await
            .map_err(|e| FsError::from_io(e, Syscall::Rm, path))?;

        if metadata.is_dir() {
            directory::remove_dir_all(path)
                .await
                .map_err(|e| FsError::from_extended(e, Syscall::Rm, path))
        } else {
            compio::fs::remove_file(path)
                .await
                .map_err(|e| FsError::from_io(e, Syscall::Rm, path))
        }
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => return Err(Self::open_error(e, Syscall::Read, path).await),
        };

        let metadata = file
            .metadata()
            .await
            .map_err(|e| FsError::from_io(e, Syscall::Stat, path))?;
        if metadata.is_dir() {
            return Err(FsError::new(ErrorCode::IsDirectory, Syscall::Read, path));
        }

        let size = metadata.len();
        let mut content = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        let mut offset = 0u64;

        // The size is only a hint; keep reading until EOF.
        loop {
            let remaining = usize::try_from(size.saturating_sub(offset)).unwrap_or(usize::MAX);
            let chunk = vec![0u8; remaining.clamp(1, self.options.buffer_size.max(1))];

            let buf_result = file.read_at(chunk, offset).await;
            let bytes_read = buf_result
                .0
                .map_err(|e| FsError::from_io(e, Syscall::Read, path))?;
            if bytes_read == 0 {
                break; // EOF
            }

            content.extend_from_slice(&buf_result.1[..bytes_read]);
            offset += bytes_read as u64;
        }

        debug!("read {} bytes from {}", content.len(), path.display());
        Ok(content)
    }

    async fn write(&self, path: &Path, data: Vec<u8>) -> Result<()> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) => return Err(Self::open_error(e, Syscall::Open, path).await),
        };

        let len = data.len();
        write_all_at(&mut file, data, 0)
            .await
            .map_err(|e| FsError::from_extended(e, Syscall::Write, path))?;
        self.finish_write(&file, path).await?;

        debug!("wrote {} bytes to {}", len, path.display());
        Ok(())
    }

    async fn append(&self, path: &Path, data: Vec<u8>) -> Result<()> {
        let mut file = match append_options().open(path).await {
            Ok(file) => file,
            Err(e) => return Err(Self::open_error(e, Syscall::Open, path).await),
        };

        let end = append_offset(&file, path).await?;
        let len = data.len();
        write_all_at(&mut file, data, end)
            .await
            .map_err(|e| FsError::from_extended(e, Syscall::Write, path))?;
        self.finish_write(&file, path).await?;

        debug!("appended {} bytes to {}", len, path.display());
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> Result<Self::Metadata> {
        let metadata = compio::fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io(e, Syscall::Stat, path))?;
        Ok(LocalMetadata::new(metadata))
    }

    async fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64> {
        let src_file = match File::open(src).await {
            Ok(file) => file,
            Err(e) => return Err(Self::open_error(e, Syscall::Copyfile, src).await),
        };
        let metadata = src_file
            .metadata()
            .await
            .map_err(|e| FsError::from_io(e, Syscall::Stat, src))?;
        if metadata.is_dir() {
            return Err(FsError::new(ErrorCode::IsDirectory, Syscall::Copyfile, src));
        }
        if is_same_file(&metadata, dst).await {
            debug!("{} and {} are the same file", src.display(), dst.display());
            return Ok(0);
        }

        let mut dst_file = File::create(dst)
            .await
            .map_err(|e| FsError::from_io(e, Syscall::Copyfile, dst))?;

        let copied = copy_file_range_with_fallback(
            &src_file,
            &mut dst_file,
            metadata.len(),
            self.options.buffer_size,
        )
        .await
        .map_err(|e| FsError::from_extended(e, Syscall::Copyfile, src))?;

        dst_file
            .set_permissions(metadata.permissions())
            .await
            .map_err(|e| FsError::from_io(e, Syscall::Copyfile, dst))?;
        self.finish_write(&dst_file, dst).await?;

        debug!(
            "copied {} bytes from {} to {}",
            copied,
            src.display(),
            dst.display()
        );
        Ok(copied)
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        rename::rename(from, to).await.map_err(|e| {
            if rename::is_cross_device(&e) {
                debug!("{} -> {} crosses filesystems", from.display(), to.display());
            }
            FsError::from_extended(e, Syscall::Rename, from).with_dest(to)
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Open options for appending
///
/// On unix the file is opened with `O_APPEND`. Linux then places every write
/// at the current end of file atomically, ignoring the write offset.
#[cfg(unix)]
fn append_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).custom_flags(libc::O_APPEND);
    options
}

#[cfg(not(unix))]
fn append_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    options
}

/// Current end of file, used as the write offset where `O_APPEND` does not
/// apply to positioned writes
async fn append_offset(file: &File, path: &Path) -> Result<u64> {
    Ok(file
        .metadata()
        .await
        .map_err(|e| FsError::from_io(e, Syscall::Stat, path))?
        .len())
}

/// Whether `dst` is the file described by `src` (same device and inode)
#[cfg(unix)]
async fn is_same_file(src: &compio::fs::Metadata, dst: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    compio::fs::metadata(dst)
        .await
        .is_ok_and(|m| m.dev() == src.dev() && m.ino() == src.ino())
}

#[cfg(not(unix))]
#[allow(clippy::unused_async)]
async fn is_same_file(_src: &compio::fs::Metadata, _dst: &Path) -> bool {
    false
}

/// Local metadata implementation using compio
pub struct LocalMetadata {
    metadata: compio::fs::Metadata,
}

impl LocalMetadata {
    fn new(metadata: compio::fs::Metadata) -> Self {
        Self { metadata }
    }
}

impl AsyncMetadata for LocalMetadata {
    fn size(&self) -> u64 {
        self.metadata.len()
    }

    fn is_file(&self) -> bool {
        self.metadata.is_file()
    }

    fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    fn is_symlink(&self) -> bool {
        self.metadata.is_symlink()
    }

    #[cfg(unix)]
    fn permissions(&self) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        self.metadata.permissions().mode() & 0o7777
    }

    #[cfg(not(unix))]
    fn permissions(&self) -> u32 {
        if self.metadata.permissions().readonly() {
            0o444
        } else {
            0o666
        }
    }

    fn modified(&self) -> SystemTime {
        self.metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
    }

    fn accessed(&self) -> SystemTime {
        self.metadata.accessed().unwrap_or(SystemTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[compio::test]
    async fn test_write_then_read() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("test.txt");
        let fs = LocalFileSystem::new();

        fs.write(&path, b"Hello, World!".to_vec()).await?;
        assert_eq!(fs.read(&path).await?, b"Hello, World!");

        Ok(())
    }

    #[compio::test]
    async fn test_read_larger_than_buffer() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("large.dat");
        let data: Vec<u8> = (0..=255u8).cycle().take(1024 * 1024 + 17).collect();
        fs::write(&path, &data)?;

        let fs = LocalFileSystem::with_options(FsOptions::new(false, 4096));
        assert_eq!(fs.read(&path).await?, data);

        Ok(())
    }

    #[compio::test]
    async fn test_write_truncates_existing() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("overwrite.txt");
        fs::write(&path, b"Original content")?;

        let fs = LocalFileSystem::with_options(FsOptions::new(true, 0));
        fs.write(&path, b"New".to_vec()).await?;

        assert_eq!(fs::read(&path)?, b"New");
        Ok(())
    }

    #[compio::test]
    async fn test_append_creates_then_extends() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("log.txt");
        let fs = LocalFileSystem::new();

        fs.append(&path, b"one ".to_vec()).await?;
        fs.append(&path, b"two".to_vec()).await?;

        assert_eq!(fs::read(&path)?, b"one two");
        Ok(())
    }

    #[compio::test]
    async fn test_read_directory_is_eisdir() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let fs = LocalFileSystem::new();

        let err = fs.read(temp_dir.path()).await.unwrap_err();
        assert_eq!(err.code(), "EISDIR");
        assert_eq!(err.syscall(), Syscall::Read);

        Ok(())
    }

    #[compio::test]
    async fn test_read_dir_on_file_is_enotdir() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("plain.txt");
        fs::write(&path, b"x")?;

        let err = LocalFileSystem::new().read_dir(&path).await.unwrap_err();
        assert_eq!(err.code(), "ENOTDIR");

        Ok(())
    }

    #[compio::test]
    async fn test_create_dir_all_over_file_is_eexist() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("taken");
        fs::write(&path, b"x")?;

        let err = LocalFileSystem::new()
            .create_dir_all(&path)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EEXIST");

        Ok(())
    }

    #[cfg(unix)]
    #[compio::test]
    async fn test_copy_keeps_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("script.sh");
        let dst = temp_dir.path().join("script.copy.sh");
        fs::write(&src, b"#!/bin/sh\n")?;
        fs::set_permissions(&src, fs::Permissions::from_mode(0o755))?;

        let fs = LocalFileSystem::new();
        let copied = fs.copy_file(&src, &dst).await?;

        assert_eq!(copied, 10);
        assert_eq!(fs.metadata(&dst).await?.permissions(), 0o755);
        Ok(())
    }

    #[compio::test]
    async fn test_metadata_reports_type() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("file.txt");
        fs::write(&path, b"Some contents")?;

        let fs = LocalFileSystem::new();
        let file_meta = fs.metadata(&path).await?;
        let dir_meta = fs.metadata(temp_dir.path()).await?;

        assert_eq!(file_meta.size(), 13);
        assert_eq!(file_meta.file_type(), "file");
        assert_eq!(dir_meta.file_type(), "directory");
        Ok(())
    }
}
