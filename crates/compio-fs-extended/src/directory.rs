//! Directory listing and recursive removal

use crate::error::{spawn_join_error, ExtendedError, Result};
use std::ffi::OsString;
use std::path::Path;

/// Read the names of the entries directly under `path`
///
/// This function provides a consistent API for directory reading that abstracts
/// whether the operation is blocking or uses io_uring.
///
/// CURRENT STATUS: Uses std::fs::read_dir on the blocking pool because
/// the kernel has no `IORING_OP_GETDENTS64` (see https://lwn.net/Articles/878873/).
///
/// The returned names are in the order the host produced them and never
/// include `.` or `..`.
///
/// # Arguments
///
/// * `path` - Directory path to read
///
/// # Errors
///
/// Returns [`ExtendedError::Directory`] carrying the host error if the
/// directory doesn't exist, is not a directory, or cannot be read.
///
/// # Example
///
/// ```rust,no_run
/// use compio_fs_extended::directory::read_dir;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// for name in read_dir(Path::new("/tmp")).await? {
///     println!("Entry: {:?}", name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn read_dir(path: &Path) -> Result<Vec<OsString>> {
    let path_owned = path.to_path_buf();
    let names = compio::runtime::spawn_blocking(move || {
        std::fs::read_dir(&path_owned)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<std::io::Result<Vec<_>>>()
    })
    .await
    .map_err(spawn_join_error)?
    .map_err(ExtendedError::Directory)?;

    log::debug!("read {} entries from {}", names.len(), path.display());
    Ok(names)
}

/// Remove a directory and everything below it
///
/// Symbolic links inside the tree are removed, never followed.
///
/// # Errors
///
/// Returns [`ExtendedError::Directory`] carrying the host error if `path`
/// doesn't exist, is not a directory, or any descendant cannot be removed.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    let path_owned = path.to_path_buf();
    compio::runtime::spawn_blocking(move || std::fs::remove_dir_all(path_owned))
        .await
        .map_err(spawn_join_error)?
        .map_err(ExtendedError::Directory)?;

    log::debug!("removed directory tree {}", path.display());
    Ok(())
}
