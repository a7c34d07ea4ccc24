//! Rename operations

use crate::error::{spawn_join_error, ExtendedError, Result};
use std::path::Path;

/// Rename `from` to `to`, replacing `to` if it is an existing file
///
/// Runs `rename(2)` on the blocking pool. The host refuses to rename across
/// filesystems with `EXDEV`; the error is returned unchanged so callers can
/// decide whether to fall back to copy and remove.
///
/// # Errors
///
/// Returns [`ExtendedError::Rename`] carrying the host error.
///
/// # Example
///
/// ```rust,no_run
/// use compio_fs_extended::rename::rename;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// rename(Path::new("old.txt"), Path::new("new.txt")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn rename(from: &Path, to: &Path) -> Result<()> {
    let from_owned = from.to_path_buf();
    let to_owned = to.to_path_buf();
    compio::runtime::spawn_blocking(move || std::fs::rename(from_owned, to_owned))
        .await
        .map_err(spawn_join_error)?
        .map_err(ExtendedError::Rename)?;

    log::debug!("renamed {} -> {}", from.display(), to.display());
    Ok(())
}

/// Whether a rename failure means source and destination live on different filesystems
#[must_use]
pub fn is_cross_device(err: &ExtendedError) -> bool {
    err.io_error()
        .and_then(std::io::Error::raw_os_error)
        .is_some_and(|code| code == libc::EXDEV)
}
