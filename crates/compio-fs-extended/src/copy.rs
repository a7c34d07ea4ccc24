//! copy_file_range operations for efficient same-filesystem copies

use crate::error::{ExtendedError, Result};
use compio::fs::File;
use compio::io::{AsyncReadAt, AsyncWriteAt};
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Copy a byte range between two open files with `copy_file_range(2)`
///
/// The copy happens entirely in the kernel. It may copy fewer bytes than
/// requested; a return of 0 means the source has no data at `src_offset`.
///
/// # Errors
///
/// Returns [`ExtendedError::Copy`] if the syscall fails, including when the
/// filesystem does not support it.
#[cfg(target_os = "linux")]
#[allow(clippy::unused_async)]
pub async fn copy_file_range_impl(
    src: &File,
    dst: &File,
    src_offset: u64,
    dst_offset: u64,
    len: u64,
) -> Result<usize> {
    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();

    let mut src_off = libc::loff_t::try_from(src_offset)
        .map_err(|e| ExtendedError::Copy(std::io::Error::other(e)))?;
    let mut dst_off = libc::loff_t::try_from(dst_offset)
        .map_err(|e| ExtendedError::Copy(std::io::Error::other(e)))?;
    let len = usize::try_from(len).unwrap_or(usize::MAX);

    // SAFETY: both descriptors are owned by live `File`s for the duration of
    // the call and the offset pointers reference stack locals.
    let result = unsafe {
        libc::copy_file_range(src_fd, &mut src_off, dst_fd, &mut dst_off, len, 0)
    };

    if result < 0 {
        return Err(ExtendedError::Copy(std::io::Error::last_os_error()));
    }

    #[allow(clippy::cast_sign_loss)]
    Ok(result as usize)
}

/// Copy `len` bytes from the start of `src` to the start of `dst`
///
/// Tries `copy_file_range` first on Linux, then finishes whatever remains
/// with an async read/write loop using `chunk_size` buffers.
///
/// # Returns
///
/// Number of bytes copied
///
/// # Errors
///
/// Returns [`ExtendedError::Copy`] if the read/write fallback fails.
pub async fn copy_file_range_with_fallback(
    src: &File,
    dst: &mut File,
    len: u64,
    chunk_size: usize,
) -> Result<u64> {
    #[allow(unused_mut)]
    let mut offset = 0u64;

    #[cfg(target_os = "linux")]
    while offset < len {
        match copy_file_range_impl(src, dst, offset, offset, len - offset).await {
            Ok(0) => break,
            Ok(n) => offset += n as u64,
            Err(e) => {
                log::debug!("copy_file_range unavailable, using read/write: {e}");
                break;
            }
        }
    }

    let chunk = chunk_size.max(1);
    loop {
        let read = src.read_at(vec![0u8; chunk], offset).await;
        let bytes_read = read.0.map_err(ExtendedError::Copy)?;
        if bytes_read == 0 {
            break;
        }

        let mut buffer = read.1;
        buffer.truncate(bytes_read);
        write_all_at(dst, buffer, offset).await?;
        offset += bytes_read as u64;
    }

    Ok(offset)
}

/// Write every byte of `buffer` at `offset`, retrying short writes
///
/// # Errors
///
/// Returns [`ExtendedError::Copy`] if a write fails or makes no progress.
pub async fn write_all_at(dst: &mut File, mut buffer: Vec<u8>, offset: u64) -> Result<()> {
    let mut current = offset;
    while !buffer.is_empty() {
        let written = dst.write_at(buffer, current).await;
        let bytes_written = written.0.map_err(ExtendedError::Copy)?;
        if bytes_written == 0 {
            return Err(ExtendedError::Copy(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "no bytes written",
            )));
        }

        buffer = written.1;
        buffer.drain(..bytes_written);
        current += bytes_written as u64;
    }
    Ok(())
}
