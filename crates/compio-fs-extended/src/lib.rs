//! # compio-fs-extended
//!
//! Filesystem operations that the base compio-fs crate does not provide:
//! - Directory listing by entry name
//! - Recursive directory removal
//! - Rename, with cross-device detection
//! - `copy_file_range` with an async read/write fallback
//!
//! Operations that only exist as blocking syscalls run on compio's blocking
//! pool so they never stall the event loop.
//!
//! ## Example
//!
//! ```rust,no_run
//! use compio_fs_extended::{directory, rename};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let names = directory::read_dir(Path::new("/tmp")).await?;
//! println!("{} entries", names.len());
//! rename::rename(Path::new("a.txt"), Path::new("b.txt")).await?;
//! # Ok(())
//! # }
//! ```
pub mod copy;
pub mod directory;
pub mod error;
pub mod rename;

// Re-export main types
pub use copy::copy_file_range_with_fallback;
pub use error::{ExtendedError, Result};
