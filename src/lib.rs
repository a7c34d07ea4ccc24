//! # hostfs
//!
//! Asynchronous host filesystem access for application runtimes.
//!
//! A small [`Filesystem`] facade (list, create, remove, read, write, append,
//! stat, exists, copy, move) over a pluggable [`AsyncFileSystem`] backend.
//! Every failure is an [`FsError`] carrying a POSIX-style code such as
//! `ENOENT` or `EISDIR`, the syscall that failed and the path involved.
//!
//! The default backend, [`LocalFileSystem`], runs on compio and uses
//! `copy_file_range` for copies where the kernel supports it.

pub mod backends;
pub mod cli;
pub mod encoding;
pub mod error;
pub mod facade;
pub mod stat;
pub mod traits;

pub use backends::{FsOptions, LocalFileSystem, LocalMetadata};
pub use encoding::{Contents, Encoding, FileOptions, UnknownEncoding};
pub use error::{ErrorCode, FsError, Result, Syscall};
pub use facade::Filesystem;
pub use stat::{EntryKind, StatResult};
pub use traits::{AsyncFileSystem, AsyncMetadata};
