//! Filesystem backend implementations
//!
//! Concrete implementations of the AsyncFileSystem trait.

pub mod local;

// Re-export main types for convenience
pub use local::{FsOptions, LocalFileSystem, LocalMetadata};
