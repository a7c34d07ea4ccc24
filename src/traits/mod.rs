//! Core traits for filesystem abstraction
//!
//! The facade is written against these traits rather than against the host
//! directly. The traits work on raw bytes and report failures as
//! [`crate::error::FsError`]; encodings are applied above them.

pub mod filesystem;
pub mod metadata;

// Re-export main traits for convenience
pub use filesystem::AsyncFileSystem;
pub use metadata::AsyncMetadata;

#[cfg(test)]
mod tests;
