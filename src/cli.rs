//! Command-line interface definitions
//!
//! This module organizes CLI arguments by **functional usage** - each group
//! contains the options needed by a specific component.

use crate::backends::FsOptions;
use crate::encoding::{Encoding, FileOptions};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Filesystem operations with POSIX-style error reporting
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// I/O configuration (encoding, sync, buffers)
    #[command(flatten)]
    pub io: IoConfig,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

/// One facade operation per subcommand
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the entries of a directory
    Ls {
        /// Directory to list
        path: PathBuf,
    },
    /// Create a directory and any missing parents
    Mkdir {
        /// Directory to create
        path: PathBuf,
    },
    /// Remove a file or a directory tree
    Rm {
        /// Path to remove
        path: PathBuf,
        /// Succeed when the path does not exist
        #[arg(short, long)]
        force: bool,
    },
    /// Create or overwrite a file
    Write {
        /// File to write
        path: PathBuf,
        /// Text to write (read from stdin when omitted)
        contents: Option<String>,
    },
    /// Append to a file, creating it if needed
    Append {
        /// File to append to
        path: PathBuf,
        /// Text to append (read from stdin when omitted)
        contents: Option<String>,
    },
    /// Print the contents of a file
    Cat {
        /// File to read
        path: PathBuf,
    },
    /// Copy a file
    Cp {
        /// Source file
        src: PathBuf,
        /// Destination file
        dst: PathBuf,
    },
    /// Move a file
    Mv {
        /// Source file
        src: PathBuf,
        /// Destination file
        dst: PathBuf,
    },
    /// Show size, type and mode of a path
    Stat {
        /// Path to inspect
        path: PathBuf,
    },
    /// Exit 0 if the path exists, 1 otherwise
    Exists {
        /// Path to check
        path: PathBuf,
    },
}

/// I/O configuration
///
/// Used by: `Filesystem::with_options()`, `read_file()`, `write_file()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "I/O Options")]
pub struct IoConfig {
    /// Text encoding (utf8, latin1); raw bytes when omitted
    #[arg(long, short = 'e', global = true)]
    pub encoding: Option<Encoding>,

    /// fsync files after every write
    #[arg(long, global = true)]
    pub sync: bool,

    /// Buffer size in KB for reads and copies (0 = default 64KB)
    #[arg(long, default_value = "0", global = true)]
    pub buffer_size_kb: usize,
}

impl IoConfig {
    /// Convert to the options struct used by `LocalFileSystem`
    #[must_use]
    pub const fn to_options(&self) -> FsOptions {
        FsOptions::new(self.sync, self.buffer_size_kb * 1024)
    }

    /// Encoding options for read, write and append
    #[must_use]
    pub const fn file_options(&self) -> FileOptions {
        FileOptions {
            encoding: self.encoding,
        }
    }
}

/// Output and logging configuration
///
/// Used by: `main()`, logging initialization
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Maximum tracing level for the selected verbosity
    #[must_use]
    pub const fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Buffer size is too large (>1GB)
    /// - Both --quiet and --verbose options are used
    pub fn validate(&self) -> Result<()> {
        if self.io.buffer_size_kb > 1024 * 1024 {
            anyhow::bail!(
                "Buffer size too large (max 1GB): {} KB",
                self.io.buffer_size_kb
            );
        }

        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        Ok(())
    }
}
