//! Error types for virlog parsing operations.
//!
//! Only problems that stop a whole run are errors: the log file is missing or
//! cannot be read, or a bounds-checked read runs past the end of a buffer.
//! Anomalies inside individual records are reported as
//! [`Diagnostic`](crate::diagnostic::Diagnostic) values instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for virlog operations.
pub type Result<T> = std::result::Result<T, VirlogError>;

/// Errors that can occur while opening or reading a virlog file.
#[derive(Error, Debug)]
pub enum VirlogError {
    /// I/O error occurred while reading the log file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The given path does not name an existing file.
    #[error("Virlog file does not exist: {}", .path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Data truncated or incomplete.
    #[error("Truncated data at offset {offset:#x}: expected {expected} bytes, got {actual} bytes")]
    TruncatedData {
        /// Offset of the attempted read.
        offset: usize,
        /// Number of bytes the read needed.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },
}

impl VirlogError {
    /// Creates a file-not-found error for `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use eset_virlog::error::VirlogError;
    /// let err = VirlogError::file_not_found("virlog.dat");
    /// assert!(err.to_string().contains("virlog.dat"));
    /// ```
    pub fn file_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a truncated-data error for a read of `expected` bytes at
    /// `offset` in a buffer of `len` bytes.
    pub fn truncated(offset: usize, expected: usize, len: usize) -> Self {
        Self::TruncatedData {
            offset,
            expected,
            actual: len.saturating_sub(offset),
        }
    }
}
