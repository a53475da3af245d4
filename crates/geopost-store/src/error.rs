//! Store error types.
//!
//! [`StoreError`] is the single error type returned by every fallible
//! [`MessageStore`](crate::MessageStore) operation.

use std::io;
use std::path::{Path, PathBuf};

/// Error type for all store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file exists but does not hold a message array.
    #[error("message store {} is corrupted: {source}", .path.display())]
    Corrupted {
        /// The unreadable file.
        path: PathBuf,
        /// Parser diagnostics (line, column, cause).
        source: serde_json::Error,
    },

    /// Reading, writing or replacing the backing file failed.
    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        /// What was being attempted, e.g. `"read"`, `"replace"`.
        operation: &'static str,
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// A record has a NaN or infinite coordinate. JSON has no encoding for
    /// it, and writing it would leave a file that no longer loads.
    #[error("message {index} has a non-finite coordinate ({lat}, {lon})")]
    NonFiniteCoordinate {
        /// Position of the offending record in the saved sequence.
        index: usize,
        /// Its latitude.
        lat: f64,
        /// Its longitude.
        lon: f64,
    },

    /// The in-memory records could not be encoded.
    #[error("failed to serialize messages: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error means existing data could not be parsed.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }

    /// OS error kind for I/O failures.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
