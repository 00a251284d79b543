//! Error types shared by the workspace, storage, and command layers.
//!
//! Navigation, validation, and storage failures are distinct variants so
//! the tool layer can report argument problems separately from execution
//! problems. Nothing here is retried automatically.

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The storage operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Read,
    Write,
    Remove,
}

impl std::fmt::Display for StorageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageOp::Read => write!(f, "read"),
            StorageOp::Write => write!(f, "write"),
            StorageOp::Remove => write!(f, "remove"),
        }
    }
}

/// A read, write, or remove that the storage backend could not complete.
#[derive(Debug, Error)]
#[error("Failed to {op} {path}: {source}")]
pub struct StorageError {
    pub op: StorageOp,
    pub path: String,
    #[source]
    pub source: io::Error,
}

impl StorageError {
    pub fn new(op: StorageOp, path: impl Into<String>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }

    /// Whether the underlying failure was a missing file.
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}

/// Errors produced by workspace operations and commands.
#[derive(Debug, Error)]
pub enum Error {
    /// A text anchor does not occur in the buffer.
    #[error("`{target}` not found")]
    NotFound { target: String },

    /// A numeric range falls outside the buffer or runs backwards.
    #[error("invalid range {start}..{end} for content of {len} characters")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// A cursor command was issued with no open windows.
    #[error("no window is focused; open a file first")]
    NoFocusedWindow,

    /// Command arguments failed their shape check. No state was touched.
    #[error("invalid arguments for '{command}': {reason}")]
    Validation { command: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    pub(crate) fn not_found(target: impl Into<String>) -> Self {
        Error::NotFound {
            target: target.into(),
        }
    }

    pub(crate) fn validation(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Report a validation error under `name`, the name the caller used
    /// for the command. Other errors are returned unchanged.
    pub(crate) fn for_command(self, name: &str) -> Self {
        match self {
            Error::Validation { reason, .. } => Error::validation(name, reason),
            other => other,
        }
    }

    /// Whether this error was raised before any state was touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}
