//! Error types for configuration and traversal.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SortKey;

/// Errors in the resolved configuration. Always fatal, raised before traversal starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A pattern could not be compiled as a glob.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A pattern was empty after normalization.
    #[error("Empty pattern: '{pattern}'")]
    EmptyPattern { pattern: String },

    /// The same sort key was given more than once.
    #[error("Sort key '{key}' given more than once")]
    DuplicateSortKey { key: SortKey },

    /// Other invalid configuration.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The configuration was rejected before traversal.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Symbolic link target does not exist.
    BrokenSymlink,
    /// Symbolic link points back at one of its ancestors.
    SymlinkCycle,
    /// Error reading metadata or listing a directory.
    ReadError,
}

/// Non-fatal warning encountered during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path relative to the scan root.
    pub path: String,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<String>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning from an I/O error, classifying permission problems.
    pub fn from_io(path: impl Into<String>, error: &std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self::new(path, format!("Read error: {error}"), kind)
    }

    /// Create a broken symlink warning.
    pub fn broken_symlink(path: impl Into<String>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Broken symlink: {path}: {error}"),
            path,
            kind: WarningKind::BrokenSymlink,
        }
    }

    /// Create a symlink cycle warning.
    pub fn symlink_cycle(path: impl Into<String>, target: &std::path::Path) -> Self {
        let path = path.into();
        Self {
            message: format!("Symlink cycle: {path} -> {}", target.display()),
            path,
            kind: WarningKind::SymlinkCycle,
        }
    }
}
