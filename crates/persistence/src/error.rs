//! # Persistence Errors
//!
//! Error types for the persistence layer. IO failures always carry the
//! path they happened on.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Snapshot errors ===
    #[error("Snapshot IO error on {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt snapshot {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },

    // === Audit log errors ===
    #[error("Audit log IO error on {path}: {source}")]
    AuditIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Configuration errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn snapshot_io(path: &Path, source: std::io::Error) -> Self {
        Self::SnapshotIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn audit_io(path: &Path, source: std::io::Error) -> Self {
        Self::AuditIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
