//! Error types for preference persistence

use compact_str::CompactString;
use std::io::ErrorKind;
use thiserror::Error;

pub type PrefResult<T> = Result<T, PrefError>;

#[derive(Error, Debug, Clone)]
pub enum PrefError {
    #[error("Preference file system error on {path}: {kind:?}")]
    FileSystem { path: CompactString, kind: ErrorKind },

    #[error("Preference serialization error: {0}")]
    Serialization(CompactString),

    #[error("Preference file corrupted: {path}")]
    Corrupted { path: CompactString },

    #[error("Atomic save operation failed: {0}")]
    AtomicSave(CompactString),
}

impl PrefError {
    /// Corruption is recovered from by treating the store as empty.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PrefError::Corrupted { .. })
    }

    #[inline]
    pub fn file_system(path: &std::path::Path, io_error: &std::io::Error) -> Self {
        Self::FileSystem {
            path: CompactString::from(path.to_string_lossy()),
            kind: io_error.kind(),
        }
    }

    #[inline]
    pub fn corrupted(path: &std::path::Path) -> Self {
        Self::Corrupted {
            path: CompactString::from(path.to_string_lossy()),
        }
    }

    #[inline]
    pub fn atomic_save(message: impl Into<CompactString>) -> Self {
        Self::AtomicSave(message.into())
    }
}

impl From<serde_json::Error> for PrefError {
    fn from(err: serde_json::Error) -> Self {
        PrefError::Serialization(CompactString::from(err.to_string()))
    }
}
