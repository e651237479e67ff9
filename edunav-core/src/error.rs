//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Study Browser
//!
//! This module defines the error enum used across the application. The three
//! navigation kinds (`NotFound`, `InvalidState`, `ProviderUnavailable`) are the
//! contract between the navigation core and the presentation layer; the rest
//! wrap the ambient failures (I/O, config, network, preferences).

use std::{io, path::PathBuf};

use compact_str::CompactString;
use edunav_prefs::PrefError;
use thiserror::Error;

use crate::model::navigation::ViewLevel;

/// Unified error type for all browser operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced identifier is absent from its collection.
    #[error("{level} '{id}' not found")]
    NotFound { level: ViewLevel, id: CompactString },

    /// Operation requires a selection that is not currently present.
    #[error("Invalid state: {0}")]
    InvalidState(CompactString),

    /// Startup fetch of one or more collections failed.
    #[error("Content provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (e.g., JSON).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Preference store failure.
    #[error("Preference store error: {0}")]
    Prefs(#[from] PrefError),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(level: ViewLevel, id: impl Into<CompactString>) -> Self {
        Self::NotFound {
            level,
            id: id.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<CompactString>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub fn provider_unavailable(reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable(reason.into())
    }

    /// Local conditions: the operation was rejected and prior state kept.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidState(_))
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
