//! Typed error hierarchy for the hook scheduler.
//!
//! `SchedulerError` covers the recoverable failure modes at the crate
//! boundary: configuration loading and hook metadata ingestion. The
//! scheduling pipeline itself is total over valid inputs and does not
//! produce errors of its own.

use thiserror::Error;

/// Errors from the scheduler boundary.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Failed to read scheduler config at {path}: {source}")]
    ConfigReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scheduler config at {path}: {source}")]
    ConfigParseFailed {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Hook '{hook_id}' has invalid metadata: {reason}")]
    InvalidMetadata { hook_id: String, reason: String },

    #[error("Hook registry error: {0}")]
    Registry(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
