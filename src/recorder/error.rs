//! Capture error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a capture session.
///
/// An invalid device pose is not an error: it is logged and the record is
/// kept.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("VR runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("Pose fetch failed: {0}")]
    PoseFetchFailure(String),

    #[error("Failed to write session to {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;
