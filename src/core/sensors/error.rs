// src/core/sensors/error.rs

use thiserror::Error;

/// Failures a backend can run into. None of them escape the orchestrator.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailure { target: String, reason: String },

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("access to {0} denied")]
    AccessDenied(String),

    #[error("device {0} unavailable")]
    DeviceUnavailable(String),

    #[error("field {field} has unexpected type {found}")]
    DecodeMismatch { field: String, found: String },

    #[error("backend used before a successful initialize")]
    NotInitialized,

    #[error("platform backend not supported on this OS")]
    Unsupported,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SensorError {
    pub fn connection(target: impl Into<String>, reason: impl ToString) -> Self {
        SensorError::ConnectionFailure {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub fn mismatch(field: impl Into<String>, found: impl Into<String>) -> Self {
        SensorError::DecodeMismatch {
            field: field.into(),
            found: found.into(),
        }
    }
}
