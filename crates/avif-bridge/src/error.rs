//! Host-level error classes.

use thiserror::Error;

/// An error raised into the host runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// An argument had the wrong host type. Raised before any work starts.
    #[error("{0}")]
    TypeError(String),

    /// An argument had the right type but an unusable value.
    #[error("{0}")]
    ArgumentError(String),

    /// The operation ran and failed.
    #[error("{0}")]
    RuntimeError(String),
}

impl HostError {
    /// Host class name of the raised error.
    pub fn class_name(&self) -> &'static str {
        match self {
            HostError::TypeError(_) => "TypeError",
            HostError::ArgumentError(_) => "ArgumentError",
            HostError::RuntimeError(_) => "RuntimeError",
        }
    }

    /// The message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            HostError::TypeError(m) | HostError::ArgumentError(m) | HostError::RuntimeError(m) => m,
        }
    }
}
