use std::{io::Error as IoError, result::Result as StdResult};

use meow_protocol::Method;
use thiserror::Error;

/// Failure of a single gateway call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The timer won the race; the backend may still answer later.
    #[error("{} timed out", .method.as_str())]
    Timeout {
        /// Operation that timed out.
        method: Method,
    },

    /// The backend reported a failure.
    #[error("{} failed: {cause}", .method.as_str())]
    Remote {
        /// Operation that failed.
        method: Method,
        /// Backend-provided reason.
        cause: String,
    },

    /// The backend answered with a payload of the wrong shape.
    #[error("{} returned an unexpected payload: {cause}", .method.as_str())]
    Decode {
        /// Operation whose reply could not be decoded.
        method: Method,
        /// Decoder message.
        cause: String,
    },
}

impl OperationError {
    /// Operation this error belongs to.
    pub fn method(&self) -> Method {
        match self {
            Self::Timeout { method } | Self::Remote { method, .. } | Self::Decode { method, .. } => {
                *method
            }
        }
    }

    /// True for timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Convenience alias for gateway call results.
pub type Result<T> = StdResult<T, OperationError>;

/// Connection-level errors of the IPC transport.
#[derive(Error, Debug)]
pub enum Error {
    /// Error in IPC communication
    #[error("IPC error: {0}")]
    Ipc(String),

    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(err: rmp_serde::decode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
