use std::result::Result as StdResult;

use meow_gateway::OperationError;
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// How the application root should present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Shown as a transient notice; the UI keeps working.
    Recoverable,
    /// Blocks the UI behind the fatal panel until a reload.
    Fatal,
}

/// Unified error type for the MemeMeow engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A backend operation failed or timed out.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// User input was rejected before reaching the backend.
    #[error("{0}")]
    Validation(String),

    /// The UI event channel has been closed by the receiver.
    #[error("UI channel closed")]
    ChannelClosed,

    /// Unrecoverable failure raised explicitly by the caller.
    #[error("{0}")]
    Fatal(String),

    /// Generic error with context.
    #[error("Engine error: {0}")]
    Msg(String),
}

impl Error {
    /// Severity tag used by the application root.
    pub fn severity(&self) -> Severity {
        match self {
            Self::ChannelClosed | Self::Fatal(_) => Severity::Fatal,
            Self::Operation(_) | Self::Validation(_) | Self::Msg(_) => Severity::Recoverable,
        }
    }
}

#[cfg(test)]
mod tests {
    use meow_protocol::Method;

    use super::*;

    #[test]
    fn severity_is_explicit() {
        let op = Error::from(OperationError::Timeout {
            method: Method::SearchMemes,
        });
        assert_eq!(op.severity(), Severity::Recoverable);
        assert_eq!(op.to_string(), "search_memes timed out");
        assert_eq!(
            Error::Validation("bad url".into()).severity(),
            Severity::Recoverable
        );
        assert_eq!(Error::ChannelClosed.severity(), Severity::Fatal);
        assert_eq!(Error::Fatal("boom".into()).severity(), Severity::Fatal);
    }
}
