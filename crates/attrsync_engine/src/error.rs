//! Error types for the engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur inside the reconciliation engine.
///
/// Expected runtime conditions - stale messages, unknown server keys,
/// failed pushes - are not errors; the engine logs them and keeps its
/// state for a later pass. These variants cover real faults: a broken
/// store, a type misuse, or a transport that cannot accept a request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The persisted store failed.
    #[error("store error: {0}")]
    Store(#[from] attrsync_store::StoreError),

    /// A local mutation named a key with no registered handle.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A mutation carried a value of the wrong kind for its attribute.
    #[error("wrong value kind for attribute {key}")]
    WrongKind {
        /// The attribute key.
        key: String,
    },

    /// The transport could not accept a request.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },
}

impl EngineError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::UnknownAttribute("coins".into());
        assert_eq!(err.to_string(), "unknown attribute: coins");

        let err = EngineError::transport("connection refused");
        assert!(err.to_string().contains("connection refused"));
    }
}
