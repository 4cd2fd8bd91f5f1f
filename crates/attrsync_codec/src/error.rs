//! Error types for the codec crate.

use crate::value::AttrKind;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while reading or writing typed values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] attrsync_store::StoreError),

    /// A value of one kind was requested as another.
    #[error("kind mismatch: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        /// The kind the caller asked for.
        expected: AttrKind,
        /// The kind actually held.
        actual: AttrKind,
    },
}
