//! Console error types
//!
//! Every remote failure is converted at the boundary of the operation that
//! issued it; nothing here is retried.

use thiserror::Error;

/// Console error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// Reading config or orders failed; previously loaded data is kept
    #[error("Failed to load {what}: {message}")]
    RemoteRead { what: &'static str, message: String },

    /// Saving the configuration failed; the draft is preserved for retry
    #[error("Error saving configuration: {message}")]
    RemoteWrite { message: String },

    /// A save is still pending on this draft
    #[error("A configuration save is already in progress")]
    CommitInProgress,

    /// Field name does not match any editable column
    #[error("Unknown configuration field: {0}")]
    UnknownField(String),

    /// The console was closed
    #[error("Console session is closed")]
    SessionClosed,
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
