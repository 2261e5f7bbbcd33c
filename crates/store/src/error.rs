//! Store Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The persistence layer rejected an operation (unavailable, full, or a
    /// transaction failed to commit).
    #[display("storage error")]
    Database,
    /// Schema migration failed on open.
    #[display("storage migration error")]
    Migration,
    /// A stored value could not be converted to its model form.
    #[display("invalid stored data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A busy or momentarily unavailable database can recover; corrupt
        // rows and failed migrations cannot.
        matches!(self, Self::Database)
    }
}
