//! Hydration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.

use derive_more::{Display, Error};
use inkstage_store::error::{Error as StoreError, ErrorKind as StoreErrorKind};

/// A hydration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for hydration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A single image fetch failed. Always recovered within `hydrate`
    /// itself (the image is marked broken); only fetch implementations
    /// raise it outward.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The staging store rejected a read or write.
    #[display("staging store error: {_0}")]
    Storage(StoreErrorKind),
}

impl ErrorKind {
    /// Convert a store error into a hydration error, preserving the store
    /// crate's `Exn` frame (error tree) as a child in its own error tree.
    #[track_caller]
    pub fn storage(err: StoreError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Storage(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Storage(kind) => kind.is_retryable(),
        }
    }
}
