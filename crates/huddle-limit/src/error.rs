//! Error types for the rate limiter.

use huddle_store::StorageError;

/// Errors that can occur during limiter operations.
#[derive(Debug, thiserror::Error)]
pub enum LimitError {
    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The limiter's command channel is full or closed.
    #[error("rate limiter is unavailable")]
    Unavailable,
}
