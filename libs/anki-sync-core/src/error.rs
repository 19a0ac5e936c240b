//! Error types for the reconciliation core.

use thiserror::Error;

/// Result type alias using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by the planner and the instruction executor.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Cooperative cancellation was observed between phases or
    /// instructions. Never surfaces mid-instruction.
    #[error("sync cancelled")]
    Cancelled,

    /// An instruction referenced a card that no known deck contains.
    /// Carries the failing instruction's stable key.
    #[error("card not found in any deck: {key}")]
    CardNotFound { key: String },

    /// The remote repository reported a transport or application fault.
    /// Fatal for the current run; re-running reconciliation computes the
    /// remaining diff.
    #[error("remote repository error: {0}")]
    Remote(String),
}
