//! Error types raised by repository implementations.

use thiserror::Error;

use super::RaidId;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("raid repository lock was poisoned")]
    LockPoisoned,

    #[error("raid {0} not found")]
    RaidNotFound(RaidId),

    #[error("raid capacity reached (max: {max})")]
    CapacityReached { max: usize },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
