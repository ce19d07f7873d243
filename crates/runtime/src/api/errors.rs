//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations from the raid engine, repository failures and
//! malformed commands so the transport can relay them with a stable code.
use thiserror::Error;

use raid_core::{ErrorSeverity, GameError, RaidError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Raid(#[from] RaidError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Malformed command payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Raid(err) => err.severity(),
            RuntimeError::Repository(RepositoryError::LockPoisoned) => ErrorSeverity::Internal,
            RuntimeError::Repository(RepositoryError::CapacityReached { .. }) => {
                ErrorSeverity::Recoverable
            }
            RuntimeError::Repository(RepositoryError::RaidNotFound(_))
            | RuntimeError::InvalidCommand(_)
            | RuntimeError::Json(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Raid(err) => err.error_code(),
            RuntimeError::Repository(RepositoryError::LockPoisoned) => "RAID_LOCK_POISONED",
            RuntimeError::Repository(RepositoryError::RaidNotFound(_)) => "RAID_NOT_FOUND",
            RuntimeError::Repository(RepositoryError::CapacityReached { .. }) => {
                "RAID_CAPACITY_REACHED"
            }
            RuntimeError::InvalidCommand(_) => "INVALID_COMMAND",
            RuntimeError::Json(_) => "MALFORMED_PAYLOAD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RaidId;

    #[test]
    fn raid_errors_keep_their_code_and_message() {
        let err = RuntimeError::from(RaidError::NotYourTurn);
        assert_eq!(err.to_string(), RaidError::NotYourTurn.to_string());
        assert_eq!(err.error_code(), RaidError::NotYourTurn.error_code());
        assert!(err.severity().is_recoverable());
    }

    #[test]
    fn repository_errors_are_classified() {
        let missing = RuntimeError::from(RepositoryError::RaidNotFound(RaidId(9)));
        assert_eq!(missing.error_code(), "RAID_NOT_FOUND");
        assert_eq!(missing.severity(), ErrorSeverity::Validation);

        let poisoned = RuntimeError::from(RepositoryError::LockPoisoned);
        assert_eq!(poisoned.severity(), ErrorSeverity::Internal);
    }
}
