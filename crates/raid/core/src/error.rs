//! Common error infrastructure for raid-core.
//!
//! Every rule violation is an expected outcome, not a crash: operations return
//! [`RaidError`] and the transport layer relays it to the client. The
//! `Display` text of each variant is the user-facing message sent over the
//! wire, while [`GameError::error_code`] gives a stable identifier for
//! branching and metrics.

use crate::state::ParticipantId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request was well-formed but arrived at the wrong
///   moment (wrong turn, wrong phase). The client can retry after observing
///   updated turn info.
/// - **Validation**: the request itself is invalid and must change before it
///   can succeed.
/// - **Internal**: unexpected state inconsistency outside the rules engine,
///   such as a poisoned lock in a host process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all raid errors.
///
/// Provides a uniform interface for error classification across crates, so
/// the runtime can build responses without matching on every variant.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors produced by raid operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaidError {
    // ===== setup =====
    #[error("Raid requires at least one player")]
    NoPlayers,

    #[error("Raid is full (max: {max})")]
    RaidFull { max: usize },

    #[error("Duplicate player {player}")]
    DuplicatePlayer { player: ParticipantId },

    // ===== phase and turn =====
    #[error("Raid is over")]
    RaidOver,

    #[error("Not player turn phase")]
    NotPlayerTurnPhase,

    #[error("Not boss turn")]
    NotBossTurn,

    #[error("Not your turn")]
    NotYourTurn,

    // ===== players =====
    #[error("Player not found")]
    PlayerNotFound { player: ParticipantId },

    #[error("Player is not active")]
    PlayerNotActive { player: ParticipantId },

    #[error("Pokemon is KO'd")]
    PokemonKnockedOut,

    #[error("Invalid attack")]
    InvalidAttack { attack: String },

    #[error("GX attack already used")]
    GxAlreadyUsed,

    // ===== cheer cards =====
    #[error("Cannot use cheer card")]
    CheerNotAllowed,

    #[error("Maximum cheer cards used")]
    CheerBudgetExhausted,

    #[error("Cheer card not available")]
    CheerCardUnavailable { card: u8 },

    #[error("Target required")]
    CheerTargetRequired,

    #[error("Invalid target")]
    InvalidCheerTarget,

    // ===== spectators =====
    #[error("Maximum spectators reached")]
    SpectatorLimitReached { max: usize },

    #[error("Already spectating")]
    AlreadySpectating,

    #[error("Active players cannot spectate")]
    StillPlaying,

    #[error("Spectator not found")]
    SpectatorNotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Invalid message")]
    InvalidMessage,
}

impl GameError for RaidError {
    fn severity(&self) -> ErrorSeverity {
        use RaidError::*;
        match self {
            // Timing errors: the same request may succeed once the turn comes around
            NotPlayerTurnPhase | NotBossTurn | NotYourTurn => ErrorSeverity::Recoverable,

            RaidOver
            | NoPlayers
            | RaidFull { .. }
            | DuplicatePlayer { .. }
            | PlayerNotFound { .. }
            | PlayerNotActive { .. }
            | PokemonKnockedOut
            | InvalidAttack { .. }
            | GxAlreadyUsed
            | CheerNotAllowed
            | CheerBudgetExhausted
            | CheerCardUnavailable { .. }
            | CheerTargetRequired
            | InvalidCheerTarget
            | SpectatorLimitReached { .. }
            | AlreadySpectating
            | StillPlaying
            | SpectatorNotFound
            | PermissionDenied
            | InvalidMessage => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use RaidError::*;
        match self {
            NoPlayers => "RAID_NO_PLAYERS",
            RaidFull { .. } => "RAID_FULL",
            DuplicatePlayer { .. } => "RAID_DUPLICATE_PLAYER",
            RaidOver => "RAID_OVER",
            NotPlayerTurnPhase => "RAID_NOT_PLAYER_PHASE",
            NotBossTurn => "RAID_NOT_BOSS_TURN",
            NotYourTurn => "RAID_NOT_YOUR_TURN",
            PlayerNotFound { .. } => "RAID_PLAYER_NOT_FOUND",
            PlayerNotActive { .. } => "RAID_PLAYER_NOT_ACTIVE",
            PokemonKnockedOut => "RAID_POKEMON_KO",
            InvalidAttack { .. } => "RAID_INVALID_ATTACK",
            GxAlreadyUsed => "RAID_GX_USED",
            CheerNotAllowed => "RAID_CHEER_NOT_ALLOWED",
            CheerBudgetExhausted => "RAID_CHEER_BUDGET_EXHAUSTED",
            CheerCardUnavailable { .. } => "RAID_CHEER_CARD_UNAVAILABLE",
            CheerTargetRequired => "RAID_CHEER_TARGET_REQUIRED",
            InvalidCheerTarget => "RAID_CHEER_INVALID_TARGET",
            SpectatorLimitReached { .. } => "RAID_SPECTATOR_LIMIT",
            AlreadySpectating => "RAID_ALREADY_SPECTATING",
            StillPlaying => "RAID_STILL_PLAYING",
            SpectatorNotFound => "RAID_SPECTATOR_NOT_FOUND",
            PermissionDenied => "RAID_PERMISSION_DENIED",
            InvalidMessage => "RAID_INVALID_MESSAGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_strings() {
        assert_eq!(RaidError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(RaidError::PokemonKnockedOut.to_string(), "Pokemon is KO'd");
        assert_eq!(
            RaidError::SpectatorLimitReached { max: 10 }.to_string(),
            "Maximum spectators reached"
        );
    }

    #[test]
    fn timing_errors_are_recoverable() {
        assert!(RaidError::NotYourTurn.severity().is_recoverable());
        assert!(RaidError::NotBossTurn.severity().is_recoverable());
        assert!(!RaidError::CheerBudgetExhausted.severity().is_recoverable());
        assert_eq!(RaidError::RaidOver.error_code(), "RAID_OVER");
    }

    #[test]
    fn finished_raid_is_not_retryable() {
        assert_eq!(RaidError::RaidOver.severity(), ErrorSeverity::Validation);
    }
}
