//! Deterministic raid-battle rules shared by the server runtime and tools.
//!
//! `raid-core` defines the canonical raid rules: the boss and its attack deck,
//! the scripted boss AI, turn sequencing, spectator bookkeeping, and the
//! [`RaidGameState`] aggregate that owns all of them. Every mutation flows
//! through the aggregate's `process_*` operations, which validate the request
//! and return a typed outcome or a [`RaidError`].
//!
//! The crate performs no I/O. Randomness comes from an injected seeded RNG and
//! time from caller-supplied [`Timestamp`]s, so a raid replays identically from
//! the same seed and inputs.
pub mod ai;
pub mod config;
pub mod error;
pub mod raid;
pub mod rng;
pub mod spectator;
pub mod state;
pub mod turn;

pub use ai::{
    Adjustment, AiConfig, AiDecision, BehaviorPattern, BossAi, BossAttackResult, BossControl,
    BossTurnContext, BossTurnReport, Difficulty, TargetingStrategy, ThreatAssessment, TurnStop,
};
pub use config::{DeckComposition, RaidConfig};
pub use error::{ErrorSeverity, GameError, RaidError};
pub use raid::{
    BossTurnOutcome, CheerOutcome, CheerStatus, DeckStatus, HealRecord, LeaveOutcome, LossCheck,
    LossReason, PlayerAttack, PlayerAttackOutcome, RaidGameState, RaidOutcome, RaidSnapshot,
    RetreatOutcome,
};
pub use rng::RaidRng;
pub use spectator::{
    EventKind, EventLog, LoggedEvent, RaidEvent, SpectatorDelivery, SpectatorManager,
    SpectatorPermissions, SpectatorRecord,
};
pub use state::{
    AttackCard, AttackDeck, Boss, BossAttack, BossCard, BossLevel, BossStatus, CheerEffect,
    CheerPool, CheerTarget, GamePhase, LastAction, ParticipantId, Player, PlayerRoster,
    PlayerSetup, PlayerStatus, Pokemon, PokemonAttack, PokemonPair, PokemonSlot, PokemonStatus,
    RaidBuffs, StatusCondition, Timestamp,
};
pub use turn::{
    BossBudget, StageProgress, StageView, TurnIndicator, TurnInfo, TurnManager, TurnOrderEntry,
    TurnPhase, TurnPlayerView, TurnStage, TurnTransition,
};
