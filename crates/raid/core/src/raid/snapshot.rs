use crate::ai::{AiConfig, AiDecision};
use crate::raid::RaidOutcome;
use crate::spectator::SpectatorRecord;
use crate::state::{Boss, GamePhase, Player, RaidBuffs, Timestamp};
use crate::turn::{TurnInfo, TurnOrderEntry};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckStatus {
    pub remaining: usize,
    pub discarded: usize,
    pub reshuffles: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheerStatus {
    pub used: u8,
    pub max_uses: u8,
    pub remaining: Vec<u8>,
}

/// Full read-only view of a raid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaidSnapshot {
    pub phase: GamePhase,
    pub outcome: Option<RaidOutcome>,
    pub clock: Timestamp,
    pub boss: Boss,
    pub players: Vec<Player>,
    pub turn: TurnInfo,
    pub turn_order: Vec<TurnOrderEntry>,
    pub deck: DeckStatus,
    pub cheer: CheerStatus,
    pub buffs: RaidBuffs,
    pub total_ko_count: u32,
    pub ko_limit: u32,
    pub spectators: Vec<SpectatorRecord>,
    pub ai: AiConfig,
    pub decision_log: Vec<AiDecision>,
    /// Threat scores from the last boss turn, in roster order.
    pub threat: Vec<(String, f64)>,
}
