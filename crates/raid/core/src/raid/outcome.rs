//! Typed results of raid operations.

use crate::ai::BossTurnReport;
use crate::state::{CheerEffect, ParticipantId, PokemonSlot};
use crate::turn::TurnTransition;

/// Why a raid was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum LossReason {
    /// Total knockouts reached the KO limit.
    KoLimit,
    NoActivePlayers,
}

/// Final result of a raid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "result", rename_all = "snake_case"))]
pub enum RaidOutcome {
    Victory,
    Defeat { reason: LossReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossCheck {
    pub has_lost: bool,
    pub reason: Option<LossReason>,
}

impl LossCheck {
    pub const fn lost(reason: LossReason) -> Self {
        Self {
            has_lost: true,
            reason: Some(reason),
        }
    }
}

/// A player's attack request: which Pokémon uses which attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerAttack {
    pub pokemon: PokemonSlot,
    pub attack_name: String,
}

impl PlayerAttack {
    pub fn new(pokemon: PokemonSlot, attack_name: impl Into<String>) -> Self {
        Self {
            pokemon,
            attack_name: attack_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerAttackOutcome {
    pub player: ParticipantId,
    pub pokemon: String,
    pub attack: String,
    /// Damage after cheer buffs.
    pub damage: u32,
    /// HP actually removed from the boss.
    pub dealt: u32,
    pub boss_hp: u32,
    pub outcome: Option<RaidOutcome>,
    /// `None` when the attack ended the raid.
    pub turn: Option<TurnTransition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetreatOutcome {
    pub player: ParticipantId,
    /// Pokémon now in the active slot.
    pub active: String,
    pub bench: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealRecord {
    pub player: ParticipantId,
    pub pokemon: String,
    pub amount: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheerOutcome {
    pub player: ParticipantId,
    pub card: u8,
    pub effect: CheerEffect,
    pub healed: Vec<HealRecord>,
    pub cheer_cards_used: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossTurnOutcome {
    pub report: BossTurnReport,
    /// Players converted to spectators after this turn.
    pub eliminated: Vec<ParticipantId>,
    pub total_ko_count: u32,
    pub outcome: Option<RaidOutcome>,
    /// `None` when the boss turn ended the raid.
    pub turn: Option<TurnTransition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaveOutcome {
    pub player: ParticipantId,
    pub loss: LossCheck,
}
