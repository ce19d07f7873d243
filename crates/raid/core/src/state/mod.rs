//! Authoritative raid data: boss, players, attack deck and cheer cards.
//!
//! These types hold plain data plus the local invariants of each entity (HP
//! bounds, KO transitions, deck conservation). Cross-entity rules such as turn
//! validation and win/loss evaluation live in [`crate::raid`].
pub mod boss;
pub mod cheer;
pub mod deck;
pub mod player;

use std::fmt;

pub use boss::{Boss, BossAttack, BossCard, BossDamage, BossLevel, BossStatus};
pub use cheer::{CheerEffect, CheerPool, CheerTarget, RaidBuffs};
pub use deck::{AttackCard, AttackDeck};
pub use player::{
    LastAction, Player, PlayerRoster, PlayerSetup, PlayerStatus, Pokemon, PokemonAttack,
    PokemonDamage, PokemonPair, PokemonSlot, PokemonStatus, StatusCondition,
};

/// Identifier of a raid participant (player or spectator), usually the
/// transport's connection or account id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Milliseconds since an epoch chosen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Externally visible phase of a raid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum GamePhase {
    PlayerTurns,
    BossTurn,
    /// Nobody is left in the turn order; no further turns can run.
    EndPhase,
    Victory,
    Defeat,
}

impl GamePhase {
    /// Returns true once the raid has a final result.
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::EndPhase)
    }
}
