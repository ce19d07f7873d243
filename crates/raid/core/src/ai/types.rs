//! Boss AI configuration knobs.

/// Who decides the boss's attacks.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BossControl {
    /// Attack deck plus targeting/difficulty/behavior rules.
    #[default]
    Scripted,
    /// A human drives the boss. Not implemented yet; runs as [`Self::Scripted`].
    PlayerControlled,
}

impl BossControl {
    /// Decision window reserved for a human boss controller.
    pub const PLAYER_DECISION_WINDOW_SECS: u64 = 30;
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    /// ×0.8 damage, 30% of chains suppressed.
    Easy,
    #[default]
    Normal,
    /// ×1.2 damage, attacks 1-2 gain a 25% chance to chain.
    Hard,
}

impl Difficulty {
    /// Scales base card damage. Integer math keeps results reproducible.
    pub const fn scale_damage(&self, damage: u32) -> u32 {
        let (numerator, denominator) = match self {
            Self::Easy => (4, 5),
            Self::Normal => (1, 1),
            Self::Hard => (6, 5),
        };
        let scaled = damage as u64 * numerator / denominator;
        if scaled > u32::MAX as u64 {
            u32::MAX
        } else {
            scaled as u32
        }
    }
}

/// How the boss picks which player to hit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetingStrategy {
    /// Lowest front-Pokémon HP.
    Weakest,
    /// Highest front-Pokémon HP.
    Strongest,
    /// Highest threat score.
    Tactical,
    /// Uniformly random standing player.
    Random,
    /// The ordinal printed on the drawn card.
    #[default]
    DeckBased,
}

/// Adjustments layered on top of the drawn card.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorPattern {
    /// Cards resolve as drawn.
    #[default]
    Balanced,
    /// Attack 1 upgrades to attack 2 with 40% probability.
    Aggressive,
    /// Attack 3 becomes a chaining attack 1 when two or more players are low.
    Strategic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiConfig {
    pub mode: BossControl,
    pub difficulty: Difficulty,
    pub targeting: TargetingStrategy,
    pub behavior: BehaviorPattern,
}

impl AiConfig {
    pub fn new(
        difficulty: Difficulty,
        targeting: TargetingStrategy,
        behavior: BehaviorPattern,
    ) -> Self {
        Self {
            mode: BossControl::Scripted,
            difficulty,
            targeting,
            behavior,
        }
    }
}
