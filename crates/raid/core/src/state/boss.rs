//! The raid boss and its level scaling.

use crate::state::PlayerSetup;

/// Boss difficulty tier, derived once at raid start from player offense.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BossLevel {
    #[default]
    #[strum(to_string = "1", serialize = "one")]
    One,
    #[strum(to_string = "2", serialize = "two")]
    Two,
    #[strum(to_string = "3", serialize = "three")]
    Three,
}

impl BossLevel {
    /// Average offense below which the boss stays at level 1.
    pub const LEVEL_TWO_OFFENSE: u32 = 100;
    /// Average offense at or above which the boss reaches level 3.
    pub const LEVEL_THREE_OFFENSE: u32 = 160;

    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub const fn max_hp(&self) -> u32 {
        match self {
            Self::One => 800,
            Self::Two => 1200,
            Self::Three => 1600,
        }
    }

    pub const fn max_attacks_per_turn(&self) -> u32 {
        match self {
            Self::One => 2,
            Self::Two => 3,
            Self::Three => 4,
        }
    }

    /// Picks the level from the players' offense.
    ///
    /// Offense is the average, over players, of the hardest-hitting attack
    /// among each player's two Pokémon.
    pub fn from_offense(players: &[PlayerSetup]) -> Self {
        if players.is_empty() {
            return Self::One;
        }

        let total: u64 = players
            .iter()
            .map(|setup| u64::from(setup.max_attack_damage()))
            .sum();
        let average = total / players.len() as u64;

        if average >= u64::from(Self::LEVEL_THREE_OFFENSE) {
            Self::Three
        } else if average >= u64::from(Self::LEVEL_TWO_OFFENSE) {
            Self::Two
        } else {
            Self::One
        }
    }
}

/// One of the three numbered boss attacks printed on the boss card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossAttack {
    pub name: String,
    pub damage: u32,
}

impl BossAttack {
    pub fn new(name: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            damage,
        }
    }
}

/// Printed boss card. Attack `n` fixes the damage of every deck card numbered `n`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossCard {
    pub name: String,
    pub attacks: [BossAttack; 3],
}

impl BossCard {
    pub fn new(name: impl Into<String>, attacks: [BossAttack; 3]) -> Self {
        Self {
            name: name.into(),
            attacks,
        }
    }

    /// Returns the attack for a 1-based attack number.
    pub fn attack(&self, attack_number: u8) -> Option<&BossAttack> {
        let index = usize::from(attack_number).checked_sub(1)?;
        self.attacks.get(index)
    }

    /// Base damage for a 1-based attack number (0 for unknown numbers).
    pub fn attack_damage(&self, attack_number: u8) -> u32 {
        self.attack(attack_number).map_or(0, |attack| attack.damage)
    }
}

impl Default for BossCard {
    fn default() -> Self {
        Self::new(
            "Raid Boss",
            [
                BossAttack::new("Tail Swipe", 30),
                BossAttack::new("Crushing Blow", 60),
                BossAttack::new("Cataclysm", 100),
            ],
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BossStatus {
    Active,
    Defeated,
}

/// Result of applying player damage to the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BossDamage {
    /// HP actually removed (never more than the boss had left).
    pub dealt: u32,
    /// True only for the hit that took the boss to 0.
    pub defeated: bool,
}

/// The shared raid opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boss {
    pub card: BossCard,
    pub level: BossLevel,
    pub current_hp: u32,
    pub max_hp: u32,
    pub max_attacks_per_turn: u32,
    pub attacks_this_turn: u32,
    pub status: BossStatus,
}

impl Boss {
    pub fn new(card: BossCard, level: BossLevel) -> Self {
        let max_hp = level.max_hp();
        Self {
            card,
            level,
            current_hp: max_hp,
            max_hp,
            max_attacks_per_turn: level.max_attacks_per_turn(),
            attacks_this_turn: 0,
            status: BossStatus::Active,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.status == BossStatus::Defeated
    }

    /// Removes HP, flooring at 0. Flips the status to defeated exactly once.
    pub fn apply_damage(&mut self, amount: u32) -> BossDamage {
        if self.is_defeated() {
            return BossDamage {
                dealt: 0,
                defeated: false,
            };
        }

        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;

        let defeated = self.current_hp == 0;
        if defeated {
            self.status = BossStatus::Defeated;
        }

        BossDamage { dealt, defeated }
    }

    /// Resets the per-turn attack counter.
    pub fn begin_turn(&mut self) {
        self.attacks_this_turn = 0;
    }

    pub fn record_attack(&mut self) {
        self.attacks_this_turn += 1;
    }

    /// Attacks still allowed this turn under `limit` (or the boss allowance).
    pub fn remaining_attacks(&self, limit: Option<u32>) -> u32 {
        let allowance = limit.map_or(self.max_attacks_per_turn, |limit| {
            limit.min(self.max_attacks_per_turn)
        });
        allowance.saturating_sub(self.attacks_this_turn)
    }
}
