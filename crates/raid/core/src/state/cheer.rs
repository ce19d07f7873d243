//! Cheer cards and the raid-wide buffs they leave behind.
//!
//! Five numbered cheer cards exist per raid and each can be played once. At
//! most `max_cheer_cards` of them may be played in total, and only by a player
//! whose own Pokémon was knocked out since their last cheer.

use std::collections::BTreeSet;

use crate::config::RaidConfig;
use crate::error::RaidError;
use crate::state::{ParticipantId, PokemonSlot};

/// HP restored to every standing Pokémon by the team heal card.
pub const TEAM_HEAL_AMOUNT: u32 = 80;
/// Flat damage added to the next player attack by the damage buff card.
pub const DAMAGE_BUFF_AMOUNT: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CheerEffect {
    /// Card 1: the next player attack deals double damage.
    DoubleDamage,
    /// Card 2: heal every standing Pokémon of every active player by 80.
    TeamHeal,
    /// Card 3: restore one chosen Pokémon to full HP.
    FullHeal,
    /// Card 4: the boss may attack only once on its next turn.
    LimitBossAttacks,
    /// Card 5: the next player attack deals +50 damage.
    DamageBuff,
}

impl CheerEffect {
    pub const fn from_card(card: u8) -> Option<Self> {
        match card {
            1 => Some(Self::DoubleDamage),
            2 => Some(Self::TeamHeal),
            3 => Some(Self::FullHeal),
            4 => Some(Self::LimitBossAttacks),
            5 => Some(Self::DamageBuff),
            _ => None,
        }
    }

    pub const fn card_number(&self) -> u8 {
        match self {
            Self::DoubleDamage => 1,
            Self::TeamHeal => 2,
            Self::FullHeal => 3,
            Self::LimitBossAttacks => 4,
            Self::DamageBuff => 5,
        }
    }

    pub const fn requires_target(&self) -> bool {
        matches!(self, Self::FullHeal)
    }
}

/// Pokémon chosen by a targeted cheer card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheerTarget {
    pub player: ParticipantId,
    pub slot: PokemonSlot,
}

/// Remaining cheer cards and the raid-wide usage budget.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheerPool {
    remaining: BTreeSet<u8>,
    used: u8,
    max_uses: u8,
}

impl CheerPool {
    pub fn new(max_uses: u8) -> Self {
        Self {
            remaining: (1..=RaidConfig::CHEER_POOL_SIZE).collect(),
            used: 0,
            max_uses,
        }
    }

    /// Checks the budget and the pool without consuming anything.
    pub fn check(&self, card: u8) -> Result<CheerEffect, RaidError> {
        if self.used >= self.max_uses {
            return Err(RaidError::CheerBudgetExhausted);
        }
        if !self.remaining.contains(&card) {
            return Err(RaidError::CheerCardUnavailable { card });
        }
        CheerEffect::from_card(card).ok_or(RaidError::CheerCardUnavailable { card })
    }

    /// Permanently removes a card from the pool and charges the budget.
    pub fn take(&mut self, card: u8) -> Result<CheerEffect, RaidError> {
        let effect = self.check(card)?;
        self.remaining.remove(&card);
        self.used += 1;
        Ok(effect)
    }

    pub fn used(&self) -> u8 {
        self.used
    }

    pub fn max_uses(&self) -> u8 {
        self.max_uses
    }

    pub fn remaining(&self) -> impl Iterator<Item = u8> + '_ {
        self.remaining.iter().copied()
    }

}

/// Pending effects left by cheer cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaidBuffs {
    /// Doubles the next player attack.
    pub double_damage: bool,
    /// Added to the next player attack after doubling.
    pub damage_bonus: u32,
    /// Caps the boss's attacks on its next turn.
    pub boss_attack_limit: Option<u32>,
}

impl RaidBuffs {
    /// Applies and clears the attack buffs. Saturates at `u32::MAX`.
    pub fn consume_attack_buffs(&mut self, base_damage: u32) -> u32 {
        let mut damage = base_damage;
        if self.double_damage {
            damage = damage.saturating_mul(2);
        }
        damage = damage.saturating_add(self.damage_bonus);

        self.double_damage = false;
        self.damage_bonus = 0;
        damage
    }

    /// Returns and clears the boss attack cap.
    pub fn take_boss_attack_limit(&mut self) -> Option<u32> {
        self.boss_attack_limit.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_enforces_budget_and_uniqueness() {
        let mut pool = CheerPool::new(3);

        assert_eq!(pool.take(2), Ok(CheerEffect::TeamHeal));
        assert_eq!(
            pool.take(2),
            Err(RaidError::CheerCardUnavailable { card: 2 })
        );
        assert_eq!(pool.take(1), Ok(CheerEffect::DoubleDamage));
        assert_eq!(pool.take(5), Ok(CheerEffect::DamageBuff));
        assert_eq!(pool.take(4), Err(RaidError::CheerBudgetExhausted));

        assert_eq!(pool.used(), 3);
        assert_eq!(pool.remaining().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn unknown_card_is_unavailable() {
        let pool = CheerPool::new(3);
        assert_eq!(pool.check(0), Err(RaidError::CheerCardUnavailable { card: 0 }));
        assert_eq!(pool.check(6), Err(RaidError::CheerCardUnavailable { card: 6 }));
    }

    #[test]
    fn attack_buffs_apply_once() {
        let mut buffs = RaidBuffs {
            double_damage: true,
            damage_bonus: DAMAGE_BUFF_AMOUNT,
            boss_attack_limit: None,
        };
        assert_eq!(buffs.consume_attack_buffs(60), 170);
        assert_eq!(buffs.consume_attack_buffs(60), 60);
    }

    #[test]
    fn card_numbers_round_trip() {
        for card in 1..=RaidConfig::CHEER_POOL_SIZE {
            let effect = CheerEffect::from_card(card).map(|e| e.card_number());
            assert_eq!(effect, Some(card));
        }
        assert!(CheerEffect::FullHeal.requires_target());
        assert!(!CheerEffect::TeamHeal.requires_target());
    }

    #[test]
    fn attack_buffs_saturate() {
        let mut buffs = RaidBuffs {
            double_damage: true,
            damage_bonus: DAMAGE_BUFF_AMOUNT,
            boss_attack_limit: None,
        };
        assert_eq!(buffs.consume_attack_buffs(3_000_000_000), u32::MAX);
        assert_eq!(buffs, RaidBuffs::default());
    }
}
