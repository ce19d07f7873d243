//! Boss attack deck.
//!
//! The deck is a fixed multiset of numbered attack cards. Drawing moves a card
//! to the discard pile; when the draw pile runs dry the discard is shuffled
//! back in. Cards are never created or destroyed after the deck is built, so
//! `len() + discard_len()` always equals the built size.
//!
//! A card's damage and its chain flag (`draw_another`) are decided once, when
//! the deck is built. Reshuffling reorders cards but never re-rolls them.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{DeckComposition, RaidConfig};
use crate::rng::roll_percent;
use crate::state::BossCard;

/// Chance (percent) that an attack-2 card chains into another draw.
pub const ATTACK_TWO_CHAIN_CHANCE: u32 = 50;
/// Chance (percent) that an attack-3 card chains into another draw.
pub const ATTACK_THREE_CHAIN_CHANCE: u32 = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackCard {
    /// Which boss attack this card triggers (1-3).
    pub attack_number: u8,
    /// 1-based ordinal of the player this card aims at.
    pub target_player: u8,
    /// Whether the boss draws again after resolving this card.
    pub draw_another: bool,
    pub damage: u32,
}

impl AttackCard {
    /// Builds a card, rolling its target ordinal and chain flag.
    fn roll<R: Rng + ?Sized>(attack_number: u8, damage: u32, rng: &mut R) -> Self {
        let draw_another = match attack_number {
            1 => true,
            2 => roll_percent(rng, ATTACK_TWO_CHAIN_CHANCE),
            _ => roll_percent(rng, ATTACK_THREE_CHAIN_CHANCE),
        };

        Self {
            attack_number,
            target_player: rng.random_range(1..=RaidConfig::TARGET_ORDINALS),
            draw_another,
            damage,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDeck {
    /// Draw pile; the last element is the top card.
    cards: Vec<AttackCard>,
    discard: Vec<AttackCard>,
    reshuffles: u32,
}

impl AttackDeck {
    /// Builds and shuffles a deck for the given boss card.
    pub fn build<R: Rng + ?Sized>(
        composition: &DeckComposition,
        boss_card: &BossCard,
        rng: &mut R,
    ) -> Self {
        let mut cards = Vec::with_capacity(composition.total());

        for (index, count) in composition.counts().into_iter().enumerate() {
            let attack_number = index as u8 + 1;
            let damage = boss_card.attack_damage(attack_number);
            for _ in 0..count {
                cards.push(AttackCard::roll(attack_number, damage, rng));
            }
        }

        cards.shuffle(rng);

        tracing::debug!(cards = cards.len(), "built boss attack deck");

        Self {
            cards,
            discard: Vec::new(),
            reshuffles: 0,
        }
    }

    /// Creates a deck from explicit cards, top card last. Nothing is shuffled.
    pub fn from_cards(cards: Vec<AttackCard>) -> Self {
        Self {
            cards,
            discard: Vec::new(),
            reshuffles: 0,
        }
    }

    /// Draws the top card into the discard pile.
    ///
    /// An empty draw pile is refilled from the discard first. Returns `None`
    /// only when both piles are empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<AttackCard> {
        if self.cards.is_empty() {
            self.reshuffle(rng);
        }

        let card = self.cards.pop()?;
        self.discard.push(card);
        Some(card)
    }

    /// Moves the discard pile back under the draw pile and shuffles it.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.discard.is_empty() {
            return;
        }

        self.cards.append(&mut self.discard);
        self.cards.shuffle(rng);
        self.reshuffles += 1;

        tracing::debug!(
            cards = self.cards.len(),
            reshuffles = self.reshuffles,
            "reshuffled boss attack deck"
        );
    }

    /// Cards left in the draw pile.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Cards across both piles.
    pub fn total(&self) -> usize {
        self.cards.len() + self.discard.len()
    }

    /// True when neither pile holds a card, so nothing can be drawn.
    pub fn is_exhausted(&self) -> bool {
        self.cards.is_empty() && self.discard.is_empty()
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    pub fn cards(&self) -> &[AttackCard] {
        &self.cards
    }

    pub fn discard(&self) -> &[AttackCard] {
        &self.discard
    }
}
