//! Turn-level boss decision engine.
//!
//! Each boss turn runs the same pipeline per card until the chain breaks or
//! the attack allowance is spent:
//!
//! 1. **Draw** the top card of the attack deck (reshuffling if needed)
//! 2. **Target** a standing player according to [`TargetingStrategy`]
//! 3. **Difficulty** scales damage and nudges the chain flag
//! 4. **Behavior** may swap the attack number ([`BehaviorPattern`])
//! 5. **Execute** the attack against the target's front Pokémon
//!
//! The drawn card is never mutated; all adjustments live on the
//! [`AiDecision`], which is also what spectators see in the decision log.

use std::collections::VecDeque;

use rand::Rng;

use super::threat::ThreatAssessment;
use super::types::{AiConfig, BehaviorPattern, BossControl, Difficulty, TargetingStrategy};
use crate::rng::roll_percent;
use crate::state::{
    AttackCard, AttackDeck, Boss, BossCard, ParticipantId, PlayerRoster, PokemonSlot,
};

/// Chance (percent) that easy difficulty cancels a chain.
pub const EASY_CHAIN_SUPPRESS_CHANCE: u32 = 30;
/// Chance (percent) that hard difficulty makes a non-chaining attack 1-2 chain.
pub const HARD_CHAIN_BONUS_CHANCE: u32 = 25;
/// Chance (percent) that aggressive behavior upgrades attack 1 to attack 2.
pub const AGGRESSIVE_UPGRADE_CHANCE: u32 = 40;
/// Front-Pokémon HP (percent of max) at or below which a player counts as low.
pub const LOW_HP_PERCENT: u32 = 30;
/// Low-HP players needed before strategic behavior spreads damage.
pub const STRATEGIC_LOW_HP_PLAYERS: usize = 2;

/// Modification applied to a drawn card while deciding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Adjustment {
    DamageScaled,
    ChainSuppressed,
    ChainAdded,
    UpgradedAttack,
    DowngradedAttack,
}

/// One resolved boss attack decision.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiDecision {
    pub round: u32,
    /// The card as drawn from the deck.
    pub drawn: AttackCard,
    pub attack_number: u8,
    pub target: ParticipantId,
    pub damage: u32,
    pub draw_another: bool,
    pub targeting: TargetingStrategy,
    pub adjustments: Vec<Adjustment>,
}

/// Outcome of one executed boss attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossAttackResult {
    pub decision: AiDecision,
    pub attack_name: String,
    pub target: ParticipantId,
    pub slot: PokemonSlot,
    pub pokemon: String,
    /// HP actually removed.
    pub damage_dealt: u32,
    pub remaining_hp: u32,
    pub knocked_out: bool,
}

/// Why the boss stopped attacking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TurnStop {
    /// The last card did not chain.
    #[default]
    ChainEnded,
    AllowanceExhausted,
    /// No card could be drawn from either pile.
    DeckExhausted,
    /// No player had a standing Pokémon.
    NoTargets,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossTurnReport {
    pub attacks: Vec<BossAttackResult>,
    /// Pokémon knocked out this turn.
    pub knockouts: u32,
    pub stop: TurnStop,
}

/// Narrowed view of the raid handed to the AI for one boss turn.
pub struct BossTurnContext<'a, R: ?Sized> {
    pub boss: &'a mut Boss,
    pub players: &'a mut PlayerRoster,
    pub deck: &'a mut AttackDeck,
    /// Cheer-imposed cap for this turn.
    pub attack_limit: Option<u32>,
    pub round: u32,
    pub rng: &'a mut R,
}

/// Scripted boss AI with a bounded decision log.
#[derive(Clone, Debug)]
pub struct BossAi {
    config: AiConfig,
    threat: ThreatAssessment,
    decision_log: VecDeque<AiDecision>,
    decision_capacity: usize,
}

impl BossAi {
    pub fn new(config: AiConfig, decision_capacity: usize) -> Self {
        Self {
            config,
            threat: ThreatAssessment::new(),
            decision_log: VecDeque::with_capacity(decision_capacity),
            decision_capacity,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn threat(&self) -> &ThreatAssessment {
        &self.threat
    }

    /// Most recent decisions, oldest first.
    pub fn decision_log(&self) -> impl Iterator<Item = &AiDecision> {
        self.decision_log.iter()
    }

    /// Runs a full boss turn: draws, decides and executes until the chain
    /// breaks, the allowance is spent, or nothing can be drawn.
    pub fn generate_boss_actions<R: Rng + ?Sized>(
        &mut self,
        ctx: BossTurnContext<'_, R>,
    ) -> BossTurnReport {
        if self.config.mode == BossControl::PlayerControlled {
            tracing::warn!(
                window_secs = BossControl::PLAYER_DECISION_WINDOW_SECS,
                "player-controlled boss is not available, running scripted AI"
            );
        }

        let BossTurnContext {
            boss,
            players,
            deck,
            attack_limit,
            round,
            rng,
        } = ctx;

        boss.begin_turn();
        self.threat.update(players);

        let mut report = BossTurnReport::default();

        loop {
            if boss.remaining_attacks(attack_limit) == 0 {
                report.stop = TurnStop::AllowanceExhausted;
                break;
            }

            let candidates: Vec<ParticipantId> = players
                .iter()
                .filter(|p| p.can_be_targeted())
                .map(|p| p.id.clone())
                .collect();
            if candidates.is_empty() {
                report.stop = TurnStop::NoTargets;
                break;
            }

            let Some(card) = deck.draw(rng) else {
                tracing::warn!(
                    attacks = boss.attacks_this_turn,
                    "attack deck and discard are both empty, ending boss turn early"
                );
                report.stop = TurnStop::DeckExhausted;
                break;
            };

            let Some(decision) = self.decide(card, &candidates, players, &boss.card, round, rng)
            else {
                report.stop = TurnStop::NoTargets;
                break;
            };

            let Some(result) = Self::execute_attack(decision.clone(), &boss.card, players) else {
                report.stop = TurnStop::NoTargets;
                break;
            };

            boss.record_attack();
            self.push_decision(decision);

            if result.knocked_out {
                report.knockouts += 1;
            }
            let chain = result.decision.draw_another;
            report.attacks.push(result);

            if !chain {
                report.stop = TurnStop::ChainEnded;
                break;
            }
        }

        tracing::debug!(
            attacks = report.attacks.len(),
            knockouts = report.knockouts,
            stop = %report.stop,
            "boss turn resolved"
        );

        report
    }

    /// Resolves a drawn card into a decision against the current candidates.
    fn decide<R: Rng + ?Sized>(
        &self,
        card: AttackCard,
        candidates: &[ParticipantId],
        players: &PlayerRoster,
        boss_card: &BossCard,
        round: u32,
        rng: &mut R,
    ) -> Option<AiDecision> {
        let target = self.select_target(&card, candidates, players, rng)?;

        let mut decision = AiDecision {
            round,
            drawn: card,
            attack_number: card.attack_number,
            target,
            damage: card.damage,
            draw_another: card.draw_another,
            targeting: self.config.targeting,
            adjustments: Vec::new(),
        };

        self.apply_difficulty(&mut decision, rng);
        self.apply_behavior(&mut decision, candidates, players, boss_card, rng);

        tracing::debug!(
            drawn = card.attack_number,
            attack = decision.attack_number,
            target = %decision.target,
            damage = decision.damage,
            chain = decision.draw_another,
            adjustments = ?decision.adjustments,
            "boss decision"
        );

        Some(decision)
    }

    /// Picks a target among `candidates` (roster order). Ties go to the
    /// earliest candidate.
    pub fn select_target<R: Rng + ?Sized>(
        &self,
        card: &AttackCard,
        candidates: &[ParticipantId],
        players: &PlayerRoster,
        rng: &mut R,
    ) -> Option<ParticipantId> {
        if candidates.is_empty() {
            return None;
        }

        let front_hp = |id: &ParticipantId| {
            players
                .get(id)
                .and_then(|p| p.pokemon.front())
                .map_or(0, |pokemon| pokemon.hp)
        };

        let chosen = match self.config.targeting {
            TargetingStrategy::Weakest => {
                let mut best = &candidates[0];
                for id in &candidates[1..] {
                    if front_hp(id) < front_hp(best) {
                        best = id;
                    }
                }
                best
            }
            TargetingStrategy::Strongest => {
                let mut best = &candidates[0];
                for id in &candidates[1..] {
                    if front_hp(id) > front_hp(best) {
                        best = id;
                    }
                }
                best
            }
            TargetingStrategy::Tactical => {
                let refs: Vec<&ParticipantId> = candidates.iter().collect();
                self.threat.highest(&refs)?
            }
            TargetingStrategy::Random => &candidates[rng.random_range(0..candidates.len())],
            TargetingStrategy::DeckBased => {
                let ordinal = usize::from(card.target_player.max(1)) - 1;
                &candidates[ordinal % candidates.len()]
            }
        };

        Some(chosen.clone())
    }

    fn apply_difficulty<R: Rng + ?Sized>(&self, decision: &mut AiDecision, rng: &mut R) {
        let difficulty = self.config.difficulty;
        if difficulty == Difficulty::Normal {
            return;
        }

        decision.damage = difficulty.scale_damage(decision.damage);
        decision.adjustments.push(Adjustment::DamageScaled);

        match difficulty {
            Difficulty::Easy => {
                if decision.draw_another && roll_percent(rng, EASY_CHAIN_SUPPRESS_CHANCE) {
                    decision.draw_another = false;
                    decision.adjustments.push(Adjustment::ChainSuppressed);
                }
            }
            Difficulty::Hard => {
                if decision.attack_number <= 2
                    && !decision.draw_another
                    && roll_percent(rng, HARD_CHAIN_BONUS_CHANCE)
                {
                    decision.draw_another = true;
                    decision.adjustments.push(Adjustment::ChainAdded);
                }
            }
            Difficulty::Normal => {}
        }
    }

    fn apply_behavior<R: Rng + ?Sized>(
        &self,
        decision: &mut AiDecision,
        candidates: &[ParticipantId],
        players: &PlayerRoster,
        boss_card: &BossCard,
        rng: &mut R,
    ) {
        let difficulty = self.config.difficulty;

        match self.config.behavior {
            BehaviorPattern::Balanced => {}
            BehaviorPattern::Aggressive => {
                if decision.attack_number == 1 && roll_percent(rng, AGGRESSIVE_UPGRADE_CHANCE) {
                    decision.attack_number = 2;
                    decision.damage = difficulty.scale_damage(boss_card.attack_damage(2));
                    decision.adjustments.push(Adjustment::UpgradedAttack);
                }
            }
            BehaviorPattern::Strategic => {
                if decision.attack_number != 3 {
                    return;
                }

                let low_hp = candidates
                    .iter()
                    .filter_map(|id| players.get(id))
                    .filter_map(|p| p.pokemon.front())
                    .filter(|pokemon| pokemon.hp_percent() <= LOW_HP_PERCENT)
                    .count();

                // Several players nearly down: spread hits instead of one big overkill.
                if low_hp >= STRATEGIC_LOW_HP_PLAYERS {
                    decision.attack_number = 1;
                    decision.draw_another = true;
                    decision.damage = difficulty.scale_damage(boss_card.attack_damage(1));
                    decision.adjustments.push(Adjustment::DowngradedAttack);
                }
            }
        }
    }

    /// Applies a decision to the target's front Pokémon.
    ///
    /// On the knocking-out hit the player's KO count increments and the
    /// player earns a cheer. Returns `None` if the target has nothing standing.
    pub fn execute_attack(
        decision: AiDecision,
        boss_card: &BossCard,
        players: &mut PlayerRoster,
    ) -> Option<BossAttackResult> {
        let player = players.get_mut(&decision.target)?;
        let slot = player.pokemon.front_slot()?;
        let pokemon = player.pokemon.get_mut(slot);

        let hit = pokemon.take_damage(decision.damage);
        let pokemon_name = pokemon.name.clone();

        if hit.knocked_out {
            player.ko_count += 1;
            player.can_use_cheer = true;
            tracing::info!(
                player = %player.id,
                pokemon = %pokemon_name,
                "pokemon knocked out by boss"
            );
        }

        let attack_name = boss_card
            .attack(decision.attack_number)
            .map(|attack| attack.name.clone())
            .unwrap_or_default();

        Some(BossAttackResult {
            target: decision.target.clone(),
            decision,
            attack_name,
            slot,
            pokemon: pokemon_name,
            damage_dealt: hit.dealt,
            remaining_hp: hit.remaining_hp,
            knocked_out: hit.knocked_out,
        })
    }

    fn push_decision(&mut self, decision: AiDecision) {
        if self.decision_capacity == 0 {
            return;
        }
        while self.decision_log.len() >= self.decision_capacity {
            self.decision_log.pop_front();
        }
        self.decision_log.push_back(decision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::state::{BossLevel, Player, PlayerSetup, Pokemon, PokemonAttack, PokemonStatus};

    fn player(id: &str, hp: u32) -> Player {
        Player::from_setup(PlayerSetup::new(
            id,
            id,
            Pokemon::new("Front", hp, vec![PokemonAttack::new("Hit", 60)]),
            Pokemon::new("Back", 100, vec![PokemonAttack::new("Tap", 20)]),
        ))
    }

    fn card(attack_number: u8, target: u8, chain: bool, damage: u32) -> AttackCard {
        AttackCard {
            attack_number,
            target_player: target,
            draw_another: chain,
            damage,
        }
    }

    fn ai(targeting: TargetingStrategy) -> BossAi {
        BossAi::new(
            AiConfig::new(Difficulty::Normal, targeting, BehaviorPattern::Balanced),
            20,
        )
    }

    fn ids(roster: &PlayerRoster) -> Vec<ParticipantId> {
        roster.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn weakest_and_strongest_pick_by_front_hp() {
        let roster = PlayerRoster::new(vec![player("a", 120), player("b", 40), player("c", 120)]);
        let candidates = ids(&roster);
        let mut rng = seeded(1);
        let drawn = card(2, 1, false, 60);

        let weakest = ai(TargetingStrategy::Weakest)
            .select_target(&drawn, &candidates, &roster, &mut rng)
            .map(|id| id.0);
        assert_eq!(weakest.as_deref(), Some("b"));

        // a and c tie on HP; the earlier one wins
        let strongest = ai(TargetingStrategy::Strongest)
            .select_target(&drawn, &candidates, &roster, &mut rng)
            .map(|id| id.0);
        assert_eq!(strongest.as_deref(), Some("a"));
    }

    #[test]
    fn deck_based_wraps_ordinal() {
        let roster = PlayerRoster::new(vec![player("a", 100), player("b", 100)]);
        let candidates = ids(&roster);
        let mut rng = seeded(2);
        let boss_ai = ai(TargetingStrategy::DeckBased);

        let pick = |target| {
            boss_ai
                .select_target(&card(1, target, true, 30), &candidates, &roster, &mut seeded(0))
                .map(|id| id.0)
        };
        assert_eq!(pick(1).as_deref(), Some("a"));
        assert_eq!(pick(2).as_deref(), Some("b"));
        assert_eq!(pick(3).as_deref(), Some("a"));
        assert_eq!(pick(4).as_deref(), Some("b"));

        assert!(
            boss_ai
                .select_target(&card(1, 1, true, 30), &[], &roster, &mut rng)
                .is_none()
        );
    }

    #[test]
    fn execute_clamps_and_grants_cheer() {
        let mut roster = PlayerRoster::new(vec![player("a", 50)]);
        let decision = AiDecision {
            round: 1,
            drawn: card(2, 1, false, 60),
            attack_number: 2,
            target: ParticipantId::from("a"),
            damage: 60,
            draw_another: false,
            targeting: TargetingStrategy::DeckBased,
            adjustments: Vec::new(),
        };

        let result = BossAi::execute_attack(decision, &BossCard::default(), &mut roster);
        let result = result.expect("target has a standing pokemon");
        assert!(result.knocked_out);
        assert_eq!(result.remaining_hp, 0);
        assert_eq!(result.damage_dealt, 50);
        assert_eq!(result.attack_name, "Crushing Blow");

        let a = roster.get(&ParticipantId::from("a")).expect("player a");
        assert_eq!(a.pokemon.active.status, PokemonStatus::Ko);
        assert_eq!(a.ko_count, 1);
        assert!(a.can_use_cheer);
    }

    #[test]
    fn chain_stops_on_non_chaining_card() {
        let mut boss = Boss::new(BossCard::default(), BossLevel::Three);
        let mut roster = PlayerRoster::new(vec![player("a", 300), player("b", 300)]);
        // top card is last
        let mut deck = AttackDeck::from_cards(vec![
            card(3, 1, false, 100),
            card(2, 2, false, 60),
            card(1, 1, true, 30),
        ]);
        let mut rng = seeded(3);
        let mut boss_ai = ai(TargetingStrategy::DeckBased);

        let report = boss_ai.generate_boss_actions(BossTurnContext {
            boss: &mut boss,
            players: &mut roster,
            deck: &mut deck,
            attack_limit: None,
            round: 1,
            rng: &mut rng,
        });

        assert_eq!(report.attacks.len(), 2);
        assert_eq!(report.stop, TurnStop::ChainEnded);
        assert_eq!(boss.attacks_this_turn, 2);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.discard_len(), 2);

        let a = roster.get(&ParticipantId::from("a")).expect("player a");
        let b = roster.get(&ParticipantId::from("b")).expect("player b");
        assert_eq!(a.pokemon.active.hp, 270);
        assert_eq!(b.pokemon.active.hp, 240);
        assert_eq!(boss_ai.decision_log().count(), 2);
    }

    #[test]
    fn allowance_and_cheer_limit_cap_attacks() {
        let mut boss = Boss::new(BossCard::default(), BossLevel::One);
        let mut roster = PlayerRoster::new(vec![player("a", 500)]);
        let mut deck = AttackDeck::from_cards(vec![card(1, 1, true, 30); 6]);
        let mut rng = seeded(4);
        let mut boss_ai = ai(TargetingStrategy::DeckBased);

        let report = boss_ai.generate_boss_actions(BossTurnContext {
            boss: &mut boss,
            players: &mut roster,
            deck: &mut deck,
            attack_limit: None,
            round: 1,
            rng: &mut rng,
        });
        assert_eq!(report.attacks.len(), 2);
        assert_eq!(report.stop, TurnStop::AllowanceExhausted);

        let limited = boss_ai.generate_boss_actions(BossTurnContext {
            boss: &mut boss,
            players: &mut roster,
            deck: &mut deck,
            attack_limit: Some(1),
            round: 2,
            rng: &mut rng,
        });
        assert_eq!(limited.attacks.len(), 1);
        assert_eq!(limited.stop, TurnStop::AllowanceExhausted);
    }

    #[test]
    fn empty_deck_ends_turn_early() {
        let mut boss = Boss::new(BossCard::default(), BossLevel::One);
        let mut roster = PlayerRoster::new(vec![player("a", 500)]);
        let mut deck = AttackDeck::from_cards(vec![card(1, 1, true, 30)]);
        let mut rng = seeded(5);
        let mut boss_ai = ai(TargetingStrategy::DeckBased);

        // one card, chaining: second draw reshuffles the discard and succeeds
        let report = boss_ai.generate_boss_actions(BossTurnContext {
            boss: &mut boss,
            players: &mut roster,
            deck: &mut deck,
            attack_limit: None,
            round: 1,
            rng: &mut rng,
        });
        assert_eq!(report.attacks.len(), 2);

        let mut empty = AttackDeck::from_cards(Vec::new());
        let report = boss_ai.generate_boss_actions(BossTurnContext {
            boss: &mut boss,
            players: &mut roster,
            deck: &mut empty,
            attack_limit: None,
            round: 2,
            rng: &mut rng,
        });
        assert!(report.attacks.is_empty());
        assert_eq!(report.stop, TurnStop::DeckExhausted);
    }

    #[test]
    fn strategic_downgrades_when_players_are_low() {
        let mut roster = PlayerRoster::new(vec![player("a", 100), player("b", 100)]);
        for p in roster.iter_mut() {
            p.pokemon.active.take_damage(75);
        }
        let candidates = ids(&roster);
        let boss_ai = BossAi::new(
            AiConfig::new(
                Difficulty::Normal,
                TargetingStrategy::DeckBased,
                BehaviorPattern::Strategic,
            ),
            20,
        );
        let mut rng = seeded(6);

        let decision = boss_ai
            .decide(
                card(3, 1, false, 100),
                &candidates,
                &roster,
                &BossCard::default(),
                1,
                &mut rng,
            )
            .expect("decision");
        assert_eq!(decision.attack_number, 1);
        assert!(decision.draw_another);
        assert_eq!(decision.damage, 30);
        assert_eq!(decision.adjustments, vec![Adjustment::DowngradedAttack]);
        assert_eq!(decision.drawn.attack_number, 3);
    }

    #[test]
    fn easy_scales_damage_down() {
        let roster = PlayerRoster::new(vec![player("a", 100)]);
        let candidates = ids(&roster);
        let boss_ai = BossAi::new(
            AiConfig::new(
                Difficulty::Easy,
                TargetingStrategy::Weakest,
                BehaviorPattern::Balanced,
            ),
            20,
        );
        let mut rng = seeded(7);

        let decision = boss_ai
            .decide(
                card(2, 1, false, 60),
                &candidates,
                &roster,
                &BossCard::default(),
                1,
                &mut rng,
            )
            .expect("decision");
        assert_eq!(decision.damage, 48);
        assert!(!decision.draw_another);
        assert_eq!(decision.adjustments, vec![Adjustment::DamageScaled]);
    }

    #[test]
    fn decision_log_is_bounded() {
        let mut boss_ai = BossAi::new(AiConfig::default(), 3);
        let mut boss = Boss::new(BossCard::default(), BossLevel::One);
        let mut roster = PlayerRoster::new(vec![player("a", 10_000)]);
        let mut deck = AttackDeck::from_cards(vec![card(2, 1, false, 10); 4]);
        let mut rng = seeded(8);

        for round in 1..=5 {
            boss_ai.generate_boss_actions(BossTurnContext {
                boss: &mut boss,
                players: &mut roster,
                deck: &mut deck,
                attack_limit: None,
                round,
                rng: &mut rng,
            });
        }

        let rounds: Vec<u32> = boss_ai.decision_log().map(|d| d.round).collect();
        assert_eq!(rounds, vec![3, 4, 5]);
    }

    fn configured(
        difficulty: Difficulty,
        targeting: TargetingStrategy,
        behavior: BehaviorPattern,
    ) -> BossAi {
        BossAi::new(AiConfig::new(difficulty, targeting, behavior), 20)
    }

    /// Decides `drawn` once per seed in `0..64`.
    fn decide_across_seeds(boss_ai: &BossAi, drawn: AttackCard) -> Vec<AiDecision> {
        let roster = PlayerRoster::new(vec![player("a", 100)]);
        let candidates = ids(&roster);
        (0..64)
            .map(|seed| {
                boss_ai
                    .decide(
                        drawn,
                        &candidates,
                        &roster,
                        &BossCard::default(),
                        1,
                        &mut seeded(seed),
                    )
                    .expect("decision")
            })
            .collect()
    }

    #[test]
    fn hard_scales_damage_up_and_sometimes_chains() {
        let boss_ai = configured(
            Difficulty::Hard,
            TargetingStrategy::Weakest,
            BehaviorPattern::Balanced,
        );
        let decisions = decide_across_seeds(&boss_ai, card(2, 1, false, 60));

        assert!(decisions.iter().all(|d| d.damage == 72));
        let (chained, plain): (Vec<_>, Vec<_>) =
            decisions.iter().partition(|d| d.draw_another);
        assert!(!chained.is_empty());
        assert!(!plain.is_empty());
        for d in chained {
            assert_eq!(
                d.adjustments,
                vec![Adjustment::DamageScaled, Adjustment::ChainAdded]
            );
            assert!(!d.drawn.draw_another);
        }
        for d in plain {
            assert_eq!(d.adjustments, vec![Adjustment::DamageScaled]);
        }

        // attack 3 never gains a chain
        let heavy = decide_across_seeds(&boss_ai, card(3, 1, false, 100));
        assert!(heavy.iter().all(|d| !d.draw_another && d.damage == 120));
    }

    #[test]
    fn easy_sometimes_suppresses_chains() {
        let boss_ai = configured(
            Difficulty::Easy,
            TargetingStrategy::Weakest,
            BehaviorPattern::Balanced,
        );
        let decisions = decide_across_seeds(&boss_ai, card(1, 1, true, 30));

        assert!(decisions.iter().all(|d| d.damage == 24));
        let (kept, suppressed): (Vec<_>, Vec<_>) =
            decisions.iter().partition(|d| d.draw_another);
        assert!(!kept.is_empty());
        assert!(!suppressed.is_empty());
        for d in suppressed {
            assert_eq!(
                d.adjustments,
                vec![Adjustment::DamageScaled, Adjustment::ChainSuppressed]
            );
            assert!(d.drawn.draw_another);
        }
    }

    #[test]
    fn aggressive_upgrades_attack_one_and_recomputes_damage() {
        let boss_card = BossCard::default();
        let boss_ai = configured(
            Difficulty::Hard,
            TargetingStrategy::Weakest,
            BehaviorPattern::Aggressive,
        );
        let decisions = decide_across_seeds(&boss_ai, card(1, 1, true, 30));

        let (upgraded, kept): (Vec<_>, Vec<_>) =
            decisions.iter().partition(|d| d.attack_number == 2);
        assert!(!upgraded.is_empty());
        assert!(!kept.is_empty());
        for d in upgraded {
            assert_eq!(d.drawn.attack_number, 1);
            assert_eq!(
                d.damage,
                Difficulty::Hard.scale_damage(boss_card.attack_damage(2))
            );
            assert_eq!(d.adjustments.last(), Some(&Adjustment::UpgradedAttack));
        }
        for d in kept {
            assert_eq!(d.attack_number, 1);
            assert_eq!(d.damage, 36);
        }

        // only attack 1 is ever upgraded
        let twos = decide_across_seeds(&boss_ai, card(2, 1, false, 60));
        assert!(
            twos.iter()
                .all(|d| !d.adjustments.contains(&Adjustment::UpgradedAttack))
        );
    }

    #[test]
    fn tactical_targets_highest_threat() {
        let mut roster = PlayerRoster::new(vec![player("a", 100), player("b", 100), player("c", 100)]);
        if let Some(b) = roster.get_mut(&ParticipantId::from("b")) {
            b.can_use_cheer = true;
        }
        let candidates = ids(&roster);
        let drawn = card(1, 1, true, 30);
        let mut boss_ai = ai(TargetingStrategy::Tactical);

        // before any assessment every score is 0 and the first candidate wins
        let stale = boss_ai
            .select_target(&drawn, &candidates, &roster, &mut seeded(9))
            .map(|id| id.0);
        assert_eq!(stale.as_deref(), Some("a"));

        boss_ai.threat.update(&roster);
        let pick = boss_ai
            .select_target(&drawn, &candidates, &roster, &mut seeded(9))
            .map(|id| id.0);
        assert_eq!(pick.as_deref(), Some("b"));

        // b out of reach: next best by roster order
        let without_b = [ParticipantId::from("a"), ParticipantId::from("c")];
        let pick = boss_ai
            .select_target(&drawn, &without_b, &roster, &mut seeded(9))
            .map(|id| id.0);
        assert_eq!(pick.as_deref(), Some("a"));
    }

    #[test]
    fn random_targeting_is_seed_deterministic() {
        let roster = PlayerRoster::new(vec![player("a", 100), player("b", 100), player("c", 100)]);
        let candidates = ids(&roster);
        let drawn = card(1, 1, true, 30);
        let boss_ai = ai(TargetingStrategy::Random);

        let picks: Vec<ParticipantId> = (0..32)
            .map(|seed| {
                boss_ai
                    .select_target(&drawn, &candidates, &roster, &mut seeded(seed))
                    .expect("candidate")
            })
            .collect();
        let again: Vec<ParticipantId> = (0..32)
            .map(|seed| {
                boss_ai
                    .select_target(&drawn, &candidates, &roster, &mut seeded(seed))
                    .expect("candidate")
            })
            .collect();
        assert_eq!(picks, again);
        for id in &candidates {
            assert!(picks.contains(id));
        }
    }
}
