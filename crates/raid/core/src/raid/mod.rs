//! The raid aggregate.
//!
//! [`RaidGameState`] exclusively owns the boss, the players, the attack deck
//! and the cheer pool. The managers ([`TurnManager`], [`BossAi`],
//! [`SpectatorManager`]) hold no copies of player or boss data; they get the
//! pieces they need as explicit arguments.
//!
//! All operations are synchronous. A rejected request leaves the raid
//! untouched and returns a [`RaidError`].
pub mod outcome;
pub mod snapshot;

pub use outcome::{
    BossTurnOutcome, CheerOutcome, HealRecord, LeaveOutcome, LossCheck, LossReason, PlayerAttack,
    PlayerAttackOutcome, RaidOutcome, RetreatOutcome,
};
pub use snapshot::{CheerStatus, DeckStatus, RaidSnapshot};

use std::collections::HashSet;

use crate::ai::{BossAi, BossTurnContext};
use crate::config::RaidConfig;
use crate::error::RaidError;
use crate::rng::{self, RaidRng};
use crate::spectator::{
    LoggedEvent, RaidEvent, SpectatorDelivery, SpectatorManager, SpectatorRecord,
};
use crate::state::{
    AttackDeck, Boss, BossCard, BossLevel, CheerEffect, CheerPool, CheerTarget, GamePhase,
    LastAction, ParticipantId, Player, PlayerRoster, PlayerSetup, PlayerStatus, RaidBuffs,
    Timestamp, cheer,
};
use crate::turn::{TurnIndicator, TurnManager, TurnPhase, TurnTransition};

pub struct RaidGameState {
    config: RaidConfig,
    boss: Boss,
    players: PlayerRoster,
    deck: AttackDeck,
    cheer: CheerPool,
    buffs: RaidBuffs,
    turns: TurnManager,
    boss_ai: BossAi,
    spectators: SpectatorManager,
    total_ko_count: u32,
    outcome: Option<RaidOutcome>,
    clock: Timestamp,
    rng: RaidRng,
}

impl RaidGameState {
    /// Seats the players in the given order, levels the boss and builds the deck.
    pub fn new(
        config: RaidConfig,
        boss_card: BossCard,
        setups: Vec<PlayerSetup>,
        mut rng: RaidRng,
    ) -> Result<Self, RaidError> {
        if setups.is_empty() {
            return Err(RaidError::NoPlayers);
        }
        if setups.len() > config.max_players {
            return Err(RaidError::RaidFull {
                max: config.max_players,
            });
        }
        let mut seen = HashSet::new();
        for setup in &setups {
            if !seen.insert(&setup.id) {
                return Err(RaidError::DuplicatePlayer {
                    player: setup.id.clone(),
                });
            }
        }

        let level = config
            .boss_level
            .unwrap_or_else(|| BossLevel::from_offense(&setups));
        let deck = AttackDeck::build(&config.deck, &boss_card, &mut rng);
        let boss = Boss::new(boss_card, level);

        let turns = TurnManager::new(
            setups
                .iter()
                .map(|setup| (setup.id.clone(), setup.username.clone())),
        );
        let players = PlayerRoster::new(setups.into_iter().map(Player::from_setup).collect());

        tracing::info!(
            boss = %boss.card.name,
            level = %boss.level,
            hp = boss.max_hp,
            players = players.len(),
            difficulty = %config.ai.difficulty,
            targeting = %config.ai.targeting,
            behavior = %config.ai.behavior,
            "raid created"
        );

        Ok(Self {
            boss,
            players,
            deck,
            cheer: CheerPool::new(config.max_cheer_cards),
            buffs: RaidBuffs::default(),
            turns,
            boss_ai: BossAi::new(config.ai, config.decision_log_capacity),
            spectators: SpectatorManager::new(&config),
            total_ko_count: 0,
            outcome: None,
            clock: Timestamp::ZERO,
            rng,
            config,
        })
    }

    /// Creates a raid whose randomness derives entirely from `seed`.
    pub fn with_seed(
        config: RaidConfig,
        boss_card: BossCard,
        setups: Vec<PlayerSetup>,
        seed: u64,
    ) -> Result<Self, RaidError> {
        Self::new(config, boss_card, setups, rng::seeded(seed))
    }

    /// Replaces the built attack deck, for scripted encounters.
    pub fn with_attack_deck(mut self, deck: AttackDeck) -> Self {
        self.deck = deck;
        self
    }

    // ===== accessors =====

    pub fn config(&self) -> &RaidConfig {
        &self.config
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn players(&self) -> &PlayerRoster {
        &self.players
    }

    pub fn player(&self, id: &ParticipantId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn deck(&self) -> &AttackDeck {
        &self.deck
    }

    pub fn cheer_pool(&self) -> &CheerPool {
        &self.cheer
    }

    pub fn buffs(&self) -> &RaidBuffs {
        &self.buffs
    }

    pub fn turns(&self) -> &TurnManager {
        &self.turns
    }

    pub fn boss_ai(&self) -> &BossAi {
        &self.boss_ai
    }

    pub fn spectators(&self) -> &SpectatorManager {
        &self.spectators
    }

    pub fn total_ko_count(&self) -> u32 {
        self.total_ko_count
    }

    pub fn outcome(&self) -> Option<RaidOutcome> {
        self.outcome
    }

    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    /// Sets the time stamped on events from now on. The clock never moves back.
    pub fn set_clock(&mut self, now: Timestamp) {
        self.clock = self.clock.max(now);
    }

    pub fn game_phase(&self) -> GamePhase {
        match self.outcome {
            Some(RaidOutcome::Victory) => GamePhase::Victory,
            Some(RaidOutcome::Defeat { .. }) => GamePhase::Defeat,
            None => match self.turns.phase() {
                TurnPhase::PlayerTurns => GamePhase::PlayerTurns,
                TurnPhase::BossTurn => GamePhase::BossTurn,
                TurnPhase::EndPhase => GamePhase::EndPhase,
            },
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_phase().is_over()
    }

    fn ensure_running(&self) -> Result<(), RaidError> {
        if self.is_over() {
            return Err(RaidError::RaidOver);
        }
        Ok(())
    }

    // ===== player actions =====

    /// Resolves a player's attack on the boss and ends their turn.
    pub fn process_player_attack(
        &mut self,
        id: &ParticipantId,
        request: PlayerAttack,
    ) -> Result<PlayerAttackOutcome, RaidError> {
        self.ensure_running()?;
        if self.turns.phase() != TurnPhase::PlayerTurns {
            return Err(RaidError::NotPlayerTurnPhase);
        }

        let player = self.active_player(id)?;
        if !self.turns.is_players_turn(id) {
            return Err(RaidError::NotYourTurn);
        }

        let pokemon = player.pokemon.get(request.pokemon);
        if pokemon.is_ko() {
            return Err(RaidError::PokemonKnockedOut);
        }
        let attack = pokemon
            .attack(&request.attack_name)
            .ok_or_else(|| RaidError::InvalidAttack {
                attack: request.attack_name.clone(),
            })?;
        if attack.gx && player.has_used_gx {
            return Err(RaidError::GxAlreadyUsed);
        }

        let pokemon_name = pokemon.name.clone();
        let attack_name = attack.name.clone();
        let base_damage = attack.damage;
        let is_gx = attack.gx;

        let damage = self.buffs.consume_attack_buffs(base_damage);
        let hit = self.boss.apply_damage(damage);

        if let Some(player) = self.players.get_mut(id) {
            player.last_action = Some(LastAction::Attack { damage });
            player.has_used_gx |= is_gx;
        }

        tracing::info!(
            player = %id,
            pokemon = %pokemon_name,
            attack = %attack_name,
            damage,
            boss_hp = self.boss.current_hp,
            "player attacked boss"
        );

        self.record(RaidEvent::PlayerAttack {
            player: id.clone(),
            pokemon: pokemon_name.clone(),
            attack: attack_name.clone(),
            damage,
            boss_hp: self.boss.current_hp,
        });

        let turn = if self.check_win_condition() {
            self.finish(RaidOutcome::Victory);
            None
        } else {
            let transition = self.turns.end_current_turn();
            self.record_turn_change();
            Some(transition)
        };

        Ok(PlayerAttackOutcome {
            player: id.clone(),
            pokemon: pokemon_name,
            attack: attack_name,
            damage,
            dealt: hit.dealt,
            boss_hp: self.boss.current_hp,
            outcome: self.outcome,
            turn,
        })
    }

    /// Swaps a player's active and benched Pokémon. Free, and does not end the turn.
    pub fn process_player_retreat(
        &mut self,
        id: &ParticipantId,
    ) -> Result<RetreatOutcome, RaidError> {
        self.ensure_running()?;
        self.active_player(id)?;

        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| RaidError::PlayerNotFound { player: id.clone() })?;
        player.pokemon.swap();
        player.last_action = Some(LastAction::Retreat);

        let outcome = RetreatOutcome {
            player: id.clone(),
            active: player.pokemon.active.name.clone(),
            bench: player.pokemon.bench.name.clone(),
        };

        tracing::debug!(player = %id, active = %outcome.active, "player retreated");

        self.record(RaidEvent::PlayerRetreat {
            player: id.clone(),
            active: outcome.active.clone(),
        });
        self.record_lineup(id);

        Ok(outcome)
    }

    /// Plays a cheer card. Card 3 (full heal) needs a target Pokémon.
    pub fn process_cheer_card(
        &mut self,
        id: &ParticipantId,
        card: u8,
        target: Option<CheerTarget>,
    ) -> Result<CheerOutcome, RaidError> {
        self.ensure_running()?;

        let player = self
            .players
            .get(id)
            .ok_or_else(|| RaidError::PlayerNotFound { player: id.clone() })?;
        // KO'd players still cheer from the sidelines; leavers do not
        if player.status == PlayerStatus::Eliminated {
            return Err(RaidError::PlayerNotActive { player: id.clone() });
        }
        if !player.can_use_cheer {
            return Err(RaidError::CheerNotAllowed);
        }

        let effect = self.cheer.check(card)?;
        if effect.requires_target() {
            let target = target.as_ref().ok_or(RaidError::CheerTargetRequired)?;
            let valid = self
                .players
                .get(&target.player)
                .is_some_and(|p| p.is_active() && !p.pokemon.get(target.slot).is_ko());
            if !valid {
                return Err(RaidError::InvalidCheerTarget);
            }
        }

        self.cheer.take(card)?;

        let mut healed = Vec::new();
        match effect {
            CheerEffect::DoubleDamage => self.buffs.double_damage = true,
            CheerEffect::DamageBuff => self.buffs.damage_bonus = cheer::DAMAGE_BUFF_AMOUNT,
            CheerEffect::LimitBossAttacks => self.buffs.boss_attack_limit = Some(1),
            CheerEffect::TeamHeal => {
                for player in self.players.iter_mut().filter(|p| p.is_active()) {
                    for pokemon in player.pokemon.iter_mut() {
                        let amount = pokemon.heal(cheer::TEAM_HEAL_AMOUNT);
                        if amount > 0 {
                            healed.push(HealRecord {
                                player: player.id.clone(),
                                pokemon: pokemon.name.clone(),
                                amount,
                            });
                        }
                    }
                }
            }
            CheerEffect::FullHeal => {
                if let Some(target) = &target {
                    if let Some(player) = self.players.get_mut(&target.player) {
                        let pokemon = player.pokemon.get_mut(target.slot);
                        let amount = pokemon.restore();
                        healed.push(HealRecord {
                            player: player.id.clone(),
                            pokemon: pokemon.name.clone(),
                            amount,
                        });
                    }
                }
            }
        }

        if let Some(player) = self.players.get_mut(id) {
            player.can_use_cheer = false;
            player.last_action = Some(LastAction::Cheer { card });
        }

        tracing::info!(
            player = %id,
            card,
            effect = %effect,
            used = self.cheer.used(),
            "cheer card played"
        );

        self.record(RaidEvent::CheerCardUsed {
            player: id.clone(),
            card,
            effect,
        });

        let mut touched: Vec<ParticipantId> = healed.iter().map(|h| h.player.clone()).collect();
        touched.dedup();
        for player in &touched {
            self.record_lineup(player);
        }

        Ok(CheerOutcome {
            player: id.clone(),
            card,
            effect,
            healed,
            cheer_cards_used: self.cheer.used(),
        })
    }

    /// Runs the boss's turn, then evaluates eliminations, loss and win.
    pub fn process_boss_turn(&mut self) -> Result<BossTurnOutcome, RaidError> {
        self.ensure_running()?;
        if self.turns.phase() != TurnPhase::BossTurn {
            return Err(RaidError::NotBossTurn);
        }

        let attack_limit = self.buffs.take_boss_attack_limit();
        let report = self.boss_ai.generate_boss_actions(BossTurnContext {
            boss: &mut self.boss,
            players: &mut self.players,
            deck: &mut self.deck,
            attack_limit,
            round: self.turns.round(),
            rng: &mut self.rng,
        });

        for result in &report.attacks {
            self.record(RaidEvent::AiDecision {
                decision: result.decision.clone(),
            });
            self.record(RaidEvent::BossAttack {
                target: result.target.clone(),
                pokemon: result.pokemon.clone(),
                attack: result.attack_name.clone(),
                damage: result.damage_dealt,
                remaining_hp: result.remaining_hp,
            });
            if result.knocked_out {
                self.total_ko_count += 1;
                self.record(RaidEvent::PokemonKnockedOut {
                    player: result.target.clone(),
                    pokemon: result.pokemon.clone(),
                    total_ko_count: self.total_ko_count,
                });
            }
        }
        self.record(RaidEvent::DeckStatus {
            remaining: self.deck.len(),
            discarded: self.deck.discard_len(),
            reshuffles: self.deck.reshuffles(),
        });

        tracing::info!(
            attacks = report.attacks.len(),
            knockouts = report.knockouts,
            total_ko_count = self.total_ko_count,
            "boss turn complete"
        );

        let eliminated = self.check_player_eliminations();

        let loss = self.check_loss_condition();
        let turn = if let Some(reason) = loss.reason {
            self.finish(RaidOutcome::Defeat { reason });
            None
        } else if self.check_win_condition() {
            self.finish(RaidOutcome::Victory);
            None
        } else {
            let transition = self.turns.advance_turn();
            self.record_turn_change();
            Some(transition)
        };

        Ok(BossTurnOutcome {
            report,
            eliminated,
            total_ko_count: self.total_ko_count,
            outcome: self.outcome,
            turn,
        })
    }

    /// Converts every active player with both Pokémon knocked out into an
    /// ex-player spectator. Returns the converted players.
    pub fn check_player_eliminations(&mut self) -> Vec<ParticipantId> {
        let eliminated: Vec<ParticipantId> = self
            .players
            .iter()
            .filter(|p| p.is_active() && p.pokemon.all_ko())
            .map(|p| p.id.clone())
            .collect();

        for id in &eliminated {
            let Some(player) = self.players.get_mut(id) else {
                continue;
            };
            player.status = PlayerStatus::Spectator;

            self.turns.remove_from_turn_order(id);
            if let Some(player) = self.players.get(id) {
                self.spectators
                    .convert_player_to_spectator(player, self.clock);
            }

            tracing::info!(player = %id, "player eliminated, now spectating");
            self.record(RaidEvent::PlayerEliminated { player: id.clone() });
        }

        eliminated
    }

    /// Removes a departing player from play and re-evaluates the loss condition.
    pub fn process_player_leave(&mut self, id: &ParticipantId) -> Result<LeaveOutcome, RaidError> {
        self.ensure_running()?;

        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| RaidError::PlayerNotFound { player: id.clone() })?;
        if player.status == PlayerStatus::Eliminated {
            return Err(RaidError::PlayerNotActive { player: id.clone() });
        }
        player.status = PlayerStatus::Eliminated;
        player.can_use_cheer = false;

        self.turns.remove_from_turn_order(id);
        if let Ok(record) = self.spectators.remove_spectator(id, self.clock) {
            tracing::debug!(player = %id, was_player = record.was_player, "dropped spectator seat");
        }

        tracing::info!(player = %id, "player left raid");
        self.record(RaidEvent::PlayerLeft { player: id.clone() });

        let loss = self.check_loss_condition();
        if self.outcome.is_none() {
            if let Some(reason) = loss.reason {
                self.finish(RaidOutcome::Defeat { reason });
            } else {
                self.record_turn_change();
            }
        }

        Ok(LeaveOutcome {
            player: id.clone(),
            loss,
        })
    }

    pub fn check_loss_condition(&self) -> LossCheck {
        if self.total_ko_count >= self.config.ko_limit {
            LossCheck::lost(LossReason::KoLimit)
        } else if self.players.active_count() == 0 {
            LossCheck::lost(LossReason::NoActivePlayers)
        } else {
            LossCheck::default()
        }
    }

    pub fn check_win_condition(&self) -> bool {
        self.boss.is_defeated()
    }

    // ===== spectators =====

    pub fn add_spectator(
        &mut self,
        id: ParticipantId,
        username: impl Into<String>,
    ) -> Result<SpectatorRecord, RaidError> {
        let was_player = self.players.contains(&id);
        if self.players.get(&id).is_some_and(Player::is_active) {
            return Err(RaidError::StillPlaying);
        }
        self.spectators
            .add_spectator(id, username, was_player, self.clock)
            .cloned()
    }

    pub fn remove_spectator(&mut self, id: &ParticipantId) -> Result<SpectatorRecord, RaidError> {
        self.spectators.remove_spectator(id, self.clock)
    }

    pub fn process_spectator_chat(
        &mut self,
        id: &ParticipantId,
        message: &str,
    ) -> Result<u64, RaidError> {
        self.spectators
            .process_spectator_chat(id, message, self.clock)
    }

    /// Posts a suggestion for an active player.
    pub fn process_spectator_suggestion(
        &mut self,
        id: &ParticipantId,
        target_player: &ParticipantId,
        suggestion: &str,
    ) -> Result<u64, RaidError> {
        self.active_player(target_player)?;
        self.spectators
            .process_spectator_suggestion(id, target_player, suggestion, self.clock)
    }

    pub fn prune_spectators(&mut self, now: Timestamp) -> Vec<ParticipantId> {
        self.set_clock(now);
        self.spectators.prune_inactive(self.clock)
    }

    pub fn replay_for(&self, id: &ParticipantId) -> Result<Vec<LoggedEvent>, RaidError> {
        self.spectators.replay_for(id)
    }

    // ===== projections =====

    pub fn game_state(&self) -> RaidSnapshot {
        RaidSnapshot {
            phase: self.game_phase(),
            outcome: self.outcome,
            clock: self.clock,
            boss: self.boss.clone(),
            players: self.players.as_slice().to_vec(),
            turn: self.turns.current_turn_info(),
            turn_order: self.turns.order().to_vec(),
            deck: DeckStatus {
                remaining: self.deck.len(),
                discarded: self.deck.discard_len(),
                reshuffles: self.deck.reshuffles(),
            },
            cheer: CheerStatus {
                used: self.cheer.used(),
                max_uses: self.cheer.max_uses(),
                remaining: self.cheer.remaining().collect(),
            },
            buffs: self.buffs,
            total_ko_count: self.total_ko_count,
            ko_limit: self.config.ko_limit,
            spectators: self.spectators.iter().cloned().collect(),
            ai: *self.boss_ai.config(),
            decision_log: self.boss_ai.decision_log().cloned().collect(),
            threat: self
                .boss_ai
                .threat()
                .scores()
                .iter()
                .map(|(id, score)| (id.to_string(), *score))
                .collect(),
        }
    }

    pub fn generate_turn_indicator(&self) -> TurnIndicator {
        self.turns
            .generate_turn_indicator(&self.boss, self.buffs.boss_attack_limit)
    }

    /// Takes all pending spectator deliveries in FIFO order.
    pub fn drain_event_queue(&mut self) -> Vec<SpectatorDelivery> {
        self.spectators.drain_queue()
    }

    // ===== internals =====

    fn active_player(&self, id: &ParticipantId) -> Result<&Player, RaidError> {
        let player = self
            .players
            .get(id)
            .ok_or_else(|| RaidError::PlayerNotFound { player: id.clone() })?;
        if !player.is_active() {
            return Err(RaidError::PlayerNotActive { player: id.clone() });
        }
        Ok(player)
    }

    fn record(&mut self, event: RaidEvent) {
        self.spectators.record_event(event, self.clock);
    }

    fn record_turn_change(&mut self) {
        let info = self.turns.current_turn_info();
        let current_player = match info.phase {
            TurnPhase::PlayerTurns => info.current_player,
            TurnPhase::BossTurn | TurnPhase::EndPhase => None,
        };
        self.record(RaidEvent::TurnChange {
            phase: info.phase,
            round: info.round,
            current_player,
        });
    }

    fn record_lineup(&mut self, id: &ParticipantId) {
        let Some(player) = self.players.get(id) else {
            return;
        };
        let event = RaidEvent::PlayerHand {
            player: id.clone(),
            active: player.pokemon.active.name.clone(),
            active_hp: player.pokemon.active.hp,
            bench: player.pokemon.bench.name.clone(),
            bench_hp: player.pokemon.bench.hp,
        };
        self.record(event);
    }

    fn finish(&mut self, outcome: RaidOutcome) {
        self.outcome = Some(outcome);
        tracing::info!(
            outcome = ?outcome,
            boss_hp = self.boss.current_hp,
            total_ko_count = self.total_ko_count,
            round = self.turns.round(),
            "raid ended"
        );
        self.record(RaidEvent::RaidEnded { outcome });
    }
}
