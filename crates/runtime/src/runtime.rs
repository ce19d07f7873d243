//! Raid service façade and its configuration.
//!
//! [`RaidService`] is what a transport layer embeds: it owns the raid
//! repository and the event bus, routes decoded [`RaidCommand`]s to the right
//! raid, and republishes each raid's log entries on the bus.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use raid_core::{
    BehaviorPattern, BossCard, Difficulty, GameError, ParticipantId, PlayerAttack, PlayerSetup,
    RaidConfig, RaidGameState, RaidOutcome, RaidSnapshot, SpectatorDelivery, TargetingStrategy,
    Timestamp, TurnIndicator,
};

use crate::api::{CommandReply, RaidCommand, RaidResponse, Result};
use crate::events::{Event, EventBus, Topic};
use crate::repository::{InMemoryRaidRepository, RaidId, RaidRepository, RepositoryError};

/// Source of the current time handed to raids.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// Runtime configuration shared by every raid the service hosts.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Rules applied to newly created raids.
    pub raid: RaidConfig,
    pub max_raids: usize,
    /// Per-topic capacity of the event bus.
    pub event_buffer_size: usize,
    /// Base seed for raid RNGs. Raids draw from OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            raid: RaidConfig::default(),
            max_raids: InMemoryRaidRepository::DEFAULT_MAX_RAIDS,
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `RAID_*` environment variables.
    ///
    /// Invalid values are logged and ignored. Loading a `.env` file is left to
    /// the binary.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(max_raids) = read_env::<usize>("RAID_MAX_RAIDS") {
            config.max_raids = max_raids;
        }
        if let Some(buffer) = read_env::<usize>("RAID_EVENT_BUFFER") {
            config.event_buffer_size = buffer;
        }
        if let Some(capacity) = read_env::<usize>("RAID_DELIVERY_QUEUE") {
            config.raid.delivery_queue_capacity = capacity;
        }
        if let Some(difficulty) = read_env::<Difficulty>("RAID_DIFFICULTY") {
            config.raid.ai.difficulty = difficulty;
        }
        if let Some(targeting) = read_env::<TargetingStrategy>("RAID_TARGETING") {
            config.raid.ai.targeting = targeting;
        }
        if let Some(behavior) = read_env::<BehaviorPattern>("RAID_BEHAVIOR") {
            config.raid.ai.behavior = behavior;
        }
        config.seed = read_env::<u64>("RAID_SEED").or(config.seed);
        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, value = %raw, %err, "ignoring invalid environment value");
            None
        }
    }
}

fn system_clock() -> Timestamp {
    Timestamp(u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0))
}

/// Hosts raids and routes commands to them.
pub struct RaidService<R: RaidRepository = InMemoryRaidRepository> {
    config: RuntimeConfig,
    repository: Arc<R>,
    bus: EventBus,
    clock: Clock,
    raids_created: Arc<AtomicU64>,
}

impl<R: RaidRepository> Clone for RaidService<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            repository: Arc::clone(&self.repository),
            bus: self.bus.clone(),
            clock: Arc::clone(&self.clock),
            raids_created: Arc::clone(&self.raids_created),
        }
    }
}

impl RaidService {
    /// Create a new service builder
    pub fn builder() -> RaidServiceBuilder {
        RaidServiceBuilder::new()
    }
}

impl<R: RaidRepository> RaidService<R> {
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to one event topic across all raids.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Seat the players against `boss` with the configured rules.
    pub fn create_raid(&self, boss: BossCard, players: Vec<PlayerSetup>) -> Result<RaidId> {
        self.create_raid_with(self.config.raid.clone(), boss, players)
    }

    /// Like [`create_raid`](Self::create_raid) with per-raid rules.
    pub fn create_raid_with(
        &self,
        config: RaidConfig,
        boss: BossCard,
        players: Vec<PlayerSetup>,
    ) -> Result<RaidId> {
        let ordinal = self.raids_created.fetch_add(1, Ordering::Relaxed);
        let seed = match self.config.seed {
            Some(base) => base.wrapping_add(ordinal),
            None => rand::random(),
        };
        let player_count = players.len();

        let mut raid = RaidGameState::with_seed(config, boss, players, seed)?;
        raid.set_clock((self.clock)());
        let id = self.repository.create(raid)?;

        tracing::info!(raid = %id, players = player_count, seed, "raid hosted");
        self.bus.publish(Event::RaidCreated {
            raid: id,
            players: player_count,
        });
        Ok(id)
    }

    /// Apply one command to a raid.
    pub fn dispatch(&self, id: RaidId, command: RaidCommand) -> Result<CommandReply> {
        command.validate()?;
        let name = command.name();
        let actor = command.actor().cloned();

        let result = self.with_raid(id, |raid| {
            let was_over = raid.is_over();
            let reply = apply(raid, command)?;
            if !was_over {
                if let Some(outcome) = raid.outcome() {
                    tracing::info!(raid = %id, ?outcome, "raid finished");
                }
            }
            Ok(reply)
        });

        match &result {
            Ok(_) => tracing::debug!(raid = %id, command = name, actor = ?actor, "command applied"),
            Err(err) => tracing::debug!(
                raid = %id,
                command = name,
                actor = ?actor,
                code = err.error_code(),
                %err,
                "command rejected"
            ),
        }
        result
    }

    /// Decode a JSON command, apply it and wrap the result.
    pub fn handle_json(&self, id: RaidId, payload: &str) -> RaidResponse {
        RaidResponse::from_result(
            RaidCommand::parse(payload).and_then(|command| self.dispatch(id, command)),
        )
    }

    pub fn snapshot(&self, id: RaidId) -> Result<RaidSnapshot> {
        self.with_raid(id, |raid| Ok(raid.game_state()))
    }

    pub fn turn_indicator(&self, id: RaidId) -> Result<TurnIndicator> {
        self.with_raid(id, |raid| Ok(raid.generate_turn_indicator()))
    }

    /// Take the raid's pending spectator deliveries in FIFO order.
    ///
    /// The service never drains on its own; the spectator transport calls
    /// this. Each raid's queue is capped by `delivery_queue_capacity` and
    /// drops its oldest entries when nobody drains it.
    pub fn drain_spectator_events(&self, id: RaidId) -> Result<Vec<SpectatorDelivery>> {
        self.with_raid(id, |raid| Ok(raid.drain_event_queue()))
    }

    /// Drop idle observers from a raid.
    pub fn prune_spectators(&self, id: RaidId) -> Result<Vec<ParticipantId>> {
        let now = (self.clock)();
        self.with_raid(id, |raid| Ok(raid.prune_spectators(now)))
    }

    /// Remove a raid and report how it ended, if it did.
    pub fn close_raid(&self, id: RaidId) -> Result<Option<RaidOutcome>> {
        let shared = self
            .repository
            .remove(id)?
            .ok_or(RepositoryError::RaidNotFound(id))?;
        let outcome = shared
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .outcome();

        tracing::info!(raid = %id, ?outcome, "raid closed");
        self.bus.publish(Event::RaidClosed { raid: id, outcome });
        Ok(outcome)
    }

    pub fn raids(&self) -> Result<Vec<RaidId>> {
        Ok(self.repository.list()?)
    }

    /// Lock a raid, advance its clock, run `f` and publish what it logged.
    fn with_raid<T>(
        &self,
        id: RaidId,
        f: impl FnOnce(&mut RaidGameState) -> Result<T>,
    ) -> Result<T> {
        let shared = self.repository.get(id)?;
        let mut raid = shared.lock().map_err(|_| RepositoryError::LockPoisoned)?;
        raid.set_clock((self.clock)());

        let since = raid.spectators().log().next_sequence();
        let result = f(&mut *raid);
        for entry in raid
            .spectators()
            .log()
            .iter()
            .filter(|entry| entry.sequence >= since)
        {
            self.bus.publish(Event::Logged {
                raid: id,
                entry: entry.clone(),
            });
        }
        result
    }
}

fn apply(raid: &mut RaidGameState, command: RaidCommand) -> Result<CommandReply> {
    let reply = match command {
        RaidCommand::Attack {
            player,
            pokemon,
            attack,
        } => CommandReply::Attack(
            raid.process_player_attack(&player, PlayerAttack::new(pokemon, attack))?,
        ),
        RaidCommand::Retreat { player } => {
            CommandReply::Retreat(raid.process_player_retreat(&player)?)
        }
        RaidCommand::Cheer {
            player,
            card,
            target,
        } => CommandReply::Cheer(raid.process_cheer_card(&player, card, target)?),
        RaidCommand::BossTurn => CommandReply::BossTurn(raid.process_boss_turn()?),
        RaidCommand::Leave { player } => CommandReply::Leave(raid.process_player_leave(&player)?),
        RaidCommand::SpectatorJoin {
            spectator,
            username,
        } => CommandReply::SpectatorJoined(raid.add_spectator(spectator, username)?),
        RaidCommand::SpectatorLeave { spectator } => {
            CommandReply::SpectatorLeft(raid.remove_spectator(&spectator)?)
        }
        RaidCommand::SpectatorChat { spectator, message } => {
            CommandReply::Posted(raid.process_spectator_chat(&spectator, &message)?)
        }
        RaidCommand::SpectatorSuggestion {
            spectator,
            target_player,
            suggestion,
        } => CommandReply::Posted(raid.process_spectator_suggestion(
            &spectator,
            &target_player,
            &suggestion,
        )?),
        RaidCommand::SpectatorReplay { spectator } => {
            CommandReply::Replay(raid.replay_for(&spectator)?)
        }
    };
    Ok(reply)
}

/// Builder for [`RaidService`].
pub struct RaidServiceBuilder {
    config: RuntimeConfig,
    clock: Option<Clock>,
}

impl RaidServiceBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Replace the wall clock, e.g. with a manual clock in tests.
    pub fn clock(mut self, clock: impl Fn() -> Timestamp + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Build with an [`InMemoryRaidRepository`] sized from the config.
    pub fn build(self) -> RaidService {
        let repository = InMemoryRaidRepository::with_capacity(self.config.max_raids);
        self.build_with_repository(repository)
    }

    pub fn build_with_repository<R: RaidRepository>(self, repository: R) -> RaidService<R> {
        let bus = EventBus::with_capacity(self.config.event_buffer_size);
        let clock: Clock = match self.clock {
            Some(clock) => clock,
            None => Arc::new(system_clock),
        };

        tracing::debug!(
            max_raids = self.config.max_raids,
            event_buffer = self.config.event_buffer_size,
            seeded = self.config.seed.is_some(),
            "raid service built"
        );

        RaidService {
            config: self.config,
            repository: Arc::new(repository),
            bus,
            clock,
            raids_created: Arc::new(AtomicU64::new(0)),
        }
    }
}
