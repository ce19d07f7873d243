use std::collections::VecDeque;

use bitflags::bitflags;

use super::events::{EventKind, EventLog, LoggedEvent, RaidEvent};
use crate::config::RaidConfig;
use crate::error::RaidError;
use crate::state::{ParticipantId, Player, Timestamp};

bitflags! {
    /// What a spectator may see and do.
    ///
    /// Ex-players get [`Self::all`]; observers who never played start with
    /// [`Self::CHAT`] only.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpectatorPermissions: u8 {
        const CHAT              = 1 << 0;
        /// Boss AI reasoning and deck internals.
        const VIEW_HIDDEN_INFO  = 1 << 1;
        /// Exact lineups and HP of every player.
        const VIEW_PLAYER_HANDS = 1 << 2;
        const SUGGEST_ACTIONS   = 1 << 3;
        /// Deliveries are flagged for expedited sending.
        const PRIORITY_UPDATES  = 1 << 4;
    }
}

impl SpectatorPermissions {
    pub fn for_participant(was_player: bool) -> Self {
        if was_player { Self::all() } else { Self::CHAT }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectatorRecord {
    pub id: ParticipantId,
    pub username: String,
    pub joined_at: Timestamp,
    pub last_active_at: Timestamp,
    pub was_player: bool,
    pub permissions: SpectatorPermissions,
    /// Sequence of the last event queued for this spectator.
    pub last_event_index: Option<u64>,
}

impl SpectatorRecord {
    fn new(id: ParticipantId, username: String, was_player: bool, now: Timestamp) -> Self {
        Self {
            id,
            username,
            joined_at: now,
            last_active_at: now,
            was_player,
            permissions: SpectatorPermissions::for_participant(was_player),
            last_event_index: None,
        }
    }
}

/// One queued event for one spectator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectatorDelivery {
    pub spectator: ParticipantId,
    pub event: LoggedEvent,
    pub priority: bool,
}

/// Spectator roster, event log and outbound delivery queue.
///
/// The queue is bounded. Whoever owns the transport drains it with
/// [`Self::drain_queue`]; once full, the oldest delivery is dropped and the
/// spectator can catch up through [`Self::replay_for`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectatorManager {
    /// Join order.
    spectators: Vec<SpectatorRecord>,
    log: EventLog,
    queue: VecDeque<SpectatorDelivery>,
    queue_capacity: usize,
    max_spectators: usize,
    idle_timeout_ms: u64,
    max_chat_length: usize,
}

impl SpectatorManager {
    pub fn new(config: &RaidConfig) -> Self {
        Self {
            spectators: Vec::new(),
            log: EventLog::new(config.event_log_capacity),
            queue: VecDeque::new(),
            queue_capacity: config.delivery_queue_capacity,
            max_spectators: config.max_spectators,
            idle_timeout_ms: config.spectator_idle_timeout_ms,
            max_chat_length: config.max_chat_length,
        }
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&SpectatorRecord> {
        self.spectators.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpectatorRecord> {
        self.spectators.iter()
    }

    pub fn len(&self) -> usize {
        self.spectators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectators.is_empty()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Admits an observer, or an ex-player when `was_player` is set.
    pub fn add_spectator(
        &mut self,
        id: ParticipantId,
        username: impl Into<String>,
        was_player: bool,
        now: Timestamp,
    ) -> Result<&SpectatorRecord, RaidError> {
        if self.contains(&id) {
            return Err(RaidError::AlreadySpectating);
        }
        if self.spectators.len() >= self.max_spectators {
            return Err(RaidError::SpectatorLimitReached {
                max: self.max_spectators,
            });
        }

        Ok(self.insert(SpectatorRecord::new(id, username.into(), was_player, now), now))
    }

    /// Seats an eliminated player as an ex-player spectator.
    ///
    /// Ex-players are always admitted, even past the spectator cap. A player
    /// already watching is upgraded in place.
    pub fn convert_player_to_spectator(&mut self, player: &Player, now: Timestamp) -> &SpectatorRecord {
        if let Some(position) = self.spectators.iter().position(|s| s.id == player.id) {
            let record = &mut self.spectators[position];
            record.was_player = true;
            record.permissions = SpectatorPermissions::all();
            record.last_active_at = now;
            return &self.spectators[position];
        }

        self.insert(
            SpectatorRecord::new(player.id.clone(), player.username.clone(), true, now),
            now,
        )
    }

    fn insert(&mut self, record: SpectatorRecord, now: Timestamp) -> &SpectatorRecord {
        tracing::info!(
            spectator = %record.id,
            was_player = record.was_player,
            permissions = ?record.permissions,
            "spectator joined"
        );

        let event = RaidEvent::SpectatorJoined {
            spectator: record.id.clone(),
            username: record.username.clone(),
            was_player: record.was_player,
        };
        self.spectators.push(record);
        self.record_event(event, now);

        let last = self.spectators.len() - 1;
        &self.spectators[last]
    }

    pub fn remove_spectator(
        &mut self,
        id: &ParticipantId,
        now: Timestamp,
    ) -> Result<SpectatorRecord, RaidError> {
        let position = self
            .spectators
            .iter()
            .position(|s| &s.id == id)
            .ok_or(RaidError::SpectatorNotFound)?;

        let record = self.spectators.remove(position);
        self.queue.retain(|delivery| &delivery.spectator != id);
        self.record_event(RaidEvent::SpectatorLeft { spectator: id.clone() }, now);

        tracing::info!(spectator = %id, "spectator left");
        Ok(record)
    }

    /// Drops observers idle longer than the timeout. Ex-players are never pruned.
    pub fn prune_inactive(&mut self, now: Timestamp) -> Vec<ParticipantId> {
        let timeout = self.idle_timeout_ms;
        let stale: Vec<ParticipantId> = self
            .spectators
            .iter()
            .filter(|s| !s.was_player && now.since(s.last_active_at) > timeout)
            .map(|s| s.id.clone())
            .collect();

        let pruned: Vec<ParticipantId> = stale
            .into_iter()
            .filter_map(|id| self.remove_spectator(&id, now).ok().map(|record| record.id))
            .collect();

        if !pruned.is_empty() {
            tracing::debug!(pruned = pruned.len(), "pruned idle spectators");
        }
        pruned
    }

    /// Returns whether a spectator with `permissions` may see events of `kind`.
    pub fn should_receive_event(permissions: SpectatorPermissions, kind: EventKind) -> bool {
        Self::required_permission(kind).is_none_or(|needed| permissions.contains(needed))
    }

    fn required_permission(kind: EventKind) -> Option<SpectatorPermissions> {
        match kind {
            EventKind::AiDecision | EventKind::DeckStatus => {
                Some(SpectatorPermissions::VIEW_HIDDEN_INFO)
            }
            EventKind::PlayerHand => Some(SpectatorPermissions::VIEW_PLAYER_HANDS),
            EventKind::SpectatorSuggestion => Some(SpectatorPermissions::SUGGEST_ACTIONS),
            EventKind::SpectatorChat => Some(SpectatorPermissions::CHAT),
            _ => None,
        }
    }

    /// Logs an event and queues it for every spectator allowed to see it.
    pub fn record_event(&mut self, event: RaidEvent, now: Timestamp) -> u64 {
        let logged = self.log.push(event, now);
        let kind = logged.kind();

        for spectator in &mut self.spectators {
            if !Self::should_receive_event(spectator.permissions, kind) {
                continue;
            }
            spectator.last_event_index = Some(logged.sequence);
            if self.queue.len() >= self.queue_capacity {
                if let Some(dropped) = self.queue.pop_front() {
                    tracing::warn!(
                        spectator = %dropped.spectator,
                        sequence = dropped.event.sequence,
                        "delivery queue full, dropping oldest"
                    );
                }
            }
            self.queue.push_back(SpectatorDelivery {
                spectator: spectator.id.clone(),
                event: logged.clone(),
                priority: spectator
                    .permissions
                    .contains(SpectatorPermissions::PRIORITY_UPDATES),
            });
        }

        logged.sequence
    }

    fn validate_text(&self, text: &str) -> Result<String, RaidError> {
        let trimmed = text.trim();
        let length = trimmed.chars().count();
        if length == 0 || length > self.max_chat_length {
            return Err(RaidError::InvalidMessage);
        }
        Ok(trimmed.to_owned())
    }

    fn authorize(
        &mut self,
        id: &ParticipantId,
        needed: SpectatorPermissions,
        now: Timestamp,
    ) -> Result<String, RaidError> {
        let record = self
            .spectators
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or(RaidError::SpectatorNotFound)?;
        if !record.permissions.contains(needed) {
            return Err(RaidError::PermissionDenied);
        }
        record.last_active_at = now;
        Ok(record.username.clone())
    }

    /// Posts a chat line. The message is trimmed and must be 1 to
    /// `max_chat_length` characters.
    pub fn process_spectator_chat(
        &mut self,
        id: &ParticipantId,
        message: &str,
        now: Timestamp,
    ) -> Result<u64, RaidError> {
        let message = self.validate_text(message)?;
        let username = self.authorize(id, SpectatorPermissions::CHAT, now)?;

        Ok(self.record_event(
            RaidEvent::SpectatorChat {
                spectator: id.clone(),
                username,
                message,
            },
            now,
        ))
    }

    /// Posts a suggestion aimed at a player. The caller checks that the target
    /// is an active player.
    pub fn process_spectator_suggestion(
        &mut self,
        id: &ParticipantId,
        target_player: &ParticipantId,
        suggestion: &str,
        now: Timestamp,
    ) -> Result<u64, RaidError> {
        let suggestion = self.validate_text(suggestion)?;
        self.authorize(id, SpectatorPermissions::SUGGEST_ACTIONS, now)?;

        Ok(self.record_event(
            RaidEvent::SpectatorSuggestion {
                spectator: id.clone(),
                target_player: target_player.clone(),
                suggestion,
            },
            now,
        ))
    }

    /// The retained log filtered by the spectator's permissions.
    pub fn replay_for(&self, id: &ParticipantId) -> Result<Vec<LoggedEvent>, RaidError> {
        let record = self.get(id).ok_or(RaidError::SpectatorNotFound)?;
        Ok(self
            .log
            .iter()
            .filter(|entry| Self::should_receive_event(record.permissions, entry.kind()))
            .cloned()
            .collect())
    }

    /// Takes every queued delivery in FIFO order.
    pub fn drain_queue(&mut self) -> Vec<SpectatorDelivery> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PlayerSetup, Pokemon, PokemonAttack};

    fn manager() -> SpectatorManager {
        SpectatorManager::new(&RaidConfig::default())
    }

    fn id(value: &str) -> ParticipantId {
        ParticipantId::from(value)
    }

    fn ex_player(value: &str) -> Player {
        Player::from_setup(PlayerSetup::new(
            value,
            value,
            Pokemon::new("A", 10, vec![PokemonAttack::new("Hit", 10)]),
            Pokemon::new("B", 10, vec![PokemonAttack::new("Hit", 10)]),
        ))
    }

    #[test]
    fn cap_and_duplicates() {
        let mut spectators = manager();
        for n in 0..RaidConfig::DEFAULT_MAX_SPECTATORS {
            assert!(
                spectators
                    .add_spectator(id(&format!("s{n}")), "watcher", false, Timestamp::ZERO)
                    .is_ok()
            );
        }

        assert_eq!(
            spectators
                .add_spectator(id("late"), "late", false, Timestamp::ZERO)
                .err(),
            Some(RaidError::SpectatorLimitReached { max: 10 })
        );
        assert_eq!(
            spectators
                .add_spectator(id("s0"), "again", false, Timestamp::ZERO)
                .err(),
            Some(RaidError::AlreadySpectating)
        );

        // ex-players always get a seat
        let record = spectators.convert_player_to_spectator(&ex_player("p1"), Timestamp(5));
        assert!(record.was_player);
        assert_eq!(record.permissions, SpectatorPermissions::all());
        assert_eq!(spectators.len(), 11);
    }

    #[test]
    fn observers_only_chat() {
        let mut spectators = manager();
        let record = spectators
            .add_spectator(id("o"), "observer", false, Timestamp::ZERO)
            .expect("admitted");
        assert_eq!(record.permissions, SpectatorPermissions::CHAT);

        assert!(
            spectators
                .process_spectator_chat(&id("o"), "  go team  ", Timestamp(1))
                .is_ok()
        );
        assert_eq!(
            spectators.process_spectator_suggestion(&id("o"), &id("p"), "retreat", Timestamp(1)),
            Err(RaidError::PermissionDenied)
        );
    }

    #[test]
    fn chat_length_is_validated() {
        let mut spectators = manager();
        spectators
            .add_spectator(id("o"), "observer", false, Timestamp::ZERO)
            .expect("admitted");

        assert_eq!(
            spectators.process_spectator_chat(&id("o"), "   ", Timestamp(1)),
            Err(RaidError::InvalidMessage)
        );
        let long = "x".repeat(201);
        assert_eq!(
            spectators.process_spectator_chat(&id("o"), &long, Timestamp(1)),
            Err(RaidError::InvalidMessage)
        );
        assert!(
            spectators
                .process_spectator_chat(&id("o"), &"x".repeat(200), Timestamp(1))
                .is_ok()
        );
        assert_eq!(
            spectators.process_spectator_chat(&id("ghost"), "hi", Timestamp(1)),
            Err(RaidError::SpectatorNotFound)
        );
    }

    #[test]
    fn hidden_events_reach_ex_players_only() {
        let mut spectators = manager();
        spectators
            .add_spectator(id("o"), "observer", false, Timestamp::ZERO)
            .expect("admitted");
        spectators.convert_player_to_spectator(&ex_player("p"), Timestamp::ZERO);
        spectators.drain_queue();

        spectators.record_event(
            RaidEvent::DeckStatus {
                remaining: 3,
                discarded: 17,
                reshuffles: 0,
            },
            Timestamp(2),
        );
        spectators.record_event(RaidEvent::PlayerLeft { player: id("x") }, Timestamp(3));

        let deliveries = spectators.drain_queue();
        let summary: Vec<(&str, EventKind, bool)> = deliveries
            .iter()
            .map(|d| (d.spectator.as_str(), d.event.kind(), d.priority))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("p", EventKind::DeckStatus, true),
                ("o", EventKind::PlayerLeft, false),
                ("p", EventKind::PlayerLeft, true),
            ]
        );
        assert_eq!(spectators.queued(), 0);

        let observer_replay = spectators.replay_for(&id("o")).expect("present");
        assert!(
            observer_replay
                .iter()
                .all(|e| e.kind() != EventKind::DeckStatus)
        );
    }

    #[test]
    fn prune_spares_ex_players() {
        let mut spectators = manager();
        spectators
            .add_spectator(id("idle"), "idle", false, Timestamp::ZERO)
            .expect("admitted");
        spectators
            .add_spectator(id("busy"), "busy", false, Timestamp::ZERO)
            .expect("admitted");
        spectators.convert_player_to_spectator(&ex_player("p"), Timestamp::ZERO);

        let timeout = RaidConfig::DEFAULT_SPECTATOR_IDLE_TIMEOUT_MS;
        spectators
            .process_spectator_chat(&id("busy"), "still here", Timestamp(timeout))
            .expect("chat allowed");

        let pruned = spectators.prune_inactive(Timestamp(timeout + 1));
        assert_eq!(pruned, vec![id("idle")]);
        assert!(spectators.contains(&id("busy")));
        assert!(spectators.contains(&id("p")));
    }

    #[test]
    fn remove_unknown_fails() {
        let mut spectators = manager();
        assert_eq!(
            spectators.remove_spectator(&id("nobody"), Timestamp::ZERO),
            Err(RaidError::SpectatorNotFound)
        );
    }

    #[test]
    fn delivery_queue_drops_oldest_when_full() {
        let config = RaidConfig {
            delivery_queue_capacity: 3,
            ..RaidConfig::default()
        };
        let mut spectators = SpectatorManager::new(&config);
        spectators
            .add_spectator(id("o"), "observer", false, Timestamp::ZERO)
            .expect("admitted");
        spectators.drain_queue();

        for n in 0..5 {
            spectators.record_event(
                RaidEvent::PlayerLeft {
                    player: id(&format!("p{n}")),
                },
                Timestamp(n),
            );
        }

        assert_eq!(spectators.queued(), 3);
        let players: Vec<RaidEvent> = spectators
            .drain_queue()
            .into_iter()
            .map(|d| d.event.event)
            .collect();
        assert_eq!(
            players,
            vec![
                RaidEvent::PlayerLeft { player: id("p2") },
                RaidEvent::PlayerLeft { player: id("p3") },
                RaidEvent::PlayerLeft { player: id("p4") },
            ]
        );
        // the log still holds everything for replay
        assert_eq!(spectators.replay_for(&id("o")).expect("present").len(), 6);
    }
}
