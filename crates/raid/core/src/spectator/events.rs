//! Raid events and the bounded, replayable event log.

use std::collections::VecDeque;

use crate::ai::AiDecision;
use crate::raid::RaidOutcome;
use crate::state::{CheerEffect, ParticipantId, Timestamp};
use crate::turn::TurnPhase;

/// Something that happened in a raid, as shown to spectators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        tag = "type",
        rename_all = "camelCase",
        rename_all_fields = "camelCase"
    )
)]
pub enum RaidEvent {
    PlayerAttack {
        player: ParticipantId,
        pokemon: String,
        attack: String,
        damage: u32,
        boss_hp: u32,
    },
    BossAttack {
        target: ParticipantId,
        pokemon: String,
        attack: String,
        damage: u32,
        remaining_hp: u32,
    },
    PokemonKnockedOut {
        player: ParticipantId,
        pokemon: String,
        total_ko_count: u32,
    },
    TurnChange {
        phase: TurnPhase,
        round: u32,
        current_player: Option<ParticipantId>,
    },
    /// Full boss reasoning, including the drawn card.
    AiDecision { decision: AiDecision },
    CheerCardUsed {
        player: ParticipantId,
        card: u8,
        effect: CheerEffect,
    },
    PlayerRetreat {
        player: ParticipantId,
        active: String,
    },
    /// A player's lineup with exact HP.
    PlayerHand {
        player: ParticipantId,
        active: String,
        active_hp: u32,
        bench: String,
        bench_hp: u32,
    },
    PlayerEliminated { player: ParticipantId },
    PlayerLeft { player: ParticipantId },
    SpectatorJoined {
        spectator: ParticipantId,
        username: String,
        was_player: bool,
    },
    SpectatorLeft { spectator: ParticipantId },
    SpectatorChat {
        spectator: ParticipantId,
        username: String,
        message: String,
    },
    SpectatorSuggestion {
        spectator: ParticipantId,
        target_player: ParticipantId,
        suggestion: String,
    },
    /// Attack deck pile sizes.
    DeckStatus {
        remaining: usize,
        discarded: usize,
        reshuffles: u32,
    },
    RaidEnded { outcome: RaidOutcome },
}

/// Fieldless tag of a [`RaidEvent`], used for permission filtering.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    PlayerAttack,
    BossAttack,
    PokemonKnockedOut,
    TurnChange,
    AiDecision,
    CheerCardUsed,
    PlayerRetreat,
    PlayerHand,
    PlayerEliminated,
    PlayerLeft,
    SpectatorJoined,
    SpectatorLeft,
    SpectatorChat,
    SpectatorSuggestion,
    DeckStatus,
    RaidEnded,
}

impl RaidEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PlayerAttack { .. } => EventKind::PlayerAttack,
            Self::BossAttack { .. } => EventKind::BossAttack,
            Self::PokemonKnockedOut { .. } => EventKind::PokemonKnockedOut,
            Self::TurnChange { .. } => EventKind::TurnChange,
            Self::AiDecision { .. } => EventKind::AiDecision,
            Self::CheerCardUsed { .. } => EventKind::CheerCardUsed,
            Self::PlayerRetreat { .. } => EventKind::PlayerRetreat,
            Self::PlayerHand { .. } => EventKind::PlayerHand,
            Self::PlayerEliminated { .. } => EventKind::PlayerEliminated,
            Self::PlayerLeft { .. } => EventKind::PlayerLeft,
            Self::SpectatorJoined { .. } => EventKind::SpectatorJoined,
            Self::SpectatorLeft { .. } => EventKind::SpectatorLeft,
            Self::SpectatorChat { .. } => EventKind::SpectatorChat,
            Self::SpectatorSuggestion { .. } => EventKind::SpectatorSuggestion,
            Self::DeckStatus { .. } => EventKind::DeckStatus,
            Self::RaidEnded { .. } => EventKind::RaidEnded,
        }
    }
}

/// An event as stored in the log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoggedEvent {
    /// Position in the log; renumbered when older entries drop off.
    pub index: usize,
    /// Monotonic across the raid, never reused.
    pub sequence: u64,
    pub timestamp: Timestamp,
    pub event: RaidEvent,
}

impl LoggedEvent {
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

/// Ring buffer of the most recent events.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
    next_sequence: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Appends an event, dropping the oldest once full. Returns the stored entry.
    pub fn push(&mut self, event: RaidEvent, timestamp: Timestamp) -> LoggedEvent {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        if self.capacity > 0 && self.entries.len() >= self.capacity {
            while self.entries.len() >= self.capacity {
                self.entries.pop_front();
            }
            for (index, logged) in self.entries.iter_mut().enumerate() {
                logged.index = index;
            }
        }

        let entry = LoggedEvent {
            index: self.entries.len(),
            sequence,
            timestamp,
            event,
        };

        if self.capacity > 0 {
            self.entries.push_back(entry.clone());
        }
        entry
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sequence number the next event will get.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left(id: &str) -> RaidEvent {
        RaidEvent::PlayerLeft {
            player: ParticipantId::from(id),
        }
    }

    #[test]
    fn drops_oldest_and_renumbers() {
        let mut log = EventLog::new(3);
        for n in 0..5u64 {
            log.push(left(&n.to_string()), Timestamp(n));
        }

        assert_eq!(log.len(), 3);
        let indices: Vec<usize> = log.iter().map(|e| e.index).collect();
        let sequences: Vec<u64> = log.iter().map(|e| e.sequence).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(sequences, vec![2, 3, 4]);
        assert_eq!(log.next_sequence(), 5);
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(left("a").kind(), EventKind::PlayerLeft);
        assert_eq!(EventKind::AiDecision.to_string(), "ai_decision");
    }
}
