//! Topic-based event bus.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use raid_core::{EventKind, LoggedEvent, RaidOutcome};

use crate::repository::RaidId;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Combat, cheers, eliminations and raid lifecycle
    Raid,
    /// Turn changes, boss decisions and deck status
    Turn,
    /// Spectator roster and chat
    Spectator,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Raid, Topic::Turn, Topic::Spectator];

    pub fn of(kind: EventKind) -> Self {
        match kind {
            EventKind::TurnChange | EventKind::AiDecision | EventKind::DeckStatus => Topic::Turn,
            EventKind::SpectatorJoined
            | EventKind::SpectatorLeft
            | EventKind::SpectatorChat
            | EventKind::SpectatorSuggestion => Topic::Spectator,
            _ => Topic::Raid,
        }
    }
}

/// Event wrapper published on the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    RaidCreated { raid: RaidId, players: usize },
    /// An entry appended to a raid's event log.
    Logged { raid: RaidId, entry: LoggedEvent },
    RaidClosed {
        raid: RaidId,
        outcome: Option<RaidOutcome>,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::RaidCreated { .. } | Event::RaidClosed { .. } => Topic::Raid,
            Event::Logged { entry, .. } => Topic::of(entry.kind()),
        }
    }

    pub fn raid(&self) -> RaidId {
        match self {
            Event::RaidCreated { raid, .. }
            | Event::Logged { raid, .. }
            | Event::RaidClosed { raid, .. } => *raid,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing is
/// best-effort: with no subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    raid: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    spectator: broadcast::Sender<Event>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            raid: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            spectator: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Raid => &self.raid,
            Topic::Turn => &self.turn,
            Topic::Spectator => &self.spectator,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!(?topic, "no subscribers for topic");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raid_core::{RaidEvent, Timestamp};

    fn logged(event: RaidEvent) -> Event {
        Event::Logged {
            raid: RaidId(1),
            entry: LoggedEvent {
                index: 0,
                sequence: 0,
                timestamp: Timestamp::ZERO,
                event,
            },
        }
    }

    #[test]
    fn kinds_route_to_topics() {
        assert_eq!(Topic::of(EventKind::TurnChange), Topic::Turn);
        assert_eq!(Topic::of(EventKind::SpectatorChat), Topic::Spectator);
        assert_eq!(Topic::of(EventKind::BossAttack), Topic::Raid);
        assert_eq!(Topic::of(EventKind::RaidEnded), Topic::Raid);
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut turn = bus.subscribe(Topic::Turn);
        let mut spectator = bus.subscribe(Topic::Spectator);

        bus.publish(logged(RaidEvent::SpectatorLeft {
            spectator: "watcher".into(),
        }));

        let received = spectator.recv().await.expect("spectator event");
        assert_eq!(received.topic(), Topic::Spectator);
        assert!(turn.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::RaidCreated {
            raid: RaidId(3),
            players: 2,
        });
    }
}
