use crate::ai::AiConfig;
use crate::state::BossLevel;

/// Raid rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaidConfig {
    /// Players admitted at raid start.
    pub max_players: usize,
    /// Cheer cards that may be played across the whole raid.
    pub max_cheer_cards: u8,
    /// Total Pokémon knockouts that lose the raid.
    pub ko_limit: u32,
    pub max_spectators: usize,
    /// Entries kept in the replayable spectator event log.
    pub event_log_capacity: usize,
    /// Undrained spectator deliveries kept before the oldest are dropped.
    pub delivery_queue_capacity: usize,
    /// Entries kept in the boss AI decision log.
    pub decision_log_capacity: usize,
    /// Idle time after which an observer (never an ex-player) is dropped.
    pub spectator_idle_timeout_ms: u64,
    pub max_chat_length: usize,
    /// Pins the boss level instead of deriving it from player offense.
    pub boss_level: Option<BossLevel>,
    pub deck: DeckComposition,
    pub ai: AiConfig,
}

impl RaidConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_CONDITIONS: usize = 4;
    pub const CHEER_POOL_SIZE: u8 = 5;
    pub const TURN_STAGES: usize = 3;
    /// Target ordinals printed on attack deck cards (1..=4).
    pub const TARGET_ORDINALS: u8 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_PLAYERS: usize = 4;
    pub const DEFAULT_MAX_CHEER_CARDS: u8 = 3;
    pub const DEFAULT_KO_LIMIT: u32 = 4;
    pub const DEFAULT_MAX_SPECTATORS: usize = 10;
    pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 50;
    pub const DEFAULT_DELIVERY_QUEUE_CAPACITY: usize = 500;
    pub const DEFAULT_DECISION_LOG_CAPACITY: usize = 20;
    pub const DEFAULT_SPECTATOR_IDLE_TIMEOUT_MS: u64 = 5 * 60 * 1000;
    pub const DEFAULT_MAX_CHAT_LENGTH: usize = 200;

    pub fn new() -> Self {
        Self {
            max_players: Self::DEFAULT_MAX_PLAYERS,
            max_cheer_cards: Self::DEFAULT_MAX_CHEER_CARDS,
            ko_limit: Self::DEFAULT_KO_LIMIT,
            max_spectators: Self::DEFAULT_MAX_SPECTATORS,
            event_log_capacity: Self::DEFAULT_EVENT_LOG_CAPACITY,
            delivery_queue_capacity: Self::DEFAULT_DELIVERY_QUEUE_CAPACITY,
            decision_log_capacity: Self::DEFAULT_DECISION_LOG_CAPACITY,
            spectator_idle_timeout_ms: Self::DEFAULT_SPECTATOR_IDLE_TIMEOUT_MS,
            max_chat_length: Self::DEFAULT_MAX_CHAT_LENGTH,
            boss_level: None,
            deck: DeckComposition::default(),
            ai: AiConfig::default(),
        }
    }

    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_boss_level(mut self, level: BossLevel) -> Self {
        self.boss_level = Some(level);
        self
    }
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of cards of each attack number in a freshly built attack deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckComposition {
    pub attack_one: usize,
    pub attack_two: usize,
    pub attack_three: usize,
}

impl DeckComposition {
    /// Card counts indexed by `attack_number - 1`.
    pub const fn counts(&self) -> [usize; 3] {
        [self.attack_one, self.attack_two, self.attack_three]
    }

    pub const fn total(&self) -> usize {
        self.attack_one + self.attack_two + self.attack_three
    }
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self {
            attack_one: 6,
            attack_two: 8,
            attack_three: 6,
        }
    }
}
