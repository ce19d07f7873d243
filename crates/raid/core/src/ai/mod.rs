//! Scripted boss AI: targeting, difficulty and behavior layered on the attack deck.
pub mod boss;
pub mod threat;
pub mod types;

pub use boss::{
    Adjustment, AiDecision, BossAi, BossAttackResult, BossTurnContext, BossTurnReport, TurnStop,
};
pub use threat::ThreatAssessment;
pub use types::{AiConfig, BehaviorPattern, BossControl, Difficulty, TargetingStrategy};
