//! Render-ready projection of the turn state.

use super::manager::{TurnManager, TurnOrderEntry, TurnPhase, TurnStage};
use crate::config::RaidConfig;
use crate::state::{Boss, ParticipantId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StageProgress {
    Completed,
    Current,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageView {
    pub stage: TurnStage,
    pub number: u8,
    pub progress: StageProgress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPlayerView {
    pub player_id: ParticipantId,
    pub username: String,
    pub color: String,
    pub turns_completed: u32,
}

impl From<&TurnOrderEntry> for TurnPlayerView {
    fn from(entry: &TurnOrderEntry) -> Self {
        Self {
            player_id: entry.player_id.clone(),
            username: entry.username.clone(),
            color: entry.color.clone(),
            turns_completed: entry.turns_completed,
        }
    }
}

/// Boss attack allowance for the current or upcoming boss turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossBudget {
    pub max_attacks: u32,
    /// Cap imposed by a cheer card, if any.
    pub attack_limit: Option<u32>,
    pub attacks_this_turn: u32,
    pub remaining: u32,
}

impl BossBudget {
    pub fn new(boss: &Boss, attack_limit: Option<u32>) -> Self {
        Self {
            max_attacks: boss.max_attacks_per_turn,
            attack_limit,
            attacks_this_turn: boss.attacks_this_turn,
            remaining: boss.remaining_attacks(attack_limit),
        }
    }
}

/// Everything a client needs to draw the turn tracker.
///
/// `next` is `None` when the boss acts after the current player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnIndicator {
    pub phase: TurnPhase,
    pub round: u32,
    pub current: Option<TurnPlayerView>,
    pub next: Option<TurnPlayerView>,
    pub previous: Option<TurnPlayerView>,
    pub stages: [StageView; RaidConfig::TURN_STAGES],
    pub boss: BossBudget,
}

impl TurnManager {
    /// Pure projection of the turn state plus the boss's attack budget.
    pub fn generate_turn_indicator(&self, boss: &Boss, attack_limit: Option<u32>) -> TurnIndicator {
        let order = self.order();
        let index = self.current_index();

        let (current, next, previous) = match self.phase() {
            TurnPhase::PlayerTurns => (
                order.get(index),
                order.get(index + 1),
                index.checked_sub(1).and_then(|prev| order.get(prev)),
            ),
            // The boss is acting: the first player is up next, the last just went.
            TurnPhase::BossTurn => (None, order.first(), order.last()),
            TurnPhase::EndPhase => (None, None, None),
        };

        let stages = TurnStage::ALL.map(|stage| StageView {
            stage,
            number: stage.number(),
            progress: self.stage_progress(stage),
        });

        TurnIndicator {
            phase: self.phase(),
            round: self.round(),
            current: current.map(TurnPlayerView::from),
            next: next.map(TurnPlayerView::from),
            previous: previous.map(TurnPlayerView::from),
            stages,
            boss: BossBudget::new(boss, attack_limit),
        }
    }

    fn stage_progress(&self, stage: TurnStage) -> StageProgress {
        match self.phase() {
            TurnPhase::PlayerTurns if stage < self.stage() => StageProgress::Completed,
            TurnPhase::PlayerTurns if stage == self.stage() => StageProgress::Current,
            TurnPhase::PlayerTurns | TurnPhase::BossTurn => StageProgress::Pending,
            TurnPhase::EndPhase => StageProgress::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BossCard, BossLevel};

    fn manager() -> TurnManager {
        TurnManager::new(["a", "b", "c"].map(|id| (ParticipantId::from(id), id)))
    }

    fn name(view: &Option<TurnPlayerView>) -> Option<&str> {
        view.as_ref().map(|v| v.player_id.as_str())
    }

    #[test]
    fn neighbors_during_player_turns() {
        let mut turns = manager();
        turns.end_current_turn();
        turns.advance_turn();

        let boss = Boss::new(BossCard::default(), BossLevel::Two);
        let indicator = turns.generate_turn_indicator(&boss, None);

        assert_eq!(name(&indicator.current), Some("b"));
        assert_eq!(name(&indicator.next), Some("c"));
        assert_eq!(name(&indicator.previous), Some("a"));
        assert_eq!(
            indicator.stages.map(|s| s.progress),
            [
                StageProgress::Completed,
                StageProgress::Current,
                StageProgress::Pending
            ]
        );
        assert_eq!(indicator.boss.remaining, 3);
    }

    #[test]
    fn last_player_has_boss_next() {
        let mut turns = manager();
        turns.end_current_turn();
        turns.end_current_turn();

        let boss = Boss::new(BossCard::default(), BossLevel::Two);
        let indicator = turns.generate_turn_indicator(&boss, Some(1));
        assert_eq!(name(&indicator.current), Some("c"));
        assert!(indicator.next.is_none());
        assert_eq!(indicator.boss.attack_limit, Some(1));
        assert_eq!(indicator.boss.remaining, 1);
    }

    #[test]
    fn boss_turn_projection() {
        let mut turns = manager();
        for _ in 0..3 {
            turns.end_current_turn();
        }
        assert_eq!(turns.phase(), TurnPhase::BossTurn);

        let boss = Boss::new(BossCard::default(), BossLevel::One);
        let indicator = turns.generate_turn_indicator(&boss, None);
        assert!(indicator.current.is_none());
        assert_eq!(name(&indicator.next), Some("a"));
        assert_eq!(name(&indicator.previous), Some("c"));
        assert!(
            indicator
                .stages
                .iter()
                .all(|s| s.progress == StageProgress::Pending)
        );
    }
}
