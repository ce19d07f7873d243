use crate::config::RaidConfig;
use crate::state::ParticipantId;

/// Display colors handed out by join order.
pub const PLAYER_COLORS: [&str; 4] = ["#e74c3c", "#3498db", "#2ecc71", "#f1c40f"];

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum TurnPhase {
    PlayerTurns,
    BossTurn,
    /// The turn order is empty.
    EndPhase,
}

/// Stage of the current player's turn.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TurnStage {
    ChooseAction,
    ResolveAction,
    EndTurn,
}

impl TurnStage {
    pub const ALL: [Self; RaidConfig::TURN_STAGES] =
        [Self::ChooseAction, Self::ResolveAction, Self::EndTurn];

    /// 1-based stage number.
    pub const fn number(&self) -> u8 {
        match self {
            Self::ChooseAction => 1,
            Self::ResolveAction => 2,
            Self::EndTurn => 3,
        }
    }

    const fn next(&self) -> Self {
        match self {
            Self::ChooseAction => Self::ResolveAction,
            Self::ResolveAction | Self::EndTurn => Self::EndTurn,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOrderEntry {
    pub player_id: ParticipantId,
    pub username: String,
    pub color: String,
    pub turns_completed: u32,
}

/// What a call to [`TurnManager::advance_turn`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum TurnTransition {
    StageAdvanced { stage: TurnStage },
    NextPlayer { player: ParticipantId },
    BossTurnStarted,
    PlayerTurnsStarted { round: u32 },
    /// Nobody is left to take a turn.
    Ended,
}

/// Plain snapshot of the turn state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnInfo {
    pub phase: TurnPhase,
    pub round: u32,
    pub stage: TurnStage,
    pub current_index: usize,
    pub current_player: Option<ParticipantId>,
    pub turn_order: Vec<ParticipantId>,
    pub boss_turns_completed: u32,
}

/// Turn order and phase machine.
///
/// Invariant: while the order is non-empty, `current_index < order.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnManager {
    order: Vec<TurnOrderEntry>,
    current_index: usize,
    stage: TurnStage,
    phase: TurnPhase,
    round: u32,
    boss_turns_completed: u32,
}

impl TurnManager {
    /// Seats players in the given order, coloring them from [`PLAYER_COLORS`].
    pub fn new<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = (ParticipantId, S)>,
        S: Into<String>,
    {
        let order: Vec<TurnOrderEntry> = players
            .into_iter()
            .enumerate()
            .map(|(index, (player_id, username))| TurnOrderEntry {
                player_id,
                username: username.into(),
                color: PLAYER_COLORS[index % PLAYER_COLORS.len()].to_owned(),
                turns_completed: 0,
            })
            .collect();

        let phase = if order.is_empty() {
            TurnPhase::EndPhase
        } else {
            TurnPhase::PlayerTurns
        };

        Self {
            order,
            current_index: 0,
            stage: TurnStage::ChooseAction,
            phase,
            round: 1,
            boss_turns_completed: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn stage(&self) -> TurnStage {
        self.stage
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn boss_turns_completed(&self) -> u32 {
        self.boss_turns_completed
    }

    pub fn order(&self) -> &[TurnOrderEntry] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, player: &ParticipantId) -> bool {
        self.order.iter().any(|entry| &entry.player_id == player)
    }

    /// Entry at the current index, if anyone is seated.
    pub fn current_player(&self) -> Option<&TurnOrderEntry> {
        self.order.get(self.current_index)
    }

    /// True only during player turns and only for the player whose turn it is.
    pub fn is_players_turn(&self, player: &ParticipantId) -> bool {
        self.phase == TurnPhase::PlayerTurns
            && self
                .current_player()
                .is_some_and(|entry| &entry.player_id == player)
    }

    /// Moves the machine one step forward.
    ///
    /// During player turns this advances the stage; after the end stage it
    /// passes to the next player, or to the boss once every player has gone.
    /// A boss turn always hands back to the first player in a new round.
    pub fn advance_turn(&mut self) -> TurnTransition {
        if self.order.is_empty() {
            self.phase = TurnPhase::EndPhase;
            return TurnTransition::Ended;
        }

        let transition = match self.phase {
            TurnPhase::PlayerTurns if self.stage != TurnStage::EndTurn => {
                self.stage = self.stage.next();
                TurnTransition::StageAdvanced { stage: self.stage }
            }
            TurnPhase::PlayerTurns => {
                self.order[self.current_index].turns_completed += 1;
                self.current_index = (self.current_index + 1) % self.order.len();
                self.stage = TurnStage::ChooseAction;

                if self.current_index == 0 {
                    self.phase = TurnPhase::BossTurn;
                    TurnTransition::BossTurnStarted
                } else {
                    TurnTransition::NextPlayer {
                        player: self.order[self.current_index].player_id.clone(),
                    }
                }
            }
            TurnPhase::BossTurn => {
                self.phase = TurnPhase::PlayerTurns;
                self.current_index = 0;
                self.stage = TurnStage::ChooseAction;
                self.round += 1;
                self.boss_turns_completed += 1;
                TurnTransition::PlayerTurnsStarted { round: self.round }
            }
            TurnPhase::EndPhase => TurnTransition::Ended,
        };

        tracing::debug!(
            phase = %self.phase,
            stage = %self.stage,
            index = self.current_index,
            round = self.round,
            "turn advanced"
        );

        transition
    }

    /// Finishes the current player's turn outright.
    pub fn end_current_turn(&mut self) -> TurnTransition {
        if self.phase == TurnPhase::PlayerTurns {
            self.stage = TurnStage::EndTurn;
        }
        self.advance_turn()
    }

    /// Drops a player from the order, keeping the current index on a live entry.
    ///
    /// Returns false if the player was not seated.
    pub fn remove_from_turn_order(&mut self, player: &ParticipantId) -> bool {
        let Some(position) = self
            .order
            .iter()
            .position(|entry| &entry.player_id == player)
        else {
            return false;
        };

        self.order.remove(position);

        if self.order.is_empty() {
            self.current_index = 0;
            self.stage = TurnStage::ChooseAction;
            self.phase = TurnPhase::EndPhase;
            tracing::debug!(player = %player, "turn order emptied");
            return true;
        }

        if position < self.current_index {
            self.current_index -= 1;
        } else if position == self.current_index {
            self.current_index %= self.order.len();
            self.stage = TurnStage::ChooseAction;
        }

        tracing::debug!(
            player = %player,
            index = self.current_index,
            remaining = self.order.len(),
            "removed from turn order"
        );

        true
    }

    pub fn current_turn_info(&self) -> TurnInfo {
        TurnInfo {
            phase: self.phase,
            round: self.round,
            stage: self.stage,
            current_index: self.current_index,
            current_player: self.current_player().map(|entry| entry.player_id.clone()),
            turn_order: self
                .order
                .iter()
                .map(|entry| entry.player_id.clone())
                .collect(),
            boss_turns_completed: self.boss_turns_completed,
        }
    }
}
