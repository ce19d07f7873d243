//! Boundary command type decoded from transport payloads.
//!
//! Commands are checked for shape here, before they reach the raid engine.
//! Rule checks (turn order, budgets, permissions) stay in `raid-core`.

use serde::{Deserialize, Serialize};

use raid_core::{
    BossTurnOutcome, CheerOutcome, CheerTarget, LeaveOutcome, LoggedEvent, ParticipantId,
    PlayerAttackOutcome, PokemonSlot, RaidConfig, RetreatOutcome, SpectatorRecord,
};

use super::errors::{Result, RuntimeError};

/// One inbound request against a single raid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum RaidCommand {
    Attack {
        player: ParticipantId,
        #[serde(default = "front_slot")]
        pokemon: PokemonSlot,
        attack: String,
    },
    Retreat {
        player: ParticipantId,
    },
    Cheer {
        player: ParticipantId,
        card: u8,
        #[serde(default)]
        target: Option<CheerTarget>,
    },
    BossTurn,
    Leave {
        player: ParticipantId,
    },
    SpectatorJoin {
        spectator: ParticipantId,
        username: String,
    },
    SpectatorLeave {
        spectator: ParticipantId,
    },
    SpectatorChat {
        spectator: ParticipantId,
        message: String,
    },
    SpectatorSuggestion {
        spectator: ParticipantId,
        target_player: ParticipantId,
        suggestion: String,
    },
    /// Re-send the event log to a spectator that reconnected.
    SpectatorReplay {
        spectator: ParticipantId,
    },
}

fn front_slot() -> PokemonSlot {
    PokemonSlot::Active
}

impl RaidCommand {
    /// Decode and validate a JSON payload.
    pub fn parse(payload: &str) -> Result<Self> {
        let command: RaidCommand = serde_json::from_str(payload)?;
        command.validate()?;
        Ok(command)
    }

    /// Snake-case name of the command, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Participant issuing the command. The boss turn has none.
    pub fn actor(&self) -> Option<&ParticipantId> {
        match self {
            RaidCommand::Attack { player, .. }
            | RaidCommand::Retreat { player }
            | RaidCommand::Cheer { player, .. }
            | RaidCommand::Leave { player } => Some(player),
            RaidCommand::SpectatorJoin { spectator, .. }
            | RaidCommand::SpectatorLeave { spectator }
            | RaidCommand::SpectatorChat { spectator, .. }
            | RaidCommand::SpectatorSuggestion { spectator, .. }
            | RaidCommand::SpectatorReplay { spectator } => Some(spectator),
            RaidCommand::BossTurn => None,
        }
    }

    /// Checks the payload shape. Does not look at any raid.
    pub fn validate(&self) -> Result<()> {
        if let Some(actor) = self.actor() {
            require_text("participant id", actor.as_str())?;
        }
        match self {
            RaidCommand::Attack { attack, .. } => require_text("attack", attack),
            RaidCommand::Cheer { card, target, .. } => {
                if !(1..=RaidConfig::CHEER_POOL_SIZE).contains(card) {
                    return Err(RuntimeError::InvalidCommand(format!(
                        "cheer card must be between 1 and {}",
                        RaidConfig::CHEER_POOL_SIZE
                    )));
                }
                match target {
                    Some(target) => require_text("target player", target.player.as_str()),
                    None => Ok(()),
                }
            }
            RaidCommand::SpectatorJoin { username, .. } => require_text("username", username),
            RaidCommand::SpectatorSuggestion {
                target_player,
                suggestion,
                ..
            } => {
                require_text("target player", target_player.as_str())?;
                require_text("suggestion", suggestion)
            }
            RaidCommand::Retreat { .. }
            | RaidCommand::BossTurn
            | RaidCommand::Leave { .. }
            | RaidCommand::SpectatorLeave { .. }
            | RaidCommand::SpectatorChat { .. }
            | RaidCommand::SpectatorReplay { .. } => Ok(()),
        }
    }
}

// Chat text is checked by the spectator manager so it can report `InvalidMessage`.
fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RuntimeError::InvalidCommand(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Typed result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "result", rename_all = "camelCase")]
pub enum CommandReply {
    Attack(PlayerAttackOutcome),
    Retreat(RetreatOutcome),
    Cheer(CheerOutcome),
    BossTurn(BossTurnOutcome),
    Leave(LeaveOutcome),
    SpectatorJoined(SpectatorRecord),
    SpectatorLeft(SpectatorRecord),
    /// Sequence number of the logged chat or suggestion.
    Posted(u64),
    Replay(Vec<LoggedEvent>),
}
