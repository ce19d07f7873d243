//! Per-player threat scoring for tactical targeting.
//!
//! ```text
//! threat = max_attack_damage
//!        + 0.5 × front_hp
//!        + 50 (if the player holds a cheer)
//!        + 0.3 × last_attack_damage (if the last action was an attack)
//! ```
//!
//! Scores are rebuilt from scratch at the start of every boss turn and never
//! carried across turns. Players who are not active score 0.

use crate::state::{LastAction, ParticipantId, Player, PlayerRoster};

/// Bonus for a player holding an unplayed cheer.
pub const CHEER_THREAT_BONUS: f64 = 50.0;
/// Weight of the front Pokémon's current HP.
pub const HP_WEIGHT: f64 = 0.5;
/// Weight of the damage dealt by the player's last attack.
pub const LAST_ATTACK_WEIGHT: f64 = 0.3;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatAssessment {
    /// Scores in roster order.
    scores: Vec<(ParticipantId, f64)>,
}

impl ThreatAssessment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every player's threat from the current roster.
    pub fn update(&mut self, players: &PlayerRoster) {
        self.scores = players
            .iter()
            .map(|player| (player.id.clone(), Self::score_player(player)))
            .collect();

        tracing::debug!(
            scores = ?self.scores,
            "threat assessment updated"
        );
    }

    pub fn score_player(player: &Player) -> f64 {
        if !player.is_active() {
            return 0.0;
        }

        // The boss hits the front Pokémon, so that is the one that matters.
        let Some(front) = player.pokemon.front() else {
            return 0.0;
        };

        let mut threat = f64::from(front.max_attack_damage()) + HP_WEIGHT * f64::from(front.hp);

        if player.can_use_cheer {
            threat += CHEER_THREAT_BONUS;
        }

        if let Some(LastAction::Attack { damage }) = player.last_action {
            threat += LAST_ATTACK_WEIGHT * f64::from(damage);
        }

        threat
    }

    /// Score from the last update, 0 for unknown players.
    pub fn score(&self, id: &ParticipantId) -> f64 {
        self.scores
            .iter()
            .find(|(player, _)| player == id)
            .map_or(0.0, |(_, score)| *score)
    }

    /// Highest-threat candidate. Ties go to the earliest candidate.
    pub fn highest<'a>(&self, candidates: &[&'a ParticipantId]) -> Option<&'a ParticipantId> {
        let mut best: Option<(&'a ParticipantId, f64)> = None;
        for &id in candidates {
            let score = self.score(id);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn scores(&self) -> &[(ParticipantId, f64)] {
        &self.scores
    }
}
