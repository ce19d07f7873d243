//! Raid participants and their two Pokémon.
//!
//! Each player brings exactly two Pokémon: one in the active slot and one on
//! the bench. A player stays in the raid while at least one of them is
//! standing; once both are knocked out the raid promotes the player to
//! spectator (see [`crate::raid::RaidGameState::check_player_eliminations`]).

use arrayvec::ArrayVec;

use crate::config::RaidConfig;
use crate::state::ParticipantId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    /// Both Pokémon knocked out; now watching with ex-player permissions.
    Spectator,
    /// Left the raid.
    Eliminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum PokemonStatus {
    Active,
    Benched,
    Ko,
}

/// Which of a player's two Pokémon an action refers to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PokemonSlot {
    Active,
    Bench,
}

/// Special conditions carried on a Pokémon. Tracked for display only.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusCondition {
    Asleep,
    Burned,
    Confused,
    Paralyzed,
    Poisoned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PokemonAttack {
    pub name: String,
    pub damage: u32,
    /// GX attacks may be used once per player per raid.
    #[cfg_attr(feature = "serde", serde(default))]
    pub gx: bool,
}

impl PokemonAttack {
    pub fn new(name: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            gx: false,
        }
    }

    pub fn gx(name: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            gx: true,
        }
    }
}

/// Result of applying boss damage to a Pokémon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PokemonDamage {
    pub dealt: u32,
    pub remaining_hp: u32,
    /// True only for the hit that knocked the Pokémon out.
    pub knocked_out: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pokemon {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attacks: Vec<PokemonAttack>,
    pub status: PokemonStatus,
    pub status_conditions: ArrayVec<StatusCondition, { RaidConfig::MAX_STATUS_CONDITIONS }>,
}

impl Pokemon {
    /// Creates a healthy Pokémon. The slot label is set when it joins a pair.
    pub fn new(name: impl Into<String>, max_hp: u32, attacks: Vec<PokemonAttack>) -> Self {
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            attacks,
            status: PokemonStatus::Active,
            status_conditions: ArrayVec::new(),
        }
    }

    pub fn is_ko(&self) -> bool {
        self.status == PokemonStatus::Ko
    }

    pub fn attack(&self, name: &str) -> Option<&PokemonAttack> {
        self.attacks.iter().find(|attack| attack.name == name)
    }

    /// Highest damage among this Pokémon's attacks.
    pub fn max_attack_damage(&self) -> u32 {
        self.attacks.iter().map(|a| a.damage).max().unwrap_or(0)
    }

    /// Fraction of HP left in percent (0-100).
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        let percent = u64::from(self.hp) * 100 / u64::from(self.max_hp);
        u32::try_from(percent).unwrap_or(u32::MAX)
    }

    /// Removes HP, clamping at 0, and flags the KO on the hit that reaches 0.
    pub fn take_damage(&mut self, amount: u32) -> PokemonDamage {
        if self.is_ko() {
            return PokemonDamage {
                dealt: 0,
                remaining_hp: 0,
                knocked_out: false,
            };
        }

        let dealt = amount.min(self.hp);
        self.hp -= dealt;

        let knocked_out = self.hp == 0;
        if knocked_out {
            self.status = PokemonStatus::Ko;
            self.status_conditions.clear();
        }

        PokemonDamage {
            dealt,
            remaining_hp: self.hp,
            knocked_out,
        }
    }

    /// Restores up to `amount` HP on a standing Pokémon. Returns HP restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_ko() {
            return 0;
        }
        let healed = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += healed;
        healed
    }

    /// Restores a standing Pokémon to full HP and clears its conditions.
    pub fn restore(&mut self) -> u32 {
        let healed = self.heal(self.max_hp);
        self.status_conditions.clear();
        healed
    }
}

/// A player's active and benched Pokémon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PokemonPair {
    pub active: Pokemon,
    pub bench: Pokemon,
}

impl PokemonPair {
    pub fn new(mut active: Pokemon, mut bench: Pokemon) -> Self {
        active.status = PokemonStatus::Active;
        bench.status = PokemonStatus::Benched;
        Self { active, bench }
    }

    pub fn get(&self, slot: PokemonSlot) -> &Pokemon {
        match slot {
            PokemonSlot::Active => &self.active,
            PokemonSlot::Bench => &self.bench,
        }
    }

    pub fn get_mut(&mut self, slot: PokemonSlot) -> &mut Pokemon {
        match slot {
            PokemonSlot::Active => &mut self.active,
            PokemonSlot::Bench => &mut self.bench,
        }
    }

    /// Slot the boss hits: the active Pokémon, or the bench once the active is down.
    pub fn front_slot(&self) -> Option<PokemonSlot> {
        if !self.active.is_ko() {
            Some(PokemonSlot::Active)
        } else if !self.bench.is_ko() {
            Some(PokemonSlot::Bench)
        } else {
            None
        }
    }

    pub fn front(&self) -> Option<&Pokemon> {
        self.front_slot().map(|slot| self.get(slot))
    }

    pub fn all_ko(&self) -> bool {
        self.active.is_ko() && self.bench.is_ko()
    }

    /// Swaps the two Pokémon along with their status labels.
    ///
    /// A knocked-out Pokémon keeps its `Ko` label wherever it lands.
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.active, &mut self.bench);
        if !self.active.is_ko() {
            self.active.status = PokemonStatus::Active;
        }
        if !self.bench.is_ko() {
            self.bench.status = PokemonStatus::Benched;
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pokemon> {
        [&mut self.active, &mut self.bench].into_iter()
    }
}

/// Most recent action a player took, used by threat scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum LastAction {
    Attack { damage: u32 },
    Retreat,
    Cheer { card: u8 },
}

/// Everything needed to seat a player at raid start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSetup {
    pub id: ParticipantId,
    pub username: String,
    pub active: Pokemon,
    pub bench: Pokemon,
}

impl PlayerSetup {
    pub fn new(
        id: impl Into<ParticipantId>,
        username: impl Into<String>,
        active: Pokemon,
        bench: Pokemon,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            active,
            bench,
        }
    }

    /// Strongest attack across both Pokémon.
    pub fn max_attack_damage(&self) -> u32 {
        self.active
            .max_attack_damage()
            .max(self.bench.max_attack_damage())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: ParticipantId,
    pub username: String,
    pub status: PlayerStatus,
    pub pokemon: PokemonPair,
    /// Pokémon of this player knocked out so far.
    pub ko_count: u32,
    pub has_used_gx: bool,
    /// Granted when one of this player's Pokémon is knocked out.
    pub can_use_cheer: bool,
    pub last_action: Option<LastAction>,
}

impl Player {
    pub fn from_setup(setup: PlayerSetup) -> Self {
        Self {
            id: setup.id,
            username: setup.username,
            status: PlayerStatus::Active,
            pokemon: PokemonPair::new(setup.active, setup.bench),
            ko_count: 0,
            has_used_gx: false,
            can_use_cheer: false,
            last_action: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Active and with at least one Pokémon standing.
    pub fn can_be_targeted(&self) -> bool {
        self.is_active() && !self.pokemon.all_ko()
    }
}

/// Players in join order.
///
/// The roster is small (at most a handful of players), so lookups are linear
/// and iteration order is stable, which targeting tie-breaks rely on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRoster {
    players: Vec<Player>,
}

impl PlayerRoster {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn as_slice(&self) -> &[Player] {
        &self.players
    }
}
