//! Scripted players for simulated raids.

use std::collections::HashSet;

use raid_core::{
    CheerEffect, CheerTarget, GamePhase, ParticipantId, Player, PlayerSetup, Pokemon,
    PokemonAttack, PokemonSlot, RaidSnapshot,
};
use raid_runtime::RaidCommand;

/// HP percentage at or below which a bot spends a full heal.
const HEAL_THRESHOLD_PERCENT: u32 = 50;

/// Seat `count` bots, cycling through preset lineups.
pub fn roster(count: usize) -> Vec<PlayerSetup> {
    (0..count)
        .map(|seat| {
            let (active, bench) = lineup(seat);
            PlayerSetup::new(
                format!("bot-{}", seat + 1),
                format!("Bot {}", seat + 1),
                active,
                bench,
            )
        })
        .collect()
}

fn lineup(seat: usize) -> (Pokemon, Pokemon) {
    match seat % 4 {
        0 => (
            Pokemon::new(
                "Charizard",
                180,
                vec![
                    PokemonAttack::new("Flamethrower", 90),
                    PokemonAttack::gx("Flare GX", 180),
                ],
            ),
            Pokemon::new("Charmander", 70, vec![PokemonAttack::new("Ember", 30)]),
        ),
        1 => (
            Pokemon::new(
                "Blastoise",
                170,
                vec![
                    PokemonAttack::new("Hydro Pump", 80),
                    PokemonAttack::gx("Tidal GX", 150),
                ],
            ),
            Pokemon::new("Squirtle", 60, vec![PokemonAttack::new("Bubble", 20)]),
        ),
        2 => (
            Pokemon::new("Venusaur", 190, vec![PokemonAttack::new("Solar Beam", 70)]),
            Pokemon::new("Bulbasaur", 70, vec![PokemonAttack::new("Vine Whip", 30)]),
        ),
        _ => (
            Pokemon::new(
                "Pikachu",
                90,
                vec![
                    PokemonAttack::new("Thunderbolt", 60),
                    PokemonAttack::gx("Volt GX", 120),
                ],
            ),
            Pokemon::new("Eevee", 80, vec![PokemonAttack::new("Quick Attack", 40)]),
        ),
    }
}

/// Next command a bot table would send, or `None` once the raid is over.
///
/// Players in `no_cheer` are not offered cheers again after a rejection.
pub fn next_command(
    snapshot: &RaidSnapshot,
    no_cheer: &HashSet<ParticipantId>,
) -> Option<RaidCommand> {
    match snapshot.phase {
        GamePhase::BossTurn => Some(RaidCommand::BossTurn),
        GamePhase::PlayerTurns => {
            cheer(snapshot, no_cheer).or_else(|| player_action(snapshot))
        }
        GamePhase::EndPhase | GamePhase::Victory | GamePhase::Defeat => None,
    }
}

fn cheer(snapshot: &RaidSnapshot, no_cheer: &HashSet<ParticipantId>) -> Option<RaidCommand> {
    if snapshot.cheer.used >= snapshot.cheer.max_uses {
        return None;
    }
    let player = snapshot
        .players
        .iter()
        .find(|p| p.can_use_cheer && !no_cheer.contains(&p.id))?;

    let wounded = snapshot
        .players
        .iter()
        .filter(|p| p.is_active())
        .find_map(|p| {
            let slot = p.pokemon.front_slot()?;
            let pokemon = p.pokemon.get(slot);
            (pokemon.hp_percent() <= HEAL_THRESHOLD_PERCENT).then(|| CheerTarget {
                player: p.id.clone(),
                slot,
            })
        });

    let full_heal = CheerEffect::FullHeal.card_number();
    let (card, target) = match wounded {
        Some(target) if snapshot.cheer.remaining.contains(&full_heal) => (full_heal, Some(target)),
        _ => {
            let card = snapshot
                .cheer
                .remaining
                .iter()
                .copied()
                .find(|&card| card != full_heal)?;
            (card, None)
        }
    };

    Some(RaidCommand::Cheer {
        player: player.id.clone(),
        card,
        target,
    })
}

fn player_action(snapshot: &RaidSnapshot) -> Option<RaidCommand> {
    let current = snapshot.turn.current_player.as_ref()?;
    let player = snapshot.players.iter().find(|p| &p.id == current)?;

    if player.pokemon.active.is_ko() {
        return Some(RaidCommand::Retreat {
            player: player.id.clone(),
        });
    }

    let attack = strongest_attack(player)?;
    Some(RaidCommand::Attack {
        player: player.id.clone(),
        pokemon: PokemonSlot::Active,
        attack,
    })
}

fn strongest_attack(player: &Player) -> Option<String> {
    player
        .pokemon
        .active
        .attacks
        .iter()
        .filter(|attack| !attack.gx || !player.has_used_gx)
        .max_by_key(|attack| attack.damage)
        .map(|attack| attack.name.clone())
}
