//! End-to-end tests driving raids through the service façade.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use raid_core::{
    BossCard, EventKind, GameError, PlayerSetup, Pokemon, PokemonAttack, RaidConfig, RaidError,
    Timestamp, TurnPhase,
};
use raid_runtime::{
    CommandReply, Event, RaidCommand, RaidId, RaidService, RuntimeConfig, RuntimeError, Topic,
};
use serde_json::json;

fn setup(id: &str) -> PlayerSetup {
    PlayerSetup::new(
        id,
        format!("Trainer {id}"),
        Pokemon::new("Eevee", 120, vec![PokemonAttack::new("Tackle", 60)]),
        Pokemon::new("Pidgey", 60, vec![PokemonAttack::new("Gust", 30)]),
    )
}

struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

fn service() -> (RaidService, ManualClock) {
    let now = Arc::new(AtomicU64::new(1_000));
    let ticks = Arc::clone(&now);
    let service = RaidService::builder()
        .seed(11)
        .clock(move || Timestamp(ticks.load(Ordering::SeqCst)))
        .build();
    (service, ManualClock(now))
}

fn two_player_raid(service: &RaidService) -> RaidId {
    service
        .create_raid(BossCard::default(), vec![setup("p1"), setup("p2")])
        .expect("raid created")
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn json_attack_hits_the_boss_and_passes_the_turn() {
    let (service, _clock) = service();
    let raid = two_player_raid(&service);

    let response = service.handle_json(raid, r#"{"type":"attack","player":"p1","attack":"Tackle"}"#);
    assert!(response.success, "{response:?}");
    let data = response.data.expect("attack result");
    assert_eq!(data["type"], json!("attack"));
    assert_eq!(data["result"]["boss_hp"], json!(740));

    let indicator = service.turn_indicator(raid).expect("indicator");
    assert_eq!(indicator.phase, TurnPhase::PlayerTurns);
    let current = indicator.current.expect("someone is up");
    assert_eq!(current.player_id.as_str(), "p2");
}

#[test]
fn rule_violations_come_back_with_codes() {
    let (service, _clock) = service();
    let raid = two_player_raid(&service);

    let response = service.handle_json(raid, r#"{"type":"attack","player":"p2","attack":"Tackle"}"#);
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Not your turn"));
    assert_eq!(
        response.code.as_deref(),
        Some(RaidError::NotYourTurn.error_code())
    );

    let response = service.handle_json(raid, r#"{"type":"bossTurn"}"#);
    assert_eq!(
        response.code.as_deref(),
        Some(RaidError::NotBossTurn.error_code())
    );

    let response = service.handle_json(raid, "{not json");
    assert_eq!(response.code.as_deref(), Some("MALFORMED_PAYLOAD"));

    let response = service.handle_json(RaidId(999), r#"{"type":"bossTurn"}"#);
    assert_eq!(response.code.as_deref(), Some("RAID_NOT_FOUND"));
}

#[test]
fn full_round_reaches_the_boss_turn() {
    let (service, _clock) = service();
    let raid = two_player_raid(&service);

    for player in ["p1", "p2"] {
        service
            .dispatch(
                raid,
                RaidCommand::Attack {
                    player: player.into(),
                    pokemon: raid_core::PokemonSlot::Active,
                    attack: "Tackle".to_owned(),
                },
            )
            .expect("attack accepted");
    }

    let reply = service
        .dispatch(raid, RaidCommand::BossTurn)
        .expect("boss turn resolves");
    let CommandReply::BossTurn(outcome) = reply else {
        panic!("expected a boss turn reply, got {reply:?}");
    };
    // Level 1 boss swings at most twice
    assert!(outcome.report.attacks.len() <= 2);
    assert!(outcome.outcome.is_none());

    let snapshot = service.snapshot(raid).expect("snapshot");
    assert_eq!(snapshot.boss.current_hp, 680);
    assert_eq!(snapshot.turn.boss_turns_completed, 1);
}

#[test]
fn spectators_chat_and_get_pruned_when_idle() {
    let (service, clock) = service();
    let raid = two_player_raid(&service);

    let reply = service
        .dispatch(
            raid,
            RaidCommand::SpectatorJoin {
                spectator: "s1".into(),
                username: "Misty".to_owned(),
            },
        )
        .expect("observer joins");
    assert!(matches!(reply, CommandReply::SpectatorJoined(ref record) if !record.was_player));

    service
        .dispatch(
            raid,
            RaidCommand::SpectatorChat {
                spectator: "s1".into(),
                message: "go p1!".to_owned(),
            },
        )
        .expect("chat accepted");

    let deliveries = service.drain_spectator_events(raid).expect("drain");
    assert!(
        deliveries
            .iter()
            .any(|d| d.spectator.as_str() == "s1" && d.event.kind() == EventKind::SpectatorChat)
    );
    assert!(service.drain_spectator_events(raid).expect("drain").is_empty());

    // Active players cannot double as spectators
    let err = service
        .dispatch(
            raid,
            RaidCommand::SpectatorJoin {
                spectator: "p1".into(),
                username: "Trainer p1".to_owned(),
            },
        )
        .expect_err("still playing");
    assert!(matches!(err, RuntimeError::Raid(RaidError::StillPlaying)));

    clock.advance(RaidConfig::DEFAULT_SPECTATOR_IDLE_TIMEOUT_MS + 1);
    let pruned = service.prune_spectators(raid).expect("prune");
    assert_eq!(pruned.len(), 1);
    assert!(service.snapshot(raid).expect("snapshot").spectators.is_empty());
}

#[test]
fn repository_capacity_and_close() {
    let service = RaidService::builder()
        .config(RuntimeConfig {
            max_raids: 1,
            seed: Some(3),
            ..RuntimeConfig::default()
        })
        .build();

    let raid = two_player_raid(&service);
    let err = service
        .create_raid(BossCard::default(), vec![setup("p3")])
        .expect_err("repository full");
    assert_eq!(err.error_code(), "RAID_CAPACITY_REACHED");

    assert_eq!(service.raids().expect("list"), vec![raid]);
    assert_eq!(service.close_raid(raid).expect("closed"), None);
    assert!(service.raids().expect("list").is_empty());
    assert!(service.close_raid(raid).is_err());
}

#[test]
fn leaving_is_final_and_closes_the_raid() {
    let (service, _clock) = service();
    let raid = two_player_raid(&service);
    let leave = |player: &str| {
        RaidCommand::parse(&format!(r#"{{"type":"leave","player":"{player}"}}"#))
            .expect("valid command")
    };

    service.dispatch(raid, leave("p1")).expect("p1 leaves");
    let again = service
        .dispatch(raid, leave("p1"))
        .expect_err("already gone");
    assert_eq!(again.error_code(), "RAID_PLAYER_NOT_ACTIVE");

    service.dispatch(raid, leave("p2")).expect("p2 leaves");
    let over = service
        .dispatch(raid, leave("p2"))
        .expect_err("raid finished");
    assert_eq!(over.error_code(), RaidError::RaidOver.error_code());
    assert!(!over.severity().is_recoverable());
}

#[test]
fn invalid_setups_surface_raid_errors() {
    let (service, _clock) = service();
    let err = service
        .create_raid(BossCard::default(), vec![setup("p1"), setup("p1")])
        .expect_err("duplicate seat");
    assert_eq!(err.error_code(), "RAID_DUPLICATE_PLAYER");
}

#[tokio::test]
async fn raid_log_is_republished_by_topic() {
    let (service, _clock) = service();
    let mut raid_rx = service.subscribe(Topic::Raid);
    let mut turn_rx = service.subscribe(Topic::Turn);

    let raid = two_player_raid(&service);
    let created = raid_rx.recv().await.expect("creation event");
    assert!(matches!(created, Event::RaidCreated { players: 2, .. }));

    let response =
        service.handle_json(raid, r#"{"type":"attack","player":"p1","attack":"Tackle"}"#);
    assert!(response.success);

    let raid_events = drain(&mut raid_rx);
    assert!(raid_events.iter().any(|event| matches!(
        event,
        Event::Logged { entry, .. } if entry.kind() == EventKind::PlayerAttack
    )));
    assert!(raid_events.iter().all(|event| event.raid() == raid));

    let turn_events = drain(&mut turn_rx);
    assert!(turn_events.iter().any(|event| matches!(
        event,
        Event::Logged { entry, .. } if entry.kind() == EventKind::TurnChange
    )));
    assert!(turn_events.iter().all(|event| event.topic() == Topic::Turn));
}
