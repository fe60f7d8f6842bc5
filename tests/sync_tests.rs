//! Peer synchronisation tests.
//!
//! Two controllers connected back to back through the codec, each with
//! one local seat and one relay seat, must end up in the same state.

use pawn_tactics::core::{Card, CardId, CardStats, GridPos, MatchConfig, PawnId, PlayerId};
use pawn_tactics::net::{decode_binary, decode_json, encode_binary, encode_json};
use pawn_tactics::{
    ActionError, CycleAdvance, DragGesture, MatchController, MatchEvent, MatchResult, Phase, Vec2,
};

#[derive(Clone, Copy)]
enum Wire {
    Json,
    Binary,
}

fn transmit(event: &MatchEvent, wire: Wire) -> MatchEvent {
    match wire {
        Wire::Json => decode_json(&encode_json(event).unwrap()).unwrap(),
        Wire::Binary => decode_binary(&encode_binary(event).unwrap()).unwrap(),
    }
}

/// Deliver outbound events both ways until neither side has anything left.
fn pump(a: &mut MatchController, b: &mut MatchController, wire: Wire) {
    loop {
        let from_a = a.drain_outbound();
        let from_b = b.drain_outbound();
        if from_a.is_empty() && from_b.is_empty() {
            break;
        }
        for event in &from_a {
            b.receive(transmit(event, wire));
        }
        for event in &from_b {
            a.receive(transmit(event, wire));
        }
    }
}

fn tick_until_idle(ctrl: &mut MatchController, now: &mut u64) {
    for _ in 0..1_000 {
        if !ctrl.is_animating() {
            return;
        }
        *now += 16;
        ctrl.tick(*now);
    }
    panic!("replay never finished");
}

/// 5x5 board, two pawns a side, one definition round linking both pawns.
fn skirmish_config() -> MatchConfig {
    MatchConfig {
        links_per_round: 2,
        ..MatchConfig::default()
            .with_board(5, 5)
            .with_pawns_per_player(2)
            .with_rounds_per_cycle(1)
    }
}

const FIRST_CARDS: [CardStats; 3] = [
    CardStats::new(1, 5, 1),
    CardStats::new(5, 1, 1),
    CardStats::new(3, 2, 2),
];

const SECOND_CARDS: [CardStats; 3] = [
    CardStats::new(1, 1, 5),
    CardStats::new(5, 1, 1),
    CardStats::new(3, 2, 2),
];

/// Both peers set up and in ACTION with the first player to move.
fn linked_peers(wire: Wire) -> (MatchController, MatchController) {
    let mut a = MatchController::online(skirmish_config(), PlayerId::FIRST).unwrap();
    let mut b = MatchController::online(skirmish_config(), PlayerId::SECOND).unwrap();
    a.start(0);
    b.start(0);

    a.define_cards(PlayerId::FIRST, &FIRST_CARDS).unwrap();
    b.define_cards(PlayerId::SECOND, &SECOND_CARDS).unwrap();
    pump(&mut a, &mut b, wire);
    assert_eq!(a.phase(), Phase::Linking { round: 1 });
    assert_eq!(b.phase(), Phase::Linking { round: 1 });

    a.link_pawn(PlayerId::FIRST, PawnId(0), CardId::compose(PlayerId::FIRST, 1, 0)).unwrap();
    a.link_pawn(PlayerId::FIRST, PawnId(1), CardId::compose(PlayerId::FIRST, 1, 1)).unwrap();
    b.link_pawn(PlayerId::SECOND, PawnId(2), CardId::compose(PlayerId::SECOND, 1, 0)).unwrap();
    b.link_pawn(PlayerId::SECOND, PawnId(3), CardId::compose(PlayerId::SECOND, 1, 1)).unwrap();
    pump(&mut a, &mut b, wire);

    assert_eq!(a.phase(), Phase::Action);
    assert_eq!(b.phase(), Phase::Action);
    assert_eq!(a.current_player(), PlayerId::FIRST);
    (a, b)
}

/// Peer A walks pawn 0 next to pawn 2, and peer B kills it with a drag.
fn exchange_lethal_attack(a: &mut MatchController, b: &mut MatchController, wire: Wire) {
    a.move_pawn(PlayerId::FIRST, PawnId(0), GridPos::new(1, 2)).unwrap();
    pump(a, b, wire);
    assert_eq!(b.current_player(), PlayerId::SECOND);

    let gesture = DragGesture::new(Vec2::new(96.0, 224.0), Vec2::new(96.0, 120.0), 1_000, 1_300);
    b.attack(PlayerId::SECOND, PawnId(2), PawnId(0), gesture).unwrap();
    let sent = b.drain_outbound();
    assert_eq!(sent.len(), 2);
    assert!(matches!(sent[0], MatchEvent::Attack { .. }));
    let MatchEvent::PhysicsAttackAnimation(descriptor) = sent[1] else {
        panic!("expected a replay descriptor, got {:?}", sent[1]);
    };
    assert_eq!(descriptor.attacker_id, PawnId(2));
    assert!(descriptor.power > 0.0);

    for event in &sent {
        a.receive(transmit(event, wire));
    }
}

#[test]
fn test_stray_click_does_not_attack() {
    let (mut a, mut b) = linked_peers(Wire::Json);
    a.move_pawn(PlayerId::FIRST, PawnId(0), GridPos::new(1, 2)).unwrap();
    pump(&mut a, &mut b, Wire::Json);
    let before = serde_json::to_value(b.state()).unwrap();

    let click = DragGesture::new(Vec2::new(96.0, 224.0), Vec2::new(97.0, 222.0), 1_000, 1_020);
    let err = b.attack(PlayerId::SECOND, PawnId(2), PawnId(0), click).unwrap_err();
    assert!(matches!(err, ActionError::GestureTooShort { .. }));
    assert_eq!(b.take_notices()[0].code, "GESTURE_TOO_SHORT");
    assert_eq!(serde_json::to_value(b.state()).unwrap(), before);
    assert!(b.drain_outbound().is_empty());
    assert!(!b.is_animating());
}

#[test]
fn test_descriptor_replay_matches_outcome() {
    let (mut a, mut b) = linked_peers(Wire::Json);
    exchange_lethal_attack(&mut a, &mut b, Wire::Json);

    assert!(a.is_animating());
    assert!(b.is_animating());
    assert_eq!(a.pass(PlayerId::FIRST), Err(ActionError::Animating));

    let mut now = 0;
    tick_until_idle(&mut a, &mut now);
    let mut now = 0;
    tick_until_idle(&mut b, &mut now);

    for ctrl in [&a, &b] {
        let target = ctrl.state().pawn(PawnId(0)).unwrap();
        assert!(target.eliminated);
        assert_eq!(ctrl.state().pawn(PawnId(2)).unwrap().pos, GridPos::new(1, 2));
        assert!(ctrl.pawn_views().iter().all(|p| p.visual.is_none()));
        assert_eq!(ctrl.current_player(), PlayerId::FIRST);
    }
    assert_eq!(a.state().pawns(), b.state().pawns());
    assert_eq!(a.state().history.len(), b.state().history.len());
}

#[test]
fn test_events_buffered_during_replay() {
    let (mut a, mut b) = linked_peers(Wire::Binary);
    exchange_lethal_attack(&mut a, &mut b, Wire::Binary);

    let mut now_a = 0;
    tick_until_idle(&mut a, &mut now_a);
    a.pass(PlayerId::FIRST).unwrap();
    assert_eq!(a.current_player(), PlayerId::SECOND);

    for event in a.drain_outbound() {
        b.receive(transmit(&event, Wire::Binary));
    }
    assert!(b.is_animating());
    assert_eq!(b.pending_inbound(), 1);
    assert_eq!(b.current_player(), PlayerId::FIRST);

    let mut now_b = 0;
    tick_until_idle(&mut b, &mut now_b);
    assert_eq!(b.pending_inbound(), 0);
    assert_eq!(b.current_player(), PlayerId::SECOND);
    assert_eq!(a.state().pawns(), b.state().pawns());
}

/// One pawn a side; the first player can reach the far haven in one move.
fn sprint_config() -> MatchConfig {
    MatchConfig::default()
        .with_board(5, 5)
        .with_pawns_per_player(1)
        .with_rounds_per_cycle(1)
}

fn remote_cards(player: PlayerId, stats: &[CardStats]) -> Vec<Card> {
    stats
        .iter()
        .enumerate()
        .map(|(slot, &s)| Card::new(CardId::compose(player, 1, slot as u8), s))
        .collect()
}

fn sprint_to_action() -> MatchController {
    let mut a = MatchController::online(sprint_config(), PlayerId::FIRST).unwrap();
    a.start(0);
    a.define_cards(PlayerId::FIRST, &FIRST_CARDS).unwrap();
    a.receive(MatchEvent::CardsDefined {
        player: PlayerId::SECOND,
        cards: remote_cards(PlayerId::SECOND, &SECOND_CARDS),
    });
    assert_eq!(a.phase(), Phase::Linking { round: 1 });

    a.link_pawn(PlayerId::FIRST, PawnId(0), CardId::compose(PlayerId::FIRST, 1, 0)).unwrap();
    a.receive(MatchEvent::PawnLinked {
        player: PlayerId::SECOND,
        pawn_id: PawnId(1),
        card_id: CardId::compose(PlayerId::SECOND, 1, 1),
    });
    assert_eq!(a.phase(), Phase::Action);
    a
}

#[test]
fn test_cycle_advance_after_game_over_is_ignored() {
    let mut a = sprint_to_action();
    a.move_pawn(PlayerId::FIRST, PawnId(0), GridPos::new(0, 4)).unwrap();
    assert_eq!(a.result(), Some(MatchResult::Winner(PlayerId::FIRST)));
    assert_eq!(a.pending_timers(), 0);

    let before = serde_json::to_value(a.state()).unwrap();
    let advance = MatchEvent::CycleAdvance(CycleAdvance {
        cycle_number: 2,
        round_number: 1,
        current_phase: Phase::Define { round: 1 },
        current_player: PlayerId::SECOND,
    });
    a.receive(advance.clone());
    a.receive(advance);

    assert_eq!(serde_json::to_value(a.state()).unwrap(), before);
    assert_eq!(a.phase(), Phase::GameOver);
}

#[test]
fn test_lower_cycle_advance_is_ignored() {
    let mut a = MatchController::online(sprint_config(), PlayerId::FIRST).unwrap();
    a.start(0);
    a.receive(MatchEvent::CycleAdvance(CycleAdvance {
        cycle_number: 0,
        round_number: 1,
        current_phase: Phase::Action,
        current_player: PlayerId::SECOND,
    }));
    assert_eq!(a.state().cycle, 1);
    assert_eq!(a.phase(), Phase::Define { round: 1 });

    a.receive(MatchEvent::CycleAdvance(CycleAdvance {
        cycle_number: 3,
        round_number: 1,
        current_phase: Phase::Define { round: 1 },
        current_player: PlayerId::SECOND,
    }));
    assert_eq!(a.state().cycle, 3);
    assert_eq!(a.current_player(), PlayerId::SECOND);
}

#[test]
fn test_cycle_advance_past_setup_is_ignored() {
    let mut a = MatchController::online(sprint_config(), PlayerId::FIRST).unwrap();
    a.start(0);
    a.define_cards(PlayerId::FIRST, &FIRST_CARDS).unwrap();

    for phase in [Phase::Linking { round: 1 }, Phase::Action] {
        a.receive(MatchEvent::CycleAdvance(CycleAdvance {
            cycle_number: 2,
            round_number: 1,
            current_phase: phase,
            current_player: PlayerId::SECOND,
        }));
    }
    let mut now = 0;
    for _ in 0..200 {
        now += 50;
        a.tick(now);
    }
    assert_eq!(a.state().cycle, 1);
    assert_eq!(a.phase(), Phase::Define { round: 1 });

    a.receive(MatchEvent::CardsDefined {
        player: PlayerId::SECOND,
        cards: remote_cards(PlayerId::SECOND, &SECOND_CARDS),
    });
    assert_eq!(a.phase(), Phase::Linking { round: 1 });
    a.link_pawn(PlayerId::FIRST, PawnId(0), CardId::compose(PlayerId::FIRST, 1, 0))
        .unwrap();
}

#[test]
fn test_stale_and_malformed_relay_events_dropped() {
    let mut a = MatchController::online(sprint_config(), PlayerId::FIRST).unwrap();
    a.start(0);
    let before = serde_json::to_value(a.state()).unwrap();

    a.receive(MatchEvent::Move {
        pawn_id: PawnId(1),
        target_x: 2,
        target_y: 2,
    });
    a.receive(MatchEvent::CardsDefined {
        player: PlayerId(7),
        cards: remote_cards(PlayerId(7), &SECOND_CARDS),
    });
    a.receive(MatchEvent::CycleAdvance(CycleAdvance {
        cycle_number: 5,
        round_number: 1,
        current_phase: Phase::Action,
        current_player: PlayerId(9),
    }));
    a.receive(MatchEvent::PhysicsAttackAnimation(pawn_tactics::AttackReplayDescriptor {
        attacker_id: PawnId(40),
        target_id: PawnId(41),
        direction: Vec2::new(1.0, 0.0),
        power: 5.0,
        start: Vec2::ZERO,
        end: Vec2::ZERO,
        player: PlayerId::SECOND,
        timestamp_ms: 0,
    }));

    assert_eq!(serde_json::to_value(a.state()).unwrap(), before);
    assert!(!a.is_animating());
    assert!(a.drain_outbound().is_empty());
}

#[test]
fn test_disconnected_peer_falls_back_to_defaults() {
    let mut a = MatchController::online(sprint_config(), PlayerId::FIRST).unwrap();
    a.start(0);
    a.define_cards(PlayerId::FIRST, &FIRST_CARDS).unwrap();
    assert_eq!(a.phase(), Phase::Define { round: 1 });

    a.set_remote_connected(false);
    // Balanced cards stood in, and the link followed straight away.
    let remote = &a.state().players[PlayerId::SECOND];
    assert_eq!(remote.cards.len(), 3);
    assert_eq!(remote.links_made, 1);
    assert_eq!(a.phase(), Phase::Linking { round: 1 });

    a.link_pawn(PlayerId::FIRST, PawnId(0), CardId::compose(PlayerId::FIRST, 1, 2)).unwrap();
    assert_eq!(a.phase(), Phase::Action);

    a.pass(PlayerId::FIRST).unwrap();
    // The silent seat passes too, exhausting the cycle.
    assert_eq!(a.state().cycle, 2);
    assert!(a
        .drain_outbound()
        .iter()
        .all(|e| !matches!(e, MatchEvent::Move { .. } | MatchEvent::Attack { .. })));
}
