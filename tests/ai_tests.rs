//! AI opponent behaviour.
//!
//! Decisions through the `ActorPolicy` contract, and whole matches driven
//! by the controller with an AI seat.

use pawn_tactics::core::{Card, CardId, CardStats, MatchConfig, MatchState, PawnId, PlayerId};
use pawn_tactics::{
    Action, ActionChoice, ActorKind, ActorPolicy, AiCheckpoint, AiOpponent, Decision, DecisionContext,
    DecisionRequest, Difficulty, GameRng, MatchController, MatchEvent, Phase, RequestKind, RpsChoice,
};

fn action_state() -> MatchState {
    let mut state = MatchState::new(MatchConfig::default());
    state.cycle = 1;
    state.round = 3;
    state.turn = 1;
    state.phase = Phase::Action;
    state.current_player = PlayerId::SECOND;
    state
}

#[test]
fn test_easy_ai_without_legal_actions_passes() {
    // Nothing linked: no pawn of either side can move or attack.
    let state = action_state();
    let ctx = DecisionContext::new(&state, PlayerId::SECOND);
    let mut ai = AiOpponent::for_seat(Difficulty::Easy, &GameRng::new(3), PlayerId::SECOND);

    for _ in 0..10 {
        assert_eq!(ai.choose_action(&ctx), Decision::Ready(ActionChoice::pass()));
    }
}

#[test]
fn test_spent_pawns_leave_only_pass() {
    let mut state = action_state();
    let card = Card::new(CardId::compose(PlayerId::SECOND, 1, 0), CardStats::new(3, 2, 2));
    let pawn = state.pawn_mut(PawnId(3)).unwrap();
    pawn.link(&card);
    pawn.stamina = 0;
    pawn.acted = true;

    let ctx = DecisionContext::new(&state, PlayerId::SECOND);
    let mut ai = AiOpponent::for_seat(Difficulty::Easy, &GameRng::new(8), PlayerId::SECOND);
    let Decision::Ready(choice) = ai.choose_action(&ctx) else {
        panic!("AI must always answer an action request");
    };
    assert_eq!(choice.action, Action::Pass);
}

#[test]
fn test_card_sets_are_valid_for_every_difficulty() {
    let state = MatchState::new(MatchConfig::default());
    let ctx = DecisionContext::new(&state, PlayerId::SECOND);

    for difficulty in Difficulty::ALL {
        let mut ai = AiOpponent::new(difficulty, GameRng::new(1));
        for round in 1..=4 {
            let Decision::Ready(cards) = ai.define_cards(&ctx, round) else {
                panic!("{difficulty:?} did not define cards");
            };
            assert_eq!(cards.len(), 3);
            for stats in cards {
                assert!(stats.validate(7).is_ok(), "{difficulty:?} round {round}: {stats}");
            }
        }
    }
}

#[test]
fn test_card_sets_follow_custom_budget() {
    let mut config = MatchConfig::default();
    config.card_budget = 10;
    config.cards_per_round = 4;
    let state = MatchState::new(config);
    let ctx = DecisionContext::new(&state, PlayerId::FIRST);

    let mut ai = AiOpponent::new(Difficulty::Hard, GameRng::new(1));
    let Decision::Ready(cards) = ai.define_cards(&ctx, 1) else {
        panic!("no cards");
    };
    assert_eq!(cards.len(), 4);
    assert!(cards.iter().all(|c| c.validate(10).is_ok()));
}

#[test]
fn test_link_unavailable_without_cards() {
    let state = MatchState::new(MatchConfig::default());
    let ctx = DecisionContext::new(&state, PlayerId::SECOND);
    let mut ai = AiOpponent::new(Difficulty::Medium, GameRng::new(2));
    assert_eq!(ai.link_pawn(&ctx), Decision::Unavailable);
}

#[test]
fn test_medium_rps_favours_rock() {
    let mut ai = AiOpponent::new(Difficulty::Medium, GameRng::new(21));
    let mut counts = [0usize; 3];
    for _ in 0..3_000 {
        let choice = ai.select_rps();
        let index = RpsChoice::ALL.iter().position(|&c| c == choice).unwrap();
        counts[index] += 1;
    }
    assert!(counts[0] > counts[2], "rock {} vs scissors {}", counts[0], counts[2]);
    assert!(counts.iter().all(|&n| n > 0));
}

#[test]
fn test_restored_ai_repeats_its_choices() {
    let mut ai = AiOpponent::for_seat(Difficulty::Easy, &GameRng::new(12), PlayerId::SECOND);
    for _ in 0..25 {
        ai.select_rps();
    }

    let json = serde_json::to_string(&ai.checkpoint()).unwrap();
    let checkpoint: AiCheckpoint = serde_json::from_str(&json).unwrap();
    let mut restored = AiOpponent::restore(&checkpoint);
    assert_eq!(restored.difficulty(), Difficulty::Easy);

    let expected: Vec<RpsChoice> = (0..20).map(|_| ai.select_rps()).collect();
    let replayed: Vec<RpsChoice> = (0..20).map(|_| restored.select_rps()).collect();
    assert_eq!(expected, replayed);
}

#[test]
fn test_ai_reports_its_kind_and_delay() {
    let mut ai = AiOpponent::new(Difficulty::Easy, GameRng::new(4));
    assert_eq!(ai.kind(), ActorKind::Ai);
    let request = DecisionRequest {
        seat: PlayerId::SECOND,
        kind: RequestKind::DefineCards,
        cycle: 1,
        round: 1,
        turn: 0,
    };
    let delay = ai.thinking_delay_ms(&request);
    assert!((800..1600).contains(&delay));
}

/// Two AI seats play each other; the controller only needs the clock.
fn run_ai_match(seed: u64, ticks: usize) -> (MatchController, Vec<MatchEvent>) {
    let config = MatchConfig::default().with_seed(seed);
    let root = GameRng::new(seed);
    let first = AiOpponent::for_seat(Difficulty::Medium, &root, PlayerId::FIRST);
    let second = AiOpponent::for_seat(Difficulty::Hard, &root, PlayerId::SECOND);
    let mut ctrl = MatchController::new(config, Box::new(first), Box::new(second)).unwrap();

    let mut events = Vec::new();
    let mut now = 0;
    ctrl.start(now);
    for _ in 0..ticks {
        if ctrl.result().is_some() {
            break;
        }
        now += 50;
        ctrl.tick(now);
        events.extend(ctrl.drain_outbound());
    }
    (ctrl, events)
}

#[test]
fn test_ai_match_is_reproducible() {
    let (a, events_a) = run_ai_match(77, 600);
    let (b, events_b) = run_ai_match(77, 600);

    assert!(!events_a.is_empty());
    assert_eq!(events_a, events_b);
    assert_eq!(a.state().history, b.state().history);
    assert_eq!(a.phase(), b.phase());
}

#[test]
fn test_ai_match_reaches_game_over() {
    let (ctrl, events) = run_ai_match(5, 100_000);

    assert!(ctrl.result().is_some());
    assert_eq!(ctrl.phase(), Phase::GameOver);
    assert!(events.iter().any(|e| matches!(e, MatchEvent::CardsDefined { .. })));
    assert!(events.iter().any(|e| matches!(e, MatchEvent::PawnLinked { .. })));

    let board = &ctrl.state().config.board;
    assert!(ctrl.state().pawns().iter().all(|p| board.contains(p.pos)));
}
