//! Benchmarks for AI action selection.
//!
//! Run with: `cargo bench --bench ai_selection`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pawn_tactics::core::{Card, CardId, CardStats, GridPos, MatchConfig, MatchState, PawnId, PlayerId};
use pawn_tactics::{AiOpponent, Difficulty, GameRng, Phase};

/// Mid-cycle position: every pawn linked, the two lines one row apart.
fn skirmish() -> MatchState {
    let mut state = MatchState::new(MatchConfig::default());
    state.cycle = 1;
    state.phase = Phase::Action;
    state.current_player = PlayerId::SECOND;

    let layout = [(0, 4), (2, 4), (4, 4), (1, 5), (3, 5), (5, 5)];
    for (index, &(x, y)) in layout.iter().enumerate() {
        let id = PawnId(index as u32);
        let owner = state.pawn(id).map_or(PlayerId::FIRST, |p| p.owner);
        let card = Card::new(CardId::compose(owner, 1, index as u8), CardStats::new(3, 2, 2));
        if let Some(pawn) = state.pawn_mut(id) {
            pawn.link(&card);
            pawn.pos = GridPos::new(x, y);
        }
    }
    state
}

fn benchmark_select_action(c: &mut Criterion) {
    let state = skirmish();
    let mut group = c.benchmark_group("AI select_action");

    for difficulty in Difficulty::ALL {
        let mut ai = AiOpponent::new(difficulty, GameRng::new(7));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{difficulty:?}")),
            &state,
            |b, state| {
                b.iter(|| black_box(ai.select_action(black_box(state), PlayerId::SECOND)));
            },
        );
    }
    group.finish();
}

fn benchmark_select_link(c: &mut Criterion) {
    let mut state = MatchState::new(MatchConfig::default());
    for slot in 0..3u8 {
        let id = CardId::compose(PlayerId::SECOND, 1, slot);
        state.players[PlayerId::SECOND]
            .cards
            .push(Card::new(id, CardStats::new(1 + slot, 5 - 2 * slot.min(2), 1 + slot)));
    }

    let mut ai = AiOpponent::new(Difficulty::Hard, GameRng::new(7));
    c.bench_function("AI select_link/hard", |b| {
        b.iter(|| black_box(ai.select_link(black_box(&state), PlayerId::SECOND)));
    });
}

criterion_group!(benches, benchmark_select_action, benchmark_select_link);
criterion_main!(benches);
