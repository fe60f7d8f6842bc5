//! Heuristic AI opponent.
//!
//! Plugs into the same [`ActorPolicy`] contract as a human seat. Every
//! random choice draws from the seat's own [`GameRng`] stream, so a match
//! replays identically from the same seed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actors::{ActionChoice, ActorKind, ActorPolicy, Decision, DecisionContext, DecisionRequest};
use crate::core::{Action, CardId, CardStats, GameRng, GameRngState, MatchState, Pawn, PawnId, PlayerId};
use crate::phase::RpsChoice;
use crate::rules::ActionResolver;

use super::archetypes;
use super::difficulty::{Difficulty, DifficultyProfile};
use super::scoring;

/// Medium's bias over rock, paper, scissors.
const MEDIUM_RPS_WEIGHTS: [f32; 3] = [0.4, 0.35, 0.25];

/// Weight of the card's Attack in the linking heuristic.
const LINK_ATTACK_WEIGHT: f32 = 0.5;

/// Saved AI seat: difficulty plus the exact position in its RNG stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiCheckpoint {
    pub difficulty: Difficulty,
    pub rng: GameRngState,
}

#[derive(Clone, Debug)]
pub struct AiOpponent {
    difficulty: Difficulty,
    profile: DifficultyProfile,
    rng: GameRng,
}

impl AiOpponent {
    #[must_use]
    pub fn new(difficulty: Difficulty, rng: GameRng) -> Self {
        Self {
            difficulty,
            profile: difficulty.profile(),
            rng,
        }
    }

    /// Opponent with the seat's own stream derived from the match RNG.
    #[must_use]
    pub fn for_seat(difficulty: Difficulty, root: &GameRng, seat: PlayerId) -> Self {
        Self::new(difficulty, root.for_context(&format!("ai-seat-{}", seat.index())))
    }

    /// Capture the seat so a saved match makes the same choices on reload.
    #[must_use]
    pub fn checkpoint(&self) -> AiCheckpoint {
        AiCheckpoint {
            difficulty: self.difficulty,
            rng: self.rng.state(),
        }
    }

    #[must_use]
    pub fn restore(checkpoint: &AiCheckpoint) -> Self {
        Self::new(checkpoint.difficulty, GameRng::from_state(&checkpoint.rng))
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Pick an ACTION-phase action. `Pass` when nothing is legal.
    pub fn select_action(&mut self, state: &MatchState, seat: PlayerId) -> Action {
        let candidates = ActionResolver::legal_actions(state, seat);
        if candidates.is_empty() {
            debug!(%seat, "no legal action, passing");
            return Action::Pass;
        }

        let take_best = match self.difficulty {
            Difficulty::Easy => false,
            Difficulty::Medium => self.rng.gen_bool(f64::from(self.profile.best_pick_probability)),
            Difficulty::Hard => true,
        };

        let index = if take_best {
            let scores: Vec<f32> = candidates
                .iter()
                .map(|a| scoring::score_action(state, seat, a, &self.profile))
                .collect();
            scoring::best_index(&scores).unwrap_or(0)
        } else {
            self.rng.gen_range_usize(0..candidates.len())
        };

        let action = candidates[index];
        debug!(%seat, ?action, take_best, options = candidates.len(), "ai action");
        action
    }

    /// Pick a pawn/card pair to link, or `None` if no pair exists.
    pub fn select_link(&mut self, state: &MatchState, seat: PlayerId) -> Option<(PawnId, CardId)> {
        let pawns: Vec<&Pawn> = state.pawns_of(seat).filter(|p| p.is_linkable()).collect();
        let cards: Vec<(CardId, CardStats)> = state.players[seat]
            .available_cards()
            .map(|c| (c.id, c.stats))
            .collect();
        if pawns.is_empty() || cards.is_empty() {
            return None;
        }

        let strategic = match self.difficulty {
            Difficulty::Easy => false,
            Difficulty::Medium | Difficulty::Hard => {
                self.rng.gen_bool(f64::from(self.profile.strategy_level))
            }
        };

        if !strategic {
            let pawn = pawns[self.rng.gen_range_usize(0..pawns.len())].id;
            let card = cards[self.rng.gen_range_usize(0..cards.len())].0;
            return Some((pawn, card));
        }

        let mut best: Option<(PawnId, CardId, f32)> = None;
        for pawn in &pawns {
            let forward = forwardness(state, seat, pawn);
            for &(card, stats) in &cards {
                let fit = forward * f32::from(stats.stamina)
                    + (1.0 - forward) * f32::from(stats.hp)
                    + LINK_ATTACK_WEIGHT * f32::from(stats.attack);
                if best.map_or(true, |(_, _, top)| fit > top) {
                    best = Some((pawn.id, card, fit));
                }
            }
        }
        best.map(|(pawn, card, _)| (pawn, card))
    }

    pub fn select_rps(&mut self) -> RpsChoice {
        let index = match self.difficulty {
            Difficulty::Medium => self.rng.choose_weighted(&MEDIUM_RPS_WEIGHTS).unwrap_or(0),
            // Hard has no opponent model; uniform like easy.
            Difficulty::Easy | Difficulty::Hard => self.rng.gen_range_usize(0..RpsChoice::ALL.len()),
        };
        RpsChoice::ALL[index]
    }
}

/// 1.0 on the row next to the enemy haven, 0.0 on our own haven row.
fn forwardness(state: &MatchState, seat: PlayerId, pawn: &Pawn) -> f32 {
    let board = &state.config.board;
    let span = (board.height - 1).max(1) as f32;
    let to_go = (pawn.pos.y - board.haven_row(seat.opponent())).abs() as f32;
    (1.0 - to_go / span).clamp(0.0, 1.0)
}

impl ActorPolicy for AiOpponent {
    fn kind(&self) -> ActorKind {
        ActorKind::Ai
    }

    fn thinking_delay_ms(&mut self, _request: &DecisionRequest) -> u64 {
        let (lo, hi) = self.profile.thinking_ms;
        self.rng.gen_range_u64(lo..hi)
    }

    fn define_cards(&mut self, ctx: &DecisionContext<'_>, round: u8) -> Decision<Vec<CardStats>> {
        let config = &ctx.state.config;
        Decision::Ready(archetypes::card_set(
            self.difficulty,
            round,
            config.card_budget,
            config.cards_per_round,
        ))
    }

    fn link_pawn(&mut self, ctx: &DecisionContext<'_>) -> Decision<(PawnId, CardId)> {
        match self.select_link(ctx.state, ctx.seat) {
            Some(pair) => Decision::Ready(pair),
            None => Decision::Unavailable,
        }
    }

    fn choose_action(&mut self, ctx: &DecisionContext<'_>) -> Decision<ActionChoice> {
        Decision::Ready(ActionChoice::new(self.select_action(ctx.state, ctx.seat)))
    }

    fn choose_rps(&mut self, _ctx: &DecisionContext<'_>) -> Decision<RpsChoice> {
        Decision::Ready(self.select_rps())
    }
}
