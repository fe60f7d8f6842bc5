//! Local human seat.

use crate::core::{CardId, CardStats, PawnId};
use crate::phase::RpsChoice;

use super::{ActionChoice, ActorKind, ActorPolicy, Decision, DecisionContext};

/// Seat driven by the local UI through the controller's entry points.
///
/// Polling never produces a decision; the UI calls `define_cards`,
/// `link_pawn`, `move_pawn`, `attack`, `pass` and `choose_rps` on the
/// controller directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalInput;

impl LocalInput {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ActorPolicy for LocalInput {
    fn kind(&self) -> ActorKind {
        ActorKind::Local
    }

    fn define_cards(&mut self, _ctx: &DecisionContext<'_>, _round: u8) -> Decision<Vec<CardStats>> {
        Decision::Pending
    }

    fn link_pawn(&mut self, _ctx: &DecisionContext<'_>) -> Decision<(PawnId, CardId)> {
        Decision::Pending
    }

    fn choose_action(&mut self, _ctx: &DecisionContext<'_>) -> Decision<ActionChoice> {
        Decision::Pending
    }

    fn choose_rps(&mut self, _ctx: &DecisionContext<'_>) -> Decision<RpsChoice> {
        Decision::Pending
    }
}
