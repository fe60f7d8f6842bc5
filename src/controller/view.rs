//! Read-only surface for the rendering layer.

use serde::Serialize;
use smallvec::SmallVec;

use crate::core::{GridPos, MatchState, Pawn, PawnId, PlayerId};
use crate::error::ActionError;
use crate::physics::{AttackCoordinator, Vec2};
use crate::rules::ActionResolver;

/// Display state of one pawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PawnView {
    pub id: PawnId,
    pub owner: PlayerId,
    pub pos: GridPos,
    /// Cosmetic screen position while a replay displaces the pawn.
    pub visual: Option<Vec2>,
    pub hp: i32,
    pub max_hp: i32,
    pub stamina: u32,
    pub attack: u32,
    pub active: bool,
    pub eliminated: bool,
    pub acted: bool,
}

impl PawnView {
    #[must_use]
    pub fn new(pawn: &Pawn, coordinator: &AttackCoordinator) -> Self {
        Self {
            id: pawn.id,
            owner: pawn.owner,
            pos: pawn.pos,
            visual: coordinator.visual_position(pawn.id),
            hp: pawn.hp,
            max_hp: pawn.max_hp,
            stamina: pawn.stamina,
            attack: pawn.attack,
            active: pawn.active,
            eliminated: pawn.eliminated,
            acted: pawn.acted,
        }
    }
}

/// Where a selected pawn could go and whom it could hit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PossibleTargets {
    pub moves: Vec<GridPos>,
    pub attacks: SmallVec<[PawnId; 4]>,
}

impl PossibleTargets {
    #[must_use]
    pub fn for_pawn(state: &MatchState, pawn: &Pawn) -> Self {
        Self {
            moves: ActionResolver::legal_moves(state, pawn),
            attacks: ActionResolver::legal_attacks(state, pawn),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty()
    }
}

/// Transient message for a rejected local request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
    pub at_ms: u64,
}

impl Notice {
    #[must_use]
    pub fn from_error(err: &ActionError, at_ms: u64) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            at_ms,
        }
    }
}
