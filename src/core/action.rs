//! Action-phase actions and the history record.
//!
//! Setup-phase submissions (card definitions, links, RPS) are not actions;
//! they are handled by the phase machine directly.

use serde::{Deserialize, Serialize};

use super::entity::PawnId;
use super::grid::GridPos;
use super::player::PlayerId;

/// One turn's worth of intent in the ACTION phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move a pawn, spending all of its remaining stamina.
    Move { pawn: PawnId, to: GridPos },
    /// Attack an adjacent enemy pawn.
    Attack { attacker: PawnId, target: PawnId },
    /// End the turn without acting.
    Pass,
}

impl Action {
    /// The acting pawn, if any.
    #[must_use]
    pub fn actor(&self) -> Option<PawnId> {
        match *self {
            Action::Move { pawn, .. } => Some(pawn),
            Action::Attack { attacker, .. } => Some(attacker),
            Action::Pass => None,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

/// A recorded action with ordering metadata.
///
/// Used for replay/debugging and to compare the two peers' histories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    pub cycle: u32,
    /// Turn number within the cycle's ACTION phase (starts at 1).
    pub turn: u32,
    /// Sequence number across the whole match.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, cycle: u32, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            cycle,
            turn,
            sequence,
        }
    }
}
