//! Pawns: the pieces on the board.
//!
//! ## Lifecycle
//!
//! - Created once at match start on a fixed starting cell.
//! - Inactive until linked to a card, which sets HP, stamina and attack.
//! - Reset at every new cycle: inactive, unlinked, HP and stamina cleared.
//! - Elimination is permanent for the match; an eliminated pawn keeps its
//!   slot in the roster but no longer occupies a cell.

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::entity::{CardId, PawnId};
use super::grid::GridPos;
use super::player::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub owner: PlayerId,
    pub pos: GridPos,
    /// Linked this cycle and not eliminated.
    pub active: bool,
    pub eliminated: bool,
    pub linked_card: Option<CardId>,
    pub hp: i32,
    pub max_hp: i32,
    /// Per-cycle movement budget; a move spends all of it.
    pub stamina: u32,
    pub attack: u32,
    /// Has attacked this cycle.
    pub acted: bool,
}

impl Pawn {
    #[must_use]
    pub fn new(id: PawnId, owner: PlayerId, pos: GridPos) -> Self {
        Self {
            id,
            owner,
            pos,
            active: false,
            eliminated: false,
            linked_card: None,
            hp: 0,
            max_hp: 0,
            stamina: 0,
            attack: 0,
            acted: false,
        }
    }

    /// Bind a card's stats to this pawn and activate it.
    pub fn link(&mut self, card: &Card) {
        self.linked_card = Some(card.id);
        self.hp = i32::from(card.stats.hp);
        self.max_hp = self.hp;
        self.stamina = u32::from(card.stats.stamina);
        self.attack = u32::from(card.stats.attack);
        self.acted = false;
        self.active = true;
    }

    /// Clear per-cycle state. Eliminated pawns stay eliminated.
    pub fn reset_for_cycle(&mut self) {
        self.active = false;
        self.linked_card = None;
        self.hp = 0;
        self.max_hp = 0;
        self.stamina = 0;
        self.attack = 0;
        self.acted = false;
    }

    /// Apply damage. Returns true if this eliminated the pawn.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hp -= amount as i32;
        if self.hp <= 0 {
            self.hp = 0;
            self.active = false;
            self.eliminated = true;
            true
        } else {
            false
        }
    }

    /// Still part of the match (may be inactive between cycles).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }

    /// Occupies its cell for movement and adjacency purposes.
    #[must_use]
    pub fn occupies_cell(&self) -> bool {
        !self.eliminated
    }

    /// Eligible for linking in the current cycle.
    #[must_use]
    pub fn is_linkable(&self) -> bool {
        !self.eliminated && self.linked_card.is_none()
    }
}
