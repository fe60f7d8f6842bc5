//! Match state: the single authoritative data tree of a match.
//!
//! `MatchState` owns both players' sub-state and, through them, every pawn
//! and card. Nothing outside the tree holds a reference into it; other
//! components look entities up by id.
//!
//! ## Invariants
//!
//! - `is_animating == true` blocks every new action submission.
//! - A card, once linked, is `spent` and referenced by exactly one pawn
//!   until the cycle ends.
//! - Pawn ids are dense: `pawns[i].id == PawnId(i)`.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::card::Card;
use super::config::MatchConfig;
use super::entity::{CardId, PawnId};
use super::grid::GridPos;
use super::pawn::Pawn;
use super::player::{PlayerId, PlayerMap};
use crate::phase::{Phase, RpsChoice};
use crate::rules::MatchResult;

/// Per-player sub-state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Roster in starting order. Fixed for the match.
    pub pawns: Vec<PawnId>,
    /// Every card defined this cycle, spent or not.
    pub cards: Vec<Card>,
    /// Submitted a card set for the current definition round.
    pub defined_this_round: bool,
    /// Links made in the current LINKING phase.
    pub links_made: usize,
    /// Links owed in the current LINKING phase.
    pub links_required: usize,
    /// Pending tie-break choice.
    pub rps_choice: Option<RpsChoice>,
}

impl PlayerState {
    /// Cards that can still be linked.
    pub fn available_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| !c.spent)
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn links_outstanding(&self) -> bool {
        self.links_made < self.links_required
    }
}

/// Authoritative match state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    pub phase: Phase,
    /// Starts at 0 in PRE_GAME, 1 for the first cycle.
    pub cycle: u32,
    /// Definition round within the cycle (1-based, 0 outside setup).
    pub round: u8,
    /// Turn counter within the ACTION phase.
    pub turn: u32,
    pub current_player: PlayerId,
    pub initiative: PlayerId,
    pub players: PlayerMap<PlayerState>,
    pawns: Vec<Pawn>,
    pub selected_pawn: Option<PawnId>,
    pub result: Option<MatchResult>,
    pub is_animating: bool,
    /// Consecutive passes in the ACTION phase; two exhaust the cycle.
    pub consecutive_passes: u8,
    pub history: Vector<ActionRecord>,
    sequence: u32,
}

impl MatchState {
    /// Create a match in PRE_GAME with every pawn on its starting cell.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let mut pawns = Vec::with_capacity(config.pawns_per_player * 2);
        let mut players: PlayerMap<PlayerState> = PlayerMap::with_default();

        for player in PlayerId::all() {
            for pos in config.board.start_cells(player, config.pawns_per_player) {
                let id = PawnId(pawns.len() as u32);
                pawns.push(Pawn::new(id, player, pos));
                players[player].pawns.push(id);
            }
        }

        Self {
            config,
            phase: Phase::PreGame,
            cycle: 0,
            round: 0,
            turn: 0,
            current_player: PlayerId::FIRST,
            initiative: PlayerId::FIRST,
            players,
            pawns,
            selected_pawn: None,
            result: None,
            is_animating: false,
            consecutive_passes: 0,
            history: Vector::new(),
            sequence: 0,
        }
    }

    // === Pawns ===

    #[must_use]
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.get(id.0 as usize)
    }

    pub fn pawn_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.get_mut(id.0 as usize)
    }

    /// Every pawn of both players.
    #[must_use]
    pub fn pawns(&self) -> &[Pawn] {
        &self.pawns
    }

    pub fn pawns_mut(&mut self) -> impl Iterator<Item = &mut Pawn> {
        self.pawns.iter_mut()
    }

    /// A player's pawns in roster order.
    pub fn pawns_of(&self, player: PlayerId) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.owner == player)
    }

    /// The pawn occupying a cell, if any. Eliminated pawns occupy nothing.
    #[must_use]
    pub fn pawn_at(&self, pos: GridPos) -> Option<&Pawn> {
        self.pawns.iter().find(|p| p.occupies_cell() && p.pos == pos)
    }

    /// Cell → pawn index for bulk queries.
    #[must_use]
    pub fn occupancy(&self) -> FxHashMap<GridPos, PawnId> {
        self.pawns
            .iter()
            .filter(|p| p.occupies_cell())
            .map(|p| (p.pos, p.id))
            .collect()
    }

    /// Pawns of `player` that have not been eliminated.
    #[must_use]
    pub fn surviving_count(&self, player: PlayerId) -> usize {
        self.pawns_of(player).filter(|p| p.is_alive()).count()
    }

    // === Progression ===

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Append an accepted action to the history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    /// Get the next action sequence number and increment.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }
}
