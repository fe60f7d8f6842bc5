//! Action resolver.
//!
//! Validates and applies a single Move or Attack against the current state
//! and detects win conditions. Validation never mutates state; application
//! assumes the action was validated.
//!
//! The rules outcome of an attack (damage, elimination, the attacker's
//! final cell) is fixed here, before any knockback animation starts.

use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Action, GridPos, MatchState, Pawn, PawnId, PlayerId};
use crate::error::ActionError;
use crate::phase::Phase;

use super::result::MatchResult;

/// What an accepted move changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub pawn: PawnId,
    pub from: GridPos,
    pub to: GridPos,
}

/// What an accepted attack changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker: PawnId,
    pub target: PawnId,
    pub damage: u32,
    pub target_hp: i32,
    pub eliminated: bool,
    /// Attacker's cell before the attack.
    pub attacker_from: GridPos,
    /// Attacker's logical cell after the attack: the target's pre-attack
    /// cell when the target was eliminated, unchanged otherwise.
    pub attacker_to: GridPos,
}

/// Stateless rules for the ACTION phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionResolver;

impl ActionResolver {
    /// Reject requests outside `player`'s own turn, during an animation or
    /// after the match ended.
    pub fn check_turn(state: &MatchState, player: PlayerId) -> Result<(), ActionError> {
        if state.is_over() {
            return Err(ActionError::MatchOver);
        }
        if state.is_animating {
            return Err(ActionError::Animating);
        }
        if !matches!(state.phase, Phase::Action | Phase::AwaitingActionTarget) {
            return Err(ActionError::WrongPhase(player, state.phase.name()));
        }
        if state.current_player != player {
            return Err(ActionError::NotYourTurn(player));
        }
        Ok(())
    }

    /// Look up a pawn `player` may act with.
    pub fn own_active_pawn(
        state: &MatchState,
        player: PlayerId,
        id: PawnId,
    ) -> Result<&Pawn, ActionError> {
        let pawn = state.pawn(id).ok_or(ActionError::UnknownPawn(id))?;
        if pawn.owner != player {
            return Err(ActionError::NotOwner(id, player));
        }
        if !pawn.active {
            return Err(ActionError::PawnInactive(id));
        }
        Ok(pawn)
    }

    /// Legal iff the target cell is on the board, unoccupied, and within the
    /// pawn's remaining stamina (Manhattan distance).
    pub fn validate_move(
        state: &MatchState,
        player: PlayerId,
        pawn: PawnId,
        to: GridPos,
    ) -> Result<(), ActionError> {
        let pawn = Self::own_active_pawn(state, player, pawn)?;
        if !state.config.board.contains(to) {
            return Err(ActionError::OutOfBounds(to));
        }
        if state.pawn_at(to).is_some() {
            return Err(ActionError::Occupied(to));
        }
        let distance = pawn.pos.manhattan(to);
        if distance > pawn.stamina {
            return Err(ActionError::OutOfRange {
                distance,
                stamina: pawn.stamina,
            });
        }
        Ok(())
    }

    /// Legal iff the two pawns are exactly one cell apart, the target is an
    /// active enemy, and the attacker has not attacked this cycle.
    pub fn validate_attack(
        state: &MatchState,
        player: PlayerId,
        attacker: PawnId,
        target: PawnId,
    ) -> Result<(), ActionError> {
        let attacker_pawn = Self::own_active_pawn(state, player, attacker)?;
        let target_pawn = state.pawn(target).ok_or(ActionError::UnknownPawn(target))?;
        if target_pawn.owner == player {
            return Err(ActionError::FriendlyTarget(target));
        }
        if !target_pawn.active {
            return Err(ActionError::PawnInactive(target));
        }
        if attacker_pawn.acted {
            return Err(ActionError::AlreadyActed(attacker));
        }
        if attacker_pawn.pos.manhattan(target_pawn.pos) != 1 {
            return Err(ActionError::NotAdjacent(attacker, target));
        }
        Ok(())
    }

    /// Validate any action-phase action, including turn ownership.
    pub fn validate(state: &MatchState, player: PlayerId, action: &Action) -> Result<(), ActionError> {
        Self::check_turn(state, player)?;
        match *action {
            Action::Move { pawn, to } => Self::validate_move(state, player, pawn, to),
            Action::Attack { attacker, target } => {
                Self::validate_attack(state, player, attacker, target)
            }
            Action::Pass => Ok(()),
        }
    }

    /// Move the pawn and spend all of its stamina.
    ///
    /// Returns `None` if the pawn no longer exists.
    pub fn apply_move(state: &mut MatchState, pawn: PawnId, to: GridPos) -> Option<MoveOutcome> {
        let pawn = state.pawn_mut(pawn)?;
        let from = pawn.pos;
        pawn.pos = to;
        pawn.stamina = 0;
        debug!(pawn = %pawn.id, %from, %to, "move applied");
        Some(MoveOutcome {
            pawn: pawn.id,
            from,
            to,
        })
    }

    /// Deal the attacker's Attack as damage to the target.
    ///
    /// On a lethal blow the target is eliminated and the attacker advances
    /// into its cell. Returns `None` if either pawn no longer exists.
    pub fn apply_attack(
        state: &mut MatchState,
        attacker: PawnId,
        target: PawnId,
    ) -> Option<AttackOutcome> {
        let (damage, attacker_from) = {
            let pawn = state.pawn(attacker)?;
            (pawn.attack, pawn.pos)
        };
        let target_pawn = state.pawn_mut(target)?;
        let target_cell = target_pawn.pos;
        let eliminated = target_pawn.take_damage(damage);
        let target_hp = target_pawn.hp;

        let attacker_pawn = state.pawn_mut(attacker)?;
        attacker_pawn.acted = true;
        if eliminated {
            attacker_pawn.pos = target_cell;
        }
        let attacker_to = attacker_pawn.pos;

        debug!(%attacker, %target, damage, target_hp, eliminated, "attack applied");
        Some(AttackOutcome {
            attacker,
            target,
            damage,
            target_hp,
            eliminated,
            attacker_from,
            attacker_to,
        })
    }

    /// A player wins when one of their pawns stands on a haven cell of the
    /// opponent, or every opponent pawn is eliminated. Both players winning
    /// in the same step is a draw.
    #[must_use]
    pub fn check_win(state: &MatchState) -> Option<MatchResult> {
        let wins = |player: PlayerId| {
            let opponent = player.opponent();
            let on_haven = state
                .pawns_of(player)
                .filter(|p| p.occupies_cell())
                .any(|p| state.config.board.is_haven_of(opponent, p.pos));
            on_haven || state.surviving_count(opponent) == 0
        };

        match (wins(PlayerId::FIRST), wins(PlayerId::SECOND)) {
            (true, true) => Some(MatchResult::Draw),
            (true, false) => Some(MatchResult::Winner(PlayerId::FIRST)),
            (false, true) => Some(MatchResult::Winner(PlayerId::SECOND)),
            (false, false) => None,
        }
    }

    // === Queries ===

    /// Every cell the pawn could legally move to.
    #[must_use]
    pub fn legal_moves(state: &MatchState, pawn: &Pawn) -> Vec<GridPos> {
        Self::move_cells(state, pawn).collect()
    }

    /// Free in-bounds cells within the pawn's remaining stamina. Moves need
    /// no path, so a pawn boxed in by its neighbours may still jump out.
    fn move_cells<'a>(state: &'a MatchState, pawn: &Pawn) -> impl Iterator<Item = GridPos> + 'a {
        let range = if pawn.active { pawn.stamina as i32 } else { 0 };
        let origin = pawn.pos;
        let occupancy = state.occupancy();
        (-range..=range)
            .flat_map(move |dy| {
                let span = range - dy.abs();
                (-span..=span).map(move |dx| (dx, dy))
            })
            .filter(|&offset| offset != (0, 0))
            .map(move |(dx, dy)| GridPos::new(origin.x + dx, origin.y + dy))
            .filter(move |cell| state.config.board.contains(*cell) && !occupancy.contains_key(cell))
    }

    /// Every enemy the pawn could legally attack.
    #[must_use]
    pub fn legal_attacks(state: &MatchState, pawn: &Pawn) -> SmallVec<[PawnId; 4]> {
        if !pawn.active || pawn.acted {
            return SmallVec::new();
        }
        pawn.pos
            .neighbors()
            .into_iter()
            .filter_map(|cell| state.pawn_at(cell))
            .filter(|other| other.active && other.owner != pawn.owner)
            .map(|other| other.id)
            .collect()
    }

    /// True if the pawn has at least one legal move or attack.
    #[must_use]
    pub fn can_act(state: &MatchState, pawn: &Pawn) -> bool {
        if !pawn.active {
            return false;
        }
        !Self::legal_attacks(state, pawn).is_empty() || Self::move_cells(state, pawn).next().is_some()
    }

    /// True if any of the player's pawns can act.
    #[must_use]
    pub fn player_can_act(state: &MatchState, player: PlayerId) -> bool {
        state.pawns_of(player).any(|p| Self::can_act(state, p))
    }

    /// Enumerate every legal move and attack for the player. Pass is not
    /// included.
    #[must_use]
    pub fn legal_actions(state: &MatchState, player: PlayerId) -> Vec<Action> {
        let mut actions = Vec::new();
        for pawn in state.pawns_of(player).filter(|p| p.active) {
            for target in Self::legal_attacks(state, pawn) {
                actions.push(Action::Attack {
                    attacker: pawn.id,
                    target,
                });
            }
            for to in Self::legal_moves(state, pawn) {
                actions.push(Action::Move { pawn: pawn.id, to });
            }
        }
        actions
    }
}
