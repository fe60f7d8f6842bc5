//! Action scoring for the AI opponent.
//!
//! All scoring functions are pure. Higher is better; scores can be
//! negative when an action walks into a lethal counter-attack.

use crate::core::{Action, GridPos, MatchState, Pawn, PlayerId};

use super::difficulty::DifficultyProfile;

const ATTACK_BASE: f32 = 40.0;
const LETHAL_BONUS: f32 = 50.0;
/// Per point of the target's Attack.
const TARGET_VALUE: f32 = 5.0;
/// Target within this many rows of our haven.
const THREAT_ROWS: i32 = 2;
const THREAT_BONUS: f32 = 20.0;
const COUNTER_PENALTY: f32 = 60.0;

const ADVANCE_PER_ROW: f32 = 10.0;
const HAVEN_BONUS: f32 = 200.0;
const EXPOSURE_PENALTY: f32 = 40.0;
const ENGAGE_BONUS: f32 = 15.0;

/// Score any action for `seat`. Pass scores zero; unknown pawns score
/// `f32::MIN`.
#[must_use]
pub fn score_action(state: &MatchState, seat: PlayerId, action: &Action, profile: &DifficultyProfile) -> f32 {
    match *action {
        Action::Attack { attacker, target } => match (state.pawn(attacker), state.pawn(target)) {
            (Some(a), Some(t)) => score_attack(state, seat, a, t, profile),
            _ => f32::MIN,
        },
        Action::Move { pawn, to } => match state.pawn(pawn) {
            Some(p) => score_move(state, seat, p, to, profile),
            None => f32::MIN,
        },
        Action::Pass => 0.0,
    }
}

/// Flat base plus lethal and high-value bonuses, scaled by
/// aggressiveness, minus the defensiveness-scaled penalty when the
/// surviving target could kill the attacker on its reply.
#[must_use]
pub fn score_attack(
    state: &MatchState,
    seat: PlayerId,
    attacker: &Pawn,
    target: &Pawn,
    profile: &DifficultyProfile,
) -> f32 {
    let lethal = attacker.attack as i32 >= target.hp;
    let mut score = ATTACK_BASE + target.attack as f32 * TARGET_VALUE;
    if lethal {
        score += LETHAL_BONUS;
    }
    let our_haven = state.config.board.haven_row(seat);
    if (target.pos.y - our_haven).abs() <= THREAT_ROWS {
        score += THREAT_BONUS;
    }
    score *= profile.aggressiveness;

    if !lethal && can_strike(target) && target.attack as i32 >= attacker.hp {
        score -= COUNTER_PENALTY * profile.defensiveness;
    }
    score
}

/// Rows gained toward the enemy haven, a large bonus for landing on it,
/// and adjacency risk/opportunity at the destination.
#[must_use]
pub fn score_move(state: &MatchState, seat: PlayerId, pawn: &Pawn, to: GridPos, profile: &DifficultyProfile) -> f32 {
    let enemy_haven = state.config.board.haven_row(seat.opponent());
    let before = (pawn.pos.y - enemy_haven).abs();
    let after = (to.y - enemy_haven).abs();
    let mut score = (before - after) as f32 * ADVANCE_PER_ROW;
    if after == 0 {
        score += HAVEN_BONUS;
    }

    for cell in to.neighbors() {
        let Some(enemy) = state.pawn_at(cell) else {
            continue;
        };
        if enemy.owner == seat || enemy.id == pawn.id || !enemy.active {
            continue;
        }
        if can_strike(enemy) && enemy.attack as i32 >= pawn.hp {
            score -= EXPOSURE_PENALTY * profile.defensiveness;
        } else if !pawn.acted {
            score += ENGAGE_BONUS * profile.aggressiveness;
        }
    }
    score
}

fn can_strike(pawn: &Pawn) -> bool {
    pawn.active && !pawn.acted && pawn.attack > 0
}

/// Index of the best-scored action; earliest wins ties.
#[must_use]
pub fn best_index(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &s)| match best {
            Some((_, top)) if top >= s => best,
            _ => Some((i, s)),
        })
        .map(|(i, _)| i)
}
