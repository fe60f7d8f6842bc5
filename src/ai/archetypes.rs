//! Card archetype tables.
//!
//! Pure lookup by difficulty and round: no learning. Every row is a
//! tank / balanced / glass-cannon style split of the standard budget of 7.

use crate::core::CardStats;

use super::difficulty::Difficulty;

/// Budget the tables are written for.
pub const TABLE_BUDGET: u8 = 7;

const fn c(hp: u8, stamina: u8, attack: u8) -> CardStats {
    CardStats::new(hp, stamina, attack)
}

// Rows are rounds 1..=3; later rounds reuse the last row.
const EASY: [[CardStats; 3]; 3] = [
    [c(3, 2, 2), c(3, 2, 2), c(3, 2, 2)],
    [c(4, 2, 1), c(3, 2, 2), c(2, 3, 2)],
    [c(3, 3, 1), c(2, 2, 3), c(3, 2, 2)],
];

const MEDIUM: [[CardStats; 3]; 3] = [
    [c(4, 2, 1), c(3, 2, 2), c(1, 3, 3)],
    [c(3, 3, 1), c(2, 3, 2), c(2, 1, 4)],
    [c(5, 1, 1), c(3, 2, 2), c(1, 2, 4)],
];

const HARD: [[CardStats; 3]; 3] = [
    [c(2, 4, 1), c(3, 2, 2), c(1, 2, 4)],
    [c(4, 1, 2), c(2, 3, 2), c(1, 1, 5)],
    [c(3, 3, 1), c(2, 2, 3), c(1, 3, 3)],
];

/// Card set for `difficulty` in definition round `round` (1-based).
///
/// Budgets other than [`TABLE_BUDGET`] fall back to balanced splits, and
/// the set is cycled to `count` cards.
#[must_use]
pub fn card_set(difficulty: Difficulty, round: u8, budget: u8, count: usize) -> Vec<CardStats> {
    if budget != TABLE_BUDGET {
        return vec![CardStats::balanced(budget); count];
    }
    let table = match difficulty {
        Difficulty::Easy => &EASY,
        Difficulty::Medium => &MEDIUM,
        Difficulty::Hard => &HARD,
    };
    let row = usize::from(round.max(1) - 1).min(table.len() - 1);
    table[row].iter().copied().cycle().take(count).collect()
}
