//! Match outcome.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// Single winner.
    Winner(PlayerId),
    /// Both players met a win condition in the same resolution step.
    Draw,
}

impl MatchResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, MatchResult::Winner(p) if *p == player)
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            MatchResult::Winner(p) => Some(*p),
            MatchResult::Draw => None,
        }
    }
}
