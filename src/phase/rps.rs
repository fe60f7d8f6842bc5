//! Rock-paper-scissors tie-break for initiative.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    pub const ALL: [RpsChoice; 3] = [RpsChoice::Rock, RpsChoice::Paper, RpsChoice::Scissors];

    /// True if `self` defeats `other`.
    #[must_use]
    pub fn beats(self, other: RpsChoice) -> bool {
        matches!(
            (self, other),
            (RpsChoice::Rock, RpsChoice::Scissors)
                | (RpsChoice::Paper, RpsChoice::Rock)
                | (RpsChoice::Scissors, RpsChoice::Paper)
        )
    }
}

/// Decide a round. `None` means a tie and the round is replayed.
///
/// ```
/// use pawn_tactics::core::PlayerId;
/// use pawn_tactics::phase::{resolve_rps, RpsChoice};
///
/// assert_eq!(resolve_rps(RpsChoice::Paper, RpsChoice::Rock), Some(PlayerId::FIRST));
/// assert_eq!(resolve_rps(RpsChoice::Rock, RpsChoice::Rock), None);
/// ```
#[must_use]
pub fn resolve_rps(first: RpsChoice, second: RpsChoice) -> Option<PlayerId> {
    if first.beats(second) {
        Some(PlayerId::FIRST)
    } else if second.beats(first) {
        Some(PlayerId::SECOND)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pair_has_one_outcome() {
        for a in RpsChoice::ALL {
            for b in RpsChoice::ALL {
                let outcome = resolve_rps(a, b);
                if a == b {
                    assert_eq!(outcome, None);
                } else {
                    assert!(outcome.is_some());
                    assert_ne!(a.beats(b), b.beats(a));
                }
            }
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&RpsChoice::Scissors).unwrap(), "\"scissors\"");
    }
}
