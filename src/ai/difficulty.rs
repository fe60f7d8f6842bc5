//! Difficulty levels and their tuning.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                thinking_ms: (800, 1600),
                aggressiveness: 0.6,
                defensiveness: 0.3,
                strategy_level: 0.0,
                best_pick_probability: 0.0,
            },
            Difficulty::Medium => DifficultyProfile {
                thinking_ms: (600, 1200),
                aggressiveness: 1.0,
                defensiveness: 0.8,
                strategy_level: 0.6,
                best_pick_probability: 0.7,
            },
            Difficulty::Hard => DifficultyProfile {
                thinking_ms: (400, 900),
                aggressiveness: 1.4,
                defensiveness: 1.2,
                strategy_level: 0.9,
                best_pick_probability: 1.0,
            },
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Numeric knobs for one difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    /// Thinking delay range in ms, inclusive start, exclusive end.
    pub thinking_ms: (u64, u64),
    /// Multiplier on attack scores.
    pub aggressiveness: f32,
    /// Multiplier on the lethal counter-attack penalty.
    pub defensiveness: f32,
    /// Probability of using the linking heuristic instead of a random pair.
    pub strategy_level: f32,
    /// Probability of taking the best-scored action.
    pub best_pick_probability: f32,
}
