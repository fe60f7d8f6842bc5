//! Match configuration.
//!
//! Hosts build a `MatchConfig` at startup (or load it from JSON) and hand it
//! to the controller. Both peers must use the same configuration; it is
//! never renegotiated mid-match.
//!
//! - `BoardConfig`: board size, starting cells and haven rows
//! - `PhysicsConfig`: gesture thresholds and knockback tuning
//! - `MatchConfig`: combines all configuration

use serde::{Deserialize, Serialize};

use super::grid::GridPos;
use super::player::PlayerId;
use crate::error::ConfigError;

/// How the first cycle's initiative player is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initiative {
    /// A fixed seat acts first.
    Player(PlayerId),
    /// Decided by a rock-paper-scissors tie-break before the first cycle.
    RockPaperScissors,
}

/// Board geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 7,
            height: 9,
        }
    }
}

impl BoardConfig {
    /// Smallest board that leaves a gap between the two starting rows.
    pub const MIN_SIDE: i32 = 5;

    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// The row `player` defends. An enemy pawn standing on it wins the match.
    #[must_use]
    pub fn haven_row(&self, player: PlayerId) -> i32 {
        if player == PlayerId::FIRST {
            0
        } else {
            self.height - 1
        }
    }

    /// True if `pos` is one of the haven cells `defender` protects.
    #[must_use]
    pub fn is_haven_of(&self, defender: PlayerId, pos: GridPos) -> bool {
        self.contains(pos) && pos.y == self.haven_row(defender)
    }

    /// The row a player's pawns start on, one step in front of their haven.
    #[must_use]
    pub fn start_row(&self, player: PlayerId) -> i32 {
        if player == PlayerId::FIRST {
            1
        } else {
            self.height - 2
        }
    }

    /// Starting cells for `count` pawns, spread evenly across the row.
    #[must_use]
    pub fn start_cells(&self, player: PlayerId, count: usize) -> Vec<GridPos> {
        let row = self.start_row(player);
        let spacing = (self.width / (count as i32).max(1)).max(1);
        let used = spacing * (count as i32 - 1);
        let left = (self.width - 1 - used) / 2;
        (0..count as i32)
            .map(|i| GridPos::new(left + i * spacing, row))
            .collect()
    }
}

/// Attack gesture thresholds and knockback simulation tuning.
///
/// None of these affect rules outcomes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Shortest drag (screen px) accepted as a deliberate attack.
    pub min_drag_distance: f32,
    /// Shortest drag duration (ms) accepted as a deliberate attack.
    pub min_drag_duration_ms: u64,
    /// Drag length that yields full power.
    pub max_drag_distance: f32,
    /// Upper bound of the power scalar.
    pub max_power: f32,
    pub pawn_mass: f32,
    pub restitution: f32,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Launch speed (px per frame) per unit of power.
    pub launch_speed: f32,
    /// Cell size in screen px, used to place bodies.
    pub cell_size: f32,
    pub frame_interval_ms: u64,
    /// Hard cap on replay length.
    pub max_frames: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            min_drag_distance: 20.0,
            min_drag_duration_ms: 80,
            max_drag_distance: 200.0,
            max_power: 10.0,
            pawn_mass: 1.0,
            restitution: 0.8,
            friction: 0.92,
            launch_speed: 3.0,
            cell_size: 64.0,
            frame_interval_ms: 16,
            max_frames: 240,
        }
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub board: BoardConfig,
    pub pawns_per_player: usize,
    /// Stat points every card must spend exactly.
    pub card_budget: u8,
    pub cards_per_round: usize,
    /// Definition rounds before the action phase.
    pub rounds_per_cycle: u8,
    /// Pawns each player links per LINKING phase.
    pub links_per_round: usize,
    pub opening_initiative: Initiative,
    pub physics: PhysicsConfig,
    /// Interval of the defensive win-condition check.
    pub win_check_interval_ms: u64,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            pawns_per_player: 3,
            card_budget: 7,
            cards_per_round: 3,
            rounds_per_cycle: 3,
            links_per_round: 1,
            opening_initiative: Initiative::Player(PlayerId::FIRST),
            physics: PhysicsConfig::default(),
            win_check_interval_ms: 1_000,
            seed: 42,
        }
    }
}

impl MatchConfig {
    /// Parse and validate a JSON configuration. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_board(mut self, width: i32, height: i32) -> Self {
        self.board = BoardConfig { width, height };
        self
    }

    #[must_use]
    pub fn with_pawns_per_player(mut self, count: usize) -> Self {
        self.pawns_per_player = count;
        self
    }

    #[must_use]
    pub fn with_rounds_per_cycle(mut self, rounds: u8) -> Self {
        self.rounds_per_cycle = rounds;
        self
    }

    #[must_use]
    pub fn with_opening_initiative(mut self, initiative: Initiative) -> Self {
        self.opening_initiative = initiative;
        self
    }

    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = BoardConfig::MIN_SIDE;
        if self.board.width < min || self.board.height < min {
            return Err(ConfigError::BoardTooSmall {
                width: self.board.width,
                height: self.board.height,
                min,
            });
        }
        if self.pawns_per_player == 0 {
            return Err(ConfigError::NoPawns);
        }
        if self.pawns_per_player as i32 > self.board.width {
            return Err(ConfigError::TooManyPawns(
                self.pawns_per_player,
                self.board.width,
            ));
        }
        if self.cards_per_round == 0 {
            return Err(ConfigError::ZeroCount {
                field: "cards_per_round",
            });
        }
        if self.rounds_per_cycle == 0 {
            return Err(ConfigError::ZeroCount {
                field: "rounds_per_cycle",
            });
        }
        if self.links_per_round == 0 {
            return Err(ConfigError::ZeroCount {
                field: "links_per_round",
            });
        }
        if self.card_budget == 0 {
            return Err(ConfigError::BudgetTooSmall(self.card_budget));
        }
        let physics = &self.physics;
        for (field, value) in [
            ("max_drag_distance", physics.max_drag_distance),
            ("max_power", physics.max_power),
            ("pawn_mass", physics.pawn_mass),
            ("launch_speed", physics.launch_speed),
            ("cell_size", physics.cell_size),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositivePhysics { field, value });
            }
        }
        if physics.max_frames == 0 {
            return Err(ConfigError::ZeroCount {
                field: "physics.max_frames",
            });
        }
        Ok(())
    }
}
