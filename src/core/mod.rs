//! Core types: ids, players, board geometry, cards, pawns, configuration,
//! RNG, action records and the authoritative match state.

pub mod action;
pub mod card;
pub mod config;
pub mod entity;
pub mod grid;
pub mod pawn;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use card::{Card, CardStats};
pub use config::{BoardConfig, Initiative, MatchConfig, PhysicsConfig};
pub use entity::{CardId, PawnId};
pub use grid::GridPos;
pub use pawn::Pawn;
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{MatchState, PlayerState};
