//! Scripted opponent.
//!
//! - `Difficulty`: easy / medium / hard and their numeric profiles
//! - `archetypes`: per-round card tables
//! - `scoring`: attack and move heuristics
//! - `AiOpponent`: the [`crate::actors::ActorPolicy`] implementation

pub mod archetypes;
pub mod difficulty;
pub mod policy;
pub mod scoring;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use policy::{AiCheckpoint, AiOpponent};
