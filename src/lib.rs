//! # pawn-tactics
//!
//! Turn engine for a two-player tactical pawn game played over a thin
//! relay, with an optional scripted opponent.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: `MatchController` owns the `MatchState`. Everything
//!    else takes the state as an explicit argument.
//!
//! 2. **Rules Before Physics**: the action resolver fixes HP and grid
//!    positions before any knockback replay starts. The replay is cosmetic.
//!
//! 3. **Interchangeable Seats**: local input, the remote relay and the AI
//!    all implement `ActorPolicy` and feed the same validate/apply path.
//!
//! ## Match Structure
//!
//! ```text
//! PRE_GAME ─► [RPS_TIE_BREAK] ─► SETUP_1_DEFINE ─► LINKING ─► SETUP_2_DEFINE ─► ...
//!                                                                 │
//!           ┌─────────────── cycle exhausted ◄── ACTION ◄─────────┘
//!           ▼
//!      next cycle ...                 win ─► GAME_OVER
//! ```
//!
//! ## Modules
//!
//! - `core`: ids, players, grid, cards, pawns, configuration, RNG, state
//! - `phase`: phase machine and the RPS tie-break
//! - `rules`: action validation and application, win detection
//! - `physics`: drag gestures, replay descriptors, knockback replay
//! - `actors`: the seat policy interface, local input, remote relay
//! - `ai`: difficulty profiles and the heuristic opponent
//! - `net`: relay events and their JSON / binary encodings
//! - `controller`: match controller, timers, view surface

pub mod actors;
pub mod ai;
pub mod controller;
pub mod core;
pub mod error;
pub mod net;
pub mod phase;
pub mod physics;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, BoardConfig, Card, CardId, CardStats, GameRng, GameRngState, GridPos,
    Initiative, MatchConfig, MatchState, Pawn, PawnId, PhysicsConfig, PlayerId, PlayerMap,
    PlayerState, PLAYER_COUNT,
};

pub use crate::error::{ActionError, CodecError, ConfigError};

pub use crate::phase::{
    resolve_rps, CycleAdvance, Phase, PhaseMachine, RpsChoice, RpsOutcome, SyncOutcome, TurnChange,
};

pub use crate::rules::{ActionResolver, AttackOutcome, MatchResult, MoveOutcome};

pub use crate::physics::{
    AttackCoordinator, AttackReplayDescriptor, DragGesture, KnockbackSim, ReplayReport, ReplayStep,
    Vec2,
};

pub use crate::actors::{
    ActionChoice, ActorKind, ActorPolicy, Decision, DecisionContext, DecisionRequest, LocalInput,
    RelayedDecision, RemoteRelay, RequestKind,
};

pub use crate::ai::{AiCheckpoint, AiOpponent, Difficulty, DifficultyProfile};

pub use crate::net::{decode_binary, decode_json, encode_binary, encode_json, MatchEvent};

pub use crate::controller::{MatchController, Notice, PawnView, PossibleTargets};
