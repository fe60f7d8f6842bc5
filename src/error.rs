//! Error types.
//!
//! Only illegal actions, bad configuration and codec failures are errors.
//! Stale relay events and events naming pawns that no longer exist are
//! dropped with a log line instead; see `controller`.

use crate::core::{CardId, GridPos, PawnId, PlayerId};

/// Why an action request was rejected.
///
/// Rejections never mutate state and are never forwarded to the peer.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("an attack animation is still playing")]
    Animating,

    #[error("the match is over")]
    MatchOver,

    #[error("{0} cannot do that during the {1} phase")]
    WrongPhase(PlayerId, &'static str),

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("{0} already submitted for this step")]
    AlreadySubmitted(PlayerId),

    #[error("{0} is not controlled from this client")]
    NotLocalSeat(PlayerId),

    #[error("unknown pawn {0}")]
    UnknownPawn(PawnId),

    #[error("unknown or unavailable card {0}")]
    UnknownCard(CardId),

    #[error("{0} does not belong to {1}")]
    NotOwner(PawnId, PlayerId),

    #[error("{0} is not active")]
    PawnInactive(PawnId),

    #[error("{0} is already linked")]
    AlreadyLinked(PawnId),

    #[error("target {0} is outside the board")]
    OutOfBounds(GridPos),

    #[error("target {0} is occupied")]
    Occupied(GridPos),

    #[error("target is {distance} cells away but only {stamina} stamina remains")]
    OutOfRange { distance: u32, stamina: u32 },

    #[error("{0} is not adjacent to {1}")]
    NotAdjacent(PawnId, PawnId),

    #[error("{0} is a friendly pawn")]
    FriendlyTarget(PawnId),

    #[error("{0} already attacked this cycle")]
    AlreadyActed(PawnId),

    #[error("expected {expected} cards, got {got}")]
    WrongCardCount { expected: usize, got: usize },

    #[error("card stats must sum to {budget} with at least 1 HP, got {hp}/{stamina}/{attack}")]
    InvalidCardStats {
        budget: u8,
        hp: u8,
        stamina: u8,
        attack: u8,
    },

    #[error("attack gesture too short: {distance:.1}px over {duration_ms}ms")]
    GestureTooShort { distance: f32, duration_ms: u64 },
}

impl ActionError {
    /// Short machine-readable code, used as the notice key for the UI.
    #[must_use]
    pub fn code(&self) -> &'static str {
        use ActionError::*;
        match self {
            Animating => "ANIMATING",
            MatchOver => "MATCH_OVER",
            WrongPhase(..) => "WRONG_PHASE",
            NotYourTurn(_) => "NOT_YOUR_TURN",
            AlreadySubmitted(_) => "ALREADY_SUBMITTED",
            NotLocalSeat(_) => "NOT_LOCAL_SEAT",
            UnknownPawn(_) => "UNKNOWN_PAWN",
            UnknownCard(_) => "UNKNOWN_CARD",
            NotOwner(..) => "NOT_OWNER",
            PawnInactive(_) => "PAWN_INACTIVE",
            AlreadyLinked(_) => "ALREADY_LINKED",
            OutOfBounds(_) => "OUT_OF_BOUNDS",
            Occupied(_) => "OCCUPIED",
            OutOfRange { .. } => "OUT_OF_RANGE",
            NotAdjacent(..) => "NOT_ADJACENT",
            FriendlyTarget(_) => "FRIENDLY_TARGET",
            AlreadyActed(_) => "ALREADY_ACTED",
            WrongCardCount { .. } => "WRONG_CARD_COUNT",
            InvalidCardStats { .. } => "INVALID_CARD_STATS",
            GestureTooShort { .. } => "GESTURE_TOO_SHORT",
        }
    }
}

/// Invalid match configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    BoardTooSmall { width: i32, height: i32, min: i32 },

    #[error("{0} pawns per player do not fit on a row of width {1}")]
    TooManyPawns(usize, i32),

    #[error("pawns_per_player must be at least 1")]
    NoPawns,

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("card budget {0} cannot give every card at least 1 HP")]
    BudgetTooSmall(u8),

    #[error("physics parameter {field} must be positive, got {value}")]
    NonPositivePhysics { field: &'static str, value: f32 },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Failure to encode or decode a boundary event.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("binary codec: {0}")]
    Binary(#[from] bincode::Error),

    #[error("json codec: {0}")]
    Json(#[from] serde_json::Error),
}
