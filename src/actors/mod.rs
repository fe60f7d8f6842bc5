//! Actor policies.
//!
//! Every seat is driven by an [`ActorPolicy`]. The controller asks the
//! seat's policy for a decision whenever the seat owes one:
//!
//! | Phase            | Entry point     |
//! |------------------|-----------------|
//! | `SETUP_N_DEFINE` | `define_cards`  |
//! | `LINKING`        | `link_pawn`     |
//! | `ACTION`         | `choose_action` |
//! | `RPS_TIE_BREAK`  | `choose_rps`    |
//!
//! Implementations:
//! - [`LocalInput`]: decisions arrive through the controller's entry points
//!   from the UI, so polling always yields `Pending`
//! - [`RemoteRelay`]: decisions arrive as relay events, already validated
//!   by the originating peer
//! - [`crate::ai::AiOpponent`]: heuristic decisions after a thinking delay

pub mod local;
pub mod remote;

use serde::{Deserialize, Serialize};

use crate::core::{Action, CardId, CardStats, MatchState, PawnId, PlayerId};
use crate::phase::{Phase, RpsChoice};
use crate::physics::DragGesture;

pub use local::LocalInput;
pub use remote::{RelayedDecision, RemoteRelay};

/// Which kind of actor drives a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Local,
    Remote,
    Ai,
}

impl ActorKind {
    /// Decisions made on this client are broadcast to the peer.
    #[must_use]
    pub fn originates_events(self) -> bool {
        !matches!(self, ActorKind::Remote)
    }
}

/// Poll result of an entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision<T> {
    Ready(T),
    /// Nothing yet; poll again later.
    Pending,
    /// The actor cannot decide. Treated as an implicit pass.
    Unavailable,
}

impl<T> Decision<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decision<U> {
        match self {
            Decision::Ready(value) => Decision::Ready(f(value)),
            Decision::Pending => Decision::Pending,
            Decision::Unavailable => Decision::Unavailable,
        }
    }
}

/// An ACTION-phase choice, with the confirming gesture for attacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionChoice {
    pub action: Action,
    pub gesture: Option<DragGesture>,
}

impl ActionChoice {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            gesture: None,
        }
    }

    #[must_use]
    pub fn pass() -> Self {
        Self::new(Action::Pass)
    }
}

/// Read-only view handed to a policy.
#[derive(Clone, Copy, Debug)]
pub struct DecisionContext<'a> {
    pub state: &'a MatchState,
    pub seat: PlayerId,
}

impl<'a> DecisionContext<'a> {
    #[must_use]
    pub fn new(state: &'a MatchState, seat: PlayerId) -> Self {
        Self { state, seat }
    }
}

/// Which entry point a seat currently owes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    DefineCards,
    LinkPawn,
    ChooseAction,
    ChooseRps,
}

/// An outstanding decision, keyed by where in the match it was asked.
///
/// A decision computed for one request is discarded if the match has
/// moved on to another by the time it is ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecisionRequest {
    pub seat: PlayerId,
    pub kind: RequestKind,
    pub cycle: u32,
    pub round: u8,
    pub turn: u32,
}

impl DecisionRequest {
    /// The decision `seat` owes right now, if any.
    #[must_use]
    pub fn owed(state: &MatchState, seat: PlayerId) -> Option<Self> {
        let player = &state.players[seat];
        let kind = match state.phase {
            Phase::Define { .. } if !player.defined_this_round => RequestKind::DefineCards,
            Phase::Linking { .. } if player.links_outstanding() => RequestKind::LinkPawn,
            Phase::RpsTieBreak if player.rps_choice.is_none() => RequestKind::ChooseRps,
            Phase::Action | Phase::AwaitingActionTarget
                if state.current_player == seat && !state.is_animating =>
            {
                RequestKind::ChooseAction
            }
            _ => return None,
        };
        Some(Self {
            seat,
            kind,
            cycle: state.cycle,
            round: state.round,
            turn: state.turn,
        })
    }
}

/// Uniform decision contract for local, remote and AI seats.
pub trait ActorPolicy: Send {
    fn kind(&self) -> ActorKind;

    /// Delay before this actor's next decision is polled.
    fn thinking_delay_ms(&mut self, _request: &DecisionRequest) -> u64 {
        0
    }

    /// One card set for definition round `round`.
    fn define_cards(&mut self, ctx: &DecisionContext<'_>, round: u8) -> Decision<Vec<CardStats>>;

    /// One pawn/card pair to link.
    fn link_pawn(&mut self, ctx: &DecisionContext<'_>) -> Decision<(PawnId, CardId)>;

    fn choose_action(&mut self, ctx: &DecisionContext<'_>) -> Decision<ActionChoice>;

    fn choose_rps(&mut self, ctx: &DecisionContext<'_>) -> Decision<RpsChoice>;

    /// Hand a relayed decision to the policy. Only the relay accepts them.
    fn deliver(&mut self, _decision: RelayedDecision) -> bool {
        false
    }

    /// Transport connectivity changed. Only the relay cares.
    fn set_connected(&mut self, _connected: bool) {}
}
