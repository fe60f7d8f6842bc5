//! Remote human seat fed by relay events.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{Action, CardId, CardStats, PawnId};
use crate::phase::RpsChoice;

use super::{ActionChoice, ActorKind, ActorPolicy, Decision, DecisionContext};

/// A decision the peer already made and validated.
#[derive(Clone, Debug, PartialEq)]
pub enum RelayedDecision {
    Cards(Vec<CardStats>),
    Link { pawn: PawnId, card: CardId },
    Action(Action),
    Rps(RpsChoice),
}

/// Seat whose decisions are replayed from the relay.
///
/// Entry points pop the oldest delivered decision if it answers the
/// request being asked; a decision that answers a different request is
/// stale and dropped. Once disconnected with nothing queued, every entry
/// point reports `Unavailable`.
#[derive(Clone, Debug)]
pub struct RemoteRelay {
    inbox: VecDeque<RelayedDecision>,
    connected: bool,
}

impl RemoteRelay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inbox: VecDeque::new(),
            connected: true,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.inbox.len()
    }

    fn take<T>(&mut self, pick: impl Fn(&RelayedDecision) -> Option<T>) -> Decision<T> {
        while let Some(front) = self.inbox.front() {
            if let Some(value) = pick(front) {
                self.inbox.pop_front();
                return Decision::Ready(value);
            }
            debug!(?front, "relayed decision does not answer the current request, dropped");
            self.inbox.pop_front();
        }
        if self.connected {
            Decision::Pending
        } else {
            Decision::Unavailable
        }
    }
}

impl Default for RemoteRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorPolicy for RemoteRelay {
    fn kind(&self) -> ActorKind {
        ActorKind::Remote
    }

    fn define_cards(&mut self, _ctx: &DecisionContext<'_>, _round: u8) -> Decision<Vec<CardStats>> {
        self.take(|d| match d {
            RelayedDecision::Cards(cards) => Some(cards.clone()),
            _ => None,
        })
    }

    fn link_pawn(&mut self, _ctx: &DecisionContext<'_>) -> Decision<(PawnId, CardId)> {
        self.take(|d| match *d {
            RelayedDecision::Link { pawn, card } => Some((pawn, card)),
            _ => None,
        })
    }

    fn choose_action(&mut self, _ctx: &DecisionContext<'_>) -> Decision<ActionChoice> {
        self.take(|d| match *d {
            RelayedDecision::Action(action) => Some(ActionChoice::new(action)),
            _ => None,
        })
    }

    fn choose_rps(&mut self, _ctx: &DecisionContext<'_>) -> Decision<RpsChoice> {
        self.take(|d| match *d {
            RelayedDecision::Rps(choice) => Some(choice),
            _ => None,
        })
    }

    fn deliver(&mut self, decision: RelayedDecision) -> bool {
        self.inbox.push_back(decision);
        true
    }

    fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}
