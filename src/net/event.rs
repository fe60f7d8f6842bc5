//! Boundary events exchanged with the relay.
//!
//! Payload shapes only; transport is the host's concern. Variant and field
//! names serialize in camelCase (`cardsDefined`, `pawnId`, ...).

use serde::{Deserialize, Serialize};

use crate::core::{Card, CardId, PawnId, PlayerId};
use crate::phase::{CycleAdvance, RpsChoice};
use crate::physics::AttackReplayDescriptor;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchEvent {
    #[serde(rename_all = "camelCase")]
    CardsDefined { player: PlayerId, cards: Vec<Card> },

    #[serde(rename_all = "camelCase")]
    PawnLinked {
        player: PlayerId,
        pawn_id: PawnId,
        card_id: CardId,
    },

    #[serde(rename_all = "camelCase")]
    Move {
        pawn_id: PawnId,
        target_x: i32,
        target_y: i32,
    },

    #[serde(rename_all = "camelCase")]
    Attack { attacker_id: PawnId, target_id: PawnId },

    PhysicsAttackAnimation(AttackReplayDescriptor),

    /// Authoritative phase snapshot; inbound only.
    CycleAdvance(CycleAdvance),

    RpsChoice { choice: RpsChoice },

    /// Voluntary end of turn.
    Pass,

    /// The sender's seat was skipped for having nothing to do.
    PlayerCannotAct,
}

impl MatchEvent {
    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MatchEvent::CardsDefined { .. } => "cardsDefined",
            MatchEvent::PawnLinked { .. } => "pawnLinked",
            MatchEvent::Move { .. } => "move",
            MatchEvent::Attack { .. } => "attack",
            MatchEvent::PhysicsAttackAnimation(_) => "physicsAttackAnimation",
            MatchEvent::CycleAdvance(_) => "cycleAdvance",
            MatchEvent::RpsChoice { .. } => "rpsChoice",
            MatchEvent::Pass => "pass",
            MatchEvent::PlayerCannotAct => "playerCannotAct",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let event = MatchEvent::Move {
            pawn_id: PawnId(4),
            target_x: 2,
            target_y: 6,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["move"]["pawnId"], 4);
        assert_eq!(json["move"]["targetY"], 6);
        assert_eq!(event.name(), "move");

        let rps = serde_json::to_value(MatchEvent::RpsChoice {
            choice: RpsChoice::Rock,
        })
        .unwrap();
        assert_eq!(rps["rpsChoice"]["choice"], "rock");

        assert_eq!(serde_json::to_value(MatchEvent::PlayerCannotAct).unwrap(), "playerCannotAct");
    }
}
