//! Attack replay descriptor.
//!
//! The only attack payload that crosses the network. Each peer rebuilds
//! the knockback animation from it; neither peer ever ships simulation
//! state.

use serde::{Deserialize, Serialize};

use crate::core::{PawnId, PlayerId};

use super::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackReplayDescriptor {
    pub attacker_id: PawnId,
    pub target_id: PawnId,
    /// Unit launch direction.
    pub direction: Vec2,
    /// Launch power in `0..=max_power`.
    pub power: f32,
    /// Drag start in screen coordinates.
    pub start: Vec2,
    /// Drag end in screen coordinates.
    pub end: Vec2,
    pub player: PlayerId,
    pub timestamp_ms: u64,
}

impl AttackReplayDescriptor {
    /// Force a peer-supplied descriptor into range: unit (or zero) direction,
    /// finite power clamped to `0..=max_power`.
    #[must_use]
    pub fn sanitized(mut self, max_power: f32) -> Self {
        self.direction = self.direction.normalized();
        self.power = if self.power.is_finite() {
            self.power.clamp(0.0, max_power)
        } else {
            0.0
        };
        if !self.start.is_finite() {
            self.start = Vec2::ZERO;
        }
        if !self.end.is_finite() {
            self.end = Vec2::ZERO;
        }
        self
    }
}
