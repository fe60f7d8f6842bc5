//! Drag gestures that confirm an attack.
//!
//! A drag counts as a deliberate attack only when it is both long enough
//! and held long enough. Its length sets the power scalar.

use serde::{Deserialize, Serialize};

use crate::core::PhysicsConfig;
use crate::error::ActionError;

use super::vector::Vec2;

/// A completed pointer drag in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragGesture {
    pub start: Vec2,
    pub end: Vec2,
    pub started_at_ms: u64,
    pub ended_at_ms: u64,
}

impl DragGesture {
    #[must_use]
    pub fn new(start: Vec2, end: Vec2, started_at_ms: u64, ended_at_ms: u64) -> Self {
        Self {
            start,
            end,
            started_at_ms,
            ended_at_ms,
        }
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.end - self.start).length()
    }

    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.ended_at_ms.saturating_sub(self.started_at_ms)
    }

    /// Unit drag direction; zero for a degenerate drag.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalized()
    }

    /// Power in `0..=max_power`, linear in drag length up to `max_drag_distance`.
    #[must_use]
    pub fn power(&self, config: &PhysicsConfig) -> f32 {
        let ratio = (self.distance() / config.max_drag_distance).clamp(0.0, 1.0);
        ratio * config.max_power
    }

    /// Check both thresholds and return the power scalar.
    pub fn confirm(&self, config: &PhysicsConfig) -> Result<f32, ActionError> {
        let distance = self.distance();
        let duration_ms = self.duration_ms();
        if !distance.is_finite()
            || distance < config.min_drag_distance
            || duration_ms < config.min_drag_duration_ms
        {
            return Err(ActionError::GestureTooShort {
                distance,
                duration_ms,
            });
        }
        Ok(self.power(config))
    }
}
