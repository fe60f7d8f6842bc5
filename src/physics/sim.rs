//! Knockback simulation.
//!
//! Two discs on a frictional plane: the attacker is launched along the
//! descriptor's direction, collides with the target, and both slide to
//! rest. Output is cosmetic; peers are allowed to diverge frame to frame.

use crate::core::{PawnId, PhysicsConfig};

use super::descriptor::AttackReplayDescriptor;
use super::vector::Vec2;

/// Below this speed (px per frame) a body counts as at rest.
const REST_SPEED: f32 = 0.05;

/// Disc radius as a fraction of the cell size.
const RADIUS_RATIO: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pawn: PawnId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub radius: f32,
}

impl Body {
    fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Signal emitted by a simulation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    /// First contact between attacker and target.
    Impact {
        attacker: PawnId,
        target: PawnId,
        /// Closing speed along the contact normal.
        speed: f32,
    },
}

#[derive(Clone, Debug)]
pub struct KnockbackSim {
    attacker: Body,
    target: Body,
    restitution: f32,
    friction: f32,
    frame: u32,
    max_frames: u32,
    impacted: bool,
}

impl KnockbackSim {
    /// Place the target at `target_home` and the attacker one cell back
    /// along the launch direction, then launch.
    #[must_use]
    pub fn new(descriptor: &AttackReplayDescriptor, target_home: Vec2, config: &PhysicsConfig) -> Self {
        let radius = config.cell_size * RADIUS_RATIO;
        let direction = descriptor.direction.normalized();
        let attacker = Body {
            pawn: descriptor.attacker_id,
            pos: target_home - direction * config.cell_size,
            vel: direction * (descriptor.power * config.launch_speed),
            mass: config.pawn_mass,
            radius,
        };
        let target = Body {
            pawn: descriptor.target_id,
            pos: target_home,
            vel: Vec2::ZERO,
            mass: config.pawn_mass,
            radius,
        };
        Self {
            attacker,
            target,
            restitution: config.restitution.clamp(0.0, 1.0),
            friction: config.friction.clamp(0.0, 1.0),
            frame: 0,
            max_frames: config.max_frames,
            impacted: false,
        }
    }

    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[must_use]
    pub fn impacted(&self) -> bool {
        self.impacted
    }

    #[must_use]
    pub fn attacker(&self) -> &Body {
        &self.attacker
    }

    #[must_use]
    pub fn target(&self) -> &Body {
        &self.target
    }

    /// Both bodies at rest, or the frame cap reached.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.frame >= self.max_frames
            || (self.attacker.speed() < REST_SPEED && self.target.speed() < REST_SPEED)
    }

    /// Advance one frame.
    pub fn step(&mut self) -> Option<SimEvent> {
        if self.is_settled() {
            return None;
        }
        self.frame += 1;

        self.attacker.pos += self.attacker.vel;
        self.target.pos += self.target.vel;
        let event = self.resolve_contact();

        self.attacker.vel = self.attacker.vel * self.friction;
        self.target.vel = self.target.vel * self.friction;
        event
    }

    fn resolve_contact(&mut self) -> Option<SimEvent> {
        let offset = self.target.pos - self.attacker.pos;
        let distance = offset.length();
        let reach = self.attacker.radius + self.target.radius;
        if distance >= reach {
            return None;
        }
        let normal = offset.normalized();
        if normal == Vec2::ZERO {
            return None;
        }

        // Separate the overlap, split by inverse mass.
        let inv_a = 1.0 / self.attacker.mass;
        let inv_t = 1.0 / self.target.mass;
        let overlap = reach - distance;
        let share = overlap / (inv_a + inv_t);
        self.attacker.pos -= normal * (share * inv_a);
        self.target.pos += normal * (share * inv_t);

        let closing = (self.attacker.vel - self.target.vel).dot(normal);
        if closing <= 0.0 {
            return None;
        }
        let impulse = (1.0 + self.restitution) * closing / (inv_a + inv_t);
        self.attacker.vel -= normal * (impulse * inv_a);
        self.target.vel += normal * (impulse * inv_t);

        if self.impacted {
            return None;
        }
        self.impacted = true;
        Some(SimEvent::Impact {
            attacker: self.attacker.pawn,
            target: self.target.pawn,
            speed: closing,
        })
    }
}
