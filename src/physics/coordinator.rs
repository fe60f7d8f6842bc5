//! Attack replay coordinator.
//!
//! Turns an accepted attack into a knockback replay and owns the
//! `is_animating` flag while it runs.
//!
//! ## Protocol
//!
//! 1. The acting peer builds an [`AttackReplayDescriptor`] with
//!    [`AttackCoordinator::describe`] from the confirmed drag gesture.
//! 2. The descriptor is broadcast; the simulation never is.
//! 3. Both peers call [`AttackCoordinator::start`] with the descriptor and
//!    drive [`AttackCoordinator::step`] once per frame.
//! 4. The last frame resets visual positions and clears `is_animating`.
//!
//! Rules outcomes are applied before `start`; nothing here touches HP or
//! logical cells.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core::{GridPos, MatchState, PawnId, PhysicsConfig, PlayerId};
use crate::error::ActionError;

use super::descriptor::AttackReplayDescriptor;
use super::gesture::DragGesture;
use super::sim::{KnockbackSim, SimEvent};
use super::vector::Vec2;

/// Summary of a finished replay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayReport {
    pub attacker: PawnId,
    pub target: PawnId,
    pub frames: u32,
    pub impacted: bool,
    /// Elimination outcome as fixed by the rules, read back at completion.
    pub target_eliminated: bool,
}

/// Result of one coordinator frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReplayStep {
    /// No replay in flight.
    Idle,
    Frame { frame: u32, event: Option<SimEvent> },
    Finished(ReplayReport),
}

#[derive(Clone, Debug)]
struct ActiveReplay {
    descriptor: AttackReplayDescriptor,
    sim: KnockbackSim,
}

#[derive(Clone, Debug)]
pub struct AttackCoordinator {
    config: PhysicsConfig,
    active: Option<ActiveReplay>,
    /// Cosmetic positions of pawns displaced by the replay.
    visuals: FxHashMap<PawnId, Vec2>,
}

impl AttackCoordinator {
    #[must_use]
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            active: None,
            visuals: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Screen-space centre of a board cell.
    #[must_use]
    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        let size = self.config.cell_size;
        Vec2::new((pos.x as f32 + 0.5) * size, (pos.y as f32 + 0.5) * size)
    }

    /// Cosmetic position of a pawn while a replay displaces it.
    #[must_use]
    pub fn visual_position(&self, pawn: PawnId) -> Option<Vec2> {
        self.visuals.get(&pawn).copied()
    }

    /// Build the descriptor for an attack about to be applied.
    ///
    /// With a gesture, the gesture must pass both drag thresholds and sets
    /// direction and power. Without one (AI seats), the launch points from
    /// attacker to target with power proportional to the attacker's Attack.
    pub fn describe(
        &self,
        state: &MatchState,
        player: PlayerId,
        attacker: PawnId,
        target: PawnId,
        gesture: Option<&DragGesture>,
        now_ms: u64,
    ) -> Result<AttackReplayDescriptor, ActionError> {
        let attacker_pawn = state.pawn(attacker).ok_or(ActionError::UnknownPawn(attacker))?;
        let target_pawn = state.pawn(target).ok_or(ActionError::UnknownPawn(target))?;
        let from = self.cell_center(attacker_pawn.pos);
        let to = self.cell_center(target_pawn.pos);
        let board_direction = (to - from).normalized();

        let (direction, power, start, end) = match gesture {
            Some(gesture) => {
                let power = gesture.confirm(&self.config)?;
                let mut direction = gesture.direction();
                if direction == Vec2::ZERO {
                    direction = board_direction;
                }
                (direction, power, gesture.start, gesture.end)
            }
            None => {
                let budget = f32::from(state.config.card_budget.max(1));
                let ratio = (attacker_pawn.attack as f32 / budget).clamp(0.0, 1.0);
                (board_direction, ratio * self.config.max_power, from, to)
            }
        };

        Ok(AttackReplayDescriptor {
            attacker_id: attacker,
            target_id: target,
            direction,
            power,
            start,
            end,
            player,
            timestamp_ms: now_ms,
        })
    }

    /// Begin a replay and set `is_animating`.
    ///
    /// A descriptor naming an unknown pawn, or an attacker that has since
    /// been eliminated, is dropped: nothing runs and `is_animating` is
    /// cleared. Returns whether a replay started.
    pub fn start(&mut self, state: &mut MatchState, descriptor: AttackReplayDescriptor) -> bool {
        if self.active.is_some() {
            warn!("replay started while another was in flight, discarding the old one");
            self.cancel(state);
        }
        if state.is_over() {
            debug!("replay after game over dropped");
            state.is_animating = false;
            return false;
        }

        let live_attacker = state
            .pawn(descriptor.attacker_id)
            .is_some_and(|p| !p.eliminated);
        let target_cell = state.pawn(descriptor.target_id).map(|p| p.pos);
        let Some(target_cell) = target_cell else {
            warn!(target = %descriptor.target_id, "replay names unknown target, dropped");
            state.is_animating = false;
            return false;
        };
        if !live_attacker {
            warn!(attacker = %descriptor.attacker_id, "replay names missing attacker, dropped");
            state.is_animating = false;
            return false;
        }

        let descriptor = descriptor.sanitized(self.config.max_power);
        let target_home = self.cell_center(target_cell);
        let sim = KnockbackSim::new(&descriptor, target_home, &self.config);
        self.visuals.insert(descriptor.attacker_id, sim.attacker().pos);
        self.visuals.insert(descriptor.target_id, sim.target().pos);

        info!(
            attacker = %descriptor.attacker_id,
            target = %descriptor.target_id,
            power = descriptor.power,
            "attack replay started"
        );
        self.active = Some(ActiveReplay { descriptor, sim });
        state.is_animating = true;
        true
    }

    /// Advance the replay by one frame.
    pub fn step(&mut self, state: &mut MatchState) -> ReplayStep {
        if state.is_over() {
            if self.active.is_some() {
                debug!("match over, replay cancelled");
                self.cancel(state);
            }
            return ReplayStep::Idle;
        }
        let Some(replay) = self.active.as_mut() else {
            return ReplayStep::Idle;
        };

        let event = replay.sim.step();
        self.visuals.insert(replay.descriptor.attacker_id, replay.sim.attacker().pos);
        self.visuals.insert(replay.descriptor.target_id, replay.sim.target().pos);
        if let Some(SimEvent::Impact { speed, .. }) = event {
            debug!(speed, "replay impact");
        }

        if !replay.sim.is_settled() {
            return ReplayStep::Frame {
                frame: replay.sim.frame(),
                event,
            };
        }

        let target_eliminated = state
            .pawn(replay.descriptor.target_id)
            .is_some_and(|p| p.eliminated);
        let report = ReplayReport {
            attacker: replay.descriptor.attacker_id,
            target: replay.descriptor.target_id,
            frames: replay.sim.frame(),
            impacted: replay.sim.impacted(),
            target_eliminated,
        };
        self.finish(state);
        info!(frames = report.frames, target_eliminated, "attack replay finished");
        ReplayStep::Finished(report)
    }

    /// Run the whole replay synchronously. Used by headless peers.
    pub fn run_to_completion(&mut self, state: &mut MatchState) -> Option<ReplayReport> {
        loop {
            match self.step(state) {
                ReplayStep::Idle => return None,
                ReplayStep::Frame { .. } => {}
                ReplayStep::Finished(report) => return Some(report),
            }
        }
    }

    /// Drop any replay in flight and clear the flag.
    pub fn cancel(&mut self, state: &mut MatchState) {
        self.finish(state);
    }

    fn finish(&mut self, state: &mut MatchState) {
        self.active = None;
        self.visuals.clear();
        state.is_animating = false;
    }
}
