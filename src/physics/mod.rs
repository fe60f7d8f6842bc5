//! Cosmetic attack physics.
//!
//! - `DragGesture`: confirms an attack and yields its power
//! - `AttackReplayDescriptor`: the network-portable attack payload
//! - `KnockbackSim`: two-disc knockback, replayed per peer
//! - `AttackCoordinator`: owns the replay and the `is_animating` flag

pub mod coordinator;
pub mod descriptor;
pub mod gesture;
pub mod sim;
pub mod vector;

pub use coordinator::{AttackCoordinator, ReplayReport, ReplayStep};
pub use descriptor::AttackReplayDescriptor;
pub use gesture::DragGesture;
pub use sim::{Body, KnockbackSim, SimEvent};
pub use vector::Vec2;
