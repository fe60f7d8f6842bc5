//! Match orchestration: the controller, its timer queue and the read-only
//! view surface for the rendering layer.

pub mod match_controller;
pub mod timers;
pub mod view;

pub use match_controller::MatchController;
pub use timers::{TimerKind, TimerQueue};
pub use view::{Notice, PawnView, PossibleTargets};
