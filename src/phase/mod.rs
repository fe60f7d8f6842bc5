//! Match phases.
//!
//! - `PhaseMachine`: setup rounds, linking, action turns, cycle hand-over
//!   and relay re-synchronisation
//! - `RpsChoice` / `resolve_rps`: initiative tie-break

pub mod machine;
pub mod rps;

pub use machine::{CycleAdvance, Phase, PhaseMachine, RpsOutcome, SyncOutcome, TurnChange};
pub use rps::{resolve_rps, RpsChoice};
