//! Action-phase rules.
//!
//! - `ActionResolver`: validates and applies moves and attacks, enumerates
//!   legal actions, detects win conditions
//! - `MatchResult`: how a match ended

pub mod resolver;
pub mod result;

pub use resolver::{ActionResolver, AttackOutcome, MoveOutcome};
pub use result::MatchResult;
