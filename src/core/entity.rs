//! Entity identification.
//!
//! Pawns and cards are referenced across the network by id only, so both
//! peers must derive the same ids without coordinating.
//!
//! ## ID Layout
//!
//! - `PawnId`: allocated once at match start, seat 0's pawns first
//!   (`0..n`), then seat 1's (`n..2n`).
//! - `CardId`: derived from `(owner, round, slot)`. Cards only live for one
//!   cycle, so this triple is unique for as long as the card exists, and
//!   both peers compute the same id no matter in which order the two
//!   `cardsDefined` events arrive.
//!
//! ```
//! use pawn_tactics::core::{CardId, PlayerId};
//!
//! let id = CardId::compose(PlayerId::SECOND, 2, 1);
//! assert_eq!(id.owner(), PlayerId::SECOND);
//! assert_eq!(id.round(), 2);
//! assert_eq!(id.slot(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Stable pawn identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PawnId(pub u32);

impl PawnId {
    /// Create a new pawn ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PawnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pawn({})", self.0)
    }
}

/// Cycle-scoped card identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Build the id of the card in `slot` of `owner`'s definition set for `round`.
    #[must_use]
    pub const fn compose(owner: PlayerId, round: u8, slot: u8) -> Self {
        Self(((owner.0 as u32) << 16) | ((round as u32) << 8) | slot as u32)
    }

    /// The player that defined this card.
    #[must_use]
    pub const fn owner(self) -> PlayerId {
        PlayerId(((self.0 >> 16) & 0xFF) as u8)
    }

    /// The definition round the card came from.
    #[must_use]
    pub const fn round(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Position within the definition set.
    #[must_use]
    pub const fn slot(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card(p{} r{} s{})", self.owner().0, self.round(), self.slot())
    }
}
