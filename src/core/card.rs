//! Cards: stat triples defined each round and spent by linking.

use serde::{Deserialize, Serialize};

use super::entity::CardId;
use crate::error::ActionError;

/// The three stats a player chooses when defining a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardStats {
    pub hp: u8,
    pub stamina: u8,
    pub attack: u8,
}

impl CardStats {
    #[must_use]
    pub const fn new(hp: u8, stamina: u8, attack: u8) -> Self {
        Self {
            hp,
            stamina,
            attack,
        }
    }

    /// Sum of all three stats.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.hp as u32 + self.stamina as u32 + self.attack as u32
    }

    /// Check the stats spend exactly `budget` points and give at least 1 HP.
    ///
    /// ```
    /// use pawn_tactics::core::CardStats;
    ///
    /// assert!(CardStats::new(3, 2, 2).validate(7).is_ok());
    /// assert!(CardStats::new(0, 3, 4).validate(7).is_err());
    /// assert!(CardStats::new(3, 3, 3).validate(7).is_err());
    /// ```
    pub fn validate(self, budget: u8) -> Result<(), ActionError> {
        if self.hp == 0 || self.total() != u32::from(budget) {
            return Err(ActionError::InvalidCardStats {
                budget,
                hp: self.hp,
                stamina: self.stamina,
                attack: self.attack,
            });
        }
        Ok(())
    }

    /// An even split of `budget`, remainder going to HP then stamina.
    #[must_use]
    pub fn balanced(budget: u8) -> Self {
        let share = budget / 3;
        let rest = budget % 3;
        Self {
            hp: share + u8::from(rest >= 1),
            stamina: share + u8::from(rest >= 2),
            attack: share,
        }
    }
}

impl std::fmt::Display for CardStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}hp/{}st/{}atk", self.hp, self.stamina, self.attack)
    }
}

/// A defined card owned by one player for the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub stats: CardStats,
    /// Set once the card has been linked to a pawn.
    pub spent: bool,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, stats: CardStats) -> Self {
        Self {
            id,
            stats,
            spent: false,
        }
    }
}
