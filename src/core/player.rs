//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! A match always has exactly two seats, so `PlayerId` is either seat 0 or
//! seat 1 and every player has exactly one opponent.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by a fixed `[T; 2]` for O(1) access, indexable
//! by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats in a match.
pub const PLAYER_COUNT: usize = 2;

/// Seat identifier: `PlayerId(0)` or `PlayerId(1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The first seat (hosts the match, starts at the top of the board).
    pub const FIRST: PlayerId = PlayerId(0);

    /// The second seat.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a new player ID.
    ///
    /// Panics if `id` is not a valid seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < PLAYER_COUNT, "PlayerId must be 0 or 1");
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    ///
    /// ```
    /// use pawn_tactics::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
    /// assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Iterate over both seats in order.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..PLAYER_COUNT as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use pawn_tactics::core::{PlayerId, PlayerMap};
///
/// let mut pawns_left: PlayerMap<u32> = PlayerMap::with_value(3);
/// pawns_left[PlayerId::SECOND] -= 1;
///
/// assert_eq!(pawns_left[PlayerId::FIRST], 3);
/// assert_eq!(pawns_left[PlayerId::SECOND], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Create a map from one value per seat.
    pub fn from_pair(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// True if the predicate holds for both players.
    pub fn all(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.data.iter().all(predicate)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
