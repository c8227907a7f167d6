//! The two seats and per-seat storage.
//!
//! `P1` moves first. Wire payloads name a seat with an `isPlayer1` flag;
//! the conversions live here so nothing else deals in raw booleans.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats in a match.
pub const PLAYER_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Moves first.
    P1,
    /// The AI seat in single-player matches.
    P2,
}

impl PlayerId {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    #[must_use]
    pub const fn is_player1(self) -> bool {
        matches!(self, Self::P1)
    }

    /// Seat named by a wire `isPlayer1` flag.
    #[must_use]
    pub const fn from_is_player1(is_player1: bool) -> Self {
        if is_player1 {
            Self::P1
        } else {
            Self::P2
        }
    }

    /// Both seats, in seat order.
    ///
    /// ```
    /// use orbital_ccg::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all().collect();
    /// assert_eq!(players, vec![PlayerId::P1, PlayerId::P2]);
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        [Self::P1, Self::P2].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// ```
/// use orbital_ccg::core::{PlayerId, PlayerMap};
///
/// let mut research: PlayerMap<u32> = PlayerMap::with_value(0);
/// research[PlayerId::P2] += 3;
///
/// assert_eq!(research[PlayerId::P1], 0);
/// assert_eq!(research[PlayerId::P2], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            seats: [factory(PlayerId::P1), factory(PlayerId::P2)],
        }
    }

    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            seats: [value.clone(), value],
        }
    }

    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all().zip(self.seats.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::all().zip(self.seats.iter_mut())
    }

    pub fn map<U>(&self, f: impl Fn(PlayerId, &T) -> U) -> PlayerMap<U> {
        PlayerMap::new(|p| f(p, self.get(p)))
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
