//! Player identification and per-player data storage.
//!
//! ## Player
//!
//! The two seats of a match. `First` always opens the game.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `Player` (scores, names).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats at the board.
///
/// Serialized as `"First"` / `"Second"`, which is also the wire form of
/// `myPlayer` in a `START` message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// The opponent of this player.
    ///
    /// ```
    /// use dots_boxes::core::Player;
    ///
    /// assert_eq!(Player::First.other(), Player::Second);
    /// assert_eq!(Player::Second.other(), Player::First);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Slot index (0 for `First`, 1 for `Second`).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::First => write!(f, "First"),
            Player::Second => write!(f, "Second"),
        }
    }
}

/// Per-player data with O(1) access by `Player`.
///
/// ## Example
///
/// ```
/// use dots_boxes::core::{Player, PlayerMap};
///
/// let mut scores: PlayerMap<u32> = PlayerMap::default();
/// scores[Player::Second] += 2;
///
/// assert_eq!(scores[Player::First], 0);
/// assert_eq!(scores[Player::Second], 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map from explicit values for each seat.
    pub fn new(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create a map with values from a factory function.
    pub fn from_fn(factory: impl Fn(Player) -> T) -> Self {
        Self::new(factory(Player::First), factory(Player::Second))
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (Player, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_basics() {
        assert_eq!(Player::First.index(), 0);
        assert_eq!(Player::Second.index(), 1);
        assert_eq!(Player::First.other().other(), Player::First);
        assert_eq!(format!("{}", Player::Second), "Second");
    }

    #[test]
    fn test_player_wire_names() {
        assert_eq!(serde_json::to_string(&Player::First).unwrap(), "\"First\"");
        let parsed: Player = serde_json::from_str("\"Second\"").unwrap();
        assert_eq!(parsed, Player::Second);
        assert!(serde_json::from_str::<Player>("\"Third\"").is_err());
    }

    #[test]
    fn test_player_map_from_fn() {
        let map = PlayerMap::from_fn(|p| p.index() as i32 * 10);

        assert_eq!(map[Player::First], 0);
        assert_eq!(map[Player::Second], 10);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<u32> = PlayerMap::default();

        map[Player::First] = 3;
        *map.get_mut(Player::Second) += 1;

        assert_eq!(map[Player::First], 3);
        assert_eq!(map[Player::Second], 1);
    }

    #[test]
    fn test_player_map_iter() {
        let map = PlayerMap::new("A", "B");

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Player::First, &"A"), (Player::Second, &"B")]);
    }
}
