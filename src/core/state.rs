//! Game state: one replica of the board.
//!
//! ## GameState
//!
//! - Claimed flags for every horizontal and vertical edge
//! - Box owners
//! - Whose turn it is, scores, and the final result once decided
//! - Ordered history of claimed edges
//!
//! Storage uses `im` persistent vectors, so cloning a state to keep the
//! previous snapshot is O(1). States are only ever changed by the rules
//! engine (`rules::apply`), which returns a new value.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerMap};
use crate::board::{box_count, edge_count, BoxPos, Edge, Orientation};

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// One player owns more boxes.
    Winner(Player),
    /// Equal box counts.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(self, player: Player) -> bool {
        self == GameResult::Winner(player)
    }
}

/// One replica of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    size: usize,

    /// Horizontal edges, `size` rows × `size - 1` cols.
    horizontal: Vector<bool>,

    /// Vertical edges, `size - 1` rows × `size` cols.
    vertical: Vector<bool>,

    /// Box owners, `(size - 1)^2` cells.
    boxes: Vector<Option<Player>>,

    /// Player to move.
    pub(crate) current_player: Player,

    /// Boxes owned per player.
    pub(crate) scores: PlayerMap<u32>,

    /// Set once every box is owned.
    pub(crate) winner: Option<GameResult>,

    /// Number of edges claimed so far.
    pub(crate) move_count: u32,

    /// Claimed edges in order.
    pub(crate) history: Vector<Edge>,
}

impl GameState {
    /// Fresh board with `size` dots per side. `First` moves first.
    ///
    /// The size is not validated here; `SessionConfig::validate` is the
    /// gate for user and peer input.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            horizontal: Vector::from(vec![false; edge_count(Orientation::Horizontal, size)]),
            vertical: Vector::from(vec![false; edge_count(Orientation::Vertical, size)]),
            boxes: Vector::from(vec![None; box_count(size)]),
            current_player: Player::First,
            scores: PlayerMap::default(),
            winner: None,
            move_count: 0,
            history: Vector::new(),
        }
    }

    /// Dots per side.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Player to move.
    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Score of one player.
    #[must_use]
    pub fn score(&self, player: Player) -> u32 {
        self.scores[player]
    }

    /// Both scores.
    #[must_use]
    pub fn scores(&self) -> &PlayerMap<u32> {
        &self.scores
    }

    /// Final result, `None` while the match is running.
    #[must_use]
    pub fn winner(&self) -> Option<GameResult> {
        self.winner
    }

    /// Has every box been claimed?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of edges claimed.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Claimed edges in the order they were played.
    #[must_use]
    pub fn history(&self) -> &Vector<Edge> {
        &self.history
    }

    // === Edges ===

    /// Is this edge claimed? Out-of-bounds edges read as unclaimed.
    #[must_use]
    pub fn is_claimed(&self, edge: Edge) -> bool {
        if !edge.in_bounds(self.size) {
            return false;
        }
        let index = edge.index(self.size);
        match edge.orientation {
            Orientation::Horizontal => self.horizontal[index],
            Orientation::Vertical => self.vertical[index],
        }
    }

    /// Horizontal edge flags, row-major.
    #[must_use]
    pub fn horizontal(&self) -> &Vector<bool> {
        &self.horizontal
    }

    /// Vertical edge flags, row-major.
    #[must_use]
    pub fn vertical(&self) -> &Vector<bool> {
        &self.vertical
    }

    pub(crate) fn claim(&mut self, edge: Edge) {
        let index = edge.index(self.size);
        match edge.orientation {
            Orientation::Horizontal => self.horizontal.set(index, true),
            Orientation::Vertical => self.vertical.set(index, true),
        };
        self.move_count += 1;
        self.history.push_back(edge);
    }

    // === Boxes ===

    /// Owner of a box, `None` if unowned or out of bounds.
    #[must_use]
    pub fn owner(&self, pos: BoxPos) -> Option<Player> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.boxes[pos.index(self.size)]
    }

    /// Box owners, row-major.
    #[must_use]
    pub fn boxes(&self) -> &Vector<Option<Player>> {
        &self.boxes
    }

    /// Number of owned boxes.
    #[must_use]
    pub fn filled_boxes(&self) -> usize {
        self.boxes.iter().filter(|owner| owner.is_some()).count()
    }

    /// Are all four edges of this box claimed?
    #[must_use]
    pub fn is_enclosed(&self, pos: BoxPos) -> bool {
        pos.edges().to_array().into_iter().all(|edge| self.is_claimed(edge))
    }

    pub(crate) fn set_owner(&mut self, pos: BoxPos, player: Player) {
        let index = pos.index(self.size);
        self.boxes.set(index, Some(player));
        self.scores[player] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(6);

        assert_eq!(state.size(), 6);
        assert_eq!(state.horizontal().len(), 30);
        assert_eq!(state.vertical().len(), 30);
        assert_eq!(state.boxes().len(), 25);
        assert_eq!(state.current_player(), Player::First);
        assert_eq!(state.score(Player::First), 0);
        assert_eq!(state.score(Player::Second), 0);
        assert_eq!(state.winner(), None);
        assert_eq!(state.move_count(), 0);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_claim_and_read_back() {
        let mut state = GameState::new(3);
        let edge = Edge::vertical(1, 2);

        assert!(!state.is_claimed(edge));
        state.claim(edge);

        assert!(state.is_claimed(edge));
        assert!(!state.is_claimed(Edge::horizontal(1, 1)));
        assert_eq!(state.move_count(), 1);
        assert_eq!(state.history().back(), Some(&edge));
    }

    #[test]
    fn test_out_of_bounds_reads() {
        let state = GameState::new(3);
        assert!(!state.is_claimed(Edge::horizontal(5, 5)));
        assert_eq!(state.owner(BoxPos::new(2, 0)), None);
    }

    #[test]
    fn test_set_owner_updates_score() {
        let mut state = GameState::new(3);
        state.set_owner(BoxPos::new(1, 1), Player::Second);

        assert_eq!(state.owner(BoxPos::new(1, 1)), Some(Player::Second));
        assert_eq!(state.score(Player::Second), 1);
        assert_eq!(state.filled_boxes(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = GameState::new(4);
        let mut copy = original.clone();
        copy.claim(Edge::horizontal(0, 0));

        assert!(!original.is_claimed(Edge::horizontal(0, 0)));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_game_result() {
        assert!(GameResult::Winner(Player::First).is_winner(Player::First));
        assert!(!GameResult::Winner(Player::First).is_winner(Player::Second));
        assert!(!GameResult::Draw.is_winner(Player::First));
    }

    #[test]
    fn test_serialization() {
        let mut state = GameState::new(2);
        state.claim(Edge::horizontal(0, 0));
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
