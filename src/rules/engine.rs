//! Move resolution.
//!
//! `apply` is a pure state transition: it never mutates its input and
//! always returns a complete state. Both peers run the same transitions in
//! the same order, so their replicas stay identical without sharing memory.
//!
//! Rules:
//! - Claiming an already-claimed (or nonexistent) edge changes nothing.
//! - Each adjacent box that becomes fully enclosed goes to the mover.
//! - Completing at least one box keeps the turn (once, even for two boxes);
//!   completing none passes it.
//! - When every box is owned the higher score wins, equal scores draw.

use smallvec::SmallVec;

use crate::board::{all_edges, BoxPos, Edge};
use crate::core::{GameResult, GameState, Player};

/// What a move did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Edge was already claimed or does not exist. State unchanged.
    Ignored,
    /// Edge claimed.
    Claimed {
        /// Player who made the move.
        mover: Player,
        /// Boxes completed by this move (0, 1 or 2).
        completed: SmallVec<[BoxPos; 2]>,
        /// Result, if this move finished the match.
        result: Option<GameResult>,
    },
}

impl MoveOutcome {
    /// Did the move change the board?
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        matches!(self, MoveOutcome::Claimed { .. })
    }

    /// Number of boxes completed.
    #[must_use]
    pub fn boxes_completed(&self) -> usize {
        match self {
            MoveOutcome::Ignored => 0,
            MoveOutcome::Claimed { completed, .. } => completed.len(),
        }
    }

    /// Does the mover play again?
    #[must_use]
    pub fn extra_turn(&self) -> bool {
        self.boxes_completed() > 0
    }
}

/// New state plus a description of the move.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub state: GameState,
    pub outcome: MoveOutcome,
}

/// Apply a move and describe what happened.
///
/// ```
/// use dots_boxes::board::Edge;
/// use dots_boxes::core::{GameState, Player};
/// use dots_boxes::rules::resolve;
///
/// let state = GameState::new(2);
/// let resolution = resolve(&state, Edge::horizontal(0, 0));
///
/// assert!(resolution.outcome.is_claimed());
/// assert_eq!(resolution.state.current_player(), Player::Second);
/// // The input snapshot is untouched.
/// assert_eq!(state.current_player(), Player::First);
/// ```
#[must_use]
pub fn resolve(state: &GameState, edge: Edge) -> Resolution {
    let size = state.size();
    if !edge.in_bounds(size) || state.is_claimed(edge) {
        return Resolution {
            state: state.clone(),
            outcome: MoveOutcome::Ignored,
        };
    }

    let mover = state.current_player();
    let mut next = state.clone();
    next.claim(edge);

    let mut completed = SmallVec::new();
    for pos in edge.adjacent_boxes(size) {
        if next.owner(pos).is_none() && next.is_enclosed(pos) {
            next.set_owner(pos, mover);
            completed.push(pos);
        }
    }

    if completed.is_empty() {
        next.current_player = mover.other();
    }

    if next.winner.is_none() && next.filled_boxes() == crate::board::box_count(size) {
        next.winner = Some(decide(&next));
    }

    let result = next.winner;
    Resolution {
        state: next,
        outcome: MoveOutcome::Claimed {
            mover,
            completed,
            result,
        },
    }
}

/// Apply a move, returning the next state.
#[must_use]
pub fn apply(state: &GameState, edge: Edge) -> GameState {
    resolve(state, edge).state
}

/// Replay an ordered move sequence from a fresh board.
#[must_use]
pub fn replay(size: usize, moves: impl IntoIterator<Item = Edge>) -> GameState {
    moves
        .into_iter()
        .fold(GameState::new(size), |state, edge| apply(&state, edge))
}

/// All unclaimed edges, horizontal first, row-major.
#[must_use]
pub fn legal_moves(state: &GameState) -> Vec<Edge> {
    all_edges(state.size())
        .filter(|edge| !state.is_claimed(*edge))
        .collect()
}

fn decide(state: &GameState) -> GameResult {
    let first = state.score(Player::First);
    let second = state.score(Player::Second);
    match first.cmp(&second) {
        std::cmp::Ordering::Greater => GameResult::Winner(Player::First),
        std::cmp::Ordering::Less => GameResult::Winner(Player::Second),
        std::cmp::Ordering::Equal => GameResult::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_passes_turn() {
        let state = GameState::new(3);
        let next = apply(&state, Edge::horizontal(0, 0));

        assert!(next.is_claimed(Edge::horizontal(0, 0)));
        assert_eq!(next.current_player(), Player::Second);
        assert_eq!(next.move_count(), 1);
    }

    #[test]
    fn test_claimed_edge_is_noop() {
        let state = apply(&GameState::new(3), Edge::vertical(0, 1));
        let resolution = resolve(&state, Edge::vertical(0, 1));

        assert_eq!(resolution.outcome, MoveOutcome::Ignored);
        assert_eq!(resolution.state, state);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let state = GameState::new(3);
        let resolution = resolve(&state, Edge::vertical(7, 0));

        assert_eq!(resolution.outcome, MoveOutcome::Ignored);
        assert_eq!(resolution.state, state);
    }

    #[test]
    fn test_single_box_keeps_turn() {
        // First box of a 3×3 grid: h(0,0), h(1,0), v(0,0), then v(0,1) closes it.
        let state = replay(3, [
            Edge::horizontal(0, 0), // First -> Second
            Edge::horizontal(1, 0), // Second -> First
            Edge::vertical(0, 0),   // First -> Second
        ]);
        assert_eq!(state.current_player(), Player::Second);

        let resolution = resolve(&state, Edge::vertical(0, 1));

        assert_eq!(resolution.outcome.boxes_completed(), 1);
        assert!(resolution.outcome.extra_turn());
        assert_eq!(resolution.state.owner(BoxPos::new(0, 0)), Some(Player::Second));
        assert_eq!(resolution.state.score(Player::Second), 1);
        assert_eq!(resolution.state.current_player(), Player::Second);
        assert_eq!(resolution.state.winner(), None);
    }

    #[test]
    fn test_double_box_single_extra_turn() {
        // Two boxes side by side on a 2-row strip of a 3×3 grid share v(0,1).
        let state = replay(3, [
            Edge::horizontal(0, 0),
            Edge::horizontal(1, 0),
            Edge::vertical(0, 0),
            Edge::horizontal(0, 1),
            Edge::horizontal(1, 1),
            Edge::vertical(0, 2),
        ]);
        let mover = state.current_player();

        let resolution = resolve(&state, Edge::vertical(0, 1));

        assert_eq!(resolution.outcome.boxes_completed(), 2);
        assert_eq!(resolution.state.score(mover), 2);
        assert_eq!(resolution.state.current_player(), mover);
    }

    #[test]
    fn test_legal_moves_shrink() {
        let state = GameState::new(3);
        assert_eq!(legal_moves(&state).len(), 12);

        let state = apply(&state, Edge::horizontal(2, 1));
        let legal = legal_moves(&state);
        assert_eq!(legal.len(), 11);
        assert!(!legal.contains(&Edge::horizontal(2, 1)));
    }

    #[test]
    fn test_input_snapshot_untouched() {
        let before = GameState::new(4);
        let after = apply(&before, Edge::vertical(2, 3));

        assert_eq!(before, GameState::new(4));
        assert_ne!(before, after);
    }
}
