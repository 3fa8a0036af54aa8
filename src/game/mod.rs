//! A running match: configuration plus the local replica of the board.
//!
//! `Game` is what a front-end drives directly in offline mode, and what the
//! session layer drives in online mode. It puts turn authority in front of
//! local moves and applies remote moves unchecked.

pub mod snapshot;

pub use snapshot::BoardSnapshot;

use tracing::{debug, trace};

use crate::board::Edge;
use crate::core::{GameState, SessionConfig};
use crate::error::ConfigError;
use crate::rules::{may_move, resolve, MoveOutcome};

/// A match in progress.
#[derive(Clone, Debug)]
pub struct Game {
    config: SessionConfig,
    state: GameState,
}

impl Game {
    /// Start a match on a fresh board.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(config.grid_size);
        Ok(Self { config, state })
    }

    /// Match configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current board.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Render-ready copy of the board.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.state)
    }

    /// May the local side move now?
    #[must_use]
    pub fn can_move(&self) -> bool {
        may_move(&self.config, &self.state)
    }

    /// Submit a locally originated move.
    ///
    /// Returns `None` when the move was dropped: not our turn, edge already
    /// claimed, or edge off the board. Only a `Some` result should be sent
    /// to the peer.
    pub fn submit(&mut self, edge: Edge) -> Option<MoveOutcome> {
        if !self.can_move() {
            trace!(%edge, current = %self.state.current_player(), "move refused: not our turn");
            return None;
        }
        let outcome = self.advance(edge);
        outcome.is_claimed().then_some(outcome)
    }

    /// Apply a move received from the peer. Turn order is not checked.
    pub fn apply_remote(&mut self, edge: Edge) -> MoveOutcome {
        self.advance(edge)
    }

    /// Reset to a fresh board with the same configuration.
    pub fn restart(&mut self) {
        debug!(grid_size = self.config.grid_size, "board reset");
        self.state = GameState::new(self.config.grid_size);
    }

    fn advance(&mut self, edge: Edge) -> MoveOutcome {
        let resolution = resolve(&self.state, edge);
        if let MoveOutcome::Claimed {
            mover,
            completed,
            result,
        } = &resolution.outcome
        {
            debug!(%edge, %mover, boxes = completed.len(), ?result, "edge claimed");
        }
        self.state = resolution.state;
        resolution.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, RoomCode};

    fn online(local: Player) -> Game {
        let room = RoomCode::new(4821).unwrap();
        Game::new(SessionConfig::online("A", "B", 3, room, local)).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert_eq!(
            Game::new(SessionConfig::offline("A", "B", 0)).unwrap_err(),
            ConfigError::GridSize(0)
        );
    }

    #[test]
    fn test_offline_alternates() {
        let mut game = Game::new(SessionConfig::offline("A", "B", 3)).unwrap();

        assert!(game.submit(Edge::horizontal(0, 0)).is_some());
        assert_eq!(game.state().current_player(), Player::Second);
        assert!(game.submit(Edge::horizontal(0, 1)).is_some());
        assert_eq!(game.state().current_player(), Player::First);
    }

    #[test]
    fn test_submit_duplicate_dropped() {
        let mut game = Game::new(SessionConfig::offline("A", "B", 3)).unwrap();
        game.submit(Edge::vertical(0, 0));
        let before = game.state().clone();

        assert!(game.submit(Edge::vertical(0, 0)).is_none());
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_online_out_of_turn_dropped() {
        let mut game = online(Player::Second);
        let before = game.state().clone();

        assert!(!game.can_move());
        assert!(game.submit(Edge::horizontal(0, 0)).is_none());
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_remote_moves_not_gated() {
        let mut game = online(Player::Second);

        // First's move arrives from the peer.
        let outcome = game.apply_remote(Edge::horizontal(0, 0));
        assert!(outcome.is_claimed());
        assert!(game.can_move());
    }

    #[test]
    fn test_restart_keeps_config() {
        let mut game = online(Player::First);
        game.submit(Edge::horizontal(0, 0));
        game.restart();

        assert_eq!(game.state(), &GameState::new(3));
        assert_eq!(game.config().local_player, Some(Player::First));
    }
}
