//! Turn authority: may this process submit a move right now?
//!
//! The only access-control point in the system. Received moves are applied
//! without consulting it; enforcing turn order is the sender's job.

use crate::core::{GameMode, GameState, SessionConfig};

/// Check whether a locally originated move is allowed.
///
/// - Offline: always. Both players share one input and the state's
///   `current_player` says whose turn it is.
/// - Online: only when the local seat is the player to move.
#[must_use]
pub fn may_move(config: &SessionConfig, state: &GameState) -> bool {
    match config.mode {
        GameMode::Offline => true,
        GameMode::Online => config.local_player == Some(state.current_player()),
    }
}
