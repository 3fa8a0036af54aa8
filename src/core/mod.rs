//! Core types: players, configuration, game state, RNG.
//!
//! This module holds the data every other layer shares. The rules engine
//! transforms `GameState`; the session layer carries `SessionConfig` over
//! the wire.

pub mod player;
pub mod config;
pub mod state;
pub mod rng;

pub use player::{Player, PlayerMap};
pub use config::{
    validate_grid_size, GameMode, RoomCode, SessionConfig, DEFAULT_GRID_SIZE, GRID_PRESETS,
    MAX_GRID_SIZE, MIN_GRID_SIZE,
};
pub use state::{GameResult, GameState};
pub use rng::SessionRng;
