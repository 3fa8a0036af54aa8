//! # dots-boxes
//!
//! A deterministic Dots & Boxes engine with a two-peer lockstep session
//! protocol.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `rules::apply(&state, edge)` returns a new state
//!    and never mutates its input. Invalid moves are no-ops.
//!
//! 2. **Replicated State Machine**: Both peers hold a full replica and apply
//!    the same moves in the same order. No authoritative server.
//!
//! 3. **Transport Agnostic**: The session is written against the
//!    `Link` / `Rendezvous` traits. `protocol::memory` provides an
//!    in-process transport.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state snapshots via `im-rs`.
//!
//! - **Turn Authority**: Local input is gated on the local seat; remote
//!   moves are applied as received.
//!
//! ## Modules
//!
//! - `core`: Players, configuration, room codes, game state, RNG
//! - `board`: Edge and box geometry
//! - `rules`: Move resolution and turn authority
//! - `game`: A running match and its render snapshot
//! - `protocol`: Wire messages, transport traits, connection lifecycle, session

pub mod core;
pub mod board;
pub mod rules;
pub mod game;
pub mod protocol;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    GameMode, GameResult, GameState, Player, PlayerMap, RoomCode, SessionConfig, SessionRng,
};

pub use crate::board::{BoxPos, Edge, Orientation};

pub use crate::rules::{apply, legal_moves, may_move, replay, resolve, MoveOutcome};

pub use crate::game::{BoardSnapshot, Game};

pub use crate::protocol::{
    ConnectionManager, Link, LinkEvent, MemoryNetwork, NetworkMessage, Rendezvous, Session,
    SessionEvent, SessionPhase,
};

pub use crate::error::{ConfigError, SessionError, SessionResult, TransportError};
