//! Game rules: move resolution and turn authority.
//!
//! - `engine`: the deterministic state transition (`apply` / `resolve`)
//! - `authority`: the gate in front of it for local moves

pub mod authority;
pub mod engine;

pub use authority::may_move;
pub use engine::{apply, legal_moves, replay, resolve, MoveOutcome, Resolution};
