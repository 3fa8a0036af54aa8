//! Read-only board view handed to renderers.

use serde::{Deserialize, Serialize};

use crate::board::{edge_dims, BoxPos, Edge, Orientation};
use crate::core::{GameResult, GameState, Player, PlayerMap};

/// Everything a renderer needs to draw one frame.
///
/// Grids are nested row-major vectors: `horizontal[row][col]`,
/// `vertical[row][col]`, `boxes[row][col]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: usize,
    pub horizontal: Vec<Vec<bool>>,
    pub vertical: Vec<Vec<bool>>,
    pub boxes: Vec<Vec<Option<Player>>>,
    pub current_player: Player,
    pub scores: PlayerMap<u32>,
    pub winner: Option<GameResult>,
}

impl BoardSnapshot {
    /// Capture a state.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        let size = state.size();
        let edges = |orientation: Orientation| -> Vec<Vec<bool>> {
            let (rows, cols) = edge_dims(orientation, size);
            (0..rows)
                .map(|row| {
                    (0..cols)
                        .map(|col| state.is_claimed(Edge::new(orientation, row, col)))
                        .collect()
                })
                .collect()
        };
        let cells = size.saturating_sub(1);
        let boxes: Vec<Vec<Option<Player>>> = (0..cells)
            .map(|row| (0..cells).map(|col| state.owner(BoxPos::new(row, col))).collect())
            .collect();

        Self {
            size,
            horizontal: edges(Orientation::Horizontal),
            vertical: edges(Orientation::Vertical),
            boxes,
            current_player: state.current_player(),
            scores: state.scores().clone(),
            winner: state.winner(),
        }
    }
}

impl From<&GameState> for BoardSnapshot {
    fn from(state: &GameState) -> Self {
        Self::capture(state)
    }
}
