//! Edge and box addressing for an N×N dot grid.
//!
//! A grid of `N` dots per side has:
//! - `N * (N-1)` horizontal edges (`row ∈ [0, N)`, `col ∈ [0, N-1)`)
//! - `(N-1) * N` vertical edges (`row ∈ [0, N-1)`, `col ∈ [0, N)`)
//! - `(N-1)^2` boxes
//!
//! Everything here is a pure function of the address and the grid size.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Direction of an edge. Wire form is `"horizontal"` / `"vertical"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Address of a claimable edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

impl Edge {
    /// Create an edge address.
    #[must_use]
    pub const fn new(orientation: Orientation, row: usize, col: usize) -> Self {
        Self {
            orientation,
            row,
            col,
        }
    }

    /// Horizontal edge `h(row, col)`.
    #[must_use]
    pub const fn horizontal(row: usize, col: usize) -> Self {
        Self::new(Orientation::Horizontal, row, col)
    }

    /// Vertical edge `v(row, col)`.
    #[must_use]
    pub const fn vertical(row: usize, col: usize) -> Self {
        Self::new(Orientation::Vertical, row, col)
    }

    /// Check the address exists on a grid of `size` dots per side.
    #[must_use]
    pub fn in_bounds(self, size: usize) -> bool {
        let (rows, cols) = edge_dims(self.orientation, size);
        self.row < rows && self.col < cols
    }

    /// Row-major index into the storage for this edge's orientation.
    ///
    /// Only meaningful when `in_bounds(size)` holds.
    #[must_use]
    pub fn index(self, size: usize) -> usize {
        let (_, cols) = edge_dims(self.orientation, size);
        self.row * cols + self.col
    }

    /// Boxes touching this edge: zero (degenerate grids), one (border) or two.
    ///
    /// ```
    /// use dots_boxes::board::{adjacent_boxes, BoxPos, Edge};
    ///
    /// // Interior horizontal edge on a 3×3 grid sits between two boxes.
    /// let boxes = adjacent_boxes(Edge::horizontal(1, 0), 3);
    /// assert_eq!(boxes.as_slice(), &[BoxPos::new(0, 0), BoxPos::new(1, 0)]);
    /// ```
    #[must_use]
    pub fn adjacent_boxes(self, size: usize) -> SmallVec<[BoxPos; 2]> {
        adjacent_boxes(self, size)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.orientation {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        };
        write!(f, "{}({},{})", tag, self.row, self.col)
    }
}

/// Address of a box (unit cell).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxPos {
    pub row: usize,
    pub col: usize,
}

impl BoxPos {
    /// Create a box address.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check the address exists on a grid of `size` dots per side.
    #[must_use]
    pub fn in_bounds(self, size: usize) -> bool {
        let cells = size.saturating_sub(1);
        self.row < cells && self.col < cells
    }

    /// Row-major index into box storage.
    #[must_use]
    pub fn index(self, size: usize) -> usize {
        self.row * size.saturating_sub(1) + self.col
    }

    /// The four edges bounding this box.
    #[must_use]
    pub fn edges(self) -> BoxEdges {
        box_edges(self)
    }
}

/// The four edges bounding a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxEdges {
    pub top: Edge,
    pub bottom: Edge,
    pub left: Edge,
    pub right: Edge,
}

impl BoxEdges {
    /// The edges as an array (top, bottom, left, right).
    #[must_use]
    pub const fn to_array(self) -> [Edge; 4] {
        [self.top, self.bottom, self.left, self.right]
    }
}

/// `(rows, cols)` of the edge lattice for one orientation.
#[must_use]
pub fn edge_dims(orientation: Orientation, size: usize) -> (usize, usize) {
    let short = size.saturating_sub(1);
    match orientation {
        Orientation::Horizontal => (size, short),
        Orientation::Vertical => (short, size),
    }
}

/// Number of edges of one orientation.
#[must_use]
pub fn edge_count(orientation: Orientation, size: usize) -> usize {
    let (rows, cols) = edge_dims(orientation, size);
    rows * cols
}

/// Number of boxes on the grid, `(N-1)^2`.
#[must_use]
pub fn box_count(size: usize) -> usize {
    let cells = size.saturating_sub(1);
    cells * cells
}

/// Boxes touching an edge.
///
/// A horizontal edge at `(r,c)` touches the box above `(r-1,c)` if `r > 0`
/// and the box below `(r,c)` if `r < N-1`. A vertical edge at `(r,c)` touches
/// the box to the left `(r,c-1)` if `c > 0` and to the right `(r,c)` if
/// `c < N-1`.
#[must_use]
pub fn adjacent_boxes(edge: Edge, size: usize) -> SmallVec<[BoxPos; 2]> {
    let mut boxes = SmallVec::new();
    let last = size.saturating_sub(1);
    let Edge { row, col, .. } = edge;

    match edge.orientation {
        Orientation::Horizontal => {
            if row > 0 {
                boxes.push(BoxPos::new(row - 1, col));
            }
            if row < last {
                boxes.push(BoxPos::new(row, col));
            }
        }
        Orientation::Vertical => {
            if col > 0 {
                boxes.push(BoxPos::new(row, col - 1));
            }
            if col < last {
                boxes.push(BoxPos::new(row, col));
            }
        }
    }

    boxes
}

/// Edges bounding box `(r,c)`: `h[r][c]`, `h[r+1][c]`, `v[r][c]`, `v[r][c+1]`.
#[must_use]
pub fn box_edges(pos: BoxPos) -> BoxEdges {
    let BoxPos { row, col } = pos;
    BoxEdges {
        top: Edge::horizontal(row, col),
        bottom: Edge::horizontal(row + 1, col),
        left: Edge::vertical(row, col),
        right: Edge::vertical(row, col + 1),
    }
}
