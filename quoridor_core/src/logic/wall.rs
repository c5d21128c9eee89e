use crate::logic::board::{Position, WALL_LATTICE};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Horizontal first: it is the orientation that blocks forward progress.
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    #[must_use]
    pub const fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// A two-cell wall anchored at the top-left corner of the 2x2 block it splits.
///
/// A horizontal wall at `(r, c)` lies along the south edges of `(r, c)` and
/// `(r, c + 1)`. A vertical wall at `(r, c)` lies along the east edges of
/// `(r, c)` and `(r + 1, c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub row: u8,
    pub col: u8,
    pub orientation: Orientation,
}

impl Wall {
    #[must_use]
    pub const fn new(row: u8, col: u8, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            orientation,
        }
    }

    #[must_use]
    pub const fn horizontal(row: u8, col: u8) -> Self {
        Self::new(row, col, Orientation::Horizontal)
    }

    #[must_use]
    pub const fn vertical(row: u8, col: u8) -> Self {
        Self::new(row, col, Orientation::Vertical)
    }

    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        self.orientation.is_horizontal()
    }

    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.row < WALL_LATTICE && self.col < WALL_LATTICE
    }

    /// Dense index over the whole lattice, `0..128`.
    #[must_use]
    pub const fn lattice_index(&self) -> usize {
        let anchor = self.row as usize * WALL_LATTICE as usize + self.col as usize;
        anchor * 2 + if self.is_horizontal() { 0 } else { 1 }
    }

    /// The two edge midpoints this wall covers.
    #[must_use]
    pub const fn occupied_segments(&self) -> [(u8, u8); 2] {
        match self.orientation {
            Orientation::Horizontal => [(self.row, self.col), (self.row, self.col + 1)],
            Orientation::Vertical => [(self.row, self.col), (self.row + 1, self.col)],
        }
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.orientation != other.orientation {
            return false;
        }
        let mine = self.occupied_segments();
        other
            .occupied_segments()
            .iter()
            .any(|segment| mine.contains(segment))
    }

    #[must_use]
    pub fn crosses(&self, other: &Self) -> bool {
        self.orientation != other.orientation && self.row == other.row && self.col == other.col
    }

    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self == other || self.overlaps(other) || self.crosses(other)
    }

    /// Whether this wall sits on the edge between two orthogonally adjacent cells.
    /// Non-adjacent pairs are never blocked.
    #[must_use]
    pub fn blocks_movement(&self, from: Position, to: Position) -> bool {
        match self.orientation {
            Orientation::Horizontal => {
                from.col == to.col
                    && from.row.abs_diff(to.row) == 1
                    && from.row.min(to.row) == self.row
                    && (from.col == self.col || from.col == self.col + 1)
            }
            Orientation::Vertical => {
                from.row == to.row
                    && from.col.abs_diff(to.col) == 1
                    && from.col.min(to.col) == self.col
                    && (from.row == self.row || from.row == self.row + 1)
            }
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.is_horizontal() { 'h' } else { 'v' };
        write!(f, "{}{suffix}", Position::new(self.row, self.col))
    }
}
