use super::action::Direction;
use serde::{Deserialize, Serialize};

/// A point in world units. Every simulated entity sits on a cell origin,
/// i.e. both coordinates are multiples of the grid's cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when `other` is strictly closer than `radius`. A zero radius
    /// never matches, so callers wanting exact equality compare directly.
    pub fn is_within(&self, other: Position, radius: f32) -> bool {
        self.distance_to(other) < radius
    }
}

/// Integer grid coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn offset(&self, dc: i32, dr: i32) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }

    /// Chebyshev distance, used for square protection zones
    pub fn chebyshev(&self, other: Cell) -> i32 {
        (self.col - other.col).abs().max((self.row - other.row).abs())
    }
}

/// Playfield geometry handed to every component that places or moves things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: i32,
    pub rows: i32,
    pub cell_size: i32,
}

impl Grid {
    pub fn new(columns: i32, rows: i32, cell_size: i32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// World width in units
    pub fn width(&self) -> i32 {
        self.columns * self.cell_size
    }

    /// World height in units
    pub fn height(&self) -> i32 {
        self.rows * self.cell_size
    }

    /// Check `[0, width) x [0, height)`
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width() && pos.y >= 0 && pos.y < self.height()
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.col < self.columns && cell.row >= 0 && cell.row < self.rows
    }

    pub fn to_position(&self, cell: Cell) -> Position {
        Position::new(cell.col * self.cell_size, cell.row * self.cell_size)
    }

    /// Cell containing a world position; floors towards negative infinity so
    /// off-grid positions map to off-grid cells.
    pub fn to_cell(&self, pos: Position) -> Cell {
        Cell::new(
            pos.x.div_euclid(self.cell_size),
            pos.y.div_euclid(self.cell_size),
        )
    }

    pub fn center_cell(&self) -> Cell {
        Cell::new(self.columns / 2, self.rows / 2)
    }
}
