//! Static obstacle layouts.
//!
//! A session picks one hand-authored shape and stamps a few copies of it on
//! free cells. The resulting layout is kept in the game state so a revived
//! session gets the exact same cells back.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::grid::{Cell, Position};
use super::spawner::{FreeCellFinder, Occupancy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleShape {
    Bar,
    Column,
    Corner,
    Plus,
    Square,
}

impl ObstacleShape {
    pub const ALL: [ObstacleShape; 5] = [
        ObstacleShape::Bar,
        ObstacleShape::Column,
        ObstacleShape::Corner,
        ObstacleShape::Plus,
        ObstacleShape::Square,
    ];

    /// Cell offsets from the anchor cell
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            ObstacleShape::Bar => &[(0, 0), (1, 0), (2, 0), (3, 0)],
            ObstacleShape::Column => &[(0, 0), (0, 1), (0, 2), (0, 3)],
            ObstacleShape::Corner => &[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)],
            ObstacleShape::Plus => &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
            ObstacleShape::Square => &[(0, 0), (1, 0), (0, 1), (1, 1)],
        }
    }
}

/// The obstacle cells of one session and where they came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    /// `None` for empty layouts and layouts supplied by a level
    pub shape: Option<ObstacleShape>,
    pub cells: Vec<Position>,
}

impl ObstacleLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Layout made of externally supplied cells
    pub fn from_cells(cells: Vec<Position>) -> Self {
        Self { shape: None, cells }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Chooses obstacle layouts at session start
#[derive(Debug, Clone, Copy)]
pub struct ObstacleManager {
    finder: FreeCellFinder,
    copies: usize,
}

impl ObstacleManager {
    pub fn new(finder: FreeCellFinder, copies: usize) -> Self {
        Self { finder, copies }
    }

    /// Pick the layout for a new session.
    ///
    /// A saved layout (revival) is returned verbatim. Otherwise a random
    /// shape is stamped `copies` times onto cells that are free, in bounds
    /// and outside the spawn protection zone.
    pub fn choose_layout<R, O>(
        &self,
        rng: &mut R,
        occupancy: &O,
        saved: Option<&ObstacleLayout>,
    ) -> ObstacleLayout
    where
        R: Rng + ?Sized,
        O: Occupancy + ?Sized,
    {
        if let Some(saved) = saved {
            debug!(cells = saved.len(), shape = ?saved.shape, "restoring saved obstacle layout");
            return saved.clone();
        }

        let shape = *ObstacleShape::ALL
            .choose(rng)
            .unwrap_or(&ObstacleShape::Square);
        let layout = self.stamp(rng, occupancy, shape);
        debug!(cells = layout.len(), ?shape, "placed obstacle layout");
        layout
    }

    /// Place `copies` of `shape`
    pub fn stamp<R, O>(&self, rng: &mut R, occupancy: &O, shape: ObstacleShape) -> ObstacleLayout
    where
        R: Rng + ?Sized,
        O: Occupancy + ?Sized,
    {
        let grid = self.finder.grid();
        let mut cells: Vec<Position> = Vec::new();

        for _ in 0..self.copies {
            let taken = |pos: Position| occupancy.is_occupied(pos) || cells.contains(&pos);
            let anchor = grid.to_cell(self.finder.find_free_cell(rng, &taken));

            let stamped: Vec<Position> = shape
                .offsets()
                .iter()
                .map(|&(dc, dr)| anchor.offset(dc, dr))
                .filter(|cell: &Cell| grid.contains_cell(*cell) && !self.finder.is_protected(*cell))
                .map(|cell| grid.to_position(cell))
                .filter(|pos| !taken(*pos))
                .collect();

            cells.extend(stamped);
        }

        ObstacleLayout {
            shape: Some(shape),
            cells,
        }
    }
}
