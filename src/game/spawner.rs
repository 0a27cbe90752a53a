use rand::Rng;
use tracing::warn;

use super::grid::{Cell, Grid, Position};

/// Answers "is something already standing here?" for placement code.
pub trait Occupancy {
    fn is_occupied(&self, pos: Position) -> bool;
}

impl<F> Occupancy for F
where
    F: Fn(Position) -> bool,
{
    fn is_occupied(&self, pos: Position) -> bool {
        self(pos)
    }
}

/// Random free-cell search shared by food, obstacle and portal placement
#[derive(Debug, Clone, Copy)]
pub struct FreeCellFinder {
    grid: Grid,
    retry_limit: u32,
    protect_center: Cell,
    protect_radius: i32,
}

impl FreeCellFinder {
    pub fn new(grid: Grid, retry_limit: u32, protect_radius: i32) -> Self {
        Self {
            grid,
            retry_limit: retry_limit.max(1),
            protect_center: grid.center_cell(),
            protect_radius,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Cells around the spawn center are kept clear for a revived snake
    pub fn is_protected(&self, cell: Cell) -> bool {
        cell.chebyshev(self.protect_center) <= self.protect_radius
    }

    /// Sample random cells until one is free and unprotected.
    ///
    /// After `retry_limit` failed samples the last sampled cell is returned
    /// anyway, occupied or not.
    pub fn find_free_cell<R, O>(&self, rng: &mut R, occupancy: &O) -> Position
    where
        R: Rng + ?Sized,
        O: Occupancy + ?Sized,
    {
        let (position, found) = self.search(rng, occupancy);
        if !found {
            warn!(
                x = position.x,
                y = position.y,
                attempts = self.retry_limit,
                "no free cell found, using last sample"
            );
        }
        position
    }

    /// Like `find_free_cell` but reports exhaustion as `None`
    pub fn try_find_free_cell<R, O>(&self, rng: &mut R, occupancy: &O) -> Option<Position>
    where
        R: Rng + ?Sized,
        O: Occupancy + ?Sized,
    {
        match self.search(rng, occupancy) {
            (position, true) => Some(position),
            (_, false) => None,
        }
    }

    fn search<R, O>(&self, rng: &mut R, occupancy: &O) -> (Position, bool)
    where
        R: Rng + ?Sized,
        O: Occupancy + ?Sized,
    {
        let mut last = self.grid.to_position(self.protect_center);

        for _ in 0..self.retry_limit {
            let cell = Cell::new(
                rng.gen_range(0..self.grid.columns),
                rng.gen_range(0..self.grid.rows),
            );
            last = self.grid.to_position(cell);

            if self.is_protected(cell) || occupancy.is_occupied(last) {
                continue;
            }
            return (last, true);
        }

        (last, false)
    }
}
