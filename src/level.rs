//! Custom obstacle layouts from a tile layer
//!
//! A level is a rectangular layer of tile IDs, row-major: nonzero is an
//! obstacle, zero is empty. Tiles are `tile_size` pixels wide in the layer's
//! own space and are rescaled onto the playfield's cell size.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::{GameError, GameResult, Grid, Position};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
    pub data: Vec<u32>,
}

impl TileLayer {
    pub fn load(path: &Path) -> GameResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let layer: TileLayer = serde_json::from_str(&json)?;
        layer.validate()?;
        Ok(layer)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.tile_size == 0 {
            return Err(GameError::InvalidLevel("tile_size must be positive".to_string()));
        }
        if self.data.len() != self.width * self.height {
            return Err(GameError::InvalidLevel(format!(
                "layer is {}x{} but holds {} tiles",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// World positions of every obstacle tile that lands on `grid`.
    ///
    /// A tile's top-left pixel is mapped to the cell containing it, so a
    /// layer drawn with 32px tiles still lines up on a 20-unit grid. Tiles
    /// that map outside the grid are dropped, duplicates collapse.
    pub fn obstacle_cells(&self, grid: &Grid) -> GameResult<Vec<Position>> {
        self.validate()?;

        let mut cells = Vec::new();
        for (index, tile) in self.data.iter().enumerate() {
            if *tile == 0 {
                continue;
            }
            let col = (index % self.width) as i64 * self.tile_size as i64;
            let row = (index / self.width) as i64 * self.tile_size as i64;
            let Ok(x) = i32::try_from(col) else { continue };
            let Ok(y) = i32::try_from(row) else { continue };

            let position = grid.to_position(grid.to_cell(Position::new(x, y)));
            if grid.contains(position) && !cells.contains(&position) {
                cells.push(position);
            }
        }

        debug!(count = cells.len(), "level obstacle cells");
        Ok(cells)
    }
}
