use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// Configuration for the game
///
/// Distances are in world units (one cell is `cell_size` units wide), times
/// in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Side length of one cell in world units
    pub cell_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Speed
    /// Move interval at session start
    pub initial_move_interval_ms: u64,
    /// Fastest allowed move interval
    pub min_move_interval_ms: u64,
    /// Slowest allowed move interval
    pub max_move_interval_ms: u64,
    /// Every time the score crosses a multiple of this, the snake speeds up
    pub speedup_score_step: u32,
    /// How much the interval shrinks at each speed-up
    pub speedup_interval_step_ms: u64,

    // Portals
    /// Portals start spawning once the score reaches this
    pub portal_score_threshold: u32,
    /// Time between two portal pair regenerations
    pub portal_spawn_interval_ms: u64,
    /// Head-to-portal distance that counts as entering a portal
    pub portal_catch_radius: f32,
    /// Shortest cooldown after a teleport
    pub teleport_cooldown_floor_ms: u64,
    /// Cooldown contribution of each snake segment
    pub teleport_cooldown_per_segment_ms: u64,

    // Placement
    /// Head-to-food distance that counts as eating
    pub food_catch_radius: f32,
    /// Random samples tried before the free-cell search gives up
    pub spawn_retry_limit: u32,
    /// Cells within this Chebyshev distance of the spawn center stay free
    pub spawn_protect_radius: i32,
    /// Copies of the chosen obstacle shape placed per layout
    pub obstacle_count: usize,
    /// Whether the special food kinds are on the board
    pub special_food: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            cell_size: 20,
            initial_snake_length: 3,
            initial_move_interval_ms: 150,
            min_move_interval_ms: 50,
            max_move_interval_ms: 300,
            speedup_score_step: 50,
            speedup_interval_step_ms: 10,
            portal_score_threshold: 50,
            portal_spawn_interval_ms: 10_000,
            portal_catch_radius: 10.0,
            teleport_cooldown_floor_ms: 1_000,
            teleport_cooldown_per_segment_ms: 100,
            food_catch_radius: 10.0,
            spawn_retry_limit: 100,
            spawn_protect_radius: 2,
            obstacle_count: 4,
            special_food: true,
        }
    }
}

/// Player-facing settings the core consumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether a session places an obstacle layout
    pub obstacles_enabled: bool,
    /// Applied to every food score delta
    pub score_multiplier: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            obstacles_enabled: true,
            score_multiplier: 1.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(40, 30)
    }

    /// Geometry view handed to placement and movement code
    pub fn grid(&self) -> Grid {
        Grid::new(
            self.grid_width as i32,
            self.grid_height as i32,
            self.cell_size,
        )
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err(String)` describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < 4 || self.grid_height < 4 {
            return Err(format!(
                "grid must be at least 4x4, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.cell_size <= 0 {
            return Err(format!("cell_size must be positive, got {}", self.cell_size));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_snake_length > self.grid_width / 2 {
            return Err(format!(
                "initial_snake_length ({}) does not fit in half the grid width ({})",
                self.initial_snake_length, self.grid_width
            ));
        }

        if self.min_move_interval_ms == 0 {
            return Err("min_move_interval_ms must be positive".to_string());
        }

        if !(self.min_move_interval_ms..=self.max_move_interval_ms)
            .contains(&self.initial_move_interval_ms)
        {
            return Err(format!(
                "initial_move_interval_ms ({}) must be within [{}, {}]",
                self.initial_move_interval_ms,
                self.min_move_interval_ms,
                self.max_move_interval_ms
            ));
        }

        if self.speedup_score_step == 0 {
            return Err("speedup_score_step must be at least 1".to_string());
        }

        if self.portal_catch_radius <= 0.0 || self.food_catch_radius <= 0.0 {
            return Err("catch radii must be positive".to_string());
        }

        if self.portal_catch_radius > self.cell_size as f32 {
            return Err(format!(
                "portal_catch_radius ({}) cannot exceed cell_size ({})",
                self.portal_catch_radius, self.cell_size
            ));
        }

        if self.spawn_retry_limit == 0 {
            return Err("spawn_retry_limit must be at least 1".to_string());
        }

        if self.spawn_protect_radius < 0 {
            return Err(format!(
                "spawn_protect_radius must be non-negative, got {}",
                self.spawn_protect_radius
            ));
        }

        Ok(())
    }
}
