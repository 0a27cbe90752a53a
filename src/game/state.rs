use std::time::Duration;

use super::food::Food;
use super::grid::{Grid, Position};
use super::obstacles::ObstacleLayout;
use super::portal::{Portal, PortalCoordinator};
use super::snake::Snake;
use super::spawner::Occupancy;

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CollisionType {
    /// Head left the playfield
    Wall,
    /// Head entered an obstacle cell
    Obstacle,
    /// Head landed on another segment
    SelfCollision,
}

/// Score and session flags. Exactly one instance per session, owned by the
/// engine and read fresh by every component on every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub score: u32,
    pub high_score: u32,
    pub moves: u32,
    pub paused: bool,
    pub game_over: bool,
    pub teleporting: bool,
    pub reviving: bool,
    /// Layout to restore when the session is revived
    pub saved_obstacles: Option<ObstacleLayout>,
}

impl GameState {
    /// Fresh state for a restart; only the high score survives
    pub fn reset(&mut self) {
        *self = GameState {
            high_score: self.high_score,
            ..GameState::default()
        };
    }

    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }
}

/// Everything one play session simulates
#[derive(Debug, Clone)]
pub struct Session {
    pub grid: Grid,
    pub snake: Snake,
    pub foods: Vec<Food>,
    pub obstacles: ObstacleLayout,
    pub portals: PortalCoordinator,
    pub state: GameState,
    /// Session clock value of the last move
    pub last_move_at: Duration,
}

impl Occupancy for Session {
    fn is_occupied(&self, pos: Position) -> bool {
        is_taken(&self.snake, &self.foods, &self.obstacles, pos) || self.portals.occupies(pos)
    }
}

/// Occupancy over the entities that block placement, portals excluded.
///
/// Takes the parts separately so callers can hold it while mutating the
/// portal coordinator.
pub fn is_taken(snake: &Snake, foods: &[Food], obstacles: &ObstacleLayout, pos: Position) -> bool {
    snake.contains(pos) || foods.iter().any(|f| f.position == pos) || obstacles.contains(pos)
}

/// Read-only view handed to the presentation layer each frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub score: u32,
    pub high_score: u32,
    pub length: usize,
    pub moves: u32,
    pub game_over: bool,
    pub paused: bool,
    pub teleporting: bool,
    pub grid: Grid,
    /// Snake segments, head first
    pub positions: Vec<Position>,
    pub foods: Vec<Food>,
    pub obstacles: Vec<Position>,
    pub portals: Vec<Portal>,
    pub move_interval: Duration,
    pub cause: Option<CollisionType>,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.positions.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use crate::game::config::GameConfig;
    use crate::game::food::FoodKind;

    fn session() -> Session {
        let config = GameConfig::small();
        Session {
            grid: config.grid(),
            snake: Snake::new(
                Position::new(100, 100),
                Direction::Right,
                3,
                config.cell_size,
                Duration::from_millis(150),
            ),
            foods: vec![Food::new(Position::new(20, 20), FoodKind::Regular)],
            obstacles: ObstacleLayout::from_cells(vec![Position::new(160, 160)]),
            portals: PortalCoordinator::new(&config),
            state: GameState::default(),
            last_move_at: Duration::ZERO,
        }
    }

    #[test]
    fn test_occupancy() {
        let session = session();
        assert!(session.is_occupied(Position::new(80, 100)));
        assert!(session.is_occupied(Position::new(20, 20)));
        assert!(session.is_occupied(Position::new(160, 160)));
        assert!(!session.is_occupied(Position::new(0, 0)));
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut state = GameState {
            score: 120,
            high_score: 300,
            game_over: true,
            saved_obstacles: Some(ObstacleLayout::empty()),
            ..GameState::default()
        };
        state.reset();
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 300);
        assert!(!state.game_over);
        assert!(state.saved_obstacles.is_none());
        assert!(state.is_running());
    }
}
