//! Per-move collision checks.
//!
//! Order is fixed: teleport, wall, obstacle, self, food. A teleport diverts
//! the move before it happens; the remaining checks run on the final body
//! position. Fatal checks always win over food in the same move.

use super::config::GameConfig;
use super::grid::Position;
use super::portal::PortalId;
use super::state::{CollisionType, Session};

/// Outcome of the checks that run after the body moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing hit
    Clear,
    /// The session ends
    Fatal(CollisionType),
    /// The head reached `session.foods[index]`
    Food(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    food_catch_radius: f32,
}

impl CollisionResolver {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            food_catch_radius: config.food_catch_radius,
        }
    }

    /// Check 1: does the planned head position enter an active portal?
    pub fn teleport_entry(&self, session: &Session, next_head: Position) -> Option<PortalId> {
        session.portals.catch(next_head)
    }

    /// Checks 2 to 5 on the moved body.
    ///
    /// After a teleport the exit cell is known to be in bounds and free of
    /// obstacles, so only the self check runs and food is not eaten.
    pub fn after_move(&self, session: &Session, teleported: bool) -> Resolution {
        let head = session.snake.head();

        if !teleported {
            if !session.grid.contains(head) {
                return Resolution::Fatal(CollisionType::Wall);
            }
            if session.obstacles.contains(head) {
                return Resolution::Fatal(CollisionType::Obstacle);
            }
        }

        if session.snake.head_hits_body() {
            return Resolution::Fatal(CollisionType::SelfCollision);
        }

        if teleported {
            return Resolution::Clear;
        }

        session
            .foods
            .iter()
            .position(|food| head.is_within(food.position, self.food_catch_radius))
            .map_or(Resolution::Clear, Resolution::Food)
    }
}
