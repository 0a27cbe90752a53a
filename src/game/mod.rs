//! Core game logic for Portal Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Hosts drive it through [`GameEngine`] with their own clock.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod grid;
pub mod obstacles;
pub mod portal;
pub mod snake;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{GameConfig, Settings};
pub use engine::{GameEngine, GameEvent};
pub use error::{GameError, GameResult};
pub use food::{Food, FoodKind};
pub use grid::{Cell, Grid, Position};
pub use obstacles::{ObstacleLayout, ObstacleShape};
pub use portal::{Portal, PortalId, PortalPair, PortalState};
pub use snake::Snake;
pub use state::{CollisionType, GameState, Snapshot};
