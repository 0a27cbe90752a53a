//! Portal Snake - a grid snake game with paired portals, obstacles and special food
//!
//! This library provides:
//! - Core game logic (game module), free of I/O and clocks
//! - High-score and settings storage (persistence module)
//! - Tile-layer levels (level module)
//! - Terminal host: input mapping, ratatui rendering, metrics and the play mode

pub mod game;
pub mod input;
pub mod level;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
