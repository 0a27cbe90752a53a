use thiserror::Error;

/// Failures outside the tick loop. Collisions are game outcomes, not errors,
/// and are reported through `GameEvent::GameOver`.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("direction ({dx}, {dy}) is not an axis-aligned unit vector")]
    InvalidDirection { dx: i32, dy: i32 },

    #[error("persistence failure: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("malformed data: {0}")]
    Format(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
