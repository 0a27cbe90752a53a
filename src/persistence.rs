//! High-score and settings storage for the terminal host
//!
//! The core never touches the disk. The host loads the high score and
//! settings before a session and writes the high score back when a game
//! ends. Both files are JSON; a missing file reads as the default value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

pub use crate::game::Settings;
use crate::game::GameResult;

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "portal_snake.high_score";

/// Get/set of a single high-score value
pub trait HighScoreStore {
    fn load(&self) -> GameResult<u32>;
    fn save(&mut self, high_score: u32) -> GameResult<()>;
}

/// Stores `{"portal_snake.high_score": N}` in a JSON file.
///
/// Other keys already in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> GameResult<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn load(&self) -> GameResult<u32> {
        let entries = self.read_entries()?;
        let high_score = entries
            .get(HIGH_SCORE_KEY)
            .and_then(|v| v.as_u64())
            .map_or(0, |v| v.min(u32::MAX as u64) as u32);
        Ok(high_score)
    }

    fn save(&mut self, high_score: u32) -> GameResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(HIGH_SCORE_KEY.to_string(), high_score.into());

        create_parent_dir(&self.path)?;
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        debug!(high_score, path = ?self.path, "high score saved");
        Ok(())
    }
}

/// Keeps the high score in memory; used by tests and `--no-save` runs
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryHighScoreStore {
    high_score: u32,
}

impl MemoryHighScoreStore {
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> GameResult<u32> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> GameResult<()> {
        self.high_score = high_score;
        Ok(())
    }
}

/// Read settings from `path`, falling back to defaults when it does not exist
pub fn load_settings(path: &Path) -> GameResult<Settings> {
    if !path.exists() {
        debug!(?path, "no settings file, using defaults");
        return Ok(Settings::default());
    }
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn save_settings(path: &Path, settings: &Settings) -> GameResult<()> {
    create_parent_dir(path)?;
    std::fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

fn create_parent_dir(path: &Path) -> GameResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
