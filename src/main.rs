use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use portal_snake::game::{GameConfig, GameEngine, GameError};
use portal_snake::level::TileLayer;
use portal_snake::modes::HumanMode;
use portal_snake::persistence::{
    HighScoreStore, JsonFileHighScoreStore, MemoryHighScoreStore, load_settings,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal_snake")]
#[command(version, about = "Snake with portals, obstacles and special food")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value = "30")]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value = "20")]
    height: usize,

    /// Seed for food, obstacle and portal placement
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file (obstacles on/off, score multiplier)
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// High-score file
    #[arg(long, default_value = "high_scores.json")]
    high_scores: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Tile-layer level providing the obstacle layout
    #[arg(long)]
    level: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to ratatui, so logs only go to a file
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let config = GameConfig::new(cli.width, cli.height);
    config
        .validate()
        .map_err(GameError::InvalidConfig)
        .context("Invalid command line")?;

    let settings = load_settings(&cli.settings)
        .with_context(|| format!("Failed to load settings from {:?}", cli.settings))?;

    let mut engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config.clone(), settings, seed),
        None => GameEngine::new(config.clone(), settings),
    };

    if let Some(path) = &cli.level {
        let layer =
            TileLayer::load(path).with_context(|| format!("Failed to load level {:?}", path))?;
        engine = engine.with_level(layer.obstacle_cells(&config.grid())?);
    }

    let store: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryHighScoreStore::default())
    } else {
        Box::new(JsonFileHighScoreStore::new(cli.high_scores))
    };

    let mut human_mode = HumanMode::new(engine, store)?;
    human_mode.run().await?;

    Ok(())
}
