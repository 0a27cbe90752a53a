use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, warn};

use crate::game::{Action, GameEngine, GameEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

pub struct HumanMode {
    engine: GameEngine,
    store: Box<dyn HighScoreStore>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Session clock origin; the engine sees time relative to it
    origin: Instant,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(mut engine: GameEngine, store: Box<dyn HighScoreStore>) -> Result<Self> {
        let high_score = store.load().context("Failed to load high score")?;
        engine.set_high_score(high_score);

        let origin = Instant::now();
        engine.start(Duration::ZERO);

        Ok(Self {
            engine,
            store,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            origin,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The engine decides when a move is due; tick it well above the
        // fastest move rate
        let mut tick_timer = interval(Duration::from_millis(10));

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game()?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(action) => self.apply(action),
                KeyAction::Restart => self.restart_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Turn(direction) => {
                let (dx, dy) = direction.delta();
                if let Err(err) = self.engine.set_direction(dx, dy) {
                    debug!(%err, "direction ignored");
                }
            }
            Action::TogglePause => self.engine.toggle_pause(),
            Action::Revive => {
                if self.engine.revive(self.now()) {
                    self.metrics.on_revive();
                }
            }
        }
    }

    fn update_game(&mut self) -> Result<()> {
        let events = self.engine.tick(self.now());
        self.metrics.record(&events);

        for event in &events {
            if let GameEvent::NewHighScore(high_score) = event {
                // A failed write must not end the session
                if let Err(err) = self.store.save(*high_score) {
                    warn!(%err, "failed to save high score");
                }
            }
        }

        Ok(())
    }

    fn restart_game(&mut self) {
        self.engine.restart(self.now());
        self.metrics.on_game_start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
