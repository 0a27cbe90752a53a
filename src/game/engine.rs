use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use super::{
    action::Direction,
    collision::{CollisionResolver, Resolution},
    config::{GameConfig, Settings},
    error::{GameError, GameResult},
    food::{Food, FoodKind},
    grid::Position,
    obstacles::{ObstacleLayout, ObstacleManager},
    portal::PortalCoordinator,
    snake::Snake,
    spawner::FreeCellFinder,
    state::{CollisionType, GameState, Session, Snapshot, is_taken},
};

/// Turn requests held between two moves; older ones are dropped first
const MAX_QUEUED_INTENTS: usize = 4;

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    FoodEaten {
        kind: FoodKind,
        position: Position,
        points: u32,
    },
    Teleported {
        from: Position,
        to: Position,
        cooldown: Duration,
    },
    PortalsSpawned {
        a: Position,
        b: Position,
    },
    PortalsReactivated,
    SpeedChanged {
        interval: Duration,
    },
    NewHighScore(u32),
    GameOver {
        cause: CollisionType,
        score: u32,
    },
}

/// The game loop controller. Owns the only session and its state; every
/// operation goes through it.
pub struct GameEngine {
    config: GameConfig,
    settings: Settings,
    finder: FreeCellFinder,
    obstacle_manager: ObstacleManager,
    resolver: CollisionResolver,
    level: Option<Vec<Position>>,
    session: Session,
    intents: VecDeque<Direction>,
    rng: StdRng,
    started: bool,
    cause: Option<CollisionType>,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig, settings: Settings) -> Self {
        Self::with_rng(config, settings, StdRng::from_entropy())
    }

    /// Deterministic engine for replays and tests
    pub fn with_seed(config: GameConfig, settings: Settings, seed: u64) -> Self {
        Self::with_rng(config, settings, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, settings: Settings, rng: StdRng) -> Self {
        let grid = config.grid();
        let finder = FreeCellFinder::new(grid, config.spawn_retry_limit, config.spawn_protect_radius);
        let obstacle_manager = ObstacleManager::new(finder, config.obstacle_count);
        let resolver = CollisionResolver::new(&config);

        let mut engine = Self {
            session: Self::empty_session(&config),
            config,
            settings,
            finder,
            obstacle_manager,
            resolver,
            level: None,
            intents: VecDeque::new(),
            rng,
            started: false,
            cause: None,
        };
        engine.session = engine.build_session(GameState::default());
        engine
    }

    /// Use a level's obstacle cells instead of a generated layout.
    ///
    /// Cells inside the spawn protection zone are dropped so the snake never
    /// starts inside an obstacle. The layout still follows the obstacle mode
    /// setting.
    pub fn with_level(mut self, cells: Vec<Position>) -> Self {
        let grid = self.config.grid();
        let (kept, protected): (Vec<Position>, Vec<Position>) = cells
            .into_iter()
            .partition(|pos| !self.finder.is_protected(grid.to_cell(*pos)));
        if !protected.is_empty() {
            warn!(
                dropped = protected.len(),
                "level obstacles inside the spawn zone ignored"
            );
        }

        self.level = Some(kept);
        let state = self.session.state.clone();
        self.session = self.build_session(state);
        self
    }

    /// Begin moving. Has no effect on a session that already started.
    pub fn start(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;
        self.session.last_move_at = now;
        info!(
            length = self.session.snake.len(),
            obstacles = self.session.obstacles.len(),
            "session started"
        );
    }

    /// Throw the session away and start a fresh one. Only the high score
    /// survives.
    pub fn restart(&mut self, now: Duration) {
        let mut state = self.session.state.clone();
        state.reset();
        self.session = self.build_session(state);
        self.intents.clear();
        self.cause = None;
        self.started = false;
        self.start(now);
    }

    /// Continue a finished game at its score, with the same obstacle cells.
    ///
    /// Returns false when the game is not over.
    pub fn revive(&mut self, now: Duration) -> bool {
        if !self.session.state.game_over {
            return false;
        }

        let mut state = self.session.state.clone();
        state.game_over = false;
        state.paused = false;
        state.teleporting = false;
        state.reviving = true;

        self.session = self.build_session(state);
        self.session.state.reviving = false;
        self.session.last_move_at = now;
        self.intents.clear();
        self.cause = None;
        self.started = true;
        info!(score = self.session.state.score, "session revived");
        true
    }

    pub fn pause(&mut self) {
        if self.started && !self.session.state.game_over {
            self.session.state.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.session.state.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.session.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Queue a directional intent. It is applied on the next move; a request
    /// opposite the current direction is dropped then.
    pub fn set_direction(&mut self, dx: i32, dy: i32) -> GameResult<()> {
        let direction = Direction::from_delta(dx, dy).ok_or(GameError::InvalidDirection { dx, dy })?;
        if self.intents.len() == MAX_QUEUED_INTENTS {
            self.intents.pop_front();
        }
        self.intents.push_back(direction);
        Ok(())
    }

    /// Advance the session clock to `now`.
    ///
    /// Runs portal timers every call and at most one move once the move
    /// interval has elapsed since the previous one.
    pub fn tick(&mut self, now: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if !self.started || !self.session.state.is_running() {
            return events;
        }

        if self.session.portals.update(now) {
            events.push(GameEvent::PortalsReactivated);
        }
        self.session.state.teleporting = self.session.portals.is_teleporting();

        self.spawn_portals_if_due(now, &mut events);

        let elapsed = now.saturating_sub(self.session.last_move_at);
        if elapsed < self.session.snake.move_interval {
            return events;
        }
        self.session.last_move_at = now;

        self.step(now, &mut events);
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        Snapshot {
            score: session.state.score,
            high_score: session.state.high_score,
            length: session.snake.len(),
            moves: session.state.moves,
            game_over: session.state.game_over,
            paused: session.state.paused,
            teleporting: session.state.teleporting,
            grid: session.grid,
            positions: session.snake.segments.clone(),
            foods: session.foods.clone(),
            obstacles: session.obstacles.cells.clone(),
            portals: session
                .portals
                .pair()
                .map(|p| p.portals().to_vec())
                .unwrap_or_default(),
            move_interval: session.snake.move_interval,
            cause: self.cause,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for hosts that script positions, e.g. tutorials
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn high_score(&self) -> u32 {
        self.session.state.high_score
    }

    /// Seed the high score from the persistence layer
    pub fn set_high_score(&mut self, high_score: u32) {
        self.session.state.high_score = high_score;
    }

    fn step(&mut self, now: Duration, events: &mut Vec<GameEvent>) {
        while let Some(direction) = self.intents.pop_front() {
            if !self.session.snake.set_direction(direction) {
                trace!(?direction, "reverse turn dropped");
            }
        }

        let cell_size = self.session.grid.cell_size;
        let session = &mut self.session;
        session.snake.commit_direction();
        let planned = session.snake.next_head(cell_size);

        let teleport = self
            .resolver
            .teleport_entry(session, planned)
            .and_then(|entry| session.portals.begin_teleport(entry, now, session.snake.len()));

        let destination = teleport.map_or(planned, |t| t.to);
        session.snake.advance(destination);
        session.state.moves += 1;

        if let Some(teleport) = teleport {
            session.state.teleporting = true;
            events.push(GameEvent::Teleported {
                from: teleport.from,
                to: teleport.to,
                cooldown: teleport.cooldown,
            });
        }

        match self.resolver.after_move(&self.session, teleport.is_some()) {
            Resolution::Clear => {}
            Resolution::Fatal(cause) => self.end_game(cause, events),
            Resolution::Food(index) => self.eat(index, events),
        }
    }

    fn end_game(&mut self, cause: CollisionType, events: &mut Vec<GameEvent>) {
        let state = &mut self.session.state;
        state.game_over = true;
        self.cause = Some(cause);

        if state.score > state.high_score {
            state.high_score = state.score;
            events.push(GameEvent::NewHighScore(state.score));
        }

        info!(?cause, score = state.score, moves = state.moves, "game over");
        events.push(GameEvent::GameOver {
            cause,
            score: state.score,
        });
    }

    fn eat(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        let food = self.session.foods[index];
        let effect = food.effect();

        let snake = &mut self.session.snake;
        if effect.segments >= 0 {
            snake.grow(effect.segments as usize);
        } else {
            snake.shrink(effect.segments.unsigned_abs() as usize);
        }

        let points = effect.scaled_score(self.settings.score_multiplier);
        let before = self.session.state.score;
        self.session.state.score = before.saturating_add(points);
        events.push(GameEvent::FoodEaten {
            kind: food.kind,
            position: food.position,
            points,
        });

        let mut interval_ms = self.session.snake.move_interval.as_millis() as i64 + effect.interval_ms;

        let step = self.config.speedup_score_step;
        let crossed = self.session.state.score / step - before / step;
        interval_ms -= (crossed as i64) * self.config.speedup_interval_step_ms as i64;

        let interval = self.clamp_interval(interval_ms);
        if interval != self.session.snake.move_interval {
            self.session.snake.move_interval = interval;
            debug!(interval_ms = interval.as_millis() as u64, "move interval changed");
            events.push(GameEvent::SpeedChanged { interval });
        }

        let position = self.finder.find_free_cell(&mut self.rng, &self.session);
        self.session.foods[index].position = position;
    }

    fn spawn_portals_if_due(&mut self, now: Duration, events: &mut Vec<GameEvent>) {
        if !self.session.portals.is_spawn_due(now, &self.session.state) {
            return;
        }

        let session = &mut self.session;
        let (snake, foods, obstacles) = (&session.snake, &session.foods, &session.obstacles);
        let taken = |pos: Position| is_taken(snake, foods, obstacles, pos);
        let pair = session
            .portals
            .regenerate(now, &mut self.rng, &self.finder, &taken);

        events.push(GameEvent::PortalsSpawned {
            a: pair.portals()[0].position,
            b: pair.portals()[1].position,
        });
    }

    fn clamp_interval(&self, interval_ms: i64) -> Duration {
        let clamped = interval_ms.clamp(
            self.config.min_move_interval_ms as i64,
            self.config.max_move_interval_ms as i64,
        );
        Duration::from_millis(clamped as u64)
    }

    /// Interval a snake starts with at `score`, counting the speed-ups
    /// already earned
    fn interval_for(&self, score: u32) -> Duration {
        let steps = (score / self.config.speedup_score_step) as i64;
        self.clamp_interval(
            self.config.initial_move_interval_ms as i64
                - steps * self.config.speedup_interval_step_ms as i64,
        )
    }

    fn empty_session(config: &GameConfig) -> Session {
        let grid = config.grid();
        Session {
            grid,
            snake: Snake::new(
                grid.to_position(grid.center_cell()),
                Direction::Right,
                config.initial_snake_length,
                config.cell_size,
                Duration::from_millis(config.initial_move_interval_ms),
            ),
            foods: Vec::new(),
            obstacles: ObstacleLayout::empty(),
            portals: PortalCoordinator::new(config),
            state: GameState::default(),
            last_move_at: Duration::ZERO,
        }
    }

    /// Lay out snake, obstacles and food for a new or revived session
    fn build_session(&mut self, mut state: GameState) -> Session {
        let grid = self.config.grid();
        let snake = Snake::new(
            grid.to_position(grid.center_cell()),
            Direction::Right,
            self.config.initial_snake_length,
            self.config.cell_size,
            self.interval_for(state.score),
        );

        let obstacles = if !self.settings.obstacles_enabled {
            ObstacleLayout::empty()
        } else if let Some(cells) = &self.level {
            ObstacleLayout::from_cells(cells.clone())
        } else {
            let saved = if state.reviving {
                state.saved_obstacles.as_ref()
            } else {
                None
            };
            let on_snake = |pos: Position| snake.contains(pos);
            self.obstacle_manager
                .choose_layout(&mut self.rng, &on_snake, saved)
        };
        state.saved_obstacles = Some(obstacles.clone());

        let mut foods: Vec<Food> = Vec::new();
        for kind in Food::session_kinds(self.config.special_food) {
            let taken = |pos: Position| is_taken(&snake, &foods, &obstacles, pos);
            let position = self.finder.find_free_cell(&mut self.rng, &taken);
            foods.push(Food::new(position, *kind));
        }

        Session {
            grid,
            snake,
            foods,
            obstacles,
            portals: PortalCoordinator::new(&self.config),
            state,
            last_move_at: Duration::ZERO,
        }
    }
}
