use std::time::Duration;

use portal_snake::game::{
    CollisionType, Direction, GameConfig, GameEngine, GameEvent, PortalPair, Position, Settings,
};
use portal_snake::level::TileLayer;
use portal_snake::persistence::{HighScoreStore, JsonFileHighScoreStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Drive a seeded session with random turns until it ends or `max_ticks` pass
fn play(seed: u64, max_ticks: u32) -> (GameEngine, Vec<GameEvent>) {
    let mut engine = GameEngine::with_seed(GameConfig::default(), Settings::default(), seed);
    let mut turns = StdRng::seed_from_u64(seed ^ 0xdead_beef);
    let mut events = Vec::new();
    let mut now = Duration::ZERO;
    engine.start(now);

    for _ in 0..max_ticks {
        if turns.gen_bool(0.2) {
            let (dx, dy) = match turns.gen_range(0..4) {
                0 => (0, -1),
                1 => (0, 1),
                2 => (-1, 0),
                _ => (1, 0),
            };
            engine.set_direction(dx, dy).unwrap();
        }
        now += ms(50);
        events.extend(engine.tick(now));

        let snapshot = engine.snapshot();
        assert!(snapshot.length >= 1);
        assert!(snapshot.move_interval >= ms(50) && snapshot.move_interval <= ms(300));
        if snapshot.game_over {
            // Further ticks change nothing
            assert!(engine.tick(now + Duration::from_secs(1)).is_empty());
            break;
        }
    }

    (engine, events)
}

#[test]
fn test_random_sessions_end_once() {
    for seed in 0..20 {
        let (engine, events) = play(seed, 5_000);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();

        if engine.state().game_over {
            assert_eq!(game_overs, 1, "seed {seed}");
            assert!(engine.snapshot().cause.is_some());
        } else {
            assert_eq!(game_overs, 0, "seed {seed}");
        }
    }
}

#[test]
fn test_score_matches_food_events() {
    for seed in 0..10 {
        let (engine, events) = play(seed, 3_000);
        let eaten: u32 = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::FoodEaten { points, .. } => Some(*points),
                _ => None,
            })
            .sum();
        assert_eq!(engine.state().score, eaten, "seed {seed}");
    }
}

#[test]
fn test_snake_turns_around_through_two_moves() {
    let settings = Settings {
        obstacles_enabled: false,
        ..Settings::default()
    };
    let mut engine = GameEngine::with_seed(GameConfig::default(), settings, 8);
    for food in &mut engine.session_mut().foods {
        food.position = Position::new(0, 0);
    }
    engine.start(Duration::ZERO);
    let start = engine.snapshot().head().unwrap();

    engine.set_direction(0, 1).unwrap();
    engine.tick(ms(150));
    engine.set_direction(-1, 0).unwrap();
    engine.tick(ms(300));

    let head = engine.snapshot().head().unwrap();
    assert_eq!(head, Position::new(start.x - 20, start.y + 20));
    assert_eq!(engine.session().snake.direction, Direction::Left);
}

#[test]
fn test_teleport_then_cooldown_then_reactivate() {
    let settings = Settings {
        obstacles_enabled: false,
        ..Settings::default()
    };
    let mut engine = GameEngine::with_seed(GameConfig::default(), settings, 11);
    engine.start(Duration::ZERO);

    let head = engine.snapshot().head().unwrap();
    let entry = Position::new(head.x + 20, head.y);
    let exit = Position::new(40, 40);
    for food in &mut engine.session_mut().foods {
        food.position = Position::new(560, 360);
    }
    engine
        .session_mut()
        .portals
        .set_pair(PortalPair::new(entry, exit), Duration::ZERO);

    let events = engine.tick(ms(150));
    assert!(events.iter().any(|e| matches!(e, GameEvent::Teleported { .. })));
    assert_eq!(engine.snapshot().head(), Some(exit));
    assert!(engine.snapshot().teleporting);

    // Length 3 means the cooldown sits at its 1s floor
    let events = engine.tick(ms(1_100));
    assert!(!events.contains(&GameEvent::PortalsReactivated));
    let events = engine.tick(ms(1_150));
    assert!(events.contains(&GameEvent::PortalsReactivated));
    assert!(!engine.snapshot().teleporting);
}

#[test]
fn test_level_obstacles_survive_revive() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("level.json");
    let layer = TileLayer {
        width: 4,
        height: 2,
        tile_size: 20,
        data: vec![1, 1, 0, 0, 0, 0, 0, 1],
    };
    std::fs::write(&path, serde_json::to_string(&layer).unwrap()).unwrap();

    // Portals off, so the straight run can only end at the wall
    let config = GameConfig {
        portal_score_threshold: u32::MAX,
        ..GameConfig::default()
    };
    let cells = TileLayer::load(&path)
        .unwrap()
        .obstacle_cells(&config.grid())
        .unwrap();
    let mut engine = GameEngine::with_seed(config, Settings::default(), 3).with_level(cells.clone());
    engine.start(Duration::ZERO);
    assert_eq!(engine.snapshot().obstacles, cells);

    // Drive into the right wall
    let mut now = Duration::ZERO;
    while !engine.state().game_over {
        now += ms(150);
        engine.tick(now);
    }
    assert_eq!(engine.snapshot().cause, Some(CollisionType::Wall));

    assert!(engine.revive(now));
    assert_eq!(engine.snapshot().obstacles, cells);
    assert!(!engine.state().game_over);
}

#[test]
fn test_high_score_round_trip_through_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = JsonFileHighScoreStore::new(dir.path().join("scores.json"));

    let config = GameConfig {
        portal_score_threshold: u32::MAX,
        ..GameConfig::default()
    };
    let mut engine = GameEngine::with_seed(config, Settings::default(), 6);
    engine.set_high_score(store.load().unwrap());
    engine.session_mut().state.score = 90;
    engine.start(Duration::ZERO);

    let mut now = Duration::ZERO;
    let mut saved = None;
    while !engine.state().game_over {
        now += ms(150);
        for event in engine.tick(now) {
            if let GameEvent::NewHighScore(score) = event {
                store.save(score).unwrap();
                saved = Some(score);
            }
        }
    }

    assert!(saved.unwrap() >= 90);
    assert_eq!(store.load().unwrap(), engine.high_score());
}
