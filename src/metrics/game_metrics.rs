use std::time::{Duration, Instant};

use crate::game::GameEvent;

/// Per-run counters shown in the header bar
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub foods_eaten: u32,
    pub teleports: u32,
    /// Set between a game over and the next start or revive
    stopped: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            foods_eaten: 0,
            teleports: 0,
            stopped: false,
        }
    }

    /// Refresh the game clock; it stands still after a game over
    pub fn update(&mut self) {
        if !self.stopped {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.foods_eaten = 0;
        self.teleports = 0;
        self.stopped = false;
    }

    /// A revived game keeps its clock and counters
    pub fn on_revive(&mut self) {
        let now = Instant::now();
        self.start_time = now.checked_sub(self.elapsed_time).unwrap_or(now);
        self.stopped = false;
    }

    pub fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::FoodEaten { .. } => self.foods_eaten += 1,
                GameEvent::Teleported { .. } => self.teleports += 1,
                GameEvent::GameOver { .. } => {
                    self.games_played += 1;
                    self.stopped = true;
                }
                _ => {}
            }
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, FoodKind, Position};

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_event_counters() {
        let mut metrics = GameMetrics::new();
        metrics.record(&[
            GameEvent::FoodEaten {
                kind: FoodKind::Regular,
                position: Position::new(0, 0),
                points: 10,
            },
            GameEvent::Teleported {
                from: Position::new(0, 0),
                to: Position::new(40, 40),
                cooldown: Duration::from_secs(1),
            },
            GameEvent::PortalsReactivated,
        ]);
        assert_eq!(metrics.foods_eaten, 1);
        assert_eq!(metrics.teleports, 1);
        assert_eq!(metrics.games_played, 0);

        metrics.record(&[GameEvent::GameOver {
            cause: CollisionType::Wall,
            score: 10,
        }]);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_start();
        assert_eq!(metrics.foods_eaten, 0);
        assert_eq!(metrics.games_played, 1);
    }

    #[test]
    fn test_clock_stops_on_game_over() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(30);
        metrics.record(&[GameEvent::GameOver {
            cause: CollisionType::Obstacle,
            score: 0,
        }]);
        metrics.update();
        assert_eq!(metrics.elapsed_time, Duration::from_secs(30));
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
