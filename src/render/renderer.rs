use std::collections::{HashMap, HashSet};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, CollisionType, FoodKind, Position, PortalId, Snapshot};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.game_over {
            frame.render_widget(self.render_game_over(snapshot), game_area);
        } else {
            frame.render_widget(self.render_grid(snapshot), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let grid = snapshot.grid;
        let head = snapshot.head();
        let body: HashSet<Position> = snapshot.positions.iter().skip(1).copied().collect();
        let obstacles: HashSet<Position> = snapshot.obstacles.iter().copied().collect();
        let foods: HashMap<Position, FoodKind> =
            snapshot.foods.iter().map(|f| (f.position, f.kind)).collect();
        let portals: HashMap<Position, (PortalId, bool)> = snapshot
            .portals
            .iter()
            .map(|p| (p.position, (p.id, p.is_active())))
            .collect();

        let mut lines = Vec::with_capacity(grid.rows as usize);
        for row in 0..grid.rows {
            let mut spans = Vec::with_capacity(grid.columns as usize);

            for col in 0..grid.columns {
                let pos = grid.to_position(Cell::new(col, row));

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if let Some((id, active)) = portals.get(&pos) {
                    Self::portal_span(*id, *active)
                } else if obstacles.contains(&pos) {
                    Span::styled("█ ", Style::default().fg(Color::Gray))
                } else if let Some(kind) = foods.get(&pos) {
                    Self::food_span(*kind)
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if snapshot.paused {
            " Portal Snake (paused) "
        } else {
            " Portal Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn food_span(kind: FoodKind) -> Span<'static> {
        let (symbol, color) = match kind {
            FoodKind::Regular => ("O ", Color::Red),
            FoodKind::GrowthBoost => ("+ ", Color::LightGreen),
            FoodKind::Shrink => ("- ", Color::LightMagenta),
            FoodKind::SpeedBoost => ("> ", Color::Yellow),
            FoodKind::Slow => ("< ", Color::LightBlue),
        };
        Span::styled(symbol, Style::default().fg(color).add_modifier(Modifier::BOLD))
    }

    fn portal_span(id: PortalId, active: bool) -> Span<'static> {
        let symbol = match id {
            PortalId::A => "@ ",
            PortalId::B => "& ",
        };
        let style = if active {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(symbol, style)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(snapshot.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(snapshot.length.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snapshot.move_interval.as_millis()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];

        if snapshot.teleporting {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "TELEPORTING",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let cause = match snapshot.cause {
            Some(CollisionType::Wall) => "Hit the wall",
            Some(CollisionType::Obstacle) => "Hit an obstacle",
            Some(CollisionType::SelfCollision) => "Bit your own tail",
            None => "",
        };
        let key = |k: &'static str, color: Color| {
            Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
        };
        let gray = Style::default().fg(Color::Gray);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, gray)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", gray),
                key("R", Color::Green),
                Span::styled(" to restart, ", gray),
                key("V", Color::Cyan),
                Span::styled(" to revive or ", gray),
                key("Q", Color::Red),
                Span::styled(" to quit", gray),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw(" to pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine, Settings};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(snapshot: &Snapshot) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| Renderer::new().render(frame, snapshot, &metrics))
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_renders_board() {
        let engine = GameEngine::with_seed(GameConfig::small(), Settings::default(), 3);
        let screen = draw(&engine.snapshot());
        assert!(screen.contains("Portal Snake"));
        assert!(screen.contains("Score:"));
        assert!(screen.contains("■"));
    }

    #[test]
    fn test_renders_game_over() {
        let engine = GameEngine::with_seed(GameConfig::small(), Settings::default(), 3);
        let mut snapshot = engine.snapshot();
        snapshot.game_over = true;
        snapshot.cause = Some(CollisionType::Wall);

        let screen = draw(&snapshot);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Hit the wall"));
    }
}
