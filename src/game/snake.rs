//! Grid movement: the snake body and the one-cell-per-move stepping rule.
//!
//! A move never lets a segment pick its own direction. Every pre-move
//! position is captured first, then the head takes its destination and each
//! trailing segment takes the old position of the segment in front of it.

use std::time::Duration;

use super::action::Direction;
use super::grid::Position;

/// What a single move did to the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    /// Where the head ended up
    pub new_head: Position,
    /// Every segment's position before the move, head first
    pub prior_positions: Vec<Position>,
}

impl Movement {
    /// Position the tail left behind
    pub fn vacated(&self) -> Option<Position> {
        self.prior_positions.last().copied()
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub segments: Vec<Position>,
    /// Direction used by the next move
    pub direction: Direction,
    /// Last accepted turn request, committed at the start of the next move
    pub pending_direction: Direction,
    /// Time between two moves
    pub move_interval: Duration,
}

impl Snake {
    /// Create a snake whose body trails straight behind `head`
    pub fn new(
        head: Position,
        direction: Direction,
        length: usize,
        cell_size: i32,
        move_interval: Duration,
    ) -> Self {
        let (dx, dy) = direction.delta();
        let segments = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * cell_size * i, -dy * cell_size * i))
            .collect();

        Self {
            segments,
            direction,
            pending_direction: direction,
            move_interval,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.segments[1..]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed snake; the body never shrinks below one
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Record a turn request for the next move.
    ///
    /// A request exactly opposite the committed direction is dropped and
    /// `false` is returned. Accepted requests overwrite any earlier pending
    /// one.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Make the pending turn the committed direction
    pub fn commit_direction(&mut self) -> Direction {
        self.direction = self.pending_direction;
        self.direction
    }

    /// Where the head would land with a plain one-cell step
    pub fn next_head(&self, cell_size: i32) -> Position {
        self.head().stepped(self.direction, cell_size)
    }

    /// Move the head to `destination` and pull the body along the old path.
    ///
    /// `destination` is normally `next_head`, or a portal exit when the move
    /// is a teleport.
    pub fn advance(&mut self, destination: Position) -> Movement {
        let prior_positions = self.segments.clone();

        self.segments[0] = destination;
        for i in 1..self.segments.len() {
            self.segments[i] = prior_positions[i - 1];
        }

        Movement {
            new_head: destination,
            prior_positions,
        }
    }

    /// Append `n` segments at the tail. They unfold as the snake moves.
    pub fn grow(&mut self, n: usize) -> usize {
        let tail = self.tail();
        self.segments.extend(std::iter::repeat_n(tail, n));
        n
    }

    /// Remove up to `n` tail segments, never going below one segment
    pub fn shrink(&mut self, n: usize) -> usize {
        let removed = n.min(self.segments.len() - 1);
        self.segments.truncate(self.segments.len() - removed);
        removed
    }

    /// Exact coordinate match between the head and any other segment
    pub fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body_segments().iter().any(|s| *s == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: i32 = 20;

    fn snake_at(x: i32, y: i32, direction: Direction, length: usize) -> Snake {
        Snake::new(
            Position::new(x, y),
            direction,
            length,
            CELL,
            Duration::from_millis(150),
        )
    }

    #[test]
    fn test_snake_creation() {
        let snake = snake_at(100, 100, Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(100, 100));
        assert_eq!(snake.segments[1], Position::new(80, 100));
        assert_eq!(snake.segments[2], Position::new(60, 100));
        assert_eq!(snake.pending_direction, Direction::Right);
    }

    #[test]
    fn test_single_move_scenario() {
        let mut snake = snake_at(100, 100, Direction::Right, 3);
        let target = snake.next_head(CELL);
        let movement = snake.advance(target);

        assert_eq!(movement.new_head, Position::new(120, 100));
        assert_eq!(snake.head(), Position::new(120, 100));
        assert_eq!(
            snake.body_segments(),
            &[Position::new(100, 100), Position::new(80, 100)]
        );
        assert_eq!(movement.vacated(), Some(Position::new(60, 100)));
    }

    #[test]
    fn test_segments_follow_prior_path() {
        let mut snake = snake_at(100, 100, Direction::Right, 5);
        let turns = [
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Left,
        ];

        for turn in turns {
            snake.set_direction(turn);
            snake.commit_direction();
            let target = snake.next_head(CELL);
            let movement = snake.advance(target);

            for i in 1..snake.len() {
                assert_eq!(snake.segments[i], movement.prior_positions[i - 1]);
            }
        }
    }

    #[test]
    fn test_reverse_request_rejected() {
        let mut snake = snake_at(100, 100, Direction::Right, 3);
        assert!(!snake.set_direction(Direction::Left));
        assert_eq!(snake.commit_direction(), Direction::Right);
    }

    #[test]
    fn test_last_accepted_request_wins() {
        let mut snake = snake_at(100, 100, Direction::Right, 3);
        assert!(snake.set_direction(Direction::Up));
        // Still compared against the committed Right, so Left stays rejected
        assert!(!snake.set_direction(Direction::Left));
        assert!(snake.set_direction(Direction::Down));
        assert_eq!(snake.commit_direction(), Direction::Down);
    }

    #[test]
    fn test_turn_is_deferred_until_commit() {
        let mut snake = snake_at(100, 100, Direction::Right, 3);
        snake.set_direction(Direction::Up);
        assert_eq!(snake.direction, Direction::Right);
        assert_eq!(snake.next_head(CELL), Position::new(120, 100));
    }

    #[test]
    fn test_grow_appends_at_tail() {
        let mut snake = snake_at(100, 100, Direction::Right, 3);
        let tail = snake.tail();
        assert_eq!(snake.grow(4), 4);
        assert_eq!(snake.len(), 7);
        assert!(snake.segments[3..].iter().all(|s| *s == tail));

        let target = snake.next_head(CELL);
        snake.advance(target);
        assert_eq!(snake.len(), 7);
    }

    #[test]
    fn test_shrink_never_below_one() {
        let mut snake = snake_at(100, 100, Direction::Right, 4);
        assert_eq!(snake.shrink(2), 2);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.shrink(10), 1);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.shrink(1), 0);
        assert_eq!(snake.head(), Position::new(100, 100));
    }

    #[test]
    fn test_head_hits_body() {
        let mut snake = snake_at(100, 100, Direction::Right, 5);
        assert!(!snake.head_hits_body());
        snake.segments[0] = snake.segments[3];
        assert!(snake.head_hits_body());
    }

    #[test]
    fn test_teleport_destination_keeps_chain() {
        let mut snake = snake_at(100, 100, Direction::Right, 4);
        let before = snake.segments.clone();
        let movement = snake.advance(Position::new(300, 20));

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(300, 20));
        assert_eq!(&snake.segments[1..], &before[..3]);
        assert_eq!(movement.prior_positions, before);
    }
}
