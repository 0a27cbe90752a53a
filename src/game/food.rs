use serde::{Deserialize, Serialize};

use super::grid::Position;

/// Food variants on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Regular,
    GrowthBoost,
    Shrink,
    SpeedBoost,
    Slow,
}

/// What eating one item does, before the settings score multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodEffect {
    /// Positive grows the snake, negative shrinks it
    pub segments: i32,
    pub score: u32,
    /// Added to the move interval; negative is faster
    pub interval_ms: i64,
}

const EFFECTS: [FoodEffect; 5] = [
    // Regular
    FoodEffect { segments: 1, score: 10, interval_ms: 0 },
    // GrowthBoost
    FoodEffect { segments: 3, score: 30, interval_ms: 0 },
    // Shrink
    FoodEffect { segments: -2, score: 5, interval_ms: 0 },
    // SpeedBoost
    FoodEffect { segments: 1, score: 15, interval_ms: -15 },
    // Slow
    FoodEffect { segments: 1, score: 5, interval_ms: 20 },
];

impl FoodKind {
    pub const ALL: [FoodKind; 5] = [
        FoodKind::Regular,
        FoodKind::GrowthBoost,
        FoodKind::Shrink,
        FoodKind::SpeedBoost,
        FoodKind::Slow,
    ];

    pub fn effect(self) -> FoodEffect {
        EFFECTS[self as usize]
    }
}

impl FoodEffect {
    /// Score after applying the settings multiplier, rounded to the nearest point
    pub fn scaled_score(&self, multiplier: f32) -> u32 {
        (self.score as f32 * multiplier.max(0.0)).round() as u32
    }
}

/// One food item. Items are repositioned after being eaten, never recreated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
}

impl Food {
    pub fn new(position: Position, kind: FoodKind) -> Self {
        Self { position, kind }
    }

    pub fn effect(&self) -> FoodEffect {
        self.kind.effect()
    }

    /// Kinds a session keeps on the board
    pub fn session_kinds(special_food: bool) -> &'static [FoodKind] {
        if special_food {
            &FoodKind::ALL
        } else {
            &FoodKind::ALL[..1]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_table() {
        assert_eq!(FoodKind::Regular.effect().segments, 1);
        assert_eq!(FoodKind::GrowthBoost.effect().segments, 3);
        assert_eq!(FoodKind::Shrink.effect().segments, -2);
        assert!(FoodKind::SpeedBoost.effect().interval_ms < 0);
        assert!(FoodKind::Slow.effect().interval_ms > 0);
        assert_eq!(FoodKind::Regular.effect().interval_ms, 0);
    }

    #[test]
    fn test_scaled_score() {
        let effect = FoodKind::Regular.effect();
        assert_eq!(effect.scaled_score(1.0), 10);
        assert_eq!(effect.scaled_score(1.5), 15);
        assert_eq!(effect.scaled_score(0.25), 3);
        assert_eq!(effect.scaled_score(-2.0), 0);
    }

    #[test]
    fn test_session_kinds() {
        assert_eq!(Food::session_kinds(false), &[FoodKind::Regular]);
        assert_eq!(Food::session_kinds(true).len(), 5);
        assert_eq!(Food::session_kinds(true)[0], FoodKind::Regular);
    }
}
