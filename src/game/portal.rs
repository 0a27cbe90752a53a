//! Paired portals.
//!
//! Both portals of a pair share one state value. While the pair is
//! `Teleporting` neither portal catches the head, which keeps the snake from
//! bouncing between two adjacent portals. The cooldown grows with the snake
//! so a long body has time to finish passing through before the pair
//! reopens.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::GameConfig;
use super::grid::Position;
use super::spawner::{FreeCellFinder, Occupancy};
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalId {
    A,
    B,
}

impl PortalId {
    pub fn partner(self) -> PortalId {
        match self {
            PortalId::A => PortalId::B,
            PortalId::B => PortalId::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalState {
    Active,
    /// Collision-inert until `until` (session clock)
    Teleporting { until: Duration },
}

/// One end of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub id: PortalId,
    pub position: Position,
    /// Where entering this portal takes the head
    pub partner: Position,
    pub state: PortalState,
}

impl Portal {
    pub fn is_active(&self) -> bool {
        self.state == PortalState::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalPair {
    a: Position,
    b: Position,
    state: PortalState,
}

impl PortalPair {
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            a,
            b,
            state: PortalState::Active,
        }
    }

    pub fn position(&self, id: PortalId) -> Position {
        match id {
            PortalId::A => self.a,
            PortalId::B => self.b,
        }
    }

    pub fn portal(&self, id: PortalId) -> Portal {
        Portal {
            id,
            position: self.position(id),
            partner: self.position(id.partner()),
            state: self.state,
        }
    }

    /// Both ends, A first
    pub fn portals(&self) -> [Portal; 2] {
        [self.portal(PortalId::A), self.portal(PortalId::B)]
    }

    pub fn state(&self) -> PortalState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PortalState::Active
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.a == pos || self.b == pos
    }

    /// First portal, in A-then-B order, whose catch radius holds `head`.
    /// Always `None` while teleporting.
    pub fn catch(&self, head: Position, radius: f32) -> Option<PortalId> {
        if !self.is_active() {
            return None;
        }
        [PortalId::A, PortalId::B]
            .into_iter()
            .find(|id| head.is_within(self.position(*id), radius))
    }
}

/// Result of entering a portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Teleport {
    pub entry: PortalId,
    pub from: Position,
    pub to: Position,
    pub cooldown: Duration,
}

/// Owns the current pair and its timers
#[derive(Debug, Clone)]
pub struct PortalCoordinator {
    pair: Option<PortalPair>,
    last_spawn: Option<Duration>,
    catch_radius: f32,
    cooldown_floor: Duration,
    cooldown_per_segment: Duration,
    spawn_interval: Duration,
    score_threshold: u32,
}

impl PortalCoordinator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pair: None,
            last_spawn: None,
            catch_radius: config.portal_catch_radius,
            cooldown_floor: Duration::from_millis(config.teleport_cooldown_floor_ms),
            cooldown_per_segment: Duration::from_millis(config.teleport_cooldown_per_segment_ms),
            spawn_interval: Duration::from_millis(config.portal_spawn_interval_ms),
            score_threshold: config.portal_score_threshold,
        }
    }

    pub fn pair(&self) -> Option<&PortalPair> {
        self.pair.as_ref()
    }

    /// Install a pair directly, replacing any existing one
    pub fn set_pair(&mut self, pair: PortalPair, now: Duration) {
        self.pair = Some(pair);
        self.last_spawn = Some(now);
    }

    /// Drop the pair and forget the spawn timer
    pub fn clear(&mut self) {
        self.pair = None;
        self.last_spawn = None;
    }

    pub fn is_teleporting(&self) -> bool {
        matches!(
            self.pair.map(|p| p.state),
            Some(PortalState::Teleporting { .. })
        )
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.pair.is_some_and(|p| p.occupies(pos))
    }

    /// `max(floor, length * per_segment)`
    pub fn cooldown_for(&self, length: usize) -> Duration {
        let scaled = self.cooldown_per_segment.saturating_mul(length as u32);
        scaled.max(self.cooldown_floor)
    }

    /// Portal whose catch radius holds `head`, if any is active
    pub fn catch(&self, head: Position) -> Option<PortalId> {
        self.pair.and_then(|p| p.catch(head, self.catch_radius))
    }

    /// Switch the pair to `Teleporting` and report where the head goes.
    ///
    /// Returns `None` when there is no active pair; entering during a
    /// cooldown is a no-op.
    pub fn begin_teleport(&mut self, entry: PortalId, now: Duration, length: usize) -> Option<Teleport> {
        let cooldown = self.cooldown_for(length);
        let pair = self.pair.as_mut().filter(|p| p.is_active())?;

        pair.state = PortalState::Teleporting {
            until: now + cooldown,
        };

        let teleport = Teleport {
            entry,
            from: pair.position(entry),
            to: pair.position(entry.partner()),
            cooldown,
        };
        debug!(?entry, to = ?teleport.to, cooldown_ms = cooldown.as_millis() as u64, "teleport");
        Some(teleport)
    }

    /// Reopen the pair once its cooldown elapsed. Returns true on the
    /// transition back to `Active`.
    pub fn update(&mut self, now: Duration) -> bool {
        match self.pair.as_mut() {
            Some(pair) => match pair.state {
                PortalState::Teleporting { until } if now >= until => {
                    pair.state = PortalState::Active;
                    debug!("portals reactivated");
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Whether the spawn timer says a new pair is due.
    ///
    /// Reads the game state fresh: nothing spawns below the score threshold,
    /// while paused, after game over or while a teleport cooldown runs.
    pub fn is_spawn_due(&self, now: Duration, state: &GameState) -> bool {
        if state.score < self.score_threshold
            || state.paused
            || state.game_over
            || state.teleporting
            || self.is_teleporting()
        {
            return false;
        }

        match self.last_spawn {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.spawn_interval,
        }
    }

    /// Replace the pair with two fresh, distinct free cells
    pub fn regenerate<R, O>(
        &mut self,
        now: Duration,
        rng: &mut R,
        finder: &FreeCellFinder,
        occupancy: &O,
    ) -> PortalPair
    where
        R: Rng + ?Sized,
        O: Occupancy + ?Sized,
    {
        // The old pair's cells are free again once it is replaced
        let old = self.pair.take();
        let taken = |pos: Position| {
            occupancy.is_occupied(pos) && !old.is_some_and(|p| p.occupies(pos))
        };

        let a = finder.find_free_cell(rng, &taken);
        let taken_or_a = |pos: Position| pos == a || taken(pos);
        let b = finder.find_free_cell(rng, &taken_or_a);

        let pair = PortalPair::new(a, b);
        self.set_pair(pair, now);
        debug!(?a, ?b, "portal pair spawned");
        pair
    }
}
