//! Game state and core simulation types
//!
//! Everything a renderer or sound layer reads lives here; the only writer is
//! [`super::tick::tick`].

use glam::Vec2;

use super::aim::AimLine;
use super::bounds::Bounds;
use super::player::Player;
use super::session::Session;
use super::slice::SliceQuality;
use super::spawner::Spawner;
use super::target::{Debris, Target, TargetKind};
use crate::consts::SHAFT_CENTER_X;
use crate::settings::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Player fell out of view; waiting for a reset
    GameOver,
}

/// Discrete things that happened during a tick, for sound and effects
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sliced {
        target_id: u32,
        kind: TargetKind,
        quality: SliceQuality,
        amt: f32,
        pos: Vec2,
    },
    /// A tutorial lantern refused an imperfect cut
    TutorialMiss { target_id: u32, pos: Vec2 },
    WallBounce { pos: Vec2 },
    DashStart { toward: Vec2 },
    FlightStarted,
    FlightEnded,
    SessionOver { score: u64, multiplier: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub bounds: Bounds,
    pub aim: AimLine,
    /// Live lanterns, ordered by increasing height
    pub targets: Vec<Target>,
    pub session: Session,
    /// Last known pointer position in screen pixels
    pub cursor: Vec2,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
    /// Lanterns destroyed by the last tick
    pub debris: Vec<Debris>,
    spawner: Spawner,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(Vec2::new(SHAFT_CENTER_X, 0.0), &tuning.player),
            bounds: Bounds::new(&tuning.bounds),
            aim: AimLine::new(),
            targets: Vec::new(),
            session: Session::new(&tuning),
            cursor: Vec2::ZERO,
            events: Vec::new(),
            debris: Vec::new(),
            spawner: Spawner::new(seed, &tuning.spawn),
            next_id: 1,
            tuning,
        };
        state.populate();
        state
    }

    /// Start a fresh run with the same seed and tuning
    pub fn reset(&mut self) {
        log::info!("Session reset (seed {})", self.seed);
        *self = Self::with_tuning(self.seed, self.tuning.clone());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn score(&self) -> u64 {
        self.session.score()
    }

    /// Pointer position in game space
    pub fn cursor_in_game(&self) -> Vec2 {
        self.session.screen_to_game(self.cursor)
    }

    /// Start the flight power-up
    pub(crate) fn grant_flight(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.session.end_aim();
        self.player.grant_flight();
        self.events.push(GameEvent::FlightStarted);
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Drop lanterns left far below the camera and stream in new ones above
    pub(crate) fn refresh_targets(&mut self) {
        let camera_y = self.session.progress();
        self.targets.retain(|t| t.pos.y >= camera_y - t.radius * 3.0);

        let next_id = &mut self.next_id;
        self.spawner.fill(&mut self.targets, camera_y, || {
            let id = *next_id;
            *next_id += 1;
            id
        });
    }

    fn populate(&mut self) {
        let id = self.next_entity_id();
        let opening = self.spawner.opening(id);
        self.targets.push(opening);
        self.refresh_targets();
        log::info!(
            "Session started (seed {}, {} lanterns queued)",
            self.seed,
            self.targets.len()
        );
    }
}
