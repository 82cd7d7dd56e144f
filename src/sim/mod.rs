//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - One `tick` per frame, driven by the caller's clock
//! - Seeded RNG only
//! - Lanterns kept in height order

pub mod aim;
pub mod bounds;
pub mod player;
pub mod session;
pub mod slice;
pub mod spawner;
pub mod state;
pub mod target;
pub mod tick;

pub use aim::AimLine;
pub use bounds::{Body, Bounds};
pub use player::{Flight, Motion, Player, SliceOutcome};
pub use session::Session;
pub use slice::{CutReading, SliceQuality, classify, launch_bonus, read_cut};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState};
pub use target::{Debris, DebrisPiece, Target, TargetKind, TargetState};
pub use tick::{InputEvent, TickInput, physics_dt, tick};
