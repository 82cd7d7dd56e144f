//! Per-frame simulation step
//!
//! One call advances the whole game by one rendered frame. Order matters:
//! the aim line is recomputed before any slicing so a dash sees this frame's
//! touched set, and every slice removal is applied before `tick` returns.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_STEP_DT;

/// Discrete input, already translated from raw device events by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer pressed: start aiming
    AimBegin,
    /// Pointer released: dash toward the cursor if the aim line touches something
    AimEnd,
    /// Start a fresh run
    Reset,
    /// Collect the flight power-up
    GrantFlight,
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in screen pixels (y down), if it moved
    pub cursor: Option<Vec2>,
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn with_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            cursor: None,
            events: events.into_iter().collect(),
        }
    }
}

/// Physics step for a frame: dilated, then capped to avoid blow-ups on hitches
pub fn physics_dt(real_dt: f32, dilation: f32) -> f32 {
    let real_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
    real_dt.min(MAX_STEP_DT) * dilation
}

/// Advance the game by one frame of `real_dt` wall-clock seconds
pub fn tick(state: &mut GameState, input: &TickInput, real_dt: f32) {
    state.events.clear();
    state.debris.clear();

    if let Some(cursor) = input.cursor {
        state.cursor = cursor;
    }

    if input.events.contains(&InputEvent::Reset) {
        state.reset();
        return;
    }

    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    // Effect timers run on undilated time so a slowdown cannot stretch itself
    let frame_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
    state.session.advance(frame_dt);
    let dt = physics_dt(frame_dt, state.session.dilation());
    state.session.ramp_aim(dt);

    recompute_aim(state);

    for event in &input.events {
        match event {
            InputEvent::AimBegin => {
                if !state.player.cutting && state.player.flight.is_none() {
                    state.session.begin_aim();
                    recompute_aim(state);
                }
            }
            InputEvent::AimEnd => {
                let toward = state.cursor_in_game();
                if state.player.dash_toward(toward, !state.aim.is_empty()) {
                    log::debug!(
                        "Dash toward ({:.0}, {:.0}) through {:?}",
                        toward.x,
                        toward.y,
                        state.aim.touched()
                    );
                    state.events.push(GameEvent::DashStart { toward });
                }
                state.session.end_aim();
                recompute_aim(state);
            }
            InputEvent::GrantFlight => {
                state.grant_flight();
                recompute_aim(state);
            }
            InputEvent::Reset => {}
        }
    }

    let progress = state.session.progress();
    state.bounds.update(dt, progress);

    state.player.update(
        dt,
        &state.bounds,
        &mut state.targets,
        &mut state.session,
        &mut state.events,
        &mut state.debris,
    );

    state.session.follow(state.player.pos.y);
    state.refresh_targets();

    if state.session.is_lost(state.player.pos.y) {
        let score = state.session.score();
        let multiplier = state.session.multiplier;
        log::info!("Session over: score {score}, multiplier x{multiplier}");
        state.phase = GamePhase::GameOver;
        state.session.end_aim();
        state.events.push(GameEvent::SessionOver { score, multiplier });
    }
}

fn recompute_aim(state: &mut GameState) {
    let cursor = state.cursor_in_game();
    let tuning = state.player.tuning();
    let (reach, samples) = (tuning.cut_distance, state.tuning.aim.samples);
    state.aim.recompute(
        state.player.pos,
        cursor,
        state.session.aiming(),
        reach,
        samples,
        &mut state.targets,
        state.session.progress(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::player::Motion;

    /// Screen position of a game-space point for the current camera, no shake
    fn screen_of(state: &GameState, game: Vec2) -> Vec2 {
        Vec2::new(game.x, crate::consts::SCREEN_HEIGHT - game.y + state.session.progress())
    }

    #[test]
    fn test_player_launches_and_camera_follows() {
        let mut state = GameState::new(12345);
        let input = TickInput::default();
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.player.pos.y > 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_dash_without_touch_is_noop() {
        let mut state = GameState::new(12345);
        // Aim sideways into empty space
        let cursor = screen_of(&state, state.player.pos + Vec2::new(150.0, 0.0));
        tick(
            &mut state,
            &TickInput {
                cursor: Some(cursor),
                events: vec![InputEvent::AimBegin],
            },
            SIM_DT,
        );
        assert!(state.session.aiming());
        let vel_before = state.player.vel;

        tick(&mut state, &TickInput::with_events([InputEvent::AimEnd]), 0.0);
        assert!(!state.player.cutting);
        assert_eq!(state.player.vel, vel_before);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::DashStart { .. })));
    }

    #[test]
    fn test_dash_toward_touched_lantern() {
        let mut state = GameState::new(12345);
        let lantern = state.targets[0].pos;
        // Put the lantern within dash reach
        state.player.pos = lantern - Vec2::new(0.0, 150.0);
        let cursor = screen_of(&state, lantern);

        tick(
            &mut state,
            &TickInput {
                cursor: Some(cursor),
                events: vec![InputEvent::AimBegin],
            },
            0.0,
        );
        assert!(state.targets[0].touched);

        tick(&mut state, &TickInput::with_events([InputEvent::AimEnd]), 0.0);
        assert_eq!(state.player.motion(), Motion::Dashing);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::DashStart { .. })));
        // Touch flags are cleared once aiming ends
        assert!(state.targets.iter().all(|t| !t.touched));
    }

    #[test]
    fn test_aim_slows_time() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::with_events([InputEvent::AimBegin]), SIM_DT);
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.session.dilation() < 0.1);
    }

    #[test]
    fn test_game_over_and_reset() {
        let mut state = GameState::new(12345);
        state.session.follow(5000.0);
        state.player.pos.y = 100.0;
        state.player.vel = Vec2::ZERO;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::SessionOver { .. })));

        // Frozen until reset
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &TickInput::with_events([InputEvent::Reset]), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_physics_dt_clamped() {
        assert_eq!(physics_dt(1.0, 1.0), MAX_STEP_DT);
        assert_eq!(physics_dt(f32::NAN, 1.0), 0.0);
        assert_eq!(physics_dt(-1.0, 1.0), 0.0);
        assert!((physics_dt(0.01, 0.01) - 0.0001).abs() < 1e-9);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let inputs = [
            TickInput::default(),
            TickInput::with_events([InputEvent::AimBegin]),
            TickInput {
                cursor: Some(Vec2::new(320.0, 200.0)),
                events: vec![],
            },
            TickInput::with_events([InputEvent::AimEnd]),
            TickInput::default(),
        ];
        for input in &inputs {
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.targets.len(), b.targets.len());
    }
}
