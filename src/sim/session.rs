//! Session-wide combo and feedback state
//!
//! Owned by the game state and lent to components during a tick. Holds the
//! camera progress that drives the score, the multiplier, and the decaying
//! slowdown and shake effects that feed back into the next step's time scale.

use glam::Vec2;

use super::slice::launch_bonus;
use crate::consts::{CAMERA_LEAD, DEATH_MARGIN, PROGRESS_PER_POINT, SCREEN_HEIGHT};
use crate::settings::{AimTuning, EffectsTuning, Tuning};

#[derive(Debug, Clone)]
pub struct Session {
    /// Incremented by perfect slices, reset only with the session
    pub multiplier: u32,
    /// Highest camera position reached; only ever rises
    camera_y: f32,
    /// Seconds left in the current slowdown window
    slowdown_left: f32,
    aiming: bool,
    /// 0..1, eases toward `aiming`
    aim_ramp: f32,
    shake_amp: f32,
    /// Seconds since the last accepted shake
    shake_phase: f32,
    effects: EffectsTuning,
    aim: AimTuning,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            multiplier: 1,
            camera_y: 0.0,
            slowdown_left: 0.0,
            aiming: false,
            aim_ramp: 0.0,
            shake_amp: 0.0,
            shake_phase: 0.0,
            effects: tuning.effects.clone(),
            aim: tuning.aim.clone(),
        }
    }

    pub fn effects(&self) -> &EffectsTuning {
        &self.effects
    }

    /// Score from the furthest progress reached
    pub fn score(&self) -> u64 {
        (self.camera_y / PROGRESS_PER_POINT).floor().max(0.0) as u64
    }

    pub fn launch_bonus(&self) -> f32 {
        launch_bonus(self.score())
    }

    /// Vertical progress of the camera
    pub fn progress(&self) -> f32 {
        self.camera_y
    }

    /// Scroll the camera up to keep the player in view
    pub fn follow(&mut self, player_y: f32) {
        if player_y > self.camera_y + CAMERA_LEAD {
            self.camera_y = player_y - CAMERA_LEAD;
        }
    }

    /// Player fell out of view
    pub fn is_lost(&self, player_y: f32) -> bool {
        player_y < self.camera_y - DEATH_MARGIN
    }

    /// Open a slow-motion window, replacing whatever is left of the current one
    pub fn slowdown(&mut self, duration: f32) {
        self.slowdown_left = duration.max(0.0);
    }

    pub fn is_slowed(&self) -> bool {
        self.slowdown_left > 0.0
    }

    /// Request camera shake. Weaker requests than the current amplitude are ignored.
    pub fn shake(&mut self, amplitude: f32) {
        if amplitude < self.shake_amp {
            return;
        }
        self.shake_phase = 0.0;
        self.shake_amp = amplitude;
    }

    pub fn shake_amplitude(&self) -> f32 {
        self.shake_amp
    }

    /// Current shake displacement for drawing
    pub fn shake_offset(&self) -> f32 {
        let cycle = self.shake_phase * self.effects.shake_frequency * std::f32::consts::TAU;
        self.shake_amp * cycle.cos()
    }

    pub fn begin_aim(&mut self) {
        self.aiming = true;
    }

    pub fn end_aim(&mut self) {
        self.aiming = false;
        self.aim_ramp = 0.0;
    }

    pub fn aiming(&self) -> bool {
        self.aiming
    }

    pub fn aim_ramp(&self) -> f32 {
        self.aim_ramp
    }

    /// Advance effect timers by unscaled frame time
    pub fn advance(&mut self, real_dt: f32) {
        self.slowdown_left = (self.slowdown_left - real_dt).max(0.0);

        self.shake_phase += real_dt;
        self.shake_amp *= self.effects.shake_retention.powf(real_dt);
        self.shake_amp = (self.shake_amp - self.effects.shake_linear_decay * real_dt).max(0.0);
    }

    /// Ease the aim ramp toward the aiming state
    ///
    /// Runs on the dilated physics step, so the ramp itself slows down as the
    /// aim slowdown deepens.
    pub fn ramp_aim(&mut self, dt: f32) {
        let goal = if self.aiming { 1.0 } else { 0.0 };
        let step = self.aim.ramp_speed * dt;
        self.aim_ramp = if self.aim_ramp < goal {
            (self.aim_ramp + step).min(goal)
        } else {
            (self.aim_ramp - step).max(goal)
        };
    }

    /// Time scale applied to the physics step
    pub fn dilation(&self) -> f32 {
        let aim_scale = 1.0 - self.aim.ramp_slowdown * self.aim_ramp;
        let effect_scale = if self.is_slowed() {
            self.effects.slowdown_scale
        } else {
            1.0
        };
        aim_scale.min(effect_scale)
    }

    /// Game space to screen pixels (y down), shake included
    pub fn game_to_screen(&self, pos: Vec2) -> Vec2 {
        let shake = self.shake_offset();
        Vec2::new(pos.x + shake, SCREEN_HEIGHT - pos.y + self.camera_y + shake)
    }

    /// Screen pixels (y down) to game space
    pub fn screen_to_game(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x, SCREEN_HEIGHT - pos.y + self.camera_y)
    }
}
