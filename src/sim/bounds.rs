//! Shaft walls
//!
//! The shaft is centered on `SHAFT_CENTER_X` and widens as the run goes deeper.
//! Width never jumps; it eases toward `target_width` with a single-pole filter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SHAFT_CENTER_X;
use crate::settings::BoundsTuning;

/// Anything round that must stay inside the shaft
pub trait Body {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Horizontal extent of the shaft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bounds {
    pub center_x: f32,
    pub width: f32,
    pub target_width: f32,
    gain: f32,
    widen_steps: Vec<(f32, f32)>,
}

impl Bounds {
    pub fn new(tuning: &BoundsTuning) -> Self {
        Self {
            center_x: SHAFT_CENTER_X,
            width: tuning.initial_width,
            target_width: tuning.initial_width,
            gain: tuning.gain,
            widen_steps: tuning.widen_steps.clone(),
        }
    }

    /// Raise the target width for the current progress and ease toward it
    pub fn update(&mut self, dt: f32, progress: f32) {
        for &(threshold, width) in &self.widen_steps {
            if progress > threshold && width > self.target_width {
                log::debug!("Shaft widening to {width} at progress {progress:.0}");
                self.target_width = width;
            }
        }

        let dw = self.target_width - self.width;
        let step = self.width + dw * dt * self.gain;
        self.width = if dw > 0.0 {
            step.min(self.target_width)
        } else {
            step.max(self.target_width)
        };
    }

    #[inline]
    pub fn left_edge(&self) -> f32 {
        self.center_x - self.width / 2.0
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.center_x + self.width / 2.0
    }

    pub fn is_too_far_left(&self, body: &impl Body) -> bool {
        body.pos().x - body.radius() < self.left_edge()
    }

    pub fn is_too_far_right(&self, body: &impl Body) -> bool {
        body.pos().x + body.radius() > self.right_edge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot(Vec2, f32);

    impl Body for Dot {
        fn pos(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_containment() {
        let bounds = Bounds::new(&BoundsTuning::default());
        let left = bounds.left_edge();
        let right = bounds.right_edge();
        assert_eq!(right - left, 400.0);

        assert!(!bounds.is_too_far_left(&Dot(Vec2::new(left + 10.0, 0.0), 10.0)));
        assert!(bounds.is_too_far_left(&Dot(Vec2::new(left + 9.0, 0.0), 10.0)));
        assert!(!bounds.is_too_far_right(&Dot(Vec2::new(right - 10.0, 0.0), 10.0)));
        assert!(bounds.is_too_far_right(&Dot(Vec2::new(right - 9.0, 0.0), 10.0)));
    }

    #[test]
    fn test_width_eases_without_overshoot() {
        let mut bounds = Bounds::new(&BoundsTuning::default());
        bounds.update(0.016, 20_000.0);
        assert_eq!(bounds.target_width, 500.0);
        assert!(bounds.width > 400.0 && bounds.width < 500.0);

        // A huge step clamps to the target instead of overshooting
        bounds.update(10.0, 20_000.0);
        assert_eq!(bounds.width, 500.0);
    }

    #[test]
    fn test_target_width_never_lowered() {
        let mut bounds = Bounds::new(&BoundsTuning::default());
        bounds.update(0.016, 40_000.0);
        assert_eq!(bounds.target_width, 600.0);
        bounds.update(0.016, 0.0);
        assert_eq!(bounds.target_width, 600.0);
    }
}
