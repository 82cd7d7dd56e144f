//! Aim line hit testing
//!
//! While the player holds the pointer, a line runs from the player toward the
//! cursor. It is sampled up to the dash length, and every lantern a sample
//! lands inside is marked touched. A dash only fires when something is touched.

use glam::Vec2;

use super::target::Target;
use crate::consts::SCREEN_HEIGHT;

/// Lanterns this many screens above the camera are not tested
const FAR_AHEAD_SCREENS: f32 = 2.0;

/// Result of the last aim pass
#[derive(Debug, Clone, Default)]
pub struct AimLine {
    /// Ids of lanterns crossed by the line, in collection order
    touched: Vec<u32>,
}

impl AimLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute touched lanterns
    ///
    /// Every lantern's `touched` flag is cleared before testing, so the flags
    /// always reflect this pass only.
    #[allow(clippy::too_many_arguments)]
    pub fn recompute(
        &mut self,
        origin: Vec2,
        cursor: Vec2,
        aiming: bool,
        reach: f32,
        samples: usize,
        targets: &mut [Target],
        camera_y: f32,
    ) -> &[u32] {
        self.touched.clear();
        for target in targets.iter_mut() {
            target.touched = false;
        }
        if !aiming {
            return &self.touched;
        }

        let dir = (cursor - origin).normalize_or_zero();
        let far_limit = camera_y + FAR_AHEAD_SCREENS * SCREEN_HEIGHT;

        for target in targets.iter_mut() {
            if target.pos.y > far_limit {
                continue;
            }
            let hit = (0..samples).any(|i| {
                let distance = i as f32 / samples as f32 * reach;
                let point = origin + dir * distance;
                point.distance(target.pos) < target.radius
            });
            if hit {
                target.touch();
                self.touched.push(target.id);
            }
        }

        &self.touched
    }

    pub fn touched(&self) -> &[u32] {
        &self.touched
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::target::TargetKind;

    fn lantern(id: u32, x: f32, y: f32) -> Target {
        Target::new(id, TargetKind::Normal, Vec2::new(x, y))
    }

    #[test]
    fn test_not_aiming_clears_everything() {
        let mut aim = AimLine::new();
        let mut targets = vec![lantern(1, 0.0, 100.0)];
        targets[0].touch();

        let hits = aim.recompute(Vec2::ZERO, Vec2::new(0.0, 300.0), false, 250.0, 25, &mut targets, 0.0);
        assert!(hits.is_empty());
        assert!(!targets[0].touched);
    }

    #[test]
    fn test_target_on_segment_is_touched() {
        let mut aim = AimLine::new();
        let mut targets = vec![lantern(1, 0.0, 120.0)];
        let hits = aim.recompute(Vec2::ZERO, Vec2::new(0.0, 500.0), true, 250.0, 25, &mut targets, 0.0);
        assert_eq!(hits, &[1]);
        assert!(targets[0].touched);
    }

    #[test]
    fn test_target_beside_segment_is_not_touched() {
        let mut aim = AimLine::new();
        // Nearest approach to the vertical line is 31 > radius 30
        let mut targets = vec![lantern(1, 31.0, 120.0)];
        let hits = aim.recompute(Vec2::ZERO, Vec2::new(0.0, 500.0), true, 250.0, 25, &mut targets, 0.0);
        assert!(hits.is_empty());
        assert!(!targets[0].touched);
    }

    #[test]
    fn test_beyond_dash_reach_is_not_touched() {
        let mut aim = AimLine::new();
        // Last sample sits at 24/25 * 250 = 240; lantern edge starts at 250
        let mut targets = vec![lantern(1, 0.0, 280.0)];
        let hits = aim.recompute(Vec2::ZERO, Vec2::new(0.0, 1000.0), true, 250.0, 25, &mut targets, 0.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_far_ahead_targets_skipped() {
        let mut aim = AimLine::new();
        let mut targets = vec![lantern(1, 0.0, 100.0)];
        // Camera far below: lantern is more than two screens above it
        let hits = aim.recompute(
            Vec2::ZERO,
            Vec2::new(0.0, 500.0),
            true,
            250.0,
            25,
            &mut targets,
            -2.0 * SCREEN_HEIGHT - 1.0,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_zero_length_aim_samples_origin_only() {
        let mut aim = AimLine::new();
        let mut targets = vec![lantern(1, 0.0, 10.0), lantern(2, 0.0, 200.0)];
        let hits = aim.recompute(Vec2::ZERO, Vec2::ZERO, true, 250.0, 25, &mut targets, 0.0);
        assert_eq!(hits, &[1]);
    }

    #[test]
    fn test_flags_reset_between_passes() {
        let mut aim = AimLine::new();
        let mut targets = vec![lantern(1, 0.0, 120.0)];
        aim.recompute(Vec2::ZERO, Vec2::new(0.0, 500.0), true, 250.0, 25, &mut targets, 0.0);
        assert!(targets[0].touched);

        // Aim sideways now
        aim.recompute(Vec2::ZERO, Vec2::new(500.0, 0.0), true, 250.0, 25, &mut targets, 0.0);
        assert!(!targets[0].touched);
        assert!(aim.is_empty());
    }
}
