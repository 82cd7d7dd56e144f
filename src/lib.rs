//! Lantern Rise - vertical slice-and-launch arcade core
//!
//! Core modules:
//! - `sim`: Simulation (player physics, aim line, slicing, session effects)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `scoreboard`: Leaderboard and non-blocking score submission

pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use scoreboard::{Leaderboard, LocalScoreboard, ScoreSubmission, SubmissionStatus};
pub use settings::{SettingsError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical screen size (game units are pixels, y grows upward)
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Horizontal center of the shaft
    pub const SHAFT_CENTER_X: f32 = SCREEN_WIDTH / 2.0;

    /// Nominal frame time of the reference driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest physics step fed to the components (frame hitch guard)
    pub const MAX_STEP_DT: f32 = 1.0 / 30.0;

    /// Camera keeps the player at most this far above the bottom edge
    pub const CAMERA_LEAD: f32 = SCREEN_HEIGHT * 0.7;
    /// Player is lost once this far below the camera
    pub const DEATH_MARGIN: f32 = 50.0;

    /// Progress units per score point
    pub const PROGRESS_PER_POINT: f32 = 10.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Heading of a vector in degrees, counter-clockwise from +x
///
/// A zero vector has no direction; it is treated as pointing straight down.
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        return -90.0;
    }
    v.y.atan2(v.x).to_degrees()
}

/// Unit vector for a heading in degrees
#[inline]
pub fn degrees_to_unit(angle: f32) -> Vec2 {
    let rad = angle.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_heading_degrees() {
        assert!((heading_degrees(Vec2::new(0.0, 1.0)) - 90.0).abs() < 1e-4);
        assert!((heading_degrees(Vec2::new(-1.0, 0.0)) - 180.0).abs() < 1e-4);
        assert_eq!(heading_degrees(Vec2::ZERO), -90.0);
    }

    #[test]
    fn test_degrees_to_unit() {
        let up = degrees_to_unit(90.0);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y - 1.0).abs() < 1e-6);
    }
}
