//! Slice quality
//!
//! A slice is judged by how well the player's travel direction lines up with
//! the direction to the lantern center. The reading is a signed value `amt` in
//! [-0.5, 0.5]; its magnitude reaching 0.5 means a dead-center cut.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{heading_degrees, wrap_degrees};

/// `0.5 - |amt|` below this is a perfect cut
pub const PERFECT_BAND: f32 = 0.02;
/// `|amt|` above this (and not perfect) is a good cut
pub const GOOD_FLOOR: f32 = 0.25;

/// Score below which perfect launches get no bonus
pub const BONUS_START_SCORE: f32 = 1000.0;
/// Score span over which the bonus ramps to its cap
pub const BONUS_RAMP_SCORE: f32 = 4000.0;
pub const MAX_LAUNCH_BONUS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliceQuality {
    Perfect,
    Good,
    Okay,
}

impl SliceQuality {
    pub fn is_perfect(self) -> bool {
        self == SliceQuality::Perfect
    }
}

/// Band a signed cut reading
pub fn classify(amt: f32) -> SliceQuality {
    let magnitude = amt.abs();
    if 0.5 - magnitude < PERFECT_BAND {
        SliceQuality::Perfect
    } else if magnitude > GOOD_FLOOR {
        SliceQuality::Good
    } else {
        SliceQuality::Okay
    }
}

/// Perfect-launch multiplier for the current score
///
/// 1.0 up to score 1000, then linear up to 10.0 at score 5000 and flat after.
pub fn launch_bonus(score: u64) -> f32 {
    let over = (score as f32 - BONUS_START_SCORE).max(0.0);
    let t = (over / BONUS_RAMP_SCORE).min(1.0);
    1.0 + (MAX_LAUNCH_BONUS - 1.0) * t
}

/// Geometry of a single cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutReading {
    /// Player heading (degrees)
    pub travel_angle: f32,
    /// Direction from player to lantern center (degrees)
    pub target_angle: f32,
    /// `(travel - target) mod 360`
    pub diff: f32,
    pub inverted: bool,
    /// Signed quality, 0.5 * cos(diff)
    pub amt: f32,
    /// Where the cut line crosses the lantern, passed on to its debris
    pub cut_proportion: f32,
    pub quality: SliceQuality,
}

/// Read a cut from the player's velocity and the offset to the lantern center
pub fn read_cut(velocity: Vec2, to_target: Vec2) -> CutReading {
    let travel_angle = heading_degrees(velocity);
    let target_angle = heading_degrees(to_target);
    let diff = wrap_degrees(travel_angle - target_angle);
    let inverted = diff < 180.0;
    let amt = 0.5 * diff.to_radians().cos();

    // Kept as-is: the wrap makes the proportion jump between cuts just either
    // side of perpendicular.
    let wrapped = amt.rem_euclid(1.0);
    let cut_proportion = if inverted { wrapped } else { 1.0 - wrapped };

    CutReading {
        travel_angle,
        target_angle,
        diff,
        inverted,
        amt,
        cut_proportion,
        quality: classify(amt),
    }
}
