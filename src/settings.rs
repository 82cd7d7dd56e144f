//! Gameplay tuning
//!
//! Every physics and feel constant lives here so a run can be re-balanced from
//! a JSON file without recompiling. Missing fields fall back to defaults.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Player body and dash constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision radius
    pub radius: f32,
    /// Proportion of speed kept after one second of drag
    pub accel: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Hard cap on speed magnitude
    pub max_speed: f32,
    /// Dash length
    pub cut_distance: f32,
    /// Dash travel speed
    pub cut_speed: f32,
    /// Speed left along the dash direction once the dash is over
    pub dash_exit_speed: f32,
    /// Upward speed above which touching a lantern slices it
    pub slice_rise_speed: f32,
    /// Initial velocity on spawn
    pub spawn_velocity: [f32; 2],
    /// Below this height a falling player rests on the launch pad
    pub launch_pad_height: f32,
    /// Flight power-up duration (seconds)
    pub flight_duration: f32,
    /// Flight rise rate (units/s)
    pub flight_rise_speed: f32,
    /// Flight sway cycles per second
    pub flight_sway_frequency: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 10.0,
            accel: 0.6,
            gravity: 800.0,
            max_fall_speed: 600.0,
            max_speed: 4000.0,
            cut_distance: 250.0,
            cut_speed: 2000.0,
            dash_exit_speed: 300.0,
            slice_rise_speed: 550.0,
            spawn_velocity: [100.0, 600.0],
            launch_pad_height: 100.0,
            flight_duration: 3.0,
            flight_rise_speed: 1200.0,
            flight_sway_frequency: 0.75,
        }
    }
}

/// Shaft width constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsTuning {
    pub initial_width: f32,
    /// Easing gain of the width filter (per second)
    pub gain: f32,
    /// (progress, width) pairs; the shaft widens once progress passes each one
    pub widen_steps: Vec<(f32, f32)>,
}

impl Default for BoundsTuning {
    fn default() -> Self {
        Self {
            initial_width: 400.0,
            gain: 5.0,
            widen_steps: vec![(15_000.0, 500.0), (30_000.0, 600.0)],
        }
    }
}

/// Aim line sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AimTuning {
    pub samples: usize,
    /// Aim ramp speed toward the aiming state (per second)
    pub ramp_speed: f32,
    /// Time scale reduction at full aim ramp
    pub ramp_slowdown: f32,
}

impl Default for AimTuning {
    fn default() -> Self {
        Self {
            samples: 25,
            ramp_speed: 7.0,
            ramp_slowdown: 0.95,
        }
    }
}

/// Slice feedback: slowdown, shake and launch speeds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    /// Time scale while a slowdown window is open
    pub slowdown_scale: f32,
    pub perfect_slowdown: f32,
    pub off_center_slowdown: f32,
    pub perfect_shake: f32,
    pub off_center_shake: f32,
    pub wall_shake: f32,
    /// Shake oscillation frequency (Hz)
    pub shake_frequency: f32,
    /// Proportion of shake left after one second
    pub shake_retention: f32,
    /// Linear shake decay (amplitude/s)
    pub shake_linear_decay: f32,
    pub perfect_speed: f32,
    pub perfect_min_rise: f32,
    pub off_center_speed: f32,
    pub off_center_min_rise: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            slowdown_scale: 0.01,
            perfect_slowdown: 0.4,
            off_center_slowdown: 0.05,
            perfect_shake: 25.0,
            off_center_shake: 10.0,
            wall_shake: 4.0,
            shake_frequency: 9.0,
            shake_retention: 0.2,
            shake_linear_decay: 200.0,
            perfect_speed: 2000.0,
            perfect_min_rise: 2000.0,
            off_center_speed: 1000.0,
            off_center_min_rise: 1300.0,
        }
    }
}

/// Lantern streaming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Place a tutorial lantern instead of the opening big one
    pub tutorial: bool,
    /// Keep lanterns generated this many screens above the camera
    pub lookahead_screens: f32,
    /// Horizontal spread around the shaft center
    pub x_spread: f32,
    /// Vertical jitter added to each lantern
    pub y_jitter: f32,
    pub normal_weight: f32,
    pub big_weight: f32,
    pub small_weight: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            tutorial: false,
            lookahead_screens: 4.0,
            x_spread: 300.0,
            y_jitter: 200.0,
            normal_weight: 0.7,
            big_weight: 0.2,
            small_weight: 0.1,
        }
    }
}

/// All gameplay tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub bounds: BoundsTuning,
    pub aim: AimTuning,
    pub effects: EffectsTuning,
    pub spawn: SpawnTuning,
}

/// Failure to load tuning
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            SettingsError::Parse(e) => write!(f, "malformed tuning JSON: {e}"),
            SettingsError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any problem
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let p = &self.player;
        let positive = [
            ("player.radius", p.radius),
            ("player.max_speed", p.max_speed),
            ("player.cut_distance", p.cut_distance),
            ("player.cut_speed", p.cut_speed),
            ("bounds.initial_width", self.bounds.initial_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if !(p.accel > 0.0 && p.accel <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "player.accel must be in (0, 1], got {}",
                p.accel
            )));
        }
        if self.aim.samples == 0 {
            return Err(SettingsError::Invalid("aim.samples must be at least 1".into()));
        }
        let s = &self.spawn;
        let weights = [s.normal_weight, s.big_weight, s.small_weight];
        if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f32>() <= 0.0 {
            return Err(SettingsError::Invalid(
                "spawn weights must be non-negative with a positive sum".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "max_speed": 3000.0 } }"#).unwrap();
        assert_eq!(tuning.player.max_speed, 3000.0);
        assert_eq!(tuning.player.cut_distance, 250.0);
        assert_eq!(tuning.aim.samples, 25);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "player": { "radius": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Tuning::from_json(r#"{ "aim": { "samples": 0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/nonexistent/lantern-tuning.json");
        assert_eq!(tuning.player.radius, 10.0);
    }
}
