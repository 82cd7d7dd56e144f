//! Lanterns: the targets the player slices through

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Body;
use crate::degrees_to_unit;

/// Lantern variants. They differ only in size, launch strength and how often
/// they spawn; tutorial lanterns additionally refuse anything but a perfect cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Normal,
    Big,
    Small,
    Tutorial,
}

/// Per-kind constants
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub radius: f32,
    pub launch_factor: f32,
}

impl TargetKind {
    pub const fn spec(self) -> KindSpec {
        match self {
            TargetKind::Normal => KindSpec {
                radius: 30.0,
                launch_factor: 1.0,
            },
            TargetKind::Big => KindSpec {
                radius: 40.0,
                launch_factor: 1.3,
            },
            TargetKind::Small => KindSpec {
                radius: 20.0,
                launch_factor: 1.15,
            },
            TargetKind::Tutorial => KindSpec {
                radius: 40.0,
                launch_factor: 1.0,
            },
        }
    }

    /// Tutorial lanterns only break on a perfect slice
    pub fn requires_perfect(self) -> bool {
        self == TargetKind::Tutorial
    }
}

/// What a renderer should draw for a live lantern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Alive,
    /// The aim line currently passes through it
    Touched,
}

/// A live lantern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub kind: TargetKind,
    pub pos: Vec2,
    pub radius: f32,
    pub launch_factor: f32,
    pub touched: bool,
    /// Player overlapped this lantern last step without breaking it
    #[serde(default)]
    pub(crate) blocked_contact: bool,
}

impl Target {
    pub fn new(id: u32, kind: TargetKind, pos: Vec2) -> Self {
        let spec = kind.spec();
        Self {
            id,
            kind,
            pos,
            radius: spec.radius,
            launch_factor: spec.launch_factor,
            touched: false,
            blocked_contact: false,
        }
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    pub fn state(&self) -> TargetState {
        if self.touched {
            TargetState::Touched
        } else {
            TargetState::Alive
        }
    }

    /// Break the lantern. Consumes it, so a destroyed lantern cannot be hit again.
    ///
    /// `cut_proportion` is where along the lantern's height the cut runs and
    /// `cut_heading` is the player's heading in degrees at the moment of impact.
    pub fn destroy(self, cut_proportion: f32, cut_heading: f32) -> Debris {
        let diameter = self.radius * 2.0;
        let cutoff = (cut_proportion * diameter).clamp(0.0, diameter);
        let upper_offset = self.radius - cutoff / 2.0;
        let lower_offset = -cutoff / 2.0;

        // Perpendicular to the cut, pointing to the upper half
        let along = degrees_to_unit(cut_heading + 90.0);

        Debris {
            target_id: self.id,
            kind: self.kind,
            center: self.pos,
            radius: self.radius,
            cut_heading,
            upper: DebrisPiece {
                offset: along * upper_offset,
                height: cutoff,
                velocity: Vec2::new(-30.0, 500.0),
                spin: 120.0,
            },
            lower: DebrisPiece {
                offset: along * lower_offset,
                height: diameter - cutoff,
                velocity: Vec2::new(60.0, 150.0),
                spin: -40.0,
            },
            bright_glow: (cut_proportion - 0.5).abs() < 0.02,
        }
    }
}

impl Body for Target {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// One half of a sliced lantern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebrisPiece {
    /// Offset of the piece center from the lantern center
    pub offset: Vec2,
    /// Height of the piece along the cut normal
    pub height: f32,
    pub velocity: Vec2,
    /// Degrees per second
    pub spin: f32,
}

/// Geometry of a destroyed lantern, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    pub target_id: u32,
    pub kind: TargetKind,
    pub center: Vec2,
    pub radius: f32,
    pub cut_heading: f32,
    pub upper: DebrisPiece,
    pub lower: DebrisPiece,
    /// Near-centered cuts leave a brighter afterglow
    pub bright_glow: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(TargetKind::Normal.spec().radius, 30.0);
        assert_eq!(TargetKind::Big.spec().launch_factor, 1.3);
        for kind in [
            TargetKind::Normal,
            TargetKind::Big,
            TargetKind::Small,
            TargetKind::Tutorial,
        ] {
            assert!(kind.spec().launch_factor >= 1.0);
            assert!(kind.spec().radius > 0.0);
        }
        assert!(TargetKind::Tutorial.requires_perfect());
        assert!(!TargetKind::Big.requires_perfect());
    }

    #[test]
    fn test_touch_state() {
        let mut target = Target::new(1, TargetKind::Normal, Vec2::new(300.0, 400.0));
        assert_eq!(target.state(), TargetState::Alive);
        target.touch();
        assert_eq!(target.state(), TargetState::Touched);
    }

    #[test]
    fn test_centered_cut_splits_evenly() {
        let target = Target::new(7, TargetKind::Normal, Vec2::new(300.0, 400.0));
        let debris = target.destroy(0.5, 90.0);
        assert_eq!(debris.target_id, 7);
        assert_eq!(debris.upper.height, 30.0);
        assert_eq!(debris.lower.height, 30.0);
        assert!(debris.bright_glow);
    }

    #[test]
    fn test_off_center_cut_pieces_cover_lantern() {
        let target = Target::new(2, TargetKind::Big, Vec2::ZERO);
        let debris = target.destroy(0.8, 45.0);
        assert!((debris.upper.height + debris.lower.height - 80.0).abs() < 1e-4);
        assert!(!debris.bright_glow);
    }
}
