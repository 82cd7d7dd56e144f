//! Lantern streaming
//!
//! Lanterns are laid out on a curve that spaces them further apart the higher
//! the run goes. The spawner only materializes the stretch just above the
//! camera, keeping the collection ordered by increasing height.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::target::{Target, TargetKind};
use crate::consts::{SCREEN_HEIGHT, SHAFT_CENTER_X};
use crate::settings::SpawnTuning;

/// First layout index used by the stream (lower indices are the opening area)
const FIRST_INDEX: u32 = 3;
/// Exponent of the spacing curve
const SPACING_EXPONENT: f32 = 1.2;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    next_index: u32,
    /// Height of the last lantern generated
    frontier_y: f32,
    tuning: SpawnTuning,
}

impl Spawner {
    pub fn new(seed: u64, tuning: &SpawnTuning) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_index: FIRST_INDEX,
            frontier_y: f32::NEG_INFINITY,
            tuning: tuning.clone(),
        }
    }

    /// The lantern waiting above the launch pad at the start of a run
    pub fn opening(&self, id: u32) -> Target {
        let kind = if self.tuning.tutorial {
            TargetKind::Tutorial
        } else {
            TargetKind::Big
        };
        Target::new(id, kind, Vec2::new(SHAFT_CENTER_X, SCREEN_HEIGHT / 2.0))
    }

    /// Generate lanterns until the stream reaches the lookahead window
    ///
    /// `next_id` allocates entity ids. Returns how many lanterns were added.
    pub fn fill(
        &mut self,
        targets: &mut Vec<Target>,
        camera_y: f32,
        mut next_id: impl FnMut() -> u32,
    ) -> usize {
        let horizon = camera_y + self.tuning.lookahead_screens * SCREEN_HEIGHT;
        let mut added = 0;

        while self.frontier_y < horizon {
            let pos = self.next_position();
            let kind = self.next_kind();
            let target = Target::new(next_id(), kind, pos);

            let at = targets.partition_point(|t| t.pos.y <= pos.y);
            targets.insert(at, target);
            self.frontier_y = pos.y;
            added += 1;
        }

        if added > 0 {
            log::debug!(
                "Spawned {added} lanterns up to y={:.0} (index {})",
                self.frontier_y,
                self.next_index
            );
        }
        added
    }

    fn next_position(&mut self) -> Vec2 {
        let i = self.next_index as f32;
        self.next_index += 1;

        let y = i.powf(SPACING_EXPONENT) * SCREEN_HEIGHT / 4.0
            + self.rng.random::<f32>() * self.tuning.y_jitter
            + SCREEN_HEIGHT / 2.0;
        let x = SHAFT_CENTER_X + (self.rng.random::<f32>() - 0.5) * self.tuning.x_spread;
        Vec2::new(x, y)
    }

    fn next_kind(&mut self) -> TargetKind {
        let s = &self.tuning;
        let total = s.normal_weight + s.big_weight + s.small_weight;
        let roll = self.rng.random::<f32>() * total;
        if roll < s.normal_weight {
            TargetKind::Normal
        } else if roll < s.normal_weight + s.big_weight {
            TargetKind::Big
        } else {
            TargetKind::Small
        }
    }
}
