//! The player projectile
//!
//! Free flight integrates gravity and drag. A dash is a fixed-length,
//! fixed-speed straight run that ignores both. Flight is a timed power-up that
//! takes over the trajectory completely.

use glam::Vec2;

use super::bounds::{Body, Bounds};
use super::session::Session;
use super::slice::{CutReading, SliceQuality, read_cut};
use super::state::GameEvent;
use super::target::{Debris, Target};
use crate::heading_degrees;
use crate::settings::PlayerTuning;

/// Relative tolerance on the speed cap
const SPEED_CAP_SLACK: f32 = 1e-6;

/// What the player is doing, for rendering and input gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    FreeFlight,
    Dashing,
    Flying,
}

/// Timed flight power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub elapsed: f32,
    pub duration: f32,
}

/// Outcome of touching a lantern
#[derive(Debug, Clone, PartialEq)]
pub enum SliceOutcome {
    Sliced {
        reading: CutReading,
        debris: Debris,
    },
    /// Tutorial lantern refused an imperfect cut
    Rejected { reading: CutReading },
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Dashing
    pub cutting: bool,
    /// Distance covered by the current dash
    pub cut_so_far: f32,
    pub flight: Option<Flight>,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &PlayerTuning) -> Self {
        let [vx, vy] = tuning.spawn_velocity;
        Self {
            pos: spawn,
            vel: Vec2::new(vx, vy),
            radius: tuning.radius,
            cutting: false,
            cut_so_far: 0.0,
            flight: None,
            tuning: tuning.clone(),
        }
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn motion(&self) -> Motion {
        if self.flight.is_some() {
            Motion::Flying
        } else if self.cutting {
            Motion::Dashing
        } else {
            Motion::FreeFlight
        }
    }

    /// Heading of travel in degrees
    pub fn heading(&self) -> f32 {
        heading_degrees(self.vel)
    }

    pub fn bounce_left(&mut self) {
        self.vel.x = -self.vel.x.abs();
    }

    pub fn bounce_right(&mut self) {
        self.vel.x = self.vel.x.abs();
    }

    /// Start a dash toward `point`
    ///
    /// Nothing happens unless the aim line touches a lantern. Returns whether
    /// a dash started.
    pub fn dash_toward(&mut self, point: Vec2, anything_touched: bool) -> bool {
        if !anything_touched || self.flight.is_some() {
            log::trace!("Dash ignored (touched: {anything_touched})");
            return false;
        }
        let dir = (point - self.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            return false;
        }

        self.cut_so_far = 0.0;
        self.cutting = true;
        self.vel = dir * self.tuning.dash_exit_speed;
        true
    }

    /// Push along the current direction of travel
    pub fn add_speed(&mut self, amount: f32) {
        let unit = self.vel.normalize_or_zero();
        if unit == Vec2::ZERO {
            return;
        }
        self.vel += unit * amount;
        self.apply_max_velocity();
    }

    /// Clamp speed to `max_speed` without changing direction
    ///
    /// Speeds within rounding error of the cap are left alone so clamping
    /// twice is the same as clamping once.
    pub fn apply_max_velocity(&mut self) {
        let max_speed = self.tuning.max_speed;
        let speed = self.vel.length();
        if speed > max_speed * (1.0 + SPEED_CAP_SLACK) {
            self.vel *= max_speed / speed;
        }
    }

    /// A player falling onto the launch pad comes to rest there
    pub fn rest_on_launch_pad(&mut self) {
        if self.pos.y < self.tuning.launch_pad_height && self.vel.y < 0.0 && !self.cutting {
            self.vel = Vec2::ZERO;
        }
    }

    pub fn grant_flight(&mut self) {
        self.cutting = false;
        self.cut_so_far = 0.0;
        self.flight = Some(Flight {
            elapsed: 0.0,
            duration: self.tuning.flight_duration,
        });
    }

    /// Overlap test against a lantern
    pub fn colliding_with(&self, target: &Target) -> bool {
        self.pos.distance(target.pos) < self.radius + target.radius
    }

    /// Advance one step: move, bounce off the walls, slice what we hit
    pub fn update(
        &mut self,
        dt: f32,
        bounds: &Bounds,
        targets: &mut Vec<Target>,
        session: &mut Session,
        events: &mut Vec<GameEvent>,
        debris: &mut Vec<Debris>,
    ) {
        if self.flight.is_some() {
            self.fly(dt, bounds, events);
        } else if !self.cutting {
            self.pos += self.vel * dt;
            self.vel *= self.tuning.accel.powf(dt);
            self.vel.y -= self.tuning.gravity * dt;
            self.vel.y = self.vel.y.max(-self.tuning.max_fall_speed);
        } else {
            let dir = self.vel.normalize_or_zero();
            self.pos += dir * self.tuning.cut_speed * dt;
            self.cut_so_far += self.tuning.cut_speed * dt;
        }

        if bounds.is_too_far_left(&*self) {
            self.bounce_right();
            self.pos.x = bounds.left_edge() + self.radius;
            session.shake(session.effects().wall_shake);
            events.push(GameEvent::WallBounce { pos: self.pos });
        } else if bounds.is_too_far_right(&*self) {
            self.bounce_left();
            self.pos.x = bounds.right_edge() - self.radius;
            session.shake(session.effects().wall_shake);
            events.push(GameEvent::WallBounce { pos: self.pos });
        }

        if self.flight.is_none() {
            self.slice_overlapping(targets, session, events, debris);
        }

        if self.cutting && self.cut_so_far >= self.tuning.cut_distance {
            self.cutting = false;
        }

        self.apply_max_velocity();
        self.rest_on_launch_pad();
    }

    fn fly(&mut self, dt: f32, bounds: &Bounds, events: &mut Vec<GameEvent>) {
        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        flight.elapsed += dt;
        let rise = self.tuning.flight_rise_speed;

        if flight.elapsed >= flight.duration {
            self.flight = None;
            self.vel = Vec2::new(0.0, rise);
            events.push(GameEvent::FlightEnded);
            return;
        }

        let sway = ((bounds.width / 2.0 - self.radius) * 0.6).max(0.0);
        let phase = flight.elapsed * std::f32::consts::TAU * self.tuning.flight_sway_frequency;
        self.pos.x = bounds.center_x + sway * phase.sin();
        self.pos.y += rise * dt;
        self.vel = Vec2::new(0.0, rise);
    }

    /// Slice every lantern we overlap while rising fast enough or dashing
    fn slice_overlapping(
        &mut self,
        targets: &mut Vec<Target>,
        session: &mut Session,
        events: &mut Vec<GameEvent>,
        debris: &mut Vec<Debris>,
    ) {
        let mut i = 0;
        while i < targets.len() {
            let armed = self.vel.y > self.tuning.slice_rise_speed || self.cutting;
            if !(armed && self.colliding_with(&targets[i])) {
                targets[i].blocked_contact = false;
                i += 1;
                continue;
            }

            match self.slice(targets, i, session) {
                SliceOutcome::Sliced { reading, debris: pieces } => {
                    events.push(GameEvent::Sliced {
                        target_id: pieces.target_id,
                        kind: pieces.kind,
                        quality: reading.quality,
                        amt: reading.amt,
                        pos: pieces.center,
                    });
                    debris.push(pieces);
                    // The lantern at `i` is gone; the next one slid into its slot
                }
                SliceOutcome::Rejected { .. } => {
                    let target = &mut targets[i];
                    if !target.blocked_contact {
                        events.push(GameEvent::TutorialMiss {
                            target_id: target.id,
                            pos: target.pos,
                        });
                    }
                    target.blocked_contact = true;
                    i += 1;
                }
            }
        }
    }

    /// Resolve a slice against `targets[index]`
    ///
    /// On success the lantern is removed from the collection before this
    /// returns, and the player's velocity and the session are updated.
    pub fn slice(&mut self, targets: &mut Vec<Target>, index: usize, session: &mut Session) -> SliceOutcome {
        let target = &targets[index];
        let reading = read_cut(self.vel, target.pos - self.pos);

        if target.kind.requires_perfect() && !reading.quality.is_perfect() {
            log::debug!(
                "Tutorial lantern {} rejected {:?} cut (amt {:.3})",
                target.id,
                reading.quality,
                reading.amt
            );
            return SliceOutcome::Rejected { reading };
        }

        let target = targets.remove(index);
        let launch_factor = target.launch_factor;
        let pieces = target.destroy(reading.cut_proportion, reading.travel_angle);

        let fx = session.effects().clone();
        let (speed_to_add, minimum_y, amt) = match reading.quality {
            SliceQuality::Perfect => {
                let bonus = session.launch_bonus();
                session.slowdown(fx.perfect_slowdown);
                session.shake(fx.perfect_shake);
                session.multiplier += 1;
                (fx.perfect_speed * bonus, fx.perfect_min_rise * bonus, 0.5)
            }
            SliceQuality::Good | SliceQuality::Okay => {
                session.shake(fx.off_center_shake);
                session.slowdown(fx.off_center_slowdown);
                (fx.off_center_speed, fx.off_center_min_rise, reading.amt)
            }
        };

        let falloff = (amt * 2.0).powi(2);
        self.add_speed(speed_to_add * launch_factor * falloff);
        self.vel.y = self.vel.y.max(minimum_y * launch_factor * falloff);

        log::debug!(
            "Sliced lantern {} ({:?}, amt {:.3}) -> vel ({:.0}, {:.0}), x{}",
            pieces.target_id,
            reading.quality,
            reading.amt,
            self.vel.x,
            self.vel.y,
            session.multiplier
        );

        SliceOutcome::Sliced {
            reading,
            debris: pieces,
        }
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
