//! Lantern Rise headless driver
//!
//! Plays one scripted run at 60 Hz without a window: aims at the nearest
//! lantern above, releases once the aim line touches it, then submits the
//! final score to an in-process scoreboard.
//!
//! Usage: `lantern-rise [TUNING_JSON] [SEED]`

use std::time::Duration;

use glam::Vec2;

use lantern_rise::consts::SIM_DT;
use lantern_rise::sim::{GameEvent, GamePhase, GameState, InputEvent, TickInput, tick};
use lantern_rise::{LocalScoreboard, ScoreSubmission, SubmissionStatus, Tuning};

/// Longest run the autopilot plays before giving up (ten minutes of frames)
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Frames to hold an aim that never touches anything
const AIM_PATIENCE: u32 = 45;
const SUBMIT_TIMEOUT: f32 = 5.0;
const DEFAULT_SEED: u64 = 0x1a47_e2d5;

/// Pointer script for the run
#[derive(Debug, Default)]
struct Autopilot {
    aim_frames: Option<u32>,
}

impl Autopilot {
    fn next_input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let player = &state.player;

        let Some(goal) = pick_lantern(state) else {
            if self.aim_frames.take().is_some() {
                input.events.push(InputEvent::AimEnd);
            }
            return input;
        };
        input.cursor = Some(state.session.game_to_screen(goal));

        match self.aim_frames.as_mut() {
            None if !player.cutting && player.flight.is_none() => {
                self.aim_frames = Some(0);
                input.events.push(InputEvent::AimBegin);
            }
            None => {}
            Some(frames) => {
                *frames += 1;
                if !state.aim.is_empty() || *frames > AIM_PATIENCE {
                    self.aim_frames = None;
                    input.events.push(InputEvent::AimEnd);
                }
            }
        }
        input
    }
}

/// Lowest lantern above the player that a dash can still reach
fn pick_lantern(state: &GameState) -> Option<Vec2> {
    let player = &state.player;
    let reach = player.tuning().cut_distance;
    state
        .targets
        .iter()
        .filter(|t| t.pos.y > player.pos.y)
        .find(|t| t.pos.distance(player.pos) < reach + t.radius)
        .map(|t| t.pos)
}

fn parse_args() -> (Tuning, u64) {
    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({e}), using default");
            DEFAULT_SEED
        }
        None => DEFAULT_SEED,
    };
    (tuning, seed)
}

fn main() {
    env_logger::init();
    log::info!("Lantern Rise (headless) starting...");

    let (tuning, seed) = parse_args();
    let mut state = GameState::with_tuning(seed, tuning);
    let mut pilot = Autopilot::default();
    let mut slices = 0u32;

    while state.phase == GamePhase::Playing && state.time_ticks < MAX_FRAMES {
        let input = pilot.next_input(&state);
        tick(&mut state, &input, SIM_DT);

        for event in &state.events {
            match event {
                GameEvent::Sliced { kind, quality, .. } => {
                    slices += 1;
                    log::debug!("Sliced {kind:?} ({quality:?}) at score {}", state.score());
                }
                GameEvent::TutorialMiss { target_id, .. } => {
                    log::debug!("Tutorial lantern {target_id} needs a perfect cut");
                }
                _ => {}
            }
        }
    }

    let score = state.score();
    log::info!(
        "Run finished after {} frames: score {score}, multiplier x{}, {slices} slices",
        state.time_ticks,
        state.session.multiplier
    );

    let scoreboard = LocalScoreboard::new();
    let mut submission = ScoreSubmission::spawn(scoreboard, "autopilot", score, SUBMIT_TIMEOUT);
    let status = loop {
        let status = submission.poll(SIM_DT);
        if !status.is_pending() {
            break status;
        }
        std::thread::sleep(Duration::from_secs_f32(SIM_DT));
    };

    match status {
        SubmissionStatus::Ranked(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                log::info!("{:>2}. {:<12} {}", i + 1, entry.name, entry.score);
            }
        }
        SubmissionStatus::Failed(e) => log::error!("Score submission failed: {e}"),
        SubmissionStatus::TimedOut => log::error!("Score submission timed out"),
        SubmissionStatus::Pending => {}
    }
}
