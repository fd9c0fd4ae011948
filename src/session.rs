//! Frame driver for a single roll
//!
//! One frame = camera input, exactly one simulation step, camera follow.
//! The frame's elapsed time only reaches the camera.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{BOOST_FACTOR, CameraMove, FollowCamera};
use crate::settings::RollSettings;
use crate::sim::{ExitReason, SimEvent, SimulationState, step};

/// Presentation input for one frame (never affects the simulation)
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Held movement keys
    pub moves: Vec<CameraMove>,
    /// Boost modifier held
    pub boost: bool,
    /// Mouse look delta (pixels, y up)
    pub look: Option<(f32, f32)>,
    /// Scroll delta
    pub zoom: Option<f32>,
}

/// Per-pin outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinReport {
    pub index: usize,
    pub position: Vec3,
    pub fall_angle: f32,
    pub hit: bool,
    pub hit_complete: bool,
}

/// Outcome of a roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollSummary {
    pub frames: u64,
    pub ball_position: Vec3,
    pub ball_active: bool,
    pub exit: Option<ExitReason>,
    /// Pins knocked (not a score)
    pub pins_down: usize,
    pub pins: Vec<PinReport>,
}

/// A roll in progress plus its camera
#[derive(Debug, Clone)]
pub struct RollSession {
    pub state: SimulationState,
    pub camera: FollowCamera,
    /// Every event since the roll started
    pub history: Vec<SimEvent>,
}

impl RollSession {
    pub fn new(settings: RollSettings) -> Self {
        let camera = FollowCamera::new(settings.follow_ball);
        Self {
            state: SimulationState::new(settings),
            camera,
            history: Vec::new(),
        }
    }

    /// Run one frame; returns the events it produced
    pub fn frame(&mut self, input: &FrameInput, dt: f32) -> &[SimEvent] {
        for &direction in &input.moves {
            self.camera.process_move(direction, dt);
            // Boost stacks a second, faster move on top of the plain one
            if input.boost {
                self.camera.process_move(direction, dt * BOOST_FACTOR);
            }
        }
        if let Some((x, y)) = input.look {
            self.camera.process_look(x, y);
        }
        if let Some(y) = input.zoom {
            self.camera.process_zoom(y);
        }

        step(&mut self.state);
        self.history.extend(self.state.events.iter().cloned());

        self.camera.follow(&self.state.ball, dt);

        &self.state.events
    }

    /// Ball stopped and no pin still toppling
    pub fn is_settled(&self) -> bool {
        self.state.is_settled()
    }

    /// Run frames with no input until settled or `max_frames` reached
    ///
    /// Returns the number of frames run.
    pub fn run_until_settled(&mut self, dt: f32, max_frames: u64) -> u64 {
        let input = FrameInput::default();
        let mut frames = 0;
        while frames < max_frames && !self.is_settled() {
            self.frame(&input, dt);
            frames += 1;
        }
        if !self.is_settled() {
            log::warn!("Roll not settled after {} frames", frames);
        }
        frames
    }

    pub fn summary(&self) -> RollSummary {
        let state = &self.state;
        RollSummary {
            frames: state.frame,
            ball_position: state.ball.pos,
            ball_active: state.ball.active,
            exit: state.ball.exit,
            pins_down: state.pins_hit(),
            pins: state
                .pins
                .iter()
                .map(|p| PinReport {
                    index: p.index,
                    position: p.position(),
                    fall_angle: p.fall_angle,
                    hit: p.hit,
                    hit_complete: p.hit_complete,
                })
                .collect(),
        }
    }
}
