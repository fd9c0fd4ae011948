//! Roll state and core simulation types
//!
//! Everything the simulation mutates per frame lives in `SimulationState`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::RollSettings;

/// Why the ball stopped rolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Rolled off the far end of the pin deck
    PastDeck,
    /// Dropped into a gutter
    Gutter,
    /// Came back over the foul line
    BehindFoulLine,
}

/// Something that happened during a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BallHitPin { pin: usize, ball_pos: Vec3 },
    PinHitPin { source: usize, target: usize, target_pos: Vec3 },
    /// Pin clamped flat at -90 degrees
    PinFallComplete { pin: usize },
    BallLeftLane { pos: Vec3, reason: ExitReason },
}

/// The bowling ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    /// Per-frame displacement
    pub vel: Vec3,
    /// Angular velocity; mirrors `vel` after every hit
    pub omega: Vec3,
    /// Accumulated spin angle (degrees, per axis)
    pub spin_angle: Vec3,
    /// On the lane floor; false once the roll is over
    pub active: bool,
    pub weight: f32,
    /// Set the first time the ball leaves the lane
    pub exit: Option<ExitReason>,
}

impl Ball {
    pub fn new(settings: &RollSettings) -> Self {
        Self {
            pos: Vec3::new(settings.initial_x, 0.0, 0.0),
            vel: settings.ball_velocity,
            omega: settings.ball_velocity,
            spin_angle: Vec3::ZERO,
            active: true,
            weight: settings.ball_weight,
            exit: None,
        }
    }

    /// Stop rolling, remembering the first reason
    pub fn deactivate(&mut self, reason: ExitReason) {
        self.active = false;
        if self.exit.is_none() {
            self.exit = Some(reason);
        }
    }
}

/// A single pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub index: usize,
    /// Rack position, fixed for the whole roll
    pub base: Vec3,
    /// Accumulated slide while toppling
    pub offset: Vec3,
    /// Unit vector from this pin toward whatever struck it
    pub hit_direction: Vec3,
    /// Tilt in degrees: 0 upright, -90 flat
    pub fall_angle: f32,
    /// Degrees the pin tips per frame
    pub fall_speed: f32,
    pub hit: bool,
    pub hit_complete: bool,
}

impl Pin {
    pub fn new(index: usize, base: Vec3) -> Self {
        Self {
            index,
            base,
            offset: Vec3::ZERO,
            hit_direction: Vec3::ZERO,
            fall_angle: 0.0,
            fall_speed: 0.0,
            hit: false,
            hit_complete: false,
        }
    }

    /// Current position used for collisions
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.base + self.offset
    }

    /// Still advancing its topple animation
    ///
    /// A pin that lands exactly on the completion threshold stays hit
    /// without completing, but no longer animates.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.hit && self.fall_angle > FALL_COMPLETE_ANGLE
    }
}

/// Row step applied after placing pin `index` to reach the next pin
///
/// Rows run right to left; the larger steps jump back to the right end of
/// the next (shorter, nearer) row, building the 4-3-2-1 triangle.
pub fn rack_step(index: usize, spacing: f32) -> Vec3 {
    match index {
        3 => Vec3::new(2.5 * spacing, 0.0, spacing),
        6 => Vec3::new(1.5 * spacing, 0.0, spacing),
        8 => Vec3::new(0.5 * spacing, 0.0, spacing),
        _ => Vec3::new(-spacing, 0.0, 0.0),
    }
}

/// Base positions of the ten pins
///
/// Pin 0 sits at `(1.5 * spacing, 0, -deck_z)` (back row, right end); pin 9
/// is the head pin nearest the foul line.
pub fn rack_positions(spacing: f32, deck_z: f32) -> [Vec3; PIN_COUNT] {
    let mut positions = [Vec3::ZERO; PIN_COUNT];
    let mut cursor = Vec3::new(1.5 * spacing, 0.0, -deck_z);
    for (i, slot) in positions.iter_mut().enumerate() {
        *slot = cursor;
        cursor += rack_step(i, spacing);
    }
    positions
}

/// Complete roll state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub settings: RollSettings,
    pub ball: Ball,
    /// Pins in rack order (index == `Pin::index`)
    pub pins: Vec<Pin>,
    /// Steps taken so far
    pub frame: u64,
    /// Events from the most recent step
    #[serde(skip)]
    pub events: Vec<SimEvent>,
    /// Final layout has been logged
    #[serde(skip)]
    pub(crate) layout_reported: bool,
}

impl SimulationState {
    /// Set up a fresh roll: ball at the foul line, full rack standing
    pub fn new(settings: RollSettings) -> Self {
        let pins = rack_positions(settings.pin_spacing, settings.pin_deck_z)
            .into_iter()
            .enumerate()
            .map(|(i, base)| Pin::new(i, base))
            .collect::<Vec<_>>();

        for pin in &pins {
            log::debug!(
                "PIN {} x: {} y: {} z: {}",
                pin.index,
                pin.base.x,
                pin.base.y,
                pin.base.z
            );
        }

        Self {
            ball: Ball::new(&settings),
            settings,
            pins,
            frame: 0,
            events: Vec::new(),
            layout_reported: false,
        }
    }

    /// Any pin still toppling
    pub fn pins_in_motion(&self) -> bool {
        self.pins.iter().any(Pin::is_animating)
    }

    /// Ball stopped and no pin is still toppling
    pub fn is_settled(&self) -> bool {
        !self.ball.active && !self.pins_in_motion()
    }

    /// Number of pins that have been knocked
    pub fn pins_hit(&self) -> usize {
        self.pins.iter().filter(|p| p.hit).count()
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(RollSettings::default())
    }
}
