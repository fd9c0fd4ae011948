//! Bowling Sim - a single bowling roll, frame by frame
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball trajectory, pin collisions, toppling)
//! - `camera`: Free-fly/follow camera driven by real elapsed time
//! - `session`: Frame driver tying the simulation and camera together
//! - `settings`: Roll tuning loaded from JSON

pub mod camera;
pub mod session;
pub mod settings;
pub mod sim;

pub use camera::{CameraMove, FollowCamera};
pub use session::{FrameInput, RollSession, RollSummary};
pub use settings::{RollSettings, SettingsError};

/// Fixed simulation constants
pub mod consts {
    /// Number of pins in a rack
    pub const PIN_COUNT: usize = 10;

    /// Lane bounds: gutters at ±95 on X, foul line to end of deck on Z
    pub const GUTTER_X: f32 = 95.0;
    pub const LANE_END_Z: f32 = -1500.0;
    pub const FOUL_LINE_Z: f32 = 10.0;

    /// Pin fall thresholds (degrees)
    pub const FALL_COMPLETE_ANGLE: f32 = -89.9;
    pub const FALL_FLAT_ANGLE: f32 = -90.0;

    /// Extra reach added to half the pin spacing for ball-vs-pin contact
    pub const BALL_HIT_MARGIN: f32 = 2.0;
    /// Extra reach added to the pin spacing for pin-vs-pin contact
    pub const PIN_HIT_MARGIN: f32 = 1.0;
    /// Pin/ball weight ratio at or above which the ball bounces straight back
    pub const BOUNCE_WEIGHT_RATIO: f32 = 2.0;

    /// Presentation offsets (model space, before scaling)
    pub const PIN_POP_LIFT: f32 = 6.0;
    pub const BALL_LIFT: f32 = 11.0;
    pub const MODEL_SCALE: f32 = 0.02;

    /// Camera stops following once the ball is this far down the lane
    pub const CAMERA_FOLLOW_STOP_Z: f32 = -1350.0;

    /// Frame time used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Axis a pin topples about when struck along `hit_direction`
///
/// Perpendicular to the hit direction in the floor plane. Rotating by a
/// negative fall angle about it tips the pin away from whatever struck it.
#[inline]
pub fn topple_axis(hit_direction: glam::Vec3) -> glam::Vec3 {
    glam::Vec3::new(hit_direction.z, 0.0, -hit_direction.x)
}
