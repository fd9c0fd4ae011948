//! Free-fly camera with optional ball follow
//!
//! Unlike the simulation, the camera integrates against real elapsed time:
//! follow speed depends on frame rate, ball speed does not.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::CAMERA_FOLLOW_STOP_Z;
use crate::sim::Ball;

const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 2.5, 8.0);
const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const MOVE_SPEED: f32 = 2.5;
const MOUSE_SENSITIVITY: f32 = 0.1;
const MAX_ZOOM: f32 = 45.0;
const MIN_ZOOM: f32 = 1.0;
const PITCH_LIMIT: f32 = 89.0;
/// Speed multiplier of the extra move made while the boost key is held
pub const BOOST_FACTOR: f32 = 5.0;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Keyboard movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMove {
    Forward,
    Backward,
    Left,
    Right,
}

/// Camera state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    world_up: Vec3,
    /// Degrees
    pub yaw: f32,
    /// Degrees, clamped to ±89
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    /// Glide forward with the ball
    pub follow_ball: bool,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FollowCamera {
    pub fn new(follow_ball: bool) -> Self {
        let mut camera = Self {
            position: DEFAULT_POSITION,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            zoom: MAX_ZOOM,
            follow_ball,
        };
        camera.update_vectors();
        camera
    }

    /// Move along the view axes for `dt` seconds
    pub fn process_move(&mut self, direction: CameraMove, dt: f32) {
        let velocity = MOVE_SPEED * dt;
        match direction {
            CameraMove::Forward => self.position += self.front * velocity,
            CameraMove::Backward => self.position -= self.front * velocity,
            CameraMove::Left => self.position -= self.right * velocity,
            CameraMove::Right => self.position += self.right * velocity,
        }
    }

    /// Mouse look (offsets in pixels, y up)
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch + y_offset * MOUSE_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Scroll zoom
    pub fn process_zoom(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Glide forward while following and the ball hasn't reached the rack
    ///
    /// Returns true if the camera moved.
    pub fn follow(&mut self, ball: &Ball, dt: f32) -> bool {
        if self.follow_ball && ball.pos.z > CAMERA_FOLLOW_STOP_Z {
            self.process_move(CameraMove::Forward, dt);
            true
        } else {
            false
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
