//! Model transforms for whoever draws the roll
//!
//! Pull-based: the renderer asks for a matrix per entity each frame. Pins
//! pop up slightly once struck; that lift is visual only and never feeds
//! back into collision positions.

use glam::{Mat4, Quat, Vec3};

use super::state::{Ball, Pin};
use crate::consts::*;
use crate::topple_axis;

/// Ball rolling orientation (about Z, by the accumulated spin angle)
pub fn ball_orientation(ball: &Ball) -> Quat {
    Quat::from_rotation_z(ball.spin_angle.z.to_radians())
}

/// Pin tilt toward the direction it was knocked
pub fn pin_orientation(pin: &Pin) -> Quat {
    let axis = topple_axis(pin.hit_direction);
    if !pin.hit || axis.length_squared() == 0.0 {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis.normalize(), pin.fall_angle.to_radians())
}

/// Ball model matrix: scale, place, lift onto the lane, roll
pub fn ball_model(ball: &Ball) -> Mat4 {
    Mat4::from_scale(Vec3::splat(MODEL_SCALE))
        * Mat4::from_translation(ball.pos)
        * Mat4::from_translation(Vec3::new(0.0, BALL_LIFT, 0.0))
        * Mat4::from_quat(ball_orientation(ball))
}

/// Pin model matrix: scale, place, pop up if struck, tilt
pub fn pin_model(pin: &Pin) -> Mat4 {
    let mut model =
        Mat4::from_scale(Vec3::splat(MODEL_SCALE)) * Mat4::from_translation(pin.position());
    if pin.hit {
        model *= Mat4::from_translation(Vec3::new(0.0, PIN_POP_LIFT, 0.0));
    }
    model * Mat4::from_quat(pin_orientation(pin))
}

/// Model matrices for the whole rack, in pin order
pub fn rack_models(pins: &[Pin]) -> Vec<Mat4> {
    pins.iter().map(pin_model).collect()
}
