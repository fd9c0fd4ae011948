//! Hit response and pin toppling
//!
//! Deliberately simplified physics: the "fall speed" of a struck pin is the
//! contact distance, and the ball's loss of speed is a component-wise product
//! rather than a real momentum exchange.

use glam::Vec3;

use super::state::{Ball, Pin};
use crate::consts::*;

/// Apply a ball strike to `pin` and the matching kick-back to `ball`
pub fn resolve_ball_hit(ball: &mut Ball, pin: &mut Pin, pin_weight: f32) {
    let to_ball = ball.pos - pin.position();

    pin.hit = true;
    pin.hit_direction = to_ball.normalize_or_zero();
    pin.fall_speed = to_ball.length();

    if pin_weight / ball.weight >= BOUNCE_WEIGHT_RATIO {
        // Heavy pin: ball bounces straight back
        ball.vel = -ball.vel;
    } else {
        ball.vel -= pin_weight * (pin.hit_direction * ball.vel) / ball.weight;
    }
    ball.omega = ball.vel;
}

/// Knock `target` over with an already fallen `source` pin
///
/// The fall speed mixes the source's scalar fall speed with its position
/// vector (`|splat(speed) - pos|`). That makes chained pins fall almost
/// instantly; kept as is.
pub fn resolve_pin_hit(source: &Pin, target: &mut Pin) {
    let source_pos = source.position();

    target.hit = true;
    target.hit_direction = (source_pos - target.position()).normalize_or_zero();
    target.fall_speed = (Vec3::splat(source.fall_speed) - source_pos).length();
}

/// Result of advancing one pin's topple by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStep {
    /// Not hit, or done animating
    Idle,
    /// Tipped further
    Falling,
    /// Would have passed flat; clamped to -90
    Clamped,
    /// Crossed the completion threshold without clamping
    Completed,
}

/// Advance a struck pin's topple by one frame
///
/// While the angle is above -89.9 the pin slides one step along the floor
/// projection of its hit direction and tips by `fall_speed` degrees.
pub fn advance_fall(pin: &mut Pin) -> FallStep {
    if !pin.is_animating() {
        return FallStep::Idle;
    }

    pin.offset.x += pin.hit_direction.x;
    pin.offset.z += pin.hit_direction.z;

    let next = pin.fall_angle - pin.fall_speed;
    if next < FALL_FLAT_ANGLE {
        pin.fall_angle = FALL_FLAT_ANGLE;
        pin.hit_complete = true;
        FallStep::Clamped
    } else {
        pin.fall_angle = next;
        if pin.fall_angle < FALL_COMPLETE_ANGLE {
            pin.hit_complete = true;
            FallStep::Completed
        } else {
            FallStep::Falling
        }
    }
}
