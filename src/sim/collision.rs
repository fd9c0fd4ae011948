//! Collision detection between the ball and pins
//!
//! Pure distance-threshold tests. With ten pins a pairwise scan per frame is
//! all that is needed; no broad phase.

use glam::Vec3;

use super::state::Pin;

/// Ball strikes `pin` if it is within `reach` and the pin is still standing
///
/// `reach` is half the pin spacing plus a small margin
/// (`RollSettings::ball_hit_distance`).
#[inline]
pub fn ball_pin_hit(ball_pos: Vec3, pin: &Pin, reach: f32) -> bool {
    !pin.hit && ball_pos.distance(pin.position()) <= reach
}

/// Fallen pin `source` strikes `target` if they are distinct pins within
/// `reach` and `target` has not been hit yet
///
/// `reach` is the pin spacing plus a small margin
/// (`RollSettings::pin_hit_distance`).
#[inline]
pub fn pin_pin_hit(source: &Pin, target: &Pin, reach: f32) -> bool {
    source.hit_complete
        && source.index != target.index
        && !target.hit
        && source.position().distance(target.position()) <= reach
}
