//! Deterministic simulation module
//!
//! All roll logic lives here. This module must be pure and deterministic:
//! - One fixed displacement per step, never wall-clock time
//! - No randomness
//! - Stable iteration order (rack index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pose;
pub mod resolve;
pub mod state;
pub mod tick;

pub use collision::{ball_pin_hit, pin_pin_hit};
pub use pose::{ball_model, ball_orientation, pin_model, pin_orientation, rack_models};
pub use resolve::{FallStep, advance_fall, resolve_ball_hit, resolve_pin_hit};
pub use state::{
    Ball, ExitReason, Pin, SimEvent, SimulationState, rack_positions, rack_step,
};
pub use tick::step;
