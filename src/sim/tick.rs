//! Per-frame simulation step
//!
//! Advances the roll by exactly one frame. The ball moves by its velocity
//! every step regardless of wall-clock time; only the camera uses real
//! elapsed time.

use std::f32::consts::PI;

use glam::Vec3;

use super::collision::{ball_pin_hit, pin_pin_hit};
use super::resolve::{FallStep, advance_fall, resolve_ball_hit, resolve_pin_hit};
use super::state::{ExitReason, SimEvent, SimulationState};
use crate::consts::*;

/// Advance the roll by one frame
///
/// Order within a frame:
/// 1. topple every struck pin one frame further
/// 2. roll the ball (spin angle, then position)
/// 3. ball against every pin
/// 4. fallen pins against standing pins
/// 5. lane-exit checks, with the hook applied in between
pub fn step(state: &mut SimulationState) {
    state.events.clear();
    state.frame += 1;

    advance_falls(state);

    if state.ball.active {
        let ball = &mut state.ball;
        ball.spin_angle += ball.omega;
        ball.pos += ball.vel;

        ball_pass(state);
    }

    pin_pass(state);

    if state.ball.active {
        check_lane_exit(state);
    }
}

/// Topple pass over all struck pins
fn advance_falls(state: &mut SimulationState) {
    for pin in &mut state.pins {
        if advance_fall(pin) == FallStep::Clamped {
            log::info!("PIN {} FALL COMPLETE", pin.index);
            state.events.push(SimEvent::PinFallComplete { pin: pin.index });
        }
    }
}

/// Ball against every standing pin, in rack order
fn ball_pass(state: &mut SimulationState) {
    let reach = state.settings.ball_hit_distance();
    let pin_weight = state.settings.pin_weight;

    for pin in &mut state.pins {
        if !ball_pin_hit(state.ball.pos, pin, reach) {
            continue;
        }
        resolve_ball_hit(&mut state.ball, pin, pin_weight);

        let pos = state.ball.pos;
        log::info!("BALL HITS PIN {} AT x: {} y: {} z: {}", pin.index, pos.x, pos.y, pos.z);
        state.events.push(SimEvent::BallHitPin {
            pin: pin.index,
            ball_pos: pos,
        });
    }
}

/// Every fallen pin against every standing pin
///
/// Index order, first source wins; a target knocked earlier in this pass is
/// skipped by later sources.
fn pin_pass(state: &mut SimulationState) {
    let reach = state.settings.pin_hit_distance();
    let count = state.pins.len();

    for i in 0..count {
        if !state.pins[i].hit_complete {
            continue;
        }
        for j in 0..count {
            if !pin_pin_hit(&state.pins[i], &state.pins[j], reach) {
                continue;
            }
            let source = state.pins[i].clone();
            let target = &mut state.pins[j];
            resolve_pin_hit(&source, target);

            let pos = target.position();
            log::info!(
                "PIN {} HITS PIN {} AT x: {} y: {} z: {}",
                i,
                j,
                pos.x,
                pos.y,
                pos.z
            );
            state.events.push(SimEvent::PinHitPin {
                source: i,
                target: j,
                target_pos: pos,
            });
        }
    }
}

/// End-of-roll checks
///
/// Rolling past the deck stops the ball without touching its velocity; the
/// lateral hook is then applied and a bounds check stops it for good,
/// zeroing velocity.
fn check_lane_exit(state: &mut SimulationState) {
    let settings = &state.settings;
    let ball = &mut state.ball;

    if ball.pos.z < LANE_END_Z {
        ball.deactivate(ExitReason::PastDeck);
    }

    ball.pos.x =
        settings.initial_x + settings.ball_spin * (PI * ball.pos.z / settings.ball_hit_at).sin();

    let reason = if ball.pos.x.abs() > GUTTER_X {
        Some(ExitReason::Gutter)
    } else if ball.pos.z < LANE_END_Z {
        Some(ExitReason::PastDeck)
    } else if ball.pos.z > FOUL_LINE_Z {
        Some(ExitReason::BehindFoulLine)
    } else {
        None
    };

    if let Some(reason) = reason {
        ball.deactivate(reason);
        ball.vel = Vec3::ZERO;
    }

    if !ball.active {
        let pos = ball.pos;
        let reason = ball.exit.unwrap_or(ExitReason::PastDeck);
        log::info!("Ball left the lane ({:?}) at x: {} z: {}", reason, pos.x, pos.z);
        state.events.push(SimEvent::BallLeftLane { pos, reason });
        report_layout(state);
    }
}

/// Log the pin layout once per roll; returns false if already logged
fn report_layout(state: &mut SimulationState) -> bool {
    if state.layout_reported {
        return false;
    }
    state.layout_reported = true;
    for pin in &state.pins {
        let pos = pin.position();
        log::info!("PIN {} x: {} y: {} z: {}", pin.index, pos.x, pos.y, pos.z);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RollSettings;
    use crate::sim::state::Pin;

    /// Straight roll with the rack pushed far beyond the lane end
    fn empty_lane() -> RollSettings {
        RollSettings {
            ball_spin: 0.0,
            pin_deck_z: 5000.0,
            ..Default::default()
        }
    }

    fn run(state: &mut SimulationState, frames: usize) {
        for _ in 0..frames {
            step(state);
        }
    }

    #[test]
    fn test_deck_end_exit_is_strict() {
        let mut state = SimulationState::new(empty_lane());

        run(&mut state, 150);
        assert_eq!(state.ball.pos, Vec3::new(0.0, 0.0, -1500.0));
        // Exit needs z < -1500: landing exactly on the deck end keeps the
        // ball rolling for one more step
        assert!(state.ball.active);
        assert!(!state.layout_reported);

        step(&mut state);
        assert!(!state.ball.active);
        assert_eq!(state.ball.exit, Some(ExitReason::PastDeck));
        assert_eq!(state.ball.vel, Vec3::ZERO);
        assert_eq!(state.ball.pos.z, -1510.0);
        assert!(matches!(
            state.events.last(),
            Some(SimEvent::BallLeftLane {
                reason: ExitReason::PastDeck,
                ..
            })
        ));

        // Final layout goes out with the exit, and only once
        assert!(state.layout_reported);
        assert!(!report_layout(&mut state));
        run(&mut state, 10);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_inactive_ball_is_frozen() {
        let mut state = SimulationState::new(empty_lane());
        run(&mut state, 151);
        let frozen = state.ball.clone();

        run(&mut state, 20);
        assert_eq!(state.ball, frozen);
        assert!(state.events.is_empty());
        assert_eq!(state.frame, 171);
    }

    #[test]
    fn test_hook_follows_sine() {
        let settings = RollSettings {
            pin_deck_z: 5000.0,
            ..Default::default()
        };
        let mut state = SimulationState::new(settings.clone());

        run(&mut state, 68);
        let z = state.ball.pos.z;
        assert_eq!(z, -680.0);
        let expected = settings.ball_spin * (PI * z / settings.ball_hit_at).sin();
        assert_eq!(state.ball.pos.x, expected);
        // Halfway to the break point the hook is at full amplitude
        assert!((state.ball.pos.x - -60.0).abs() < 1e-3);
    }

    #[test]
    fn test_gutter_exit_zeroes_velocity() {
        let settings = RollSettings {
            ball_spin: 200.0,
            pin_deck_z: 5000.0,
            ..Default::default()
        };
        let mut state = SimulationState::new(settings);

        run(&mut state, 200);
        assert!(!state.ball.active);
        assert_eq!(state.ball.exit, Some(ExitReason::Gutter));
        assert_eq!(state.ball.vel, Vec3::ZERO);
        assert!(state.ball.pos.x.abs() > GUTTER_X);
    }

    #[test]
    fn test_ball_behind_foul_line() {
        let settings = RollSettings {
            ball_spin: 0.0,
            ball_velocity: Vec3::new(0.0, 0.0, 11.0),
            ..Default::default()
        };
        let mut state = SimulationState::new(settings);

        step(&mut state);
        assert!(!state.ball.active);
        assert_eq!(state.ball.exit, Some(ExitReason::BehindFoulLine));
        assert_eq!(state.ball.vel, Vec3::ZERO);
    }

    #[test]
    fn test_default_roll_hits_head_pin_first() {
        let mut state = SimulationState::default();

        let mut first_hit = None;
        for _ in 0..300 {
            step(&mut state);
            if let Some(SimEvent::BallHitPin { pin, ball_pos }) = state
                .events
                .iter()
                .find(|e| matches!(e, SimEvent::BallHitPin { .. }))
                .cloned()
            {
                first_hit = Some((pin, ball_pos));
                break;
            }
        }

        let (pin, ball_pos) = first_hit.expect("ball should reach the rack");
        assert_eq!(pin, 9);
        let head = &state.pins[9];
        assert!(head.hit);
        assert!(ball_pos.distance(head.position()) <= 12.0);
        let expected = (ball_pos - head.position()).normalize();
        assert!((head.hit_direction - expected).length() < 1e-6);
        // Light pin slows the ball instead of bouncing it
        assert!(state.ball.vel.z > -10.0 && state.ball.vel.z < 0.0);
        assert_eq!(state.ball.omega, state.ball.vel);
    }

    #[test]
    fn test_ball_hits_pin_zero_when_aimed() {
        // Aim straight down the right side at pin 0 (30, 0, -1450)
        let settings = RollSettings {
            ball_spin: 0.0,
            initial_x: 30.0,
            ..Default::default()
        };
        let mut state = SimulationState::new(settings);

        let mut hit_frame = None;
        for frame in 1..=200 {
            step(&mut state);
            if state.pins[0].hit {
                hit_frame = Some(frame);
                break;
            }
        }

        assert!(hit_frame.is_some());
        let pin = &state.pins[0];
        let to_ball = state.ball.pos - pin.base;
        assert!(to_ball.length() <= 12.0);
        assert_eq!(pin.hit_direction, to_ball.normalize());
    }

    #[test]
    fn test_completed_pin_knocks_row_neighbour() {
        let mut state = SimulationState::new(empty_lane());
        {
            let a = &mut state.pins[1];
            a.hit = true;
            a.hit_complete = true;
            a.fall_angle = -90.0;
            a.fall_speed = 10.0;
        }

        step(&mut state);

        // Row neighbours 20 apart fall within the same frame
        assert!(state.pins[0].hit);
        assert!(state.pins[2].hit);
        // Diagonal and further pins stay standing
        assert!(!state.pins[3].hit);
        assert!(!state.pins[4].hit);
        assert!(state.events.iter().any(|e| matches!(
            e,
            SimEvent::PinHitPin {
                source: 1,
                target: 0,
                ..
            }
        )));
    }

    #[test]
    fn test_chain_reaction_spreads_along_row() {
        let mut state = SimulationState::new(empty_lane());
        {
            let a = &mut state.pins[0];
            a.hit = true;
            a.hit_complete = true;
            a.fall_angle = -90.0;
        }

        // Pin 1 is hit now, falls flat next frame (huge chained fall speed),
        // then knocks pin 2, which knocks pin 3.
        run(&mut state, 1);
        assert!(state.pins[1].hit);
        assert!(!state.pins[2].hit);

        run(&mut state, 1);
        assert!(state.pins[1].hit_complete);
        assert_eq!(state.pins[1].fall_angle, -90.0);
        assert!(state.pins[2].hit);
        // Overshooting flat clamps and reports it
        assert!(state.events.contains(&SimEvent::PinFallComplete { pin: 1 }));

        run(&mut state, 2);
        assert!(state.pins[3].hit);
    }

    #[test]
    fn test_first_source_wins() {
        let mut state = SimulationState::new(empty_lane());
        for i in [0, 2] {
            let p = &mut state.pins[i];
            p.hit = true;
            p.hit_complete = true;
            p.fall_angle = -90.0;
        }

        step(&mut state);

        let hits: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::PinHitPin { source, target, .. } => Some((*source, *target)),
                _ => None,
            })
            .collect();
        // Pin 1 sits between both; pin 0 scans first
        assert!(hits.contains(&(0, 1)));
        assert!(!hits.contains(&(2, 1)));
        assert!(hits.contains(&(2, 3)));
        assert_eq!(state.pins[1].hit_direction, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_pins_keep_falling_after_ball_stops() {
        let mut state = SimulationState::new(empty_lane());
        run(&mut state, 151);
        assert!(!state.ball.active);

        state.pins[5] = Pin {
            hit: true,
            fall_speed: 10.0,
            ..state.pins[5].clone()
        };
        assert!(!state.is_settled());

        run(&mut state, 9);
        assert!(state.pins[5].hit_complete);
        assert_eq!(state.pins[5].fall_angle, -90.0);
        // Row neighbours go down in the same frame
        assert!(state.pins[4].hit);
        assert!(state.pins[6].hit);
        assert!(state.pins_in_motion());
    }

    #[test]
    fn test_determinism() {
        let settings = RollSettings {
            ball_spin: -60.0,
            ball_hit_at: -1360.0,
            pin_spacing: 20.0,
            ..Default::default()
        };
        let mut state1 = SimulationState::new(settings.clone());
        let mut state2 = SimulationState::new(settings);

        for _ in 0..400 {
            step(&mut state1);
            step(&mut state2);
            assert_eq!(state1.ball, state2.ball);
            assert_eq!(state1.pins, state2.pins);
            assert_eq!(state1.events, state2.events);
        }
        assert_eq!(
            state1.ball.pos.to_array().map(f32::to_bits),
            state2.ball.pos.to_array().map(f32::to_bits)
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn roll_settings() -> impl Strategy<Value = RollSettings> {
            (
                -120.0f32..120.0,
                -2000.0f32..-500.0,
                8.0f32..40.0,
                -40.0f32..40.0,
                1.0f32..20.0,
                0.5f32..30.0,
            )
                .prop_map(|(spin, hit_at, spacing, x, speed, pin_weight)| RollSettings {
                    ball_spin: spin,
                    ball_hit_at: hit_at,
                    pin_spacing: spacing,
                    initial_x: x,
                    ball_velocity: Vec3::new(0.0, 0.0, -speed),
                    pin_weight,
                    ..Default::default()
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn pin_lifecycle_is_monotonic(settings in roll_settings()) {
                let mut state = SimulationState::new(settings);
                let mut prev = state.pins.clone();

                for _ in 0..400 {
                    step(&mut state);
                    for (before, after) in prev.iter().zip(&state.pins) {
                        prop_assert!(!before.hit || after.hit);
                        prop_assert!(!before.hit_complete || after.hit_complete);
                        prop_assert!(after.fall_angle <= before.fall_angle);
                        prop_assert!((-90.0..=0.0).contains(&after.fall_angle));
                        prop_assert!(!after.hit_complete || after.hit);
                        if after.hit_complete {
                            prop_assert!(after.fall_angle < FALL_COMPLETE_ANGLE);
                        }
                        if before.hit_complete {
                            prop_assert_eq!(after.offset, before.offset);
                        }
                        if !after.hit {
                            prop_assert_eq!(after.fall_angle, 0.0);
                        }
                    }
                    prev = state.pins.clone();
                }
            }

            #[test]
            fn ball_stops_only_out_of_bounds(settings in roll_settings()) {
                let mut state = SimulationState::new(settings);

                for _ in 0..400 {
                    let was_active = state.ball.active;
                    step(&mut state);
                    if was_active && !state.ball.active {
                        let pos = state.ball.pos;
                        prop_assert!(
                            pos.x.abs() > GUTTER_X || pos.z < LANE_END_Z || pos.z > FOUL_LINE_Z
                        );
                        prop_assert_eq!(state.ball.vel, Vec3::ZERO);
                    }
                    if state.ball.active {
                        let pos = state.ball.pos;
                        prop_assert!(pos.x.abs() <= GUTTER_X);
                        prop_assert!(pos.z >= LANE_END_Z && pos.z <= FOUL_LINE_Z);
                    }
                }
            }

            #[test]
            fn identical_settings_replay_identically(settings in roll_settings()) {
                let mut a = SimulationState::new(settings.clone());
                let mut b = SimulationState::new(settings);
                for _ in 0..300 {
                    step(&mut a);
                    step(&mut b);
                }
                prop_assert_eq!(a.ball, b.ball);
                prop_assert_eq!(a.pins, b.pins);
            }
        }
    }
}
