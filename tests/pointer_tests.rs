//! Pointer & Input Tests
//!
//! Tests for:
//! - Viewport normalization (center, corners, outside, degenerate)
//! - Joint angles derived from the pointer
//! - InputBridge translation of raw events

use std::time::Duration;

use glam::Vec2;

use mutant_stage::input::{InputAction, InputBridge, InputEvent, JointAngles, TapSettings, Viewport};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn center_normalizes_to_zero() {
    let viewport = Viewport::new(800.0, 600.0);
    assert_eq!(viewport.normalize(Vec2::new(400.0, 300.0)), Vec2::ZERO);
}

#[test]
fn corners_normalize_to_unit() {
    let viewport = Viewport::new(800.0, 600.0);
    assert_eq!(viewport.normalize(Vec2::ZERO), Vec2::new(-1.0, -1.0));
    assert_eq!(viewport.normalize(Vec2::new(800.0, 600.0)), Vec2::new(1.0, 1.0));
    assert_eq!(viewport.normalize(Vec2::new(800.0, 0.0)), Vec2::new(1.0, -1.0));
}

#[test]
fn outside_positions_are_clamped() {
    let viewport = Viewport::new(800.0, 600.0);
    let n = viewport.normalize(Vec2::new(-500.0, 5000.0));
    assert_eq!(n, Vec2::new(-1.0, 1.0));
}

#[test]
fn zero_sized_viewport_is_neutral() {
    let viewport = Viewport::new(0.0, 0.0);
    assert_eq!(viewport.normalize(Vec2::new(12.0, 34.0)), Vec2::ZERO);
    assert!(approx(viewport.aspect(), 1.0));
}

#[test]
fn aspect_is_width_over_height() {
    assert!(approx(Viewport::new(1280.0, 720.0).aspect(), 16.0 / 9.0));
}

// ============================================================================
// Joint angles
// ============================================================================

#[test]
fn centered_pointer_gives_rest_angles() {
    let angles = JointAngles::from_pointer(Vec2::ZERO, 60.0);
    assert_eq!(angles, JointAngles::default());
}

#[test]
fn top_right_corner_reaches_the_limit() {
    let viewport = Viewport::new(800.0, 600.0);
    let angles = JointAngles::from_pointer(viewport.normalize(Vec2::new(800.0, 0.0)), 60.0);

    assert!(approx(angles.yaw_degrees(), 60.0));
    assert!(approx(angles.pitch_degrees(), -60.0));
}

#[test]
fn halfway_pointer_gives_half_the_limit() {
    let viewport = Viewport::new(800.0, 600.0);
    let angles = JointAngles::from_pointer(viewport.normalize(Vec2::new(200.0, 450.0)), 40.0);

    assert!(approx(angles.yaw_degrees(), -20.0));
    assert!(approx(angles.pitch_degrees(), 20.0));
}

#[test]
fn angles_never_exceed_the_limit() {
    let viewport = Viewport::new(640.0, 480.0);
    for x in (-200..=840).step_by(40) {
        for y in (-200..=680).step_by(40) {
            let n = viewport.normalize(Vec2::new(x as f32, y as f32));
            let angles = JointAngles::from_pointer(n, 60.0);
            assert!(angles.yaw_degrees().abs() <= 60.0 + EPSILON);
            assert!(angles.pitch_degrees().abs() <= 60.0 + EPSILON);
        }
    }

    // Out-of-range input is clamped too.
    let angles = JointAngles::from_pointer(Vec2::new(3.0, -7.0), 60.0);
    assert!(approx(angles.yaw_degrees(), 60.0));
    assert!(approx(angles.pitch_degrees(), -60.0));
}

// ============================================================================
// Input bridge
// ============================================================================

#[test]
fn pointer_move_steers() {
    let mut bridge = InputBridge::new(Viewport::new(800.0, 600.0), TapSettings::default());
    let action = bridge.translate(
        InputEvent::PointerMoved {
            position: Vec2::new(600.0, 300.0),
        },
        ms(0),
    );
    assert_eq!(action, Some(InputAction::Steer(Vec2::new(0.5, 0.0))));
}

#[test]
fn two_taps_request_a_switch() {
    let mut bridge = InputBridge::new(Viewport::new(800.0, 600.0), TapSettings::default());
    let position = Vec2::new(100.0, 100.0);

    assert_eq!(bridge.translate(InputEvent::PointerDown { position }, ms(0)), None);
    assert_eq!(bridge.translate(InputEvent::PointerUp { position }, ms(60)), None);
    assert_eq!(bridge.translate(InputEvent::PointerDown { position }, ms(180)), None);
    assert_eq!(
        bridge.translate(InputEvent::PointerUp { position }, ms(240)),
        Some(InputAction::SwitchAnimation)
    );
}

#[test]
fn host_double_tap_requests_a_switch() {
    let mut bridge = InputBridge::new(Viewport::new(800.0, 600.0), TapSettings::default());
    assert_eq!(
        bridge.translate(InputEvent::DoubleTap, ms(0)),
        Some(InputAction::SwitchAnimation)
    );
}

#[test]
fn resize_updates_the_viewport() {
    let mut bridge = InputBridge::new(Viewport::new(800.0, 600.0), TapSettings::default());
    let action = bridge.translate(
        InputEvent::Resized {
            width: 400.0,
            height: 400.0,
        },
        ms(0),
    );

    assert_eq!(action, Some(InputAction::Resize(Viewport::new(400.0, 400.0))));
    assert_eq!(bridge.viewport(), Viewport::new(400.0, 400.0));

    let steer = bridge.translate(
        InputEvent::PointerMoved {
            position: Vec2::new(400.0, 0.0),
        },
        ms(10),
    );
    assert_eq!(steer, Some(InputAction::Steer(Vec2::new(1.0, -1.0))));
}
