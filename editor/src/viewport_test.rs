#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point
// =============================================================

#[test]
fn point_new_and_default() {
    let p = Point::new(3.0, -4.5);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, -4.5);
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

// =============================================================
// Viewport conversions
// =============================================================

#[test]
fn default_viewport_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.device_to_scene(Point::new(40.0, 25.0)), Point::new(40.0, 25.0));
}

#[test]
fn device_to_scene_divides_by_scale() {
    let vp = Viewport::new(3.0);
    assert_eq!(vp.device_to_scene(Point::new(48.0, 30.0)), Point::new(16.0, 10.0));
}

#[test]
fn fractional_scale_grows_scene_coords() {
    let vp = Viewport::new(0.5);
    assert_eq!(vp.device_to_scene(Point::new(10.0, 7.0)), Point::new(20.0, 14.0));
}

#[test]
fn scene_to_device_inverts_device_to_scene() {
    let vp = Viewport::new(4.0);
    let scene = Point::new(12.5, 7.25);
    assert_eq!(vp.device_to_scene(vp.scene_to_device(scene)), scene);
}

// =============================================================
// determine_scale
// =============================================================

#[test]
fn scale_exact_fit_is_integer() {
    assert_eq!(determine_scale(640.0, 360.0), 2.0);
}

#[test]
fn scale_floors_wide_container() {
    assert_eq!(determine_scale(1000.0, 1000.0), 3.0);
}

#[test]
fn scale_steps_down_when_height_overflows() {
    // 960 / 320 = 3, but 180 * 3 = 540 > 400.
    assert_eq!(determine_scale(960.0, 400.0), 2.0);
}

#[test]
fn scale_three_quarters_band() {
    assert_eq!(determine_scale(300.0, 300.0), 0.75);
}

#[test]
fn scale_half_band() {
    assert_eq!(determine_scale(200.0, 200.0), 0.5);
}

#[test]
fn scale_quarter_floor() {
    assert_eq!(determine_scale(100.0, 100.0), 0.25);
    assert_eq!(determine_scale(0.0, 0.0), 0.25);
}

#[test]
fn scale_step_down_from_one_falls_into_quarter() {
    // 320 wide gives 1×, but 180 > 100 tall steps it down to 0 → 0.25.
    assert_eq!(determine_scale(320.0, 100.0), 0.25);
}

#[test]
fn for_container_uses_determine_scale() {
    assert_eq!(Viewport::for_container(640.0, 360.0).scale, 2.0);
}

// =============================================================
// Rounding and snapping
// =============================================================

#[test]
fn round_half_up_matches_browser_rounding() {
    assert_eq!(round_half_up(1.5), 2.0);
    assert_eq!(round_half_up(1.25), 1.0);
    assert_eq!(round_half_up(0.4375), 0.0);
    assert_eq!(round_half_up(-1.5), -1.0);
    assert_eq!(round_half_up(-1.6), -2.0);
    assert_eq!(round_half_up(-0.5), 0.0);
}

#[test]
fn snap_rounds_to_nearest_tile() {
    assert_eq!(snap_point(Point::new(24.0, 7.0), 16), Point::new(32.0, 0.0));
}

#[test]
fn snap_rounds_up_small_remainders_past_half() {
    assert_eq!(snap_point(Point::new(20.0, 10.0), 16), Point::new(16.0, 16.0));
}

#[test]
fn snap_keeps_multiples() {
    assert_eq!(snap(48.0, 16), 48.0);
    assert_eq!(snap(0.0, 16), 0.0);
}

#[test]
fn snap_negative_half_rounds_towards_positive() {
    assert_eq!(snap(-24.0, 16), -16.0);
    assert_eq!(snap(-25.0, 16), -32.0);
}

#[test]
fn snap_zero_tile_is_identity() {
    assert_eq!(snap(13.7, 0), 13.7);
}
