// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn client_position_is_relative_to_the_canvas() {
    let p = client_to_canvas(Vec2::new(130.0, 75.0), Vec2::new(30.0, 25.0));
    assert_eq!(p, Vec2::new(100.0, 50.0));
}

#[test]
fn wheel_pixels_pass_through() {
    assert_eq!(wheel_delta_px(-120.0, 0, 800.0), -120.0);
}

#[test]
fn wheel_lines_and_pages_are_scaled() {
    assert_eq!(wheel_delta_px(3.0, 1, 800.0), 48.0);
    assert_eq!(wheel_delta_px(-1.0, 2, 800.0), -800.0);
    // degenerate page height still keeps the sign
    assert_eq!(wheel_delta_px(1.0, 2, 0.0), 1.0);
}

#[test]
fn backing_size_scales_by_device_pixel_ratio() {
    assert_eq!(backing_size(Vec2::new(800.0, 600.0), 2.0), (1600, 1200));
    assert_eq!(backing_size(Vec2::new(333.0, 200.0), 1.5), (500, 300));
}

#[test]
fn backing_size_survives_bad_ratios_and_empty_canvases() {
    assert_eq!(backing_size(Vec2::new(640.0, 480.0), 0.0), (640, 480));
    assert_eq!(backing_size(Vec2::new(640.0, 480.0), f64::NAN), (640, 480));
    assert_eq!(backing_size(Vec2::ZERO, 2.0), (1, 1));
}

#[test]
fn dot_index_parses_attribute() {
    assert_eq!(parse_dot_index(Some("2")), Some(2));
    assert_eq!(parse_dot_index(Some(" 0 ")), Some(0));
    assert_eq!(parse_dot_index(Some("x")), None);
    assert_eq!(parse_dot_index(Some("-1")), None);
    assert_eq!(parse_dot_index(None), None);
}
