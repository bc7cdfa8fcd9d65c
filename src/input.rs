use glam::Vec2;

/// Pointer position relative to the canvas, in CSS pixels.
#[inline]
pub fn client_to_canvas(client: Vec2, rect_origin: Vec2) -> Vec2 {
    client - rect_origin
}

/// Wheel delta normalised to pixels. `delta_mode` follows the DOM constants:
/// 0 pixels, 1 lines, 2 pages.
#[inline]
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32, page_height: f32) -> f32 {
    let dy = delta_y as f32;
    match delta_mode {
        1 => dy * 16.0,
        2 => dy * page_height.max(1.0),
        _ => dy,
    }
}

/// Backing-store size for a canvas of `css` size at `dpr`.
#[inline]
pub fn backing_size(css: Vec2, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let w = (css.x as f64 * dpr).round().max(1.0) as u32;
    let h = (css.y as f64 * dpr).round().max(1.0) as u32;
    (w, h)
}

/// Index stored on a carousel dot, if the attribute parses.
#[inline]
pub fn parse_dot_index(attr: Option<&str>) -> Option<usize> {
    attr.and_then(|s| s.trim().parse().ok())
}
