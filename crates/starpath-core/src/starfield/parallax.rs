use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::Deserialize;

use crate::constants::{
    hex_rgb, PARALLAX_COLOR_VARIANCE, PARALLAX_DENSITY, PARALLAX_MIN_SEGMENT_LENGTH,
    PARALLAX_MIN_STARS_PER_SEGMENT, PARALLAX_OPACITY, PARALLAX_PADDING, PARALLAX_POINT_SIZE,
    PARALLAX_RENDER_ORDER, PARALLAX_SPREAD_RADIUS, PARALLAX_TINT,
};
use crate::scene::{CloudLayer, PointCloud, StarVertex, TextureSlot};

use super::jittered_color;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxConfig {
    pub density: f32,
    pub spread_radius: f32,
    pub point_size: f32,
    pub padding: f32,
    pub tint: [f32; 3],
    pub color_variance: f32,
    pub min_stars_per_segment: usize,
    pub min_segment_length: f32,
    pub opacity: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            density: PARALLAX_DENSITY,
            spread_radius: PARALLAX_SPREAD_RADIUS,
            point_size: PARALLAX_POINT_SIZE,
            padding: PARALLAX_PADDING,
            tint: hex_rgb(PARALLAX_TINT),
            color_variance: PARALLAX_COLOR_VARIANCE,
            min_stars_per_segment: PARALLAX_MIN_STARS_PER_SEGMENT,
            min_segment_length: PARALLAX_MIN_SEGMENT_LENGTH,
            opacity: PARALLAX_OPACITY,
        }
    }
}

/// Two unit vectors spanning the plane perpendicular to `dir`.
pub fn perpendicular_basis(dir: Vec3) -> (Vec3, Vec3) {
    let reference = if dir.y.abs() > 0.99 { Vec3::X } else { Vec3::Y };
    let perp1 = dir.cross(reference).normalize_or_zero();
    let perp2 = dir.cross(perp1).normalize_or_zero();
    (perp1, perp2)
}

/// Straight segments the belt is laid along, padding included.
pub fn belt_segments(positions: &[Vec3], config: &ParallaxConfig) -> Vec<(Vec3, Vec3)> {
    let mut segments = Vec::with_capacity(positions.len() + 1);
    if positions.len() < 2 {
        return segments;
    }
    let first = positions[0];
    let last = positions[positions.len() - 1];
    if let Some(dir) = (positions[1] - first).try_normalize() {
        segments.push((first - dir * config.padding, first));
    }
    segments.extend(positions.windows(2).map(|w| (w[0], w[1])));
    if let Some(dir) = (last - positions[positions.len() - 2]).try_normalize() {
        segments.push((last, last + dir * config.padding));
    }
    segments
        .into_iter()
        .filter(|(a, b)| a.distance(*b) > config.min_segment_length)
        .collect()
}

pub fn stars_for_length(length: f32, config: &ParallaxConfig) -> usize {
    ((length * config.density).floor() as usize).max(config.min_stars_per_segment)
}

/// Belt of stars hugging the camera path. `None` with fewer than two events.
pub fn generate_parallax_belt<R: Rng + ?Sized>(
    positions: &[Vec3],
    config: &ParallaxConfig,
    rng: &mut R,
) -> Option<PointCloud> {
    if positions.len() < 2 {
        log::warn!(
            "[starfield] parallax belt needs at least 2 events, got {}; skipping",
            positions.len()
        );
        return None;
    }
    let mut stars = Vec::new();
    for (start, end) in belt_segments(positions, config) {
        let length = start.distance(end);
        let dir = (end - start) / length;
        let (perp1, perp2) = perpendicular_basis(dir);
        for _ in 0..stars_for_length(length, config) {
            let along = start + (end - start) * rng.gen::<f32>();
            let angle = rng.gen::<f32>() * TAU;
            let radius = rng.gen::<f32>() * config.spread_radius;
            let offset = (perp1 * angle.cos() + perp2 * angle.sin()) * radius;
            stars.push(StarVertex {
                position: (along + offset).to_array(),
                color: jittered_color(config.tint, config.color_variance, rng),
            });
        }
    }
    log::info!("[starfield] parallax belt with {} stars", stars.len());
    Some(PointCloud {
        layer: CloudLayer::Parallax,
        stars,
        point_size: config.point_size,
        opacity: config.opacity,
        texture: TextureSlot::BackgroundStar,
        render_order: PARALLAX_RENDER_ORDER,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal_even_when_vertical() {
        for dir in [Vec3::Y, Vec3::NEG_Y, Vec3::NEG_Z, Vec3::new(1.0, 1.0, 0.0).normalize()] {
            let (a, b) = perpendicular_basis(dir);
            assert!((a.length() - 1.0).abs() < 1e-5);
            assert!((b.length() - 1.0).abs() < 1e-5);
            assert!(a.dot(dir).abs() < 1e-5);
            assert!(b.dot(dir).abs() < 1e-5);
            assert!(a.dot(b).abs() < 1e-5);
        }
    }

    #[test]
    fn coincident_events_are_skipped() {
        let config = ParallaxConfig::default();
        let pts = [Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0)];
        let segs = belt_segments(&pts, &config);
        // no leading pad (zero direction), zero-length middle segment dropped
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn belt_sits_below_the_galaxy() {
        use crate::starfield::GalaxyConfig;
        use rand::{rngs::StdRng, SeedableRng};

        let config = ParallaxConfig::default();
        let pts = [Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0)];
        let belt = generate_parallax_belt(&pts, &config, &mut StdRng::seed_from_u64(1));
        let belt = belt.expect("two events make a belt");
        assert_eq!(belt.opacity, 0.9);
        assert!(belt.opacity < GalaxyConfig::default().opacity);
    }
}
