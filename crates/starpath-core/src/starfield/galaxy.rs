use std::f32::consts::TAU;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::Rng;
use serde::Deserialize;

use crate::constants::{
    hex_rgb, GALAXY_BASE_RADIUS, GALAXY_COLOR_VARIANCE, GALAXY_OPACITY, GALAXY_POINT_SIZE,
    GALAXY_RADIUS_SPREAD, GALAXY_RENDER_ORDER, GALAXY_SPIN_X, GALAXY_SPIN_Y, GALAXY_STAR_COUNT,
    GALAXY_TINT,
};
use crate::scene::{CloudLayer, PointCloud, StarVertex, TextureSlot};

use super::jittered_color;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GalaxyConfig {
    pub star_count: usize,
    pub base_radius: f32,
    pub radius_spread: f32,
    pub tint: [f32; 3],
    pub color_variance: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub spin: [f32; 2],
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            star_count: GALAXY_STAR_COUNT,
            base_radius: GALAXY_BASE_RADIUS,
            radius_spread: GALAXY_RADIUS_SPREAD,
            tint: hex_rgb(GALAXY_TINT),
            color_variance: GALAXY_COLOR_VARIANCE,
            point_size: GALAXY_POINT_SIZE,
            opacity: GALAXY_OPACITY,
            spin: [GALAXY_SPIN_X, GALAXY_SPIN_Y],
        }
    }
}

/// Spherical shell of background stars centred on the origin.
pub fn generate_galaxy<R: Rng + ?Sized>(config: &GalaxyConfig, rng: &mut R) -> PointCloud {
    let stars = (0..config.star_count)
        .map(|_| {
            let radius = config.base_radius + rng.gen::<f32>() * config.radius_spread;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            let theta = TAU * rng.gen::<f32>();
            let position = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            );
            StarVertex {
                position: position.to_array(),
                color: jittered_color(config.tint, config.color_variance, rng),
            }
        })
        .collect();
    PointCloud {
        layer: CloudLayer::Galaxy,
        stars,
        point_size: config.point_size,
        opacity: config.opacity,
        texture: TextureSlot::BackgroundStar,
        render_order: GALAXY_RENDER_ORDER,
    }
}

/// Slow spin of the galaxy shell, recentred on the camera so it never
/// drifts out of reach.
#[derive(Clone, Debug, Default)]
pub struct GalaxyState {
    pub rotation: Vec2,
    pub center: Vec3,
    spin: Vec2,
}

impl GalaxyState {
    pub fn new(config: &GalaxyConfig) -> Self {
        Self {
            rotation: Vec2::ZERO,
            center: Vec3::ZERO,
            spin: Vec2::from_array(config.spin),
        }
    }

    pub fn spin(&mut self) {
        self.rotation += self.spin;
    }

    pub fn recenter(&mut self, camera_eye: Vec3) {
        self.center = camera_eye;
    }

    pub fn model(&self) -> Mat4 {
        let rot = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0);
        Mat4::from_rotation_translation(rot, self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn stars_stay_inside_the_shell() {
        let config = GalaxyConfig {
            star_count: 2_000,
            ..GalaxyConfig::default()
        };
        let cloud = generate_galaxy(&config, &mut StdRng::seed_from_u64(7));
        assert_eq!(cloud.len(), 2_000);
        assert_eq!(cloud.render_order, -2);
        for star in &cloud.stars {
            let r = Vec3::from_array(star.position).length();
            assert!(r >= 300.0 - 1e-2 && r <= 600.0 + 1e-2, "radius {r}");
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let config = GalaxyConfig {
            star_count: 50,
            ..GalaxyConfig::default()
        };
        let a = generate_galaxy(&config, &mut StdRng::seed_from_u64(1));
        let b = generate_galaxy(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.stars, b.stars);
    }

    #[test]
    fn spin_accumulates_and_follows_camera() {
        let mut g = GalaxyState::new(&GalaxyConfig::default());
        for _ in 0..10 {
            g.spin();
        }
        assert!((g.rotation.y - 0.0005).abs() < 1e-7);
        g.recenter(Vec3::new(1.0, 2.0, 3.0));
        let origin = g.model().transform_point3(Vec3::ZERO);
        assert!(origin.distance(Vec3::new(1.0, 2.0, 3.0)) < 1e-5);
    }
}
