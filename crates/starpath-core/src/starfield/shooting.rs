use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::Deserialize;

use crate::camera::Camera;
use crate::constants::*;
use crate::scene::{Billboard, Facing, TextureSlot};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShootingStarConfig {
    pub min_delay_secs: f32,
    pub max_delay_secs: f32,
    pub spawn_distance: f32,
    pub spawn_distance_jitter: f32,
    pub frustum_fill: f32,
    pub travel: f32,
    pub travel_jitter: f32,
    pub forward_min: f32,
    pub forward_max: f32,
    pub scale: f32,
    pub scale_jitter: f32,
    pub lifetime_secs: f32,
    pub lifetime_jitter_secs: f32,
    pub peak_opacity: f32,
    pub fade_in: f32,
    pub fade_out: f32,
    pub color: [f32; 3],
    pub afterimage_every_ticks: u32,
    pub afterimage_min_opacity: f32,
    pub afterimage_scale: f32,
    pub afterimage_opacity: f32,
    pub afterimage_shrink: f32,
    pub afterimage_lifetime_secs: f32,
    pub afterimage_lifetime_jitter_secs: f32,
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: SHOOTING_MIN_DELAY_SECS,
            max_delay_secs: SHOOTING_MAX_DELAY_SECS,
            spawn_distance: SHOOTING_SPAWN_DISTANCE,
            spawn_distance_jitter: SHOOTING_SPAWN_DISTANCE_JITTER,
            frustum_fill: SHOOTING_FRUSTUM_FILL,
            travel: SHOOTING_TRAVEL,
            travel_jitter: SHOOTING_TRAVEL_JITTER,
            forward_min: SHOOTING_FORWARD_MIN,
            forward_max: SHOOTING_FORWARD_MAX,
            scale: SHOOTING_SCALE,
            scale_jitter: SHOOTING_SCALE_JITTER,
            lifetime_secs: SHOOTING_LIFETIME_SECS,
            lifetime_jitter_secs: SHOOTING_LIFETIME_JITTER_SECS,
            peak_opacity: SHOOTING_PEAK_OPACITY,
            fade_in: SHOOTING_FADE_IN,
            fade_out: SHOOTING_FADE_OUT,
            color: hex_rgb(SHOOTING_COLOR),
            afterimage_every_ticks: AFTERIMAGE_EVERY_TICKS,
            afterimage_min_opacity: AFTERIMAGE_MIN_OPACITY,
            afterimage_scale: AFTERIMAGE_SCALE,
            afterimage_opacity: AFTERIMAGE_OPACITY,
            afterimage_shrink: AFTERIMAGE_SHRINK,
            afterimage_lifetime_secs: AFTERIMAGE_LIFETIME_SECS,
            afterimage_lifetime_jitter_secs: AFTERIMAGE_LIFETIME_JITTER_SECS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShootingStar {
    pub start: Vec3,
    pub end: Vec3,
    pub base_scale: f32,
    pub rotation: f32,
    pub lifetime: f32,
    elapsed: f32,
    ticks: u32,
}

impl ShootingStar {
    /// Random streak somewhere inside the current view.
    pub fn spawn<R: Rng + ?Sized>(camera: &Camera, config: &ShootingStarConfig, rng: &mut R) -> Self {
        let forward = camera.forward();
        let right = camera.right();
        let up = camera.true_up();

        let distance = config.spawn_distance + rng.gen::<f32>() * config.spawn_distance_jitter;
        let view_h = 2.0 * (camera.fovy_radians * 0.5).tan() * distance;
        let view_w = view_h * camera.aspect;
        let x = (rng.gen::<f32>() - 0.5) * view_w * config.frustum_fill;
        let y = (rng.gen::<f32>() - 0.5) * view_h * config.frustum_fill;
        let start = camera.eye + forward * distance + right * x + up * y;

        let r = rng.gen_range(-1.0_f32..=1.0);
        let u = rng.gen_range(-1.0_f32..=1.0);
        let f = rng.gen_range(config.forward_min..=config.forward_max);
        let dir = (right * r + up * u + forward * f)
            .try_normalize()
            .unwrap_or(right);
        let travel = config.travel + rng.gen::<f32>() * config.travel_jitter;

        Self {
            start,
            end: start + dir * travel,
            base_scale: config.scale + rng.gen::<f32>() * config.scale_jitter,
            rotation: rng.gen::<f32>() * TAU,
            lifetime: (config.lifetime_secs + rng.gen::<f32>() * config.lifetime_jitter_secs)
                .max(f32::EPSILON),
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn position(&self) -> Vec3 {
        self.start.lerp(self.end, self.progress())
    }

    /// Fade in, hold at the peak, fade out.
    pub fn opacity(&self, config: &ShootingStarConfig) -> f32 {
        let u = self.progress();
        let peak = config.peak_opacity;
        let hold_end = 1.0 - config.fade_out;
        if u < config.fade_in {
            peak * u / config.fade_in
        } else if u < hold_end {
            peak
        } else {
            (peak * (1.0 - u) / config.fade_out).max(0.0)
        }
    }

    /// base -> 1.2 base at the midpoint -> 0.8 base at the end.
    pub fn scale(&self) -> f32 {
        let u = self.progress();
        let b = self.base_scale;
        if u < 0.5 {
            b + (1.2 * b - b) * (u / 0.5)
        } else {
            1.2 * b + (0.8 * b - 1.2 * b) * ((u - 0.5) / 0.5)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.lifetime
    }
}

#[derive(Clone, Debug)]
pub struct Afterimage {
    pub position: Vec3,
    pub start_scale: f32,
    pub start_opacity: f32,
    pub rotation: f32,
    pub lifetime: f32,
    elapsed: f32,
}

impl Afterimage {
    fn t(&self) -> f32 {
        (self.elapsed / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn opacity(&self) -> f32 {
        self.start_opacity * (1.0 - self.t())
    }

    pub fn scale(&self, shrink: f32) -> f32 {
        self.start_scale * (1.0 - self.t() * (1.0 - shrink))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.lifetime
    }
}

/// Every live shooting star and afterimage. Finished ones are dropped on
/// the tick they complete.
#[derive(Clone, Debug, Default)]
pub struct ShootingStarField {
    config: ShootingStarConfig,
    stars: Vec<ShootingStar>,
    afterimages: Vec<Afterimage>,
}

impl ShootingStarField {
    pub fn new(config: ShootingStarConfig) -> Self {
        Self {
            config,
            stars: Vec::new(),
            afterimages: Vec::new(),
        }
    }

    pub fn config(&self) -> &ShootingStarConfig {
        &self.config
    }

    pub fn spawn<R: Rng + ?Sized>(&mut self, camera: &Camera, rng: &mut R) {
        self.stars.push(ShootingStar::spawn(camera, &self.config, rng));
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn afterimages(&self) -> &[Afterimage] {
        &self.afterimages
    }

    pub fn is_idle(&self) -> bool {
        self.stars.is_empty() && self.afterimages.is_empty()
    }

    pub fn clear(&mut self) {
        self.stars.clear();
        self.afterimages.clear();
    }

    /// Advances everything by `dt`; returns how many objects were released.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> usize {
        let before = self.stars.len() + self.afterimages.len();

        for image in &mut self.afterimages {
            image.elapsed += dt;
        }
        self.afterimages.retain(|a| !a.is_finished());

        let cfg = &self.config;
        let every = cfg.afterimage_every_ticks.max(1);
        let mut spawned = 0;
        for star in &mut self.stars {
            star.elapsed += dt;
            star.ticks += 1;
            let opacity = star.opacity(cfg);
            if star.ticks % every == 0 && opacity > cfg.afterimage_min_opacity && !star.is_finished() {
                self.afterimages.push(Afterimage {
                    position: star.position(),
                    start_scale: star.scale() * cfg.afterimage_scale,
                    start_opacity: opacity * cfg.afterimage_opacity,
                    rotation: star.rotation,
                    lifetime: (cfg.afterimage_lifetime_secs
                        + rng.gen::<f32>() * cfg.afterimage_lifetime_jitter_secs)
                        .max(f32::EPSILON),
                    elapsed: 0.0,
                });
                spawned += 1;
            }
        }
        self.stars.retain(|s| !s.is_finished());

        (before + spawned).saturating_sub(self.stars.len() + self.afterimages.len())
    }

    pub fn draw(&self, out: &mut Vec<Billboard>) {
        let cfg = &self.config;
        out.extend(self.afterimages.iter().map(|a| {
            let s = a.scale(cfg.afterimage_shrink);
            Billboard {
                position: a.position,
                size: Vec2::splat(s),
                color: cfg.color,
                opacity: a.opacity(),
                rotation: a.rotation,
                texture: TextureSlot::Star,
                facing: Facing::Camera,
                render_order: AFTERIMAGE_RENDER_ORDER,
            }
        }));
        out.extend(self.stars.iter().map(|s| Billboard {
            position: s.position(),
            size: Vec2::splat(s.scale()),
            color: cfg.color,
            opacity: s.opacity(cfg),
            rotation: s.rotation,
            texture: TextureSlot::Star,
            facing: Facing::Camera,
            render_order: SHOOTING_RENDER_ORDER,
        }));
    }
}

/// What asked for a shooting star.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnTrigger {
    Schedule,
    Click,
}

/// Single cancelable repeating countdown; re-rolls its delay after each
/// firing. Starting again replaces whatever was pending.
#[derive(Clone, Debug)]
pub struct SpawnSchedule {
    min_delay: f32,
    max_delay: f32,
    remaining: Option<f32>,
}

impl SpawnSchedule {
    pub fn new(config: &ShootingStarConfig) -> Self {
        let min_delay = min_delay(config);
        let max_delay = if config.max_delay_secs.is_finite() {
            config.max_delay_secs.max(min_delay)
        } else {
            min_delay
        };
        Self {
            min_delay,
            max_delay,
            remaining: None,
        }
    }

    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max_delay > self.min_delay {
            rng.gen_range(self.min_delay..self.max_delay)
        } else {
            self.min_delay
        }
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining = Some(self.roll(rng));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Counts down by `dt`; returns whether it fired. Fires at most once per
    /// tick and then waits a freshly rolled delay, so overdue time is dropped.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let remaining = remaining - dt.max(0.0);
        if remaining > 0.0 {
            self.remaining = Some(remaining);
            return false;
        }
        self.remaining = Some(self.roll(rng));
        true
    }
}

fn min_delay(config: &ShootingStarConfig) -> f32 {
    if config.min_delay_secs.is_finite() {
        config.min_delay_secs.max(SHOOTING_DELAY_FLOOR_SECS)
    } else {
        SHOOTING_DELAY_FLOOR_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn opacity_profile() {
        let cfg = ShootingStarConfig::default();
        let mut star = ShootingStar::spawn(
            &Camera::new(&CameraConfig::default(), 1.0),
            &cfg,
            &mut StdRng::seed_from_u64(9),
        );
        star.lifetime = 4.0;
        star.elapsed = 0.2; // 5 %
        assert!((star.opacity(&cfg) - 0.475).abs() < 1e-4);
        star.elapsed = 2.0;
        assert_eq!(star.opacity(&cfg), 0.95);
        assert!((star.scale() - 1.2 * star.base_scale).abs() < 1e-4);
        star.elapsed = 4.0;
        assert!(star.opacity(&cfg).abs() < 1e-6);
        assert!((star.scale() - 0.8 * star.base_scale).abs() < 1e-4);
        assert!(star.position().distance(star.end) < 1e-4);
    }

    #[test]
    fn spawn_lands_in_front_of_the_camera() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let cfg = ShootingStarConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let s = ShootingStar::spawn(&camera, &cfg, &mut rng);
            let ahead = (s.start - camera.eye).dot(camera.forward());
            assert!((30.0..=40.0 + 1e-3).contains(&ahead), "ahead {ahead}");
            let travel = s.start.distance(s.end);
            assert!((50.0 - 1e-3..=110.0 + 1e-3).contains(&travel));
            assert!((3.0..=5.0).contains(&s.lifetime));
        }
    }

    #[test]
    fn schedule_fires_once_per_tick_and_rerolls() {
        let cfg = ShootingStarConfig {
            min_delay_secs: 1.0,
            max_delay_secs: 1.0,
            ..ShootingStarConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let mut schedule = SpawnSchedule::new(&cfg);
        assert!(!schedule.tick(10.0, &mut rng));
        schedule.start(&mut rng);
        assert!(!schedule.tick(0.5, &mut rng));
        assert!(schedule.tick(3.5, &mut rng));
        assert!((schedule.remaining().unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_delays_are_floored() {
        let cfg = ShootingStarConfig {
            min_delay_secs: 0.0,
            max_delay_secs: 0.0,
            ..ShootingStarConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut schedule = SpawnSchedule::new(&cfg);
        schedule.start(&mut rng);
        assert_eq!(schedule.remaining(), Some(SHOOTING_DELAY_FLOOR_SECS));
        assert!(schedule.tick(0.25, &mut rng));
        assert!(!schedule.tick(0.01, &mut rng));
    }
}
