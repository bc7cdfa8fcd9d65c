//! Camera description, picking rays and the scroll-driven camera drive.

use chrono::NaiveDate;
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::Deserialize;

use crate::constants::{
    vec3, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, INTRO_CAMERA_EYE, INTRO_CAMERA_TARGET,
    INTRO_FLIGHT_SECS, LOOK_AHEAD_PROGRESS, PROGRESS_SMOOTHING, PROGRESS_SNAP_EPSILON,
    SCROLL_SENSITIVITY,
};
use crate::path::PathCurve;
use crate::story::StoryDataset;
use crate::temporal::parse_approx_date;
use crate::tween::{Easing, Tween};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: vec3(config.intro_eye),
            target: vec3(config.intro_target),
            up: Vec3::Y,
            aspect,
            fovy_radians: config.fov_degrees.to_radians(),
            znear: config.near,
            zfar: config.far,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.eye = pose.eye;
        self.target = pose.target;
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye,
            target: self.target,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward()
            .cross(self.up)
            .try_normalize()
            .unwrap_or(Vec3::X)
    }

    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// World-space picking ray through a point in normalised device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray {
            origin: self.eye,
            direction: (far - self.eye).try_normalize().unwrap_or(self.forward()),
        }
    }

    /// NDC of a world point, or `None` when it is behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Pixel position (origin top-left) to NDC (origin centre, y up).
#[inline]
pub fn pixel_to_ndc(px: Vec2, viewport: Vec2) -> Vec2 {
    let w = viewport.x.max(1.0);
    let h = viewport.y.max(1.0);
    Vec2::new(2.0 * px.x / w - 1.0, 1.0 - 2.0 * px.y / h)
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub scroll_sensitivity: f32,
    pub smoothing: f32,
    pub snap_epsilon: f32,
    pub look_ahead: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub intro_eye: [f32; 3],
    pub intro_target: [f32; 3],
    pub flight_secs: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scroll_sensitivity: SCROLL_SENSITIVITY,
            smoothing: PROGRESS_SMOOTHING,
            snap_epsilon: PROGRESS_SNAP_EPSILON,
            look_ahead: LOOK_AHEAD_PROGRESS,
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            intro_eye: INTRO_CAMERA_EYE,
            intro_target: INTRO_CAMERA_TARGET,
            flight_secs: INTRO_FLIGHT_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn intro(config: &CameraConfig) -> Self {
        Self {
            eye: vec3(config.intro_eye),
            target: vec3(config.intro_target),
        }
    }
}

/// Pose on the path at `progress`, looking `look_ahead` further along.
pub fn look_ahead_pose(curve: &PathCurve, progress: f32, look_ahead: f32) -> CameraPose {
    let progress = progress.clamp(0.0, 1.0);
    let eye = curve.point_at(progress);
    let mut target = curve.point_at((progress + look_ahead).min(1.0));
    // at the end of the path the look-ahead collapses onto the eye
    if target.distance_squared(eye) < 1e-10 {
        target = eye + curve.tangent_at(progress);
    }
    CameraPose { eye, target }
}

#[derive(Clone, Debug)]
struct Flight {
    eye: Tween<Vec3>,
    target: Tween<Vec3>,
}

/// Smoothed scroll progress along the path plus the one-off intro flight.
#[derive(Clone, Debug)]
pub struct CameraDrive {
    config: CameraConfig,
    progress: f32,
    target_progress: f32,
    flight: Option<Flight>,
}

impl CameraDrive {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            progress: 0.0,
            target_progress: 0.0,
            flight: None,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target_progress(&self) -> f32 {
        self.target_progress
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Scroll input; ignored while the intro flight runs.
    pub fn on_scroll(&mut self, delta_y: f32) {
        if self.flight.is_some() || delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        self.target_progress =
            (self.target_progress + delta_y.signum() * self.config.scroll_sensitivity).clamp(0.0, 1.0);
    }

    /// One smoothing step towards the target progress.
    pub fn step(&mut self) -> f32 {
        let diff = self.target_progress - self.progress;
        self.progress = if diff.abs() < self.config.snap_epsilon {
            self.target_progress
        } else {
            self.progress + diff * self.config.smoothing
        }
        .clamp(0.0, 1.0);
        self.progress
    }

    pub fn pose(&self, curve: &PathCurve) -> CameraPose {
        look_ahead_pose(curve, self.progress, self.config.look_ahead)
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.target_progress = 0.0;
        self.flight = None;
    }

    /// Starts the intro flight from `from` to the start of the path.
    pub fn begin_flight(&mut self, from: CameraPose, curve: &PathCurve) {
        let to = look_ahead_pose(curve, 0.0, self.config.look_ahead);
        let secs = self.config.flight_secs;
        self.flight = Some(Flight {
            eye: Tween::new(from.eye, to.eye, secs, Easing::InOutSine),
            target: Tween::new(from.target, to.target, secs, Easing::InOutSine),
        });
    }

    /// Per active frame: either the flight pose or the smoothed path pose.
    pub fn update(&mut self, dt: f32, curve: &PathCurve) -> CameraPose {
        if let Some(flight) = self.flight.as_mut() {
            let pose = CameraPose {
                eye: flight.eye.advance(dt),
                target: flight.target.advance(dt),
            };
            if flight.eye.is_finished() {
                self.flight = None;
                self.progress = 0.0;
                self.target_progress = 0.0;
            }
            return pose;
        }
        self.step();
        self.pose(curve)
    }

    /// Date shown for the current position along the journey.
    pub fn journey_date(&self, dataset: &StoryDataset, today: NaiveDate) -> NaiveDate {
        journey_date(dataset, self.progress, today)
    }
}

pub fn journey_date(dataset: &StoryDataset, progress: f32, today: NaiveDate) -> NaiveDate {
    let parsed = dataset
        .index_at_progress(progress)
        .and_then(|i| dataset.get(i))
        .and_then(|e| parse_approx_date(&e.date));
    match parsed {
        Some(date) if date < today => date,
        _ if progress >= 1.0 => today,
        Some(date) => date,
        None => today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_sphere_in_front() {
        let t = ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
        assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn centre_ray_points_forward() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert!(ray.direction.distance(camera.forward()) < 1e-4);
        assert_eq!(pixel_to_ndc(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0)), Vec2::ZERO);
    }

    #[test]
    fn projection_round_trips_the_target() {
        let camera = Camera::new(&CameraConfig::default(), 1.5);
        let ndc = camera.project(camera.target).unwrap();
        assert!(ndc.length() < 1e-4);
        assert!(camera.project(camera.eye - camera.forward() * 5.0).is_none());
    }

    #[test]
    fn scroll_is_ignored_during_flight() {
        let curve = PathCurve::fallback();
        let mut drive = CameraDrive::new(CameraConfig::default());
        drive.begin_flight(CameraPose::intro(drive.config()), &curve);
        drive.on_scroll(100.0);
        assert_eq!(drive.target_progress(), 0.0);
        let mut pose = drive.update(0.0, &curve);
        assert_eq!(pose.eye, Vec3::new(0.0, 5.0, 15.0));
        for _ in 0..300 {
            pose = drive.update(1.0 / 60.0, &curve);
        }
        assert!(!drive.is_flying());
        assert_eq!(pose.eye, curve.point_at(0.0));
        drive.on_scroll(100.0);
        assert!(drive.target_progress() > 0.0);
    }
}
