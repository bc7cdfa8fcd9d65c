//! Open Catmull-Rom spline through the story event positions.
//!
//! Progress maps uniformly onto segments, so `i / (N - 1)` lands exactly on
//! the i-th event position. The ends are extended with mirrored phantom
//! points.

use glam::Vec3;
use serde::Deserialize;

use crate::constants::{vec3, FALLBACK_PATH_END, FALLBACK_PATH_START, KNOT_SNAP_EPSILON, PATH_TENSION};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveKind {
    CatmullRom { tension: f32 },
    Centripetal,
    Chordal,
}

impl Default for CurveKind {
    fn default() -> Self {
        CurveKind::CatmullRom {
            tension: PATH_TENSION,
        }
    }
}

/// Cubic Hermite polynomial with vector coefficients.
#[derive(Clone, Copy, Debug)]
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32) -> Self {
        Self::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
    }

    /// Non-uniform variant; `pow` is applied to squared distances.
    fn nonuniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, pow: f32) -> Self {
        let mut dt0 = p0.distance_squared(p1).powf(pow);
        let mut dt1 = p1.distance_squared(p2).powf(pow);
        let mut dt2 = p2.distance_squared(p3).powf(pow);
        // coincident points
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }
        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        Self::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, t: f32) -> Vec3 {
        ((self.c3 * t + self.c2) * t + self.c1) * t + self.c0
    }

    fn derivative(&self, t: f32) -> Vec3 {
        (3.0 * self.c3 * t + 2.0 * self.c2) * t + self.c1
    }
}

enum Location {
    Knot(usize),
    Segment(usize, f32),
}

#[derive(Clone, Debug)]
pub struct PathCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    fallback: bool,
}

impl PathCurve {
    /// Builds the camera path. Fewer than two usable points gives the
    /// fallback straight path.
    pub fn build(points: &[Vec3], kind: CurveKind) -> Self {
        let usable: Vec<Vec3> = points.iter().copied().filter(|p| p.is_finite()).collect();
        if usable.len() < 2 {
            log::warn!(
                "[path] need at least 2 points for a path, got {}; using fallback",
                usable.len()
            );
            return Self::fallback();
        }
        Self {
            points: usable,
            kind,
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            points: vec![vec3(FALLBACK_PATH_START), vec3(FALLBACK_PATH_END)],
            kind: CurveKind::default(),
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Progress at which the curve passes through `points()[index]`.
    pub fn knot_progress(&self, index: usize) -> f32 {
        (index.min(self.segment_count()) as f32 / self.segment_count() as f32).clamp(0.0, 1.0)
    }

    pub fn point_at(&self, progress: f32) -> Vec3 {
        match self.locate(progress) {
            Location::Knot(i) => self.points[i],
            Location::Segment(i, t) => self.segment(i).eval(t),
        }
    }

    /// Unit tangent; never zero or non-finite.
    pub fn tangent_at(&self, progress: f32) -> Vec3 {
        let (i, t) = match self.locate(progress) {
            Location::Knot(i) if i == self.segment_count() => (i - 1, 1.0),
            Location::Knot(i) => (i, 0.0),
            Location::Segment(i, t) => (i, t),
        };
        self.segment(i)
            .derivative(t)
            .try_normalize()
            .or_else(|| (self.points[i + 1] - self.points[i]).try_normalize())
            .unwrap_or(Vec3::NEG_Z)
    }

    fn locate(&self, progress: f32) -> Location {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let segments = self.segment_count();
        let scaled = progress * segments as f32;
        let nearest = scaled.round();
        if (scaled - nearest).abs() <= KNOT_SNAP_EPSILON {
            return Location::Knot((nearest as usize).min(segments));
        }
        let index = (scaled.floor() as usize).min(segments - 1);
        Location::Segment(index, scaled - index as f32)
    }

    fn segment(&self, index: usize) -> Cubic {
        let pts = &self.points;
        let last = pts.len() - 1;
        let p1 = pts[index];
        let p2 = pts[index + 1];
        let p0 = if index > 0 {
            pts[index - 1]
        } else {
            2.0 * pts[0] - pts[1]
        };
        let p3 = if index + 2 <= last {
            pts[index + 2]
        } else {
            2.0 * pts[last] - pts[last - 1]
        };
        match self.kind {
            CurveKind::CatmullRom { tension } => Cubic::uniform(p0, p1, p2, p3, tension),
            CurveKind::Centripetal => Cubic::nonuniform(p0, p1, p2, p3, 0.25),
            CurveKind::Chordal => Cubic::nonuniform(p0, p1, p2, p3, 0.5),
        }
    }
}
