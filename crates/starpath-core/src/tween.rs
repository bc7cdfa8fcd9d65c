//! Interpolate-a-value-over-time capability: easing curves, one-shot tweens
//! and looping pulses. Everything is advanced by frame `dt` in seconds.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    OutQuad,
    InOutQuad,
    InOutSine,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::OutQuad => t * (2.0 - t),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::InOutSine => -0.5 * ((PI * t).cos() - 1.0),
        }
    }
}

pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// A finished tween resting at `value`.
    pub fn settled(value: T) -> Self {
        Self::new(value, value, 0.0, Easing::Linear)
    }

    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from.lerp_to(self.to, t)
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: f32) -> T {
        if !self.is_finished() {
            self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        }
        self.value()
    }

    /// Restarts towards `to` from wherever the value currently is.
    pub fn retarget(&mut self, to: T, duration: f32, easing: Easing) {
        *self = Self::new(self.value(), to, duration, easing);
    }
}

/// Infinite alternating oscillation between `low` and `high`, after an
/// initial delay spent at `low`.
#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    low: f32,
    high: f32,
    half_period: f32,
    delay: f32,
    elapsed: f32,
    easing: Easing,
}

impl Pulse {
    pub fn new(low: f32, high: f32, half_period: f32, delay: f32, easing: Easing) -> Self {
        Self {
            low,
            high,
            half_period: half_period.max(f32::EPSILON),
            delay: delay.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn is_started(&self) -> bool {
        self.elapsed > self.delay
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        // keep the accumulator bounded; a full cycle is two half periods
        let cycle = 2.0 * self.half_period;
        if self.elapsed > self.delay + cycle {
            self.elapsed = self.delay + (self.elapsed - self.delay) % cycle;
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.elapsed < self.delay {
            return self.low;
        }
        let t = (self.elapsed - self.delay) / self.half_period;
        let leg = t.floor();
        let frac = t - leg;
        let phase = if (leg as u64) % 2 == 0 { frac } else { 1.0 - frac };
        self.low + (self.high - self.low) * self.easing.apply(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for e in [
            Easing::Linear,
            Easing::OutQuad,
            Easing::InOutQuad,
            Easing::InOutSine,
        ] {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?}");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?}");
        }
        assert!((Easing::InOutSine.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::OutQuad.apply(0.5) > 0.5);
    }

    #[test]
    fn tween_reaches_target_and_stops() {
        let mut t = Tween::new(0.0_f32, 10.0, 0.15, Easing::OutQuad);
        let mid = t.advance(0.075);
        assert!(mid > 5.0 && mid < 10.0);
        assert_eq!(t.advance(1.0), 10.0);
        assert!(t.is_finished());
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut t = Tween::new(Vec2::ZERO, Vec2::splat(2.0), 1.0, Easing::Linear);
        t.advance(0.5);
        t.retarget(Vec2::ZERO, 1.0, Easing::Linear);
        assert_eq!(t.value(), Vec2::splat(1.0));
        assert_eq!(t.target(), Vec2::ZERO);
    }

    #[test]
    fn pulse_alternates_after_delay() {
        let mut p = Pulse::new(0.3, 1.0, 2.5, 0.1, Easing::InOutSine);
        assert_eq!(p.advance(0.05), 0.3);
        assert!((p.advance(0.05 + 2.5) - 1.0).abs() < 1e-4);
        assert!((p.advance(2.5) - 0.3).abs() < 1e-4);
        for _ in 0..1000 {
            let v = p.advance(0.016);
            assert!((0.3 - 1e-4..=1.0 + 1e-4).contains(&v));
        }
    }
}
