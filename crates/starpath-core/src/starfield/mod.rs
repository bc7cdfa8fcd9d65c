//! Procedural star fields: the galaxy shell, the parallax belt along the
//! path and transient shooting stars.

pub mod galaxy;
pub mod parallax;
pub mod shooting;

pub use galaxy::*;
pub use parallax::*;
pub use shooting::*;

use rand::Rng;

/// Tint plus one jitter in `±variance / 2` drawn per star and applied to
/// every channel. Channels may exceed 1 (additive HDR); only negatives are cut.
pub(crate) fn jittered_color<R: Rng + ?Sized>(
    tint: [f32; 3],
    variance: f32,
    rng: &mut R,
) -> [f32; 3] {
    let jitter = (rng.gen::<f32>() - 0.5) * variance;
    tint.map(|c| (c + jitter).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn saturated_channels_keep_their_jitter() {
        let mut rng = StdRng::seed_from_u64(5);
        let brighter = (0..200)
            .map(|_| jittered_color([0.0, 0.5, 1.0], 0.4, &mut rng))
            .filter(|c| c[2] > 1.0)
            .count();
        assert!(brighter > 0);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let c = jittered_color([0.0, 0.5, 1.0], 0.4, &mut rng);
            assert!(c[0] >= 0.0 && c[2] <= 1.2 + 1e-6);
        }
    }

    #[test]
    fn jitter_is_shared_across_channels() {
        let mut rng = StdRng::seed_from_u64(3);
        let tint = [0.5, 0.4, 0.3];
        for _ in 0..100 {
            let c = jittered_color(tint, 0.4, &mut rng);
            let d = c[0] - tint[0];
            assert!(d.abs() <= 0.2 + 1e-6);
            assert!((c[1] - tint[1] - d).abs() < 1e-6);
            assert!((c[2] - tint[2] - d).abs() < 1e-6);
        }
    }
}
